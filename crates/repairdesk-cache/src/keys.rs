//! Cache key builders for every RepairDesk cache entry.
//!
//! Centralising key construction keeps listing keys and their
//! invalidation pattern in agreement.

/// Prefix applied to all RepairDesk cache keys.
const PREFIX: &str = "repairdesk";

// ── Order keys ─────────────────────────────────────────────

/// Key for one page of an order listing, as seen by one actor.
pub fn order_list(filter: &str, page: u64, page_size: u64, actor: &str) -> String {
    format!("{PREFIX}:orders:list:{filter}:p{page}:s{page_size}:u{actor}")
}

/// Pattern wiping every cached order listing.
pub fn order_list_pattern() -> String {
    format!("{PREFIX}:orders:list:*")
}

// ── User keys ──────────────────────────────────────────────

/// Key for the active maintainer roster.
pub fn maintainer_roster() -> String {
    format!("{PREFIX}:users:maintainers")
}
