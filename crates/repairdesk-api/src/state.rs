//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use repairdesk_auth::jwt::JwtDecoder;
use repairdesk_auth::rbac::PermissionResolver;
use repairdesk_cache::{CacheManager, ReadCache};
use repairdesk_core::config::AppConfig;
use repairdesk_database::Stores;
use repairdesk_realtime::RealtimeEngine;
use repairdesk_service::notification::{NotificationService, PushGateway};
use repairdesk_service::order::{OrderService, OrderServiceConfig};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// One handle per store trait (PostgreSQL or in-memory)
    pub stores: Stores,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Role to action resolution, defaults plus the stored relation
    pub permission_resolver: Arc<PermissionResolver>,

    // ── Realtime ─────────────────────────────────────────────
    pub realtime: Arc<RealtimeEngine>,

    // ── Services ─────────────────────────────────────────────
    pub notification_service: Arc<NotificationService>,
    pub order_service: Arc<OrderService>,
}

impl AppState {
    /// Wires services over the given stores and cache.
    ///
    /// The realtime engine's connection manager is the push gateway the
    /// notification service delivers through.
    pub fn new(config: AppConfig, stores: Stores, cache: Arc<CacheManager>) -> Self {
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
        let gateway: Arc<dyn PushGateway> = realtime.connections.clone();

        let notification_service = Arc::new(NotificationService::new(
            Arc::clone(&stores.notifications),
            gateway,
        ));

        let order_service = Arc::new(OrderService::new(
            Arc::clone(&stores.orders),
            Arc::clone(&stores.users),
            Arc::clone(&notification_service),
            ReadCache::new(Arc::clone(&cache)),
            OrderServiceConfig::from_cache_config(&config.cache),
        ));

        let permission_resolver = Arc::new(PermissionResolver::with_store(Arc::clone(
            &stores.role_permissions,
        )));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            stores,
            cache,
            jwt_decoder,
            permission_resolver,
            realtime,
            notification_service,
            order_service,
        }
    }
}
