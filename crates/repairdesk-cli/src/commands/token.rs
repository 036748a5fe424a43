//! Development token minting.

use anyhow::Context;
use clap::Args;

use repairdesk_auth::JwtEncoder;

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Numeric user id
    #[arg(long)]
    pub user_id: i64,

    /// Username; also the principal's push group
    #[arg(long)]
    pub username: String,

    /// Role name: Admin, Manager, Maintainer or Student
    #[arg(long)]
    pub role: String,

    /// Lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    pub ttl: i64,
}

/// Sign a token with the configured secret and print it.
pub fn execute(args: &TokenArgs, config_path: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let encoder = JwtEncoder::new(&config.auth);

    let token = encoder
        .issue(args.user_id, &args.username, &args.role, args.ttl)
        .context("Failed to sign token")?;

    println!("{token}");
    Ok(())
}
