//! `repairdesk serve`: run the HTTP/WebSocket server in the foreground.

use anyhow::Context;
use clap::Args;

use repairdesk_core::config::AppConfig;

use crate::output;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen on this port instead of `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind to this address instead of `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Skip the scheduled timeout sweep, e.g. when another instance runs it
    #[arg(long)]
    pub no_sweeper: bool,
}

impl ServeArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if self.no_sweeper {
            config.sweeper.enabled = false;
        }
    }
}

pub async fn execute(args: &ServeArgs, config_path: &str) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    args.apply(&mut config);

    output::print_kv("listen", &format!("{}:{}", config.server.host, config.server.port));
    output::print_kv(
        "sweeper",
        if config.sweeper.enabled { config.sweeper.cron.as_str() } else { "disabled" },
    );

    repairdesk_api::run_server(config)
        .await
        .context("Server exited with an error")
}
