//! CLI command definitions and dispatch.

pub mod listen;
pub mod migrate;
pub mod serve;
pub mod sweep;
pub mod token;

use anyhow::Context;
use clap::{Parser, Subcommand};

use repairdesk_core::config::AppConfig;

use crate::output::OutputFormat;

/// RepairDesk: dormitory repair ticketing
#[derive(Debug, Parser)]
#[command(name = "repairdesk", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the RepairDesk server
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// Run the timeout sweep once and exit
    Sweep(sweep::SweepArgs),
    /// Connect to the live channel and print incoming notifications
    Listen(listen::ListenArgs),
    /// Mint a development access token
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> anyhow::Result<()> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate => migrate::execute(&self.config).await,
            Commands::Sweep(args) => sweep::execute(args, &self.config, self.format).await,
            Commands::Listen(args) => listen::execute(args, &self.config).await,
            Commands::Token(args) => token::execute(args, &self.config),
        }
    }

    /// The server logs at `info`; one-shot commands keep quiet unless asked.
    pub fn default_log_level(&self) -> &'static str {
        match self.command {
            Commands::Serve(_) => "info",
            _ => "warn",
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> anyhow::Result<AppConfig> {
    AppConfig::load(config_path)
        .with_context(|| format!("Failed to load config from '{config_path}'"))
}
