//! Console rendering for CLI commands.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// How command results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bordered table
    #[default]
    Table,
    /// Pretty-printed JSON, for scripts
    Json,
}

/// Print one result row, e.g. a sweep summary.
pub fn print_record<T: Serialize + Tabled>(record: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new([record]);
            table.with(Style::rounded());
            println!("{table}");
        }
        OutputFormat::Json => match serde_json::to_string_pretty(record) {
            Ok(json) => println!("{json}"),
            Err(e) => print_error(&format!("Could not encode result: {e}")),
        },
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Indented `label: value` line under a notification heading.
pub fn print_kv(label: &str, value: &str) {
    println!("   {:<10}{value}", format!("{label}:"));
}
