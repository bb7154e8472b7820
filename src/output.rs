//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows as a table, or the underlying values as JSON.
pub fn print_list<R, T>(rows: &[R], values: &[T], format: OutputFormat)
where
    R: Tabled,
    T: Serialize,
{
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => print_json(values),
    }
}

/// Print one value: key/value lines for tables, JSON otherwise.
pub fn print_item<T: Serialize>(pairs: &[(&str, String)], value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            for (key, val) in pairs {
                print_kv(key, val);
            }
        }
        OutputFormat::Json => print_json(value),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => print_error(&format!("Failed to serialize output: {e}")),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{key}:"), value);
}
