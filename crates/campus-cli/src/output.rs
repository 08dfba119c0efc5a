//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;
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

fn pretty<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
}

/// Print rows as a table, or as a JSON array
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", pretty(rows, "[]")),
        OutputFormat::Table if rows.is_empty() => println!("Nothing to show."),
        OutputFormat::Table => println!("{}", Table::new(rows)),
    }
}

/// Print one value: its top-level fields as aligned pairs, or as JSON
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    if format == OutputFormat::Json {
        println!("{}", pretty(item, "{}"));
        return;
    }
    match serde_json::to_value(item) {
        Ok(Value::Object(fields)) => {
            for (key, value) in &fields {
                match value {
                    Value::String(s) => print_kv(key, s),
                    other => print_kv(key, &other.to_string()),
                }
            }
        }
        Ok(other) => println!("{other}"),
        Err(e) => print_warning(&format!("Cannot display result: {e}")),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {value}", format!("{key}:"));
}
