use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style, Table as TabledTable, Tabled};

use datahub_cli::normalize::{display_value, Table, INACTIVE_DAYS_COLUMN};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Tsv,
}

static FORMAT: AtomicU8 = AtomicU8::new(0);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_format(format: OutputFormat) {
    FORMAT.store(format as u8, Ordering::Relaxed);
}

pub fn format() -> OutputFormat {
    match FORMAT.load(Ordering::Relaxed) {
        1 => OutputFormat::Json,
        2 => OutputFormat::Tsv,
        _ => OutputFormat::Table,
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Print a normalized table in the current output format.
pub fn print_table(table: &Table) {
    match format() {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&table.to_records()).unwrap_or_default()
            );
        }
        OutputFormat::Tsv => print!("{}", table.to_tsv()),
        OutputFormat::Table => {
            let status = table.column_index("status");
            let inactive = table.column_index(INACTIVE_DAYS_COLUMN);

            let mut builder = Builder::default();
            builder.push_record(table.columns.iter().cloned());
            for row in &table.rows {
                builder.push_record(row.iter().enumerate().map(|(i, cell)| {
                    let text = truncate(&display_value(cell), 40);
                    if Some(i) == status {
                        status_colored(&text)
                    } else if Some(i) == inactive {
                        inactive_colored(cell.as_i64(), &text)
                    } else {
                        text
                    }
                }));
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
    }
}

/// Print typed rows as a table, or the items themselves as JSON/TSV.
pub fn print_rows<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    match format() {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            println!("{}", TabledTable::new(rows).with(Style::rounded()));
        }
        _ => {
            let records: Vec<serde_json::Value> = items
                .iter()
                .filter_map(|item| serde_json::to_value(item).ok())
                .collect();
            print_table(&Table::from_records(&records));
        }
    }
}

/// Print a message (skipped when quiet, or prints simple object in JSON mode)
pub fn print_message(message: &str) {
    if QUIET.load(Ordering::Relaxed) {
        return;
    }
    if format() == OutputFormat::Json {
        println!("{}", serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

/// Format submission status with color
pub fn status_colored(status: &str) -> String {
    let lower = status.to_lowercase();
    if lower.contains("completed") || lower.contains("released") {
        status.green().to_string()
    } else if lower.contains("progress") || lower.contains("submitted") {
        status.blue().to_string()
    } else if lower.contains("rejected")
        || lower.contains("canceled")
        || lower.contains("withdrawn")
    {
        status.red().to_string()
    } else if lower.contains("archived") || lower.contains("deleted") {
        status.bright_black().to_string()
    } else {
        status.to_string()
    }
}

/// Highlight submissions that have been idle for a long time.
pub fn inactive_colored(days: Option<i64>, text: &str) -> String {
    match days {
        Some(d) if d >= 60 => text.red().bold().to_string(),
        Some(d) if d >= 30 => text.yellow().to_string(),
        _ => text.to_string(),
    }
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_round_trips_through_atomic() {
        set_format(OutputFormat::Tsv);
        assert_eq!(format(), OutputFormat::Tsv);
        set_format(OutputFormat::Table);
        assert_eq!(format(), OutputFormat::Table);
    }
}
