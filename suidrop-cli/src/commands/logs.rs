//! Logs command - view and manage the event log

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;

use suidrop_core::services::logging::now_ms;
use suidrop_core::services::LoggingService;

use super::get_suidrop_dir;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Show every event of one run
        #[arg(long, conflicts_with = "errors")]
        run: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear old log entries
    Clear {
        /// Delete logs older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy the log database to a file for troubleshooting
    Export {
        /// Destination file
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn get_logging_service() -> Result<LoggingService> {
    let suidrop_dir = get_suidrop_dir()?;
    LoggingService::new(&suidrop_dir, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{TimeZone, Utc};
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// First block of a run id, enough to tell runs apart in a table
fn short_run_id(run_id: &str) -> &str {
    run_id.split('-').next().unwrap_or(run_id)
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List {
            limit,
            errors,
            run,
            json,
        } => {
            let service = get_logging_service()?;
            let entries = match (&run, errors) {
                (Some(run_id), _) => service.get_run(run_id)?,
                (None, true) => service.get_errors(limit)?,
                (None, false) => service.get_recent(limit)?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Run", "Event", "Context", "Digest", "Error"]);

            for entry in &entries {
                let context = [entry.command.as_deref(), entry.network.as_deref()]
                    .iter()
                    .filter_map(|&s| s)
                    .collect::<Vec<_>>()
                    .join(", ");

                let error_indicator = if entry.error_message.is_some() {
                    "!".red().to_string()
                } else {
                    String::new()
                };

                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    entry.run_id.as_deref().map(short_run_id).unwrap_or("").to_string(),
                    entry.event.clone(),
                    context,
                    entry.tx_digest.clone().unwrap_or_default(),
                    error_indicator,
                ]);
            }

            println!("{}", table);

            // Show error details if any
            let error_entries: Vec<_> = entries
                .iter()
                .filter(|e| e.error_message.is_some())
                .take(3)
                .collect();
            if !error_entries.is_empty() {
                println!();
                println!("{}", "Recent Errors:".red().bold());
                for err in error_entries {
                    println!(
                        "  {} [{}]: {}",
                        format_timestamp(err.timestamp).dimmed(),
                        err.event,
                        err.error_message.as_deref().unwrap_or("Unknown error")
                    );
                }
            }
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let service = get_logging_service()?;
            let cutoff_ms = now_ms() - (older_than_days as i64 * 24 * 60 * 60 * 1000);

            if !force && !json {
                use dialoguer::Confirm;
                if !Confirm::new()
                    .with_prompt(format!("Delete logs older than {} days?", older_than_days))
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = service.delete_before(cutoff_ms)?;

            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                println!("Deleted {} log entries", deleted);
            }
        }
        LogsCommands::Export { path, json } => {
            let service = get_logging_service()?;
            if path.as_path() == service.db_path() {
                bail!("Export path is the live log database");
            }
            let entries = service.count()?;
            let exported = service.export(&path)?;

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "path": exported.to_string_lossy(),
                        "entries": entries
                    })
                );
            } else {
                output::success(&format!(
                    "Exported {} log entries to {}",
                    entries,
                    exported.display()
                ));
            }
        }
        LogsCommands::Stats { json } => {
            let service = get_logging_service()?;
            let stats = service.stats()?;
            let db_path = service.db_path().to_path_buf();
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "total_entries": stats.total,
                        "error_count": stats.errors,
                        "run_count": stats.runs,
                        "oldest": stats.oldest,
                        "newest": stats.newest,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes
                    })
                );
            } else {
                println!("{}", "Log Statistics".bold());
                println!("  Total entries: {}", stats.total);
                println!("  Errors: {}", stats.errors);
                println!("  Runs: {}", stats.runs);
                if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
                    println!(
                        "  Range: {} to {}",
                        format_timestamp(oldest),
                        format_timestamp(newest)
                    );
                }
                println!("  Database: {}", db_path.display());
                println!("  Size: {}", output::format_size(size_bytes));
            }
        }
    }

    Ok(())
}
