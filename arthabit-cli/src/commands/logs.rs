//! Logs command - inspect and prune the event log

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use arthabit_core::{EntryPoint, LogEntry, LoggingService};

use super::get_arthabit_dir;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent entries
    List {
        /// How many entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only entries that carry an error
        #[arg(long)]
        errors: bool,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
    /// Delete entries older than a cutoff
    Clear {
        /// Age cutoff in days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Don't ask for confirmation
        #[arg(long, short = 'f')]
        force: bool,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
    /// Show entry counts and file size
    Stats {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
    /// Copy the log file for a bug report
    Export {
        /// Destination path
        path: PathBuf,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = open_log()?;

    match command {
        LogsCommands::List {
            limit,
            errors,
            json,
        } => list(&service, limit, errors, json),
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => clear(&service, older_than_days, force, json),
        LogsCommands::Stats { json } => stats(&service, json),
        LogsCommands::Export { path } => export(&service, &path),
    }
}

fn open_log() -> Result<LoggingService> {
    LoggingService::new(&get_arthabit_dir(), EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn list(service: &LoggingService, limit: usize, errors_only: bool, json: bool) -> Result<()> {
    let entries = if errors_only {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("The log is empty.");
        return Ok(());
    }

    let mut table = output::create_table(&["Time", "Source", "Event", "Context", ""]);
    for entry in &entries {
        let marker = if entry.error_message.is_some() {
            "!".red().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.entry_point.clone(),
            entry.event.clone(),
            describe_context(entry),
            marker,
        ]);
    }
    println!("{}", table);

    if !errors_only {
        print_recent_errors(service)?;
    }

    Ok(())
}

/// The command and endpoint columns collapsed into one cell
fn describe_context(entry: &LogEntry) -> String {
    match (entry.command.as_deref(), entry.endpoint.as_deref()) {
        (Some(command), Some(endpoint)) => format!("{} {}", command, endpoint),
        (Some(command), None) => command.to_string(),
        (None, Some(endpoint)) => endpoint.to_string(),
        (None, None) => String::new(),
    }
}

fn print_recent_errors(service: &LoggingService) -> Result<()> {
    let recent = service.get_errors(3)?;
    if recent.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", "Recent errors:".red().bold());
    for entry in &recent {
        println!(
            "  {}  {} - {}",
            format_timestamp(entry.timestamp).dimmed(),
            entry.event,
            entry.error_message.as_deref().unwrap_or("unknown"),
        );
    }

    Ok(())
}

fn clear(service: &LoggingService, older_than_days: u64, force: bool, json: bool) -> Result<()> {
    let cutoff_ms = Utc::now().timestamp_millis() - (older_than_days as i64) * 86_400_000;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete log entries older than {} days?",
                older_than_days
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = service.delete_before(cutoff_ms)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        println!("Removed {} log entries", deleted);
    }

    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let total = service.count()?;
    let error_count = service.get_errors(usize::MAX)?.len();
    let log_path = service.log_path();
    let size_bytes = std::fs::metadata(log_path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "entries": total,
                "errors": error_count,
                "path": log_path.to_string_lossy(),
                "size_bytes": size_bytes,
            })
        );
        return Ok(());
    }

    println!("{}", "Event log".bold());
    println!("  Entries: {}", total);
    println!("  Errors: {}", error_count);
    println!("  File: {}", log_path.display());
    println!("  Size: {}", output::format_size(size_bytes));

    Ok(())
}

fn export(service: &LoggingService, path: &Path) -> Result<()> {
    let exported = service.export(path)?;
    output::success(&format!("Exported logs to {}", exported.display()));
    Ok(())
}

fn format_timestamp(timestamp_ms: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}
