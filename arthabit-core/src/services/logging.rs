//! Logging service - append-only event log in logs.jsonl
//!
//! Every command and backend call leaves one JSON line describing what
//! happened, never what data was involved: tokens, amounts, merchants and
//! profile fields stay out of the log. The CLI and the desktop shell write
//! to the same file, so entries record which shell produced them.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Distinguishes ids minted within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Entry id: millisecond timestamp in the high 48 bits, insertion counter
/// in the low 16. Sorting by id is sorting by write order.
fn generate_id() -> u64 {
    let timestamp = Utc::now().timestamp_millis() as u64;
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Which shell wrote the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Desktop,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Desktop => "desktop",
        }
    }
}

/// An event about to be recorded, before the service stamps it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            endpoint: None,
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    /// Backend endpoint the event concerns
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// CLI command the event came from
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// The failure message shown to the user
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Extra failure context, typically the HTTP status
    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// One parsed line of logs.jsonl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub endpoint: Option<String>,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

/// Writer and query interface over logs.jsonl
///
/// Writes serialize through a mutex and append one line per entry; reads
/// load the whole file and drop lines that fail to parse, so one mangled
/// line never makes the log unreadable.
pub struct LoggingService {
    log_path: PathBuf,
    write_lock: Mutex<()>,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Open the log, creating the directory and an empty logs.jsonl when
    /// this is the first run.
    pub fn new(
        arthabit_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        let log_path = arthabit_dir.join("logs.jsonl");
        std::fs::create_dir_all(arthabit_dir)?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            log_path,
            write_lock: Mutex::new(()),
            entry_point,
            app_version: app_version.into(),
            platform: std::env::consts::OS,
        })
    }

    /// Record one event. The service stamps the id, timestamp, entry point,
    /// app version and platform before the line is written.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: generate_id(),
            timestamp: Utc::now().timestamp_millis(),
            entry_point: self.entry_point.as_str().to_string(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            endpoint: event.endpoint,
            command: event.command,
            error_message: event.error_message,
            error_details: event.error_details,
        };
        let line = serde_json::to_string(&entry)?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", line)?;

        Ok(())
    }

    /// Bare event with no context
    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    /// Record that a CLI command ran
    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    /// Record a failure, with optional extra detail
    pub fn log_error(&self, event: &str, message: &str, details: Option<&str>) -> Result<()> {
        let mut failure = LogEvent::new(event).with_error(message);
        if let Some(details) = details {
            failure = failure.with_error_details(details);
        }
        self.log(failure)
    }

    /// Read all entries, skipping lines that fail to parse
    fn read_entries(&self) -> Result<Vec<LogEntry>> {
        let content = match std::fs::read_to_string(&self.log_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }

    /// The most recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_entries()?;
        // The id embeds the timestamp plus an insertion counter, so sorting
        // by id gives a stable newest-first order even within one millisecond
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        entries.truncate(limit);
        Ok(entries)
    }

    /// The most recent entries that carry an error, newest first
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_entries()?;
        entries.retain(|entry| entry.error_message.is_some());
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Total number of readable entries
    pub fn count(&self) -> Result<u64> {
        Ok(self.read_entries()?.len() as u64)
    }

    /// Drop entries older than the cutoff (unix ms), returning how many went
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {}", e))?;

        let entries = self.read_entries()?;
        let kept: Vec<&LogEntry> = entries
            .iter()
            .filter(|entry| entry.timestamp >= timestamp_ms)
            .collect();
        let deleted = (entries.len() - kept.len()) as u64;

        let mut lines = String::new();
        for entry in kept {
            lines.push_str(&serde_json::to_string(entry)?);
            lines.push('\n');
        }
        std::fs::write(&self.log_path, lines)?;

        Ok(deleted)
    }

    /// Copy the log file somewhere it can be attached to a bug report
    pub fn export(&self, output_path: &Path) -> Result<PathBuf> {
        std::fs::copy(&self.log_path, output_path)?;
        Ok(output_path.to_path_buf())
    }

    /// Path of the backing file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
