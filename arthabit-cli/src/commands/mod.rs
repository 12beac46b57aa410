//! One module per ah subcommand, plus the shared setup helpers

pub mod add;
pub mod expenses;
pub mod login;
pub mod logout;
pub mod logs;
pub mod profile;
pub mod signup;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use arthabit_core::{mask_token, ArthabitContext, EntryPoint, LogEvent, LoggingService, Session};

/// What `--json` callers of login and signup get back. The access token is
/// masked before it reaches stdout; scripts that need the real token read
/// credentials.json directly.
#[derive(Serialize)]
pub struct SessionSummary {
    pub user_id: Option<String>,
    pub access_token: String,
}

impl SessionSummary {
    pub fn new(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            access_token: mask_token(&session.access_token),
        }
    }
}

/// Event logger for the current invocation, or None when the log cannot
/// be opened. A command never fails because its logging did.
pub fn get_logger() -> Option<LoggingService> {
    let arthabit_dir = get_arthabit_dir();
    std::fs::create_dir_all(&arthabit_dir).ok()?;
    LoggingService::new(&arthabit_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Best-effort write to the event log
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// The arthabit data directory: $ARTHABIT_DIR when set, else ~/.arthabit
pub fn get_arthabit_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ARTHABIT_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not determine home directory")
            .join(".arthabit")
    }
}

/// Build the context every command runs against, creating the data
/// directory on first use
pub fn get_context() -> Result<ArthabitContext> {
    let arthabit_dir = get_arthabit_dir();

    std::fs::create_dir_all(&arthabit_dir)
        .with_context(|| format!("Failed to create arthabit directory: {:?}", arthabit_dir))?;

    ArthabitContext::new(&arthabit_dir).context("Failed to initialize arthabit context")
}
