//! Status command - probe the stored session against the backend

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::ProgressBar;
use serde::Serialize;

use arthabit_core::services::{AuthState, BootstrapPath};
use arthabit_core::{mask_token, LogEvent};

use super::{get_context, get_logger, log_event};

/// Everything `--json` reports about the session probe
#[derive(Serialize)]
struct StatusView {
    state: AuthState,
    path: BootstrapPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    /// Masked, the full token never leaves the store
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    // The probe can take two round trips, so show where we are while it runs.
    // indicatif draws to stderr, gate on that stream.
    let spinner = if !json && atty::is(atty::Stream::Stderr) {
        let bar = ProgressBar::new_spinner();
        bar.set_message(format!("{}...", AuthState::Checking));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let probe = ctx.auth_service.bootstrap();

    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    let report = match probe {
        Ok(report) => report,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("session_check_failed")
                    .with_command("status")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };
    log_event(
        &logger,
        LogEvent::new("session_checked").with_command("status"),
    );

    let session = ctx.session_service.load_session()?;
    let view = StatusView {
        state: report.state,
        path: report.path,
        detail: report.detail,
        user_id: session.as_ref().and_then(|s| s.user_id.clone()),
        access_token: session.as_ref().map(|s| mask_token(&s.access_token)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", "Session Status".bold());
    println!();

    // The probe has resolved by the time we print, so checking only ever
    // labels the spinner
    let state_label = match view.state {
        AuthState::Checking => "checking".dimmed().to_string(),
        AuthState::Authenticated => "authenticated".green().bold().to_string(),
        AuthState::Unauthenticated => "unauthenticated".yellow().bold().to_string(),
    };
    println!("  State: {}", state_label);

    match view.path {
        BootstrapPath::Ping => println!("  Probe: stored access token accepted"),
        BootstrapPath::Refresh => println!("  Probe: access token rotated via refresh"),
        BootstrapPath::None => {}
    }

    if let Some(detail) = &view.detail {
        println!("  Reason: {}", detail.dimmed());
    }
    if let Some(user_id) = &view.user_id {
        println!("  User ID: {}", user_id);
    }
    if let Some(token) = &view.access_token {
        println!("  Access token: {}", token);
    }

    if view.state == AuthState::Unauthenticated {
        println!();
        println!("{}", "Not signed in. Run 'ah login' to sign in.".yellow());
    }

    Ok(())
}
