//! Login command - sign in with username and password

use anyhow::Result;
use dialoguer::{Input, Password};

use arthabit_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event, SessionSummary};
use crate::output;

pub fn run(username: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    // Prompt for whatever the flags didn't provide
    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    match ctx.auth_service.login(&username, &password) {
        Ok(session) => {
            log_event(
                &logger,
                LogEvent::new("login")
                    .with_command("login")
                    .with_endpoint("/auth/v1/login"),
            );

            if json {
                let result = OperationResult::ok(SessionSummary::new(&session));
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            output::success("Logged in");
            if let Some(user_id) = &session.user_id {
                println!("  User ID: {}", user_id);
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("login_failed")
                    .with_command("login")
                    .with_endpoint("/auth/v1/login")
                    .with_error(e.to_string()),
            );

            if json {
                let result = OperationResult::<SessionSummary>::fail(e.to_string());
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Err(e.into())
        }
    }
}
