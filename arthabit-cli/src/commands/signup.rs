//! Signup command - create an account and sign in

use anyhow::Result;
use dialoguer::{Input, Password};

use arthabit_core::services::SignupForm;
use arthabit_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event, SessionSummary};
use crate::output;

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

pub fn run(
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let form = SignupForm {
        first_name: prompt_if_missing(first_name, "First name")?,
        last_name: prompt_if_missing(last_name, "Last name")?,
        username: prompt_if_missing(username, "Username")?,
        email: prompt_if_missing(email, "Email")?,
        password: match password {
            Some(p) => p,
            None => Password::new().with_prompt("Password").interact()?,
        },
        phone_number: prompt_if_missing(phone, "Phone number")?,
    };

    match ctx.auth_service.signup(&form) {
        Ok(session) => {
            log_event(
                &logger,
                LogEvent::new("signup")
                    .with_command("signup")
                    .with_endpoint("/auth/v1/signup"),
            );

            if json {
                let result = OperationResult::ok(SessionSummary::new(&session));
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            output::success("Account created");
            if let Some(user_id) = &session.user_id {
                println!("  User ID: {}", user_id);
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("signup_failed")
                    .with_command("signup")
                    .with_endpoint("/auth/v1/signup")
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
