//! Logout command - drop the stored session

use anyhow::Result;

use arthabit_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    // Tokens are dropped locally; the backend keeps no session state to revoke
    ctx.auth_service.logout()?;
    log_event(&logger, LogEvent::new("logout").with_command("logout"));

    if json {
        println!("{}", serde_json::json!({"state": "unauthenticated"}));
    } else {
        output::success("Logged out");
    }

    Ok(())
}
