//! Profile command - show the signed-in user's profile

use anyhow::Result;
use colored::Colorize;

use arthabit_core::LogEvent;

use super::{get_context, get_logger, log_event};

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let user = ctx.user_service.get_profile()?;
    log_event(
        &logger,
        LogEvent::new("profile_viewed")
            .with_command("profile")
            .with_endpoint("/user/v1/getUser"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{}", user.full_name().bold());
    println!();
    println!("  Email: {}", user.email);
    println!("  Phone: {}", user.formatted_phone());
    println!("  User ID: {}", user.user_id);
    if let Some(pic) = &user.profile_pic {
        println!("  Profile picture: {}", pic);
    }

    Ok(())
}
