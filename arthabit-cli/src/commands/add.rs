//! Add command - record a new expense

use anyhow::Result;
use dialoguer::Input;

use arthabit_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(
    amount: Option<String>,
    merchant: Option<String>,
    currency: &str,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let amount = match amount {
        Some(a) => a,
        None => Input::new().with_prompt("Amount").interact_text()?,
    };
    let merchant = match merchant {
        Some(m) => m,
        None => Input::new().with_prompt("Merchant").interact_text()?,
    };

    match ctx.expense_service.add_expense(&amount, &merchant, currency) {
        Ok(expenses) => {
            log_event(
                &logger,
                LogEvent::new("expense_added")
                    .with_command("add")
                    .with_endpoint("/expense/v1/addExpense"),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&expenses)?);
                return Ok(());
            }

            output::success("Expense added");
            println!("  {} expense(s) on record", expenses.len());
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("expense_add_failed")
                    .with_command("add")
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}
