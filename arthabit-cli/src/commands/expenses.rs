//! Expenses command - list recorded expenses

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;

use arthabit_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let expenses = ctx.expense_service.list_expenses()?;
    log_event(
        &logger,
        LogEvent::new("expenses_listed")
            .with_command("expenses")
            .with_endpoint("/expense/v1/getExpense"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }

    if expenses.is_empty() {
        output::warning("No expenses yet. Use 'ah add' to record one.");
        return Ok(());
    }

    let mut table = output::create_table(&["Date", "Merchant", "Amount"]);
    for expense in &expenses {
        table.add_row(vec![
            expense.formatted_date(),
            expense.merchant.clone(),
            expense.formatted_amount(),
        ]);
    }
    println!("{}", table);

    // One total per currency, INR and USD don't sum into a single number
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for expense in &expenses {
        *totals
            .entry(expense.currency.as_str())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    let summary = totals
        .iter()
        .map(|(currency, total)| format!("{} {:.2}", currency, total))
        .collect::<Vec<_>>()
        .join(", ");

    println!();
    println!("Total: {}", summary.bold());
    println!("{} expense(s)", expenses.len());

    Ok(())
}
