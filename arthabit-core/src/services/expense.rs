//! Expense service - list and record expenses for the signed-in user
//!
//! Input validation runs before any credential lookup or network call, so a
//! malformed amount never costs a round trip.

use std::sync::Arc;

use crate::adapters::expense_api::ExpenseClient;
use crate::domain::result::Result;
use crate::domain::{Expense, NewExpense};
use crate::ports::TokenStore;
use crate::services::SessionService;

/// Expense service for the expense history and new entries
pub struct ExpenseService {
    expense_client: ExpenseClient,
    session: SessionService,
}

impl ExpenseService {
    pub fn new(expense_client: ExpenseClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            expense_client,
            session: SessionService::new(store),
        }
    }

    /// Fetch the expense history for the current session
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let access_token = self.session.require_access_token()?;
        let user_id = self.session.require_user_id()?;
        self.expense_client.get_expenses(&access_token, &user_id)
    }

    /// Validate and record a new expense, then return the refreshed history.
    ///
    /// The service answers the add call with no useful body, so the updated
    /// list comes from a second fetch.
    pub fn add_expense(
        &self,
        amount: &str,
        merchant: &str,
        currency: &str,
    ) -> Result<Vec<Expense>> {
        let expense = NewExpense::parse(amount, merchant, currency)?;

        let access_token = self.session.require_access_token()?;
        let user_id = self.session.require_user_id()?;
        self.expense_client
            .add_expense(&access_token, &user_id, &expense)?;

        self.expense_client.get_expenses(&access_token, &user_id)
    }
}
