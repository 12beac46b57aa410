//! Expense service API client
//!
//! Authenticated calls against the expense ledger. Every request carries the
//! `Authorization: Bearer <accessToken>` and `X-User-Id: <userId>` headers;
//! callers pass the credentials explicitly, this client never reads storage.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Expense, NewExpense};

// =============================================================================
// API Response Models (matching the expense service wire format)
// =============================================================================

/// An expense row as served. The service also sends `external_id` and
/// `user_id`; this client has no use for them.
#[derive(Debug, Clone, Deserialize)]
struct ExpenseDto {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    merchant: String,
    currency: String,
    created_at: String,
}

// =============================================================================
// Expense HTTP Client
// =============================================================================

/// Expense service API client
#[derive(Debug)]
pub struct ExpenseClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl ExpenseClient {
    /// Create a new expense client against the given base URL
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// Fetch the full expense list for the user. There is no pagination;
    /// callers re-fetch after any mutation.
    pub fn get_expenses(&self, access_token: &str, user_id: &str) -> Result<Vec<Expense>> {
        let url = format!("{}/expense/v1/getExpense", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("X-User-Id", user_id)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Error::protocol(format!(
                "Failed to fetch expenses: {}",
                status
            )));
        }

        let dtos: Vec<ExpenseDto> = response
            .json()
            .map_err(|_| Error::protocol("Empty response"))?;

        Ok(dtos.into_iter().map(map_expense).collect())
    }

    /// Submit a validated expense. The response body is not used; any 2xx
    /// status (the service answers 201) counts as success.
    pub fn add_expense(
        &self,
        access_token: &str,
        user_id: &str,
        expense: &NewExpense,
    ) -> Result<()> {
        let url = format!("{}/expense/v1/addExpense", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("X-User-Id", user_id)
            .json(expense)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Error::protocol(format!("Failed to add expense: {}", status)));
        }

        Ok(())
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::transport(format!(
                "Connection timed out after {} seconds",
                self.timeout_secs
            ))
        } else if error.is_connect() {
            Error::transport("Unable to connect to the expense service")
        } else {
            Error::transport(format!("Expense request failed: {}", error))
        }
    }
}

/// Map an expense DTO to the domain Expense
fn map_expense(dto: ExpenseDto) -> Expense {
    Expense {
        amount: dto.amount,
        merchant: dto.merchant,
        currency: dto.currency,
        created_at: parse_created_at(&dto.created_at),
    }
}

/// Parse the service's ISO date-time, tolerating a missing offset.
/// Unparseable values fall back to "now" rather than failing the whole list.
fn parse_created_at(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    Utc::now()
}

// =============================================================================
// Tests
// =============================================================================
