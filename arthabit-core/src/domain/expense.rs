//! Expense domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::result::Error;

/// Currencies the add-expense form offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Inr, Currency::Usd];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            other => Err(Error::validation(format!("Invalid currency: {}", other))),
        }
    }
}

/// A single expense as served by the expense service.
///
/// The inbound currency is kept as the raw string the backend stored;
/// only the creation path restricts it to [`Currency`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub merchant: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// "INR 250.00" style display string
    pub fn formatted_amount(&self) -> String {
        format!("{} {:.2}", self.currency, self.amount)
    }

    /// "Aug 25" style display string
    pub fn formatted_date(&self) -> String {
        self.created_at.format("%b %-d").to_string()
    }
}

/// A validated expense submission.
///
/// Construction goes through [`NewExpense::parse`], which applies the same
/// checks the entry form does before any network call is made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub merchant: String,
    pub currency: Currency,
}

impl NewExpense {
    /// Validate raw form input into a submission.
    ///
    /// Rejects non-numeric or non-positive amounts and blank merchants
    /// locally; the merchant is trimmed before sending.
    pub fn parse(amount: &str, merchant: &str, currency: &str) -> Result<Self, Error> {
        let amount = match Decimal::from_str(amount.trim()) {
            Ok(value) if value > Decimal::ZERO => value,
            _ => {
                return Err(Error::validation(
                    "Please enter a valid amount greater than 0",
                ))
            }
        };

        let merchant = merchant.trim();
        if merchant.is_empty() {
            return Err(Error::validation("Please enter a merchant name"));
        }

        Ok(Self {
            amount,
            merchant: merchant.to_string(),
            currency: currency.parse()?,
        })
    }
}
