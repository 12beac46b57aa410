//! Session domain model
//!
//! A session is the locally persisted credential set for one signed-in user:
//! the short-lived access token, the long-lived refresh token, and the user id
//! the backend returned at login. Tokens are opaque server-issued strings and
//! are never logged or displayed in full.

use serde::{Deserialize, Serialize};

/// Credentials for an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Not every auth response carries a user id (refresh does not)
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            user_id,
        }
    }
}

/// Shorten a token for display. Full tokens never appear in output or logs.
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}
