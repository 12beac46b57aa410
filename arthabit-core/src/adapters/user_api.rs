//! User service API client
//!
//! Fetches user profiles by id. The user service takes the id as a query
//! parameter and needs no auth headers.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::User;

// =============================================================================
// API Response Models (matching the user service wire format)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct UserDto {
    user_id: String,
    first_name: String,
    last_name: String,
    phone_number: i64,
    email: String,
    #[serde(default)]
    profile_pic: Option<String>,
}

// =============================================================================
// User HTTP Client
// =============================================================================

/// User service API client
#[derive(Debug)]
pub struct UserClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl UserClient {
    /// Create a new user client against the given base URL
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

    /// Fetch the profile for a user id
    pub fn get_user(&self, user_id: &str) -> Result<User> {
        let url = format!("{}/user/v1/getUser", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("userId", user_id)])
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Error::protocol(format!("Failed to fetch user: {}", status)));
        }

        let dto: UserDto = response.json().map_err(|_| Error::protocol("Empty response"))?;
        Ok(map_user(dto))
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::transport(format!(
                "Connection timed out after {} seconds",
                self.timeout_secs
            ))
        } else if error.is_connect() {
            Error::transport("Unable to connect to the user service")
        } else {
            Error::transport(format!("User request failed: {}", error))
        }
    }
}

/// Map a user DTO to the domain User
fn map_user(dto: UserDto) -> User {
    User {
        user_id: dto.user_id,
        first_name: dto.first_name,
        last_name: dto.last_name,
        phone_number: dto.phone_number,
        email: dto.email,
        profile_pic: dto.profile_pic,
    }
}

// =============================================================================
// Tests
// =============================================================================
