//! Auth service API client
//!
//! Talks to the authentication service: liveness ping, login, signup and
//! token refresh. A ping only counts as alive when the response is 2xx AND
//! the body contains a well-formed UUID (the service answers
//! "Ping Successful for user: <uuid>"); anything else is treated as an
//! expired or invalid access token.

use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};

// =============================================================================
// API Request/Response Models (matching the auth service wire format)
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshTokenRequest<'a> {
    token: &'a str,
}

/// Signup payload. Field names are the service's (snake_case); the phone
/// number is numeric on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: i64,
    pub password: String,
    pub username: String,
}

/// Success body of login, signup and refreshToken.
///
/// `token` on the wire is the refresh token. Only login and signup responses
/// carry a user id; refresh does not.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthTokens {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "token")]
    pub refresh_token: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Failure body shape shared by the backend services
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// Auth HTTP Client
// =============================================================================

/// UUID pattern the ping body must contain
const UUID_PATTERN: &str =
    r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// Auth service API client
#[derive(Debug)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
    uuid_re: Regex,
}

impl AuthClient {
    /// Create a new auth client against the given base URL
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        // The pattern is a constant, so compilation cannot fail at runtime
        let uuid_re = Regex::new(UUID_PATTERN)
            .map_err(|e| Error::Other(format!("Invalid UUID pattern: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            uuid_re,
        })
    }

    /// Liveness check for an access token.
    ///
    /// Succeeds only when the service answers 2xx and the body contains a
    /// syntactically valid UUID; returns that UUID. A 2xx body without one is
    /// a protocol error ("Invalid ping response"), a non-2xx status maps to
    /// "Ping failed: {status}".
    pub fn ping(&self, access_token: &str) -> Result<Uuid> {
        let url = format!("{}/auth/v1/ping", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Error::protocol(format!("Ping failed: {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| Error::protocol(format!("Failed to read ping response: {}", e)))?;

        self.extract_uuid(&body)
            .ok_or_else(|| Error::protocol("Invalid ping response"))
    }

    /// Exchange username/password for a fresh token set
    pub fn login(&self, username: &str, password: &str) -> Result<AuthTokens> {
        let url = format!("{}/auth/v1/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .map_err(|e| self.map_request_error(e))?;

        self.read_auth_response(response, "Login failed")
    }

    /// Register a new account; the service signs the user in on success
    pub fn signup(&self, request: &SignupRequest) -> Result<AuthTokens> {
        let url = format!("{}/auth/v1/signup", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        self.read_auth_response(response, "Signup failed")
    }

    /// Mint a new token pair from a stored refresh token
    pub fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens> {
        let url = format!("{}/auth/v1/refreshToken", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&RefreshTokenRequest {
                token: refresh_token,
            })
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Error::protocol(format!("Token refresh failed: {}", status)));
        }

        response
            .json()
            .map_err(|_| Error::protocol("Empty response"))
    }

    /// Parse a login/signup response, surfacing the backend's error message
    /// (its failure bodies carry a `message` field) or `{label}: {status}`.
    fn read_auth_response(
        &self,
        response: reqwest::blocking::Response,
        failure_label: &str,
    ) -> Result<AuthTokens> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return response.json().map_err(|_| Error::protocol("Empty response"));
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("{}: {}", failure_label, status));

        Err(Error::protocol(message))
    }

    /// Find and validate a UUID substring in a ping body
    fn extract_uuid(&self, body: &str) -> Option<Uuid> {
        let candidate = self.uuid_re.find(body)?;
        Uuid::parse_str(candidate.as_str()).ok()
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::transport(format!(
                "Connection timed out after {} seconds",
                self.timeout_secs
            ))
        } else if error.is_connect() {
            Error::transport("Unable to connect to the auth service")
        } else {
            Error::transport(format!("Auth request failed: {}", error))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
