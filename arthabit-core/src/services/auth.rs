//! Auth service - session bootstrap, login, signup and logout
//!
//! The bootstrap probe decides the auth state on startup without user input:
//! ping the auth service with the stored access token, and if that is
//! rejected fall back to the refresh token. Only an explicit logout or a
//! successful refresh ever mutates the stored credentials; a failed probe
//! leaves them exactly as they were.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::auth_api::{AuthClient, AuthTokens, SignupRequest};
use crate::domain::result::{Error, Result};
use crate::domain::Session;
use crate::ports::TokenStore;
use crate::services::SessionService;

/// Authentication state as seen by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    /// Probe in flight, state not yet known
    Checking,
    Authenticated,
    Unauthenticated,
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AuthState::Checking => "checking",
            AuthState::Authenticated => "authenticated",
            AuthState::Unauthenticated => "unauthenticated",
        };
        write!(f, "{}", label)
    }
}

/// Which probe step produced the final state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapPath {
    /// The stored access token is still valid
    Ping,
    /// The access token was rotated via the refresh token
    Refresh,
    /// Neither step succeeded
    None,
}

/// Outcome of a bootstrap probe
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub state: AuthState,
    pub path: BootstrapPath,
    /// The error that blocked authentication, for display and logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl BootstrapReport {
    fn authenticated(path: BootstrapPath) -> Self {
        Self {
            state: AuthState::Authenticated,
            path,
            detail: None,
        }
    }

    fn unauthenticated(detail: impl Into<String>) -> Self {
        Self {
            state: AuthState::Unauthenticated,
            path: BootstrapPath::None,
            detail: Some(detail.into()),
        }
    }
}

/// Raw signup input before validation
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

/// Auth service tying the auth client to the token store
pub struct AuthService {
    auth_client: AuthClient,
    session: SessionService,
}

impl AuthService {
    pub fn new(auth_client: AuthClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            auth_client,
            session: SessionService::new(store),
        }
    }

    /// Decide the auth state from the stored credentials.
    ///
    /// Ping with the stored access token first. On any ping failure, attempt
    /// a token refresh; a successful refresh persists the rotated pair and
    /// authenticates. When both steps fail the stored credentials are left
    /// untouched and the blocking error is reported in `detail`. Returns
    /// `Err` only when the token store itself cannot be read or written.
    pub fn bootstrap(&self) -> Result<BootstrapReport> {
        if let Some(access_token) = self.session.access_token()? {
            // The ping body carries the user's UUID, but the stored user id
            // stays authoritative; the UUID is only proof of liveness.
            if self.auth_client.ping(&access_token).is_ok() {
                return Ok(BootstrapReport::authenticated(BootstrapPath::Ping));
            }
        }

        let refresh_token = match self.session.refresh_token()? {
            Some(refresh_token) => refresh_token,
            None => return Ok(BootstrapReport::unauthenticated("No refresh token")),
        };

        match self.auth_client.refresh_token(&refresh_token) {
            Ok(tokens) => {
                self.persist(&tokens)?;
                Ok(BootstrapReport::authenticated(BootstrapPath::Refresh))
            }
            Err(e) => Ok(BootstrapReport::unauthenticated(e.to_string())),
        }
    }

    /// Authenticate with username and password and persist the session
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() {
            return Err(Error::validation("Username cannot be empty"));
        }
        if password.trim().is_empty() {
            return Err(Error::validation("Password cannot be empty"));
        }

        let tokens = self.auth_client.login(username, password)?;
        let session = self.persist(&tokens)?;
        Ok(session)
    }

    /// Register a new account and persist the session
    pub fn signup(&self, form: &SignupForm) -> Result<Session> {
        let request = validate_signup(form)?;
        let tokens = self.auth_client.signup(&request)?;
        let session = self.persist(&tokens)?;
        Ok(session)
    }

    /// Drop the stored session. Purely local: the backend keeps no session
    /// state to invalidate, and calling this twice is harmless.
    pub fn logout(&self) -> Result<()> {
        self.session.clear_tokens()
    }

    fn persist(&self, tokens: &AuthTokens) -> Result<Session> {
        self.session.save_tokens(
            &tokens.access_token,
            &tokens.refresh_token,
            tokens.user_id.as_deref(),
        )?;
        Ok(Session::new(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            tokens.user_id.clone(),
        ))
    }
}

fn validate_signup(form: &SignupForm) -> Result<SignupRequest> {
    let first_name = require_field(&form.first_name, "First name")?;
    let last_name = require_field(&form.last_name, "Last name")?;
    let username = require_field(&form.username, "Username")?;
    let email = require_field(&form.email, "Email")?;
    let password = require_field(&form.password, "Password")?;
    let phone_number = require_field(&form.phone_number, "Phone number")?;

    let phone_number: i64 = phone_number
        .parse()
        .map_err(|_| Error::validation("Invalid phone number"))?;

    Ok(SignupRequest {
        first_name,
        last_name,
        email,
        phone_number,
        password,
        username,
    })
}

fn require_field(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} is required", label)));
    }
    Ok(trimmed.to_string())
}

// =============================================================================
// Tests
// =============================================================================
