//! Session service - resolve and persist the stored credential set
//!
//! All other services obtain credentials through this service and pass them
//! to the HTTP clients explicitly. Nothing below this layer reads the token
//! store on its own.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::Session;
use crate::ports::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_ID_KEY};

/// Session service for credential access
pub struct SessionService {
    store: Arc<dyn TokenStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Load the stored session.
    ///
    /// A session exists only when both tokens are present; a lone access or
    /// refresh token is treated as no session. The user id is optional.
    pub fn load_session(&self) -> Result<Option<Session>> {
        let access_token = self.store.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.store.get(REFRESH_TOKEN_KEY)?;

        match (access_token, refresh_token) {
            (Some(access_token), Some(refresh_token)) => {
                let user_id = self.store.get(USER_ID_KEY)?;
                Ok(Some(Session::new(access_token, refresh_token, user_id)))
            }
            _ => Ok(None),
        }
    }

    /// Persist a token pair, and the user id when the response carried one.
    ///
    /// Refresh responses come without a user id; passing `None` leaves the
    /// stored user id untouched rather than erasing it.
    pub fn save_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        user_id: Option<&str>,
    ) -> Result<()> {
        match user_id {
            Some(user_id) => self.store.set_many(&[
                (ACCESS_TOKEN_KEY, access_token),
                (REFRESH_TOKEN_KEY, refresh_token),
                (USER_ID_KEY, user_id),
            ]),
            None => self.store.set_many(&[
                (ACCESS_TOKEN_KEY, access_token),
                (REFRESH_TOKEN_KEY, refresh_token),
            ]),
        }
    }

    /// Remove every stored credential. Safe to call when nothing is stored.
    pub fn clear_tokens(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        self.store.remove(USER_ID_KEY)?;
        Ok(())
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn user_id(&self) -> Result<Option<String>> {
        self.store.get(USER_ID_KEY)
    }

    /// Access token required for an authenticated call
    pub fn require_access_token(&self) -> Result<String> {
        self.access_token()?
            .ok_or_else(|| Error::missing_credential("No access token"))
    }

    /// User id required for a session-scoped call
    pub fn require_user_id(&self) -> Result<String> {
        self.user_id()?
            .ok_or_else(|| Error::missing_credential("No user ID"))
    }
}
