//! Token store port
//!
//! Defines the interface for durable, process-independent storage of the
//! session credentials. Implementations must survive restarts; callers treat
//! the store as effectively single-writer (one bootstrap or login/logout flow
//! at a time by convention).

use crate::domain::result::Result;

/// Storage key for the short-lived bearer token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the long-lived refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key for the signed-in user's id
pub const USER_ID_KEY: &str = "userId";

/// Durable key/value persistence for session credentials
///
/// No atomicity across keys is promised; callers that need the access and
/// refresh tokens to move together write them in one call at the service
/// layer, which implementations should turn into a single file rewrite.
pub trait TokenStore: Send + Sync {
    /// Read a value. Absent keys are `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value (idempotent overwrite)
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write several values in one pass. The default implementation loops
    /// over [`TokenStore::set`]; file-backed implementations override it to
    /// rewrite once.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove a value (idempotent; removing an absent key is not an error)
    fn remove(&self, key: &str) -> Result<()>;
}
