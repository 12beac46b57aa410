//! User service - profile lookup for the signed-in user

use std::sync::Arc;

use crate::adapters::user_api::UserClient;
use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::TokenStore;
use crate::services::SessionService;

/// User service for profile data
pub struct UserService {
    user_client: UserClient,
    session: SessionService,
}

impl UserService {
    pub fn new(user_client: UserClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            user_client,
            session: SessionService::new(store),
        }
    }

    /// Fetch the profile of the stored user.
    ///
    /// Only the user id is needed; the user service endpoint is not
    /// token-authenticated.
    pub fn get_profile(&self) -> Result<User> {
        let user_id = self
            .session
            .user_id()?
            .ok_or_else(|| Error::missing_credential("User ID not found"))?;
        self.user_client.get_user(&user_id)
    }
}
