//! Arthabit Core - Business logic for expense tracking
//!
//! Hexagonal layout: entities in the middle, traits describing what the
//! outside world must provide, adapters supplying it.
//!
//! - **domain**: Session, User, Expense and the error taxonomy
//! - **ports**: the TokenStore trait the services depend on
//! - **services**: the auth, session, expense, user and logging flows
//! - **adapters**: file-backed token store and the three HTTP clients

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::auth_api::AuthClient;
use adapters::expense_api::ExpenseClient;
use adapters::file_store::FileTokenStore;
use adapters::user_api::UserClient;
use config::Config;
use ports::TokenStore;
use services::*;

// Convenience re-exports so callers rarely need the submodule paths
pub use domain::{mask_token, Currency, Expense, NewExpense, Session, User};
pub use domain::result::{Error, OperationResult};
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService};

/// Everything a caller needs to run Arthabit operations: the loaded
/// configuration, the shared token store and one service per flow.
pub struct ArthabitContext {
    pub config: Config,
    pub token_store: Arc<dyn TokenStore>,
    pub session_service: SessionService,
    pub auth_service: AuthService,
    pub expense_service: ExpenseService,
    pub user_service: UserService,
}

// Services and the store hold non-Debug internals (HTTP clients, trait
// objects), so only the config is shown.
impl std::fmt::Debug for ArthabitContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArthabitContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ArthabitContext {
    /// Wire up the store, the clients and every service under `arthabit_dir`
    pub fn new(arthabit_dir: &Path) -> Result<Self> {
        let config = Config::load(arthabit_dir)?;

        let token_store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(arthabit_dir));

        let auth_client = AuthClient::new(&config.auth_base_url, config.request_timeout_secs)?;
        let user_client = UserClient::new(&config.user_base_url, config.request_timeout_secs)?;
        let expense_client =
            ExpenseClient::new(&config.expense_base_url, config.request_timeout_secs)?;

        let session_service = SessionService::new(Arc::clone(&token_store));
        let auth_service = AuthService::new(auth_client, Arc::clone(&token_store));
        let expense_service = ExpenseService::new(expense_client, Arc::clone(&token_store));
        let user_service = UserService::new(user_client, Arc::clone(&token_store));

        Ok(Self {
            config,
            token_store,
            session_service,
            auth_service,
            expense_service,
            user_service,
        })
    }
}
