//! Adapter implementations
//!
//! Adapters implement the port traits and wrap concrete technologies:
//! - Flat JSON file on disk for the TokenStore port
//! - HTTP client for the auth service (ping, login, signup, refresh)
//! - HTTP client for the user service (profile lookup)
//! - HTTP client for the expense service (list, add)

pub mod auth_api;
pub mod expense_api;
pub mod file_store;
pub mod user_api;

#[cfg(test)]
pub mod backend_mock;
