//! Ports: the traits the core is written against
//!
//! Services only ever see these interfaces; the adapters module supplies
//! the concrete implementations.

mod token_store;

pub use token_store::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_ID_KEY};
