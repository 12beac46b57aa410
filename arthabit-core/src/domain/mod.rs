//! Domain entities
//!
//! Plain data types and their validation rules. Nothing here performs
//! I/O or talks to the network.

mod expense;
mod session;
mod user;
pub mod result;

pub use expense::{Currency, Expense, NewExpense};
pub use session::{mask_token, Session};
pub use user::User;
