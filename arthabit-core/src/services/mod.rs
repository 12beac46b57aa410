//! Business logic, one service per flow
//!
//! Auth bootstrap, session state, expense listing and entry, profile
//! lookup and the event log.

mod auth;
mod expense;
pub mod logging;
mod session;
mod user;

pub use auth::{AuthService, AuthState, BootstrapPath, BootstrapReport, SignupForm};
pub use expense::ExpenseService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use session::SessionService;
pub use user::UserService;
