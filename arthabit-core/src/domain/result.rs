//! Error taxonomy and the tagged result used on JSON surfaces

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type.
///
/// The first three variants carry complete user-facing messages (the same
/// strings the original screens showed), so their display form is the bare
/// message. `MissingCredential` means the call was short-circuited before any
/// network I/O; `Transport` means the request never got a response;
/// `Protocol` means the backend answered with a non-success status or an
/// unusable body.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    MissingCredential(String),

    #[error("{0}")]
    Protocol(String),

    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result alias used throughout the domain and service layers
pub type Result<T> = std::result::Result<T, Error>;

/// Tagged operation outcome for JSON surfaces: success with a payload, or
/// failure with a human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}
