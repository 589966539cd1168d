//! Error types for planner operations.

use thiserror::Error;

use crate::store::remote::RemoteError;

/// Errors that can occur in planner operations.
///
/// Remote transport failures (`RemoteError`) are normally absorbed by falling
/// back to the local store and only reach callers through sync reports; they
/// appear here for the rare paths with no fallback left.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Local storage is full")]
    StorageFull,

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Events are not loaded yet")]
    SessionNotReady,

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
