//! # AppError
//!
//! Centralized error handling for the emergency board.
//! Every rejection a client can trigger has its own variant so the web layer
//! can map it to a status code without string matching.

use thiserror::Error;

/// The primary error type for all eb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request comes from a blocked locale (or sent no `Accept-Language`)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Same client posted again inside the post interval
    #[error("too many requests: {0}")]
    RateLimitExceeded(String),

    /// Same client resent its previous message verbatim
    #[error("duplicate message")]
    Duplicate,

    /// Message contains a denylisted substring
    #[error("banned word detected")]
    BannedWord,

    /// Malformed input (e.g., empty or overlong message)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Infrastructure failure (e.g., database unavailable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, AppError>;
