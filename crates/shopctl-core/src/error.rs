//! Unified error handling for shopctl-core

use thiserror::Error;

/// Core error type for shopctl-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected the session credential (401). Handled globally:
    /// the gateway reports it to the session store instead of each caller.
    #[error("Authentication required")]
    Unauthorized,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A newer fetch for the same view started before this one resolved.
    #[error("Response superseded by a newer request")]
    Superseded,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for shopctl-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a backend-declared business error
    pub fn backend(msg: impl Into<String>) -> Self {
        Error::Backend(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
