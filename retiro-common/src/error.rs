//! Common error types for Retiro

use thiserror::Error;

/// Common result type for Retiro operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Retiro services
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request to an external collaborator failed (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
