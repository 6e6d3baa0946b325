//! Common error types for Journalful

use thiserror::Error;

/// Common result type for Journalful operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Journalful services
///
/// The variants are the classification the transport layer maps onto
/// response codes: invalid input, not found and conflict are caller errors,
/// everything else is an internal failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

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

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation exists but is not yet supported
    #[error("Not yet supported: {0}")]
    Unsupported(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the error is a SQLite unique-constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }

    /// Re-classify a unique-constraint violation as a conflict
    pub fn or_conflict(self, message: impl Into<String>) -> Self {
        if self.is_unique_violation() {
            Error::Conflict(message.into())
        } else {
            self
        }
    }
}
