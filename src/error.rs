//! Domain error types for test-run visitors.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use crate::models::TestCaseId;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// A finish/pass message arrived for a test case that never started
    #[error("Test case {0} was never started")]
    UnknownTestCase(TestCaseId),

    /// A result record violates the persisted table's constraints
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reading the message stream failed
    #[error("I/O error: {0}")]
    Io(String),
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}
