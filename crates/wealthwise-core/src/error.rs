//! Error types for WealthWise

use thiserror::Error;

use crate::ai::AdvisorOperation;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or malformed user input; no state was touched and no call was made
    #[error("{0}")]
    Validation(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient funds in Total Balance.")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("Amount must be greater than zero: {0}")]
    InvalidAmount(f64),

    #[error("AI request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("AI request was cancelled")]
    Cancelled,

    /// A gateway operation failed. Displays the operation's generic message;
    /// the underlying cause is kept for logs.
    #[error("{}", operation.failure_message())]
    Advisor {
        operation: AdvisorOperation,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap any failure of an AI operation into its generic user-facing error
    pub fn advisor(operation: AdvisorOperation, source: Error) -> Self {
        Error::Advisor {
            operation,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_error_displays_generic_message() {
        let err = Error::advisor(
            AdvisorOperation::Distribution,
            Error::InvalidData("No JSON found".into()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to get a distribution plan from the AI. Please try again."
        );

        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("No JSON found"));
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = Error::InsufficientFunds {
            requested: 5000.0,
            available: 100.0,
        };
        assert_eq!(err.to_string(), "Insufficient funds in Total Balance.");
    }
}
