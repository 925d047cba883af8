//! Error types shared by the whole crate.

use thiserror::Error;

/// Errors raised while configuring, loading data for, or running a network.
///
/// Every failure here is a configuration or programming defect; nothing is
/// retried and no partial result is returned.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    Shape {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        NetworkError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn shape(
        context: impl Into<String>,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        NetworkError::Shape {
            context: context.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NetworkError>;
