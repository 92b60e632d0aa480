//! Error types for the `lectern-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a chat model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backend did not respond within the configured timeout.
    ///
    /// Kept distinct from [`ModelError::Backend`] so callers can decide
    /// to retry rather than treating the failure as terminal.
    #[error("Model request timed out ({model})")]
    Timeout {
        /// The model whose request timed out.
        model: String,
    },

    /// The backend was unreachable or returned a failure response.
    #[error("Model backend error ({model}): {message}")]
    Backend {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
