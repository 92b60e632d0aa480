//! Error types for the `lectern-rag` crate.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An embedding request did not complete within the configured timeout.
    ///
    /// Kept distinct from [`RagError::Embedding`] so callers can decide to
    /// retry rather than treating the failure as terminal.
    #[error("Embedding request timed out ({provider})")]
    EmbeddingTimeout {
        /// The embedding provider whose request timed out.
        provider: String,
    },

    /// No document exists under the given id.
    #[error("Document '{0}' not found")]
    DocumentNotFound(Uuid),

    /// Segmentation produced no chunks — the input has no extractable text.
    #[error("Document has no extractable text")]
    EmptyDocument,

    /// A vector index construction or query error.
    #[error("Index error: {0}")]
    Index(String),

    /// An error in the document store backend.
    #[error("Store error ({backend}): {message}")]
    Store {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Input shape validation failed (mismatched lengths, bad parameters).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
