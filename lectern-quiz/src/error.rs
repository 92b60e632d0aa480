//! Error types for the `lectern-quiz` crate.

use thiserror::Error;

/// Errors that can occur during quiz generation and grounded answering.
#[derive(Debug, Error)]
pub enum QuizError {
    /// An error propagated from the retrieval core.
    #[error(transparent)]
    Rag(#[from] lectern_rag::RagError),

    /// An error propagated from the generation backend after the fallback
    /// attempt also failed.
    #[error(transparent)]
    Model(#[from] lectern_model::ModelError),

    /// The generation backend replied, but the content could not be
    /// shaped into the expected schema.
    ///
    /// Carries a truncated copy of the raw reply for diagnostics; the
    /// full payload is only logged.
    #[error("Malformed generation response: {message}")]
    MalformedResponse {
        /// What was wrong with the reply.
        message: String,
        /// Truncated raw reply text.
        raw_response: String,
    },
}

/// A convenience result type for quiz operations.
pub type Result<T> = std::result::Result<T, QuizError>;
