//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends behind a unified
/// async interface. All vectors produced by one provider share the
/// dimensionality reported by [`dimensions`](EmbeddingProvider::dimensions).
///
/// Contract:
///
/// - an empty batch returns an empty `Vec` without touching the backend;
/// - a batch fails or succeeds as a whole — no partial results;
/// - the empty string is a valid input, embedded like any other text.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::EmbeddingProvider;
///
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    ///
    /// Equivalent to a one-element [`embed_batch`](EmbeddingProvider::embed_batch)
    /// call and fails the same way.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Returns one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
