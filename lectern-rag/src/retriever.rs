//! Retrieval service orchestrator.
//!
//! The [`Retriever`] coordinates the ingest-and-search workflow:
//! segmentation, batch embedding, index construction, persistence, and
//! per-document semantic search. Collaborators are injected as trait
//! objects so tests can substitute fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lectern_rag::{Retriever, RetrievalConfig, InMemoryDocumentStore};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .store(Arc::new(InMemoryDocumentStore::new()))
//!     .build()?;
//!
//! let id = retriever.ingest("user-1", &pages).await?;
//! let results = retriever.search(id, "what is chapter two about?", 5).await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::cache::{DocumentIndex, IndexCache};
use crate::config::RetrievalConfig;
use crate::document::{Chunk, DocumentRecord, DocumentSummary, EmbeddedChunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::{VectorIndex, similarity_score};
use crate::segmenter::segment;
use crate::store::DocumentStore;

/// The retrieval service.
///
/// Ingestion is all-or-nothing: a failure at any stage persists nothing.
/// Built indices are immutable, so searches need no locking and any
/// number of callers can query one document concurrently. A bounded LRU
/// cache keeps recent indices resident; evicted ones are rebuilt from the
/// persisted record on the next search.
pub struct Retriever {
    config: RetrievalConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn DocumentStore>,
    cache: IndexCache,
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the service configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Ingest one document given its ordered page texts.
    ///
    /// Runs segmentation → batch embedding → index construction, persists
    /// the record under a fresh id, and returns that id. Each call mints
    /// its own id, so concurrent ingestions never share state.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyDocument`] if segmentation yields no chunks
    ///   (no extractable text).
    /// - Embedding and store failures propagate; nothing is persisted.
    pub async fn ingest(&self, owner: &str, pages: &[String]) -> Result<Uuid> {
        let chunks = segment(pages, self.config.chunk_size, self.config.chunk_overlap);
        if chunks.is_empty() {
            error!(owner, page_count = pages.len(), "no extractable text in document");
            return Err(RagError::EmptyDocument);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(owner, error = %e, "embedding failed during ingestion");
            e
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::Validation(format!(
                "embedding count ({}) does not match chunk count ({})",
                embeddings.len(),
                chunks.len()
            )));
        }

        let record = DocumentRecord {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            chunks: chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
                .collect(),
            created_at: Utc::now(),
        };

        // Validate the index before anything is persisted.
        let document_index = build_document_index(&record)?;

        let id = record.id;
        let chunk_count = record.chunks.len();
        self.store.put(record).await.map_err(|e| {
            error!(document.id = %id, error = %e, "persisting document failed");
            e
        })?;
        self.cache.insert(id, Arc::new(document_index)).await;

        info!(document.id = %id, chunk_count, "ingested document");
        Ok(id)
    }

    /// Search one document for the chunks most similar to `query`.
    ///
    /// Returns at most `top_k` results, ranked by descending similarity
    /// score; fewer when the document has fewer chunks. Identical query
    /// text against an unchanged document always yields identical output.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DocumentNotFound`] for an unknown id;
    /// embedding failures propagate.
    pub async fn search(
        &self,
        document_id: Uuid,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let document_index = self.load_index(document_id).await?;
        if document_index.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(document.id = %document_id, error = %e, "query embedding failed");
            e
        })?;

        let neighbors = document_index.index.search(&query_embedding, top_k)?;
        let results: Vec<SearchResult> = neighbors
            .into_iter()
            .map(|n| {
                let chunk = &document_index.chunks[n.position];
                SearchResult {
                    text: chunk.text.clone(),
                    page_number: chunk.page_number,
                    score: similarity_score(n.distance),
                }
            })
            .collect();

        info!(document.id = %document_id, result_count = results.len(), "search completed");
        Ok(results)
    }

    /// Return the full ordered chunk list of one document.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DocumentNotFound`] for an unknown id.
    pub async fn chunks(&self, document_id: Uuid) -> Result<Vec<Chunk>> {
        let document_index = self.load_index(document_id).await?;
        Ok(document_index.chunks.clone())
    }

    /// Delete a document: its persisted record, vectors, and cached index.
    pub async fn delete(&self, document_id: Uuid) -> Result<()> {
        self.store.delete(document_id).await?;
        self.cache.remove(document_id).await;
        info!(document.id = %document_id, "deleted document");
        Ok(())
    }

    /// Enumerate the documents held by one owner.
    pub async fn list(&self, owner: &str) -> Result<Vec<DocumentSummary>> {
        self.store.list_for_owner(owner).await
    }

    /// Load a document's index from the cache, rebuilding from the store
    /// on a miss.
    async fn load_index(&self, document_id: Uuid) -> Result<Arc<DocumentIndex>> {
        if let Some(index) = self.cache.get(document_id).await {
            return Ok(index);
        }

        let record = self
            .store
            .get(document_id)
            .await?
            .ok_or(RagError::DocumentNotFound(document_id))?;

        let document_index = Arc::new(build_document_index(&record)?);
        self.cache.insert(document_id, Arc::clone(&document_index)).await;
        info!(document.id = %document_id, "rebuilt index from store");
        Ok(document_index)
    }
}

/// Build the in-memory index for a persisted record.
fn build_document_index(record: &DocumentRecord) -> Result<DocumentIndex> {
    let embeddings: Vec<Vec<f32>> = record.chunks.iter().map(|c| c.embedding.clone()).collect();
    let chunks: Vec<Chunk> = record.chunks.iter().map(|c| c.chunk.clone()).collect();
    Ok(DocumentIndex { index: VectorIndex::build(embeddings)?, chunks })
}

/// Builder for constructing a [`Retriever`].
///
/// All fields are required except `config`, which falls back to
/// [`RetrievalConfig::default`].
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrievalConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn DocumentStore>>,
}

impl RetrieverBuilder {
    /// Set the service configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the document store backend.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the [`Retriever`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing.
    pub fn build(self) -> Result<Retriever> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RagError::Config("store is required".to_string()))?;

        let cache = IndexCache::new(config.cache_capacity);
        Ok(Retriever { config, embedding_provider, store, cache })
    }
}
