//! Integration tests for the retrieval service with a deterministic fake
//! embedding provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lectern_rag::error::{RagError, Result};
use lectern_rag::{
    DocumentStore, EmbeddingProvider, InMemoryDocumentStore, RetrievalConfig, Retriever,
};
use uuid::Uuid;

/// Embeds text as a 2-d vector keyed to its character count, so nearest
/// neighbors are the chunks closest in length to the query. Deterministic
/// and offline.
struct LengthEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

impl LengthEmbedder {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0), fail: false }
    }

    fn failing() -> Self {
        Self { calls: AtomicUsize::new(0), fail: true }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for LengthEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_batch(&[text]).await?.remove(0))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagError::Embedding {
                provider: "fake".into(),
                message: "injected failure".into(),
            });
        }
        Ok(texts.iter().map(|t| vec![t.chars().count() as f32, 0.0]).collect())
    }

    fn dimensions(&self) -> usize {
        2
    }
}

fn small_chunk_retriever(
    embedder: Arc<LengthEmbedder>,
    store: Arc<InMemoryDocumentStore>,
    cache_capacity: usize,
) -> Retriever {
    // Zero overlap keeps each short page as exactly one chunk, so chunk
    // lengths (and thus fake embeddings) stay predictable.
    let config = RetrievalConfig::builder()
        .chunk_size(40)
        .chunk_overlap(0)
        .top_k(5)
        .cache_capacity(cache_capacity)
        .build()
        .unwrap();
    Retriever::builder()
        .config(config)
        .embedding_provider(embedder)
        .store(store)
        .build()
        .unwrap()
}

fn pages() -> Vec<String> {
    // Three single-window pages of distinct lengths: 10, 20, and 30 chars.
    vec!["abcdefghij".into(), "x".repeat(20), "y".repeat(30)]
}

#[tokio::test]
async fn ingest_then_search_ranks_by_similarity() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), store, 8);

    let id = retriever.ingest("user-1", &pages()).await.unwrap();

    // A 21-char query sits closest to the 20-char chunk.
    let results = retriever.search(id, &"q".repeat(21), 3).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].text.len(), 20);
    assert_eq!(results[0].page_number, 2);
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    for r in &results {
        assert!(r.score > 0.0 && r.score <= 1.0);
    }
}

#[tokio::test]
async fn search_is_deterministic() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), store, 8);

    let id = retriever.ingest("user-1", &pages()).await.unwrap();
    let first = retriever.search(id, "same query", 5).await.unwrap();
    let second = retriever.search(id, "same query", 5).await.unwrap();

    let texts: Vec<_> = first.iter().map(|r| (&r.text, r.score.to_bits())).collect();
    let texts2: Vec<_> = second.iter().map(|r| (&r.text, r.score.to_bits())).collect();
    assert_eq!(texts, texts2);
}

#[tokio::test]
async fn top_k_is_clamped_to_chunk_count() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), store, 8);

    let id = retriever.ingest("user-1", &pages()).await.unwrap();
    let results = retriever.search(id, "query", 1000).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), store, 8);

    let err = retriever.search(Uuid::new_v4(), "query", 5).await.unwrap_err();
    assert!(matches!(err, RagError::DocumentNotFound(_)));

    let err = retriever.chunks(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RagError::DocumentNotFound(_)));
}

#[tokio::test]
async fn blank_document_fails_ingestion() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), Arc::clone(&store), 8);

    let err = retriever.ingest("user-1", &["  ".into(), "\n".into()]).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyDocument));
    // No network call, nothing persisted.
    assert_eq!(embedder.calls(), 0);
    assert!(store.list_for_owner("user-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_embedding_persists_nothing() {
    let embedder = Arc::new(LengthEmbedder::failing());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), Arc::clone(&store), 8);

    let err = retriever.ingest("user-1", &pages()).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));
    assert!(store.list_for_owner("user-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn evicted_index_is_rebuilt_from_the_store() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    // Capacity 1: the second ingest evicts the first document's index.
    let retriever = small_chunk_retriever(Arc::clone(&embedder), store, 1);

    let first = retriever.ingest("user-1", &pages()).await.unwrap();
    let second = retriever.ingest("user-1", &pages()).await.unwrap();
    assert_ne!(first, second);

    // Searching the evicted document reloads its record and succeeds.
    let results = retriever.search(first, &"q".repeat(21), 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text.len(), 20);
}

#[tokio::test]
async fn delete_cascades_record_and_index() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), Arc::clone(&store), 8);

    let id = retriever.ingest("user-1", &pages()).await.unwrap();
    retriever.delete(id).await.unwrap();

    assert!(matches!(
        retriever.search(id, "query", 5).await,
        Err(RagError::DocumentNotFound(_))
    ));
    assert!(store.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn listing_reports_per_owner_documents() {
    let embedder = Arc::new(LengthEmbedder::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = small_chunk_retriever(Arc::clone(&embedder), store, 8);

    let id = retriever.ingest("user-1", &pages()).await.unwrap();
    retriever.ingest("user-2", &pages()).await.unwrap();

    let listed = retriever.list("user-1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].chunk_count, 3);
}
