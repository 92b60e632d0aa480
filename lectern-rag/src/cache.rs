//! Bounded cache of built per-document indices.
//!
//! Embeddings are cheap to reload from the document store but expensive
//! to recompute, so the retriever keeps recently used indices resident
//! and rebuilds evicted ones from persisted records on the next search.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::document::Chunk;
use crate::index::VectorIndex;

/// A built vector index together with the chunk metadata its rows map
/// back to. Immutable once constructed; shared between concurrent
/// searches through `Arc`.
#[derive(Debug)]
pub struct DocumentIndex {
    /// The exact k-NN index over the document's embeddings.
    pub index: VectorIndex,
    /// Chunk metadata, position-aligned with the index rows.
    pub chunks: Vec<Chunk>,
}

#[derive(Debug)]
struct CacheEntry {
    value: Arc<DocumentIndex>,
    last_used: u64,
}

#[derive(Debug)]
struct CacheState {
    entries: HashMap<Uuid, CacheEntry>,
    tick: u64,
}

/// A least-recently-used cache of [`DocumentIndex`]es keyed by document id.
///
/// Holds at most `capacity` indices; inserting beyond that evicts the
/// entry that was used longest ago. Eviction only drops the in-memory
/// index — persisted records are untouched.
#[derive(Debug)]
pub struct IndexCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl IndexCache {
    /// Create a cache bounded to `capacity` entries.
    ///
    /// `capacity` must be non-zero; the config builder enforces this
    /// before a cache is ever constructed.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState { entries: HashMap::new(), tick: 0 }),
        }
    }

    /// Look up an index, marking it as most recently used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<DocumentIndex>> {
        let mut state = self.state.lock().await;
        state.tick += 1;
        let tick = state.tick;
        let entry = state.entries.get_mut(&id)?;
        entry.last_used = tick;
        Some(Arc::clone(&entry.value))
    }

    /// Insert an index, evicting the least recently used entry if full.
    pub async fn insert(&self, id: Uuid, value: Arc<DocumentIndex>) {
        let mut state = self.state.lock().await;
        state.tick += 1;
        let tick = state.tick;

        if !state.entries.contains_key(&id) && state.entries.len() >= self.capacity {
            if let Some(oldest) =
                state.entries.iter().min_by_key(|(_, e)| e.last_used).map(|(k, _)| *k)
            {
                state.entries.remove(&oldest);
                debug!(document.id = %oldest, "evicted index from cache");
            }
        }

        state.entries.insert(id, CacheEntry { value, last_used: tick });
    }

    /// Drop an index from the cache (used when its document is deleted).
    pub async fn remove(&self, id: Uuid) {
        let mut state = self.state.lock().await;
        state.entries.remove(&id);
    }

    /// Number of resident indices.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Whether the cache holds no indices.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_index() -> Arc<DocumentIndex> {
        Arc::new(DocumentIndex {
            index: VectorIndex::build(vec![vec![0.0, 1.0]]).unwrap(),
            chunks: vec![Chunk { text: "t".into(), page_number: 1 }],
        })
    }

    #[tokio::test]
    async fn evicts_least_recently_used_entry() {
        let cache = IndexCache::new(2);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        cache.insert(a, dummy_index()).await;
        cache.insert(b, dummy_index()).await;

        // Touch `a` so `b` becomes the eviction candidate.
        assert!(cache.get(a).await.is_some());
        cache.insert(c, dummy_index()).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(b).await.is_none());
        assert!(cache.get(a).await.is_some());
        assert!(cache.get(c).await.is_some());
    }

    #[tokio::test]
    async fn reinserting_same_id_does_not_evict_others() {
        let cache = IndexCache::new(2);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        cache.insert(a, dummy_index()).await;
        cache.insert(b, dummy_index()).await;
        cache.insert(a, dummy_index()).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(b).await.is_some());
    }

    #[tokio::test]
    async fn remove_drops_entry() {
        let cache = IndexCache::new(4);
        let a = Uuid::new_v4();
        cache.insert(a, dummy_index()).await;
        cache.remove(a).await;
        assert!(cache.get(a).await.is_none());
        assert!(cache.is_empty().await);
    }
}
