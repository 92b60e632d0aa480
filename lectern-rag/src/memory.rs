//! In-memory document store.
//!
//! A zero-dependency [`DocumentStore`] backed by a `HashMap` protected by
//! a `tokio::sync::RwLock`. Suitable for development, testing, and
//! single-process deployments that accept losing documents on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{DocumentRecord, DocumentSummary};
use crate::error::Result;
use crate::store::DocumentStore;

/// An in-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<HashMap<Uuid, DocumentRecord>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, record: DocumentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        records.remove(&id);
        Ok(())
    }

    async fn list_for_owner(&self, owner: &str) -> Result<Vec<DocumentSummary>> {
        let records = self.records.read().await;
        let mut summaries: Vec<DocumentSummary> =
            records.values().filter(|r| r.owner == owner).map(DocumentSummary::from).collect();
        summaries.sort_by_key(|s| s.created_at);
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chunk, EmbeddedChunk};
    use chrono::Utc;

    fn record(owner: &str) -> DocumentRecord {
        DocumentRecord {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            chunks: vec![EmbeddedChunk {
                chunk: Chunk { text: "alpha".into(), page_number: 1 },
                embedding: vec![0.0, 1.0],
            }],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let store = InMemoryDocumentStore::new();
        let rec = record("user-1");
        let id = rec.id;

        store.put(rec.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(rec));

        store.delete(id).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), None);
        // Deleting again is a no-op.
        store.delete(id).await.unwrap();
    }

    #[tokio::test]
    async fn listing_is_scoped_to_owner() {
        let store = InMemoryDocumentStore::new();
        store.put(record("user-1")).await.unwrap();
        store.put(record("user-1")).await.unwrap();
        store.put(record("user-2")).await.unwrap();

        let listed = store.list_for_owner("user-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|s| s.owner == "user-1"));
        assert!(store.list_for_owner("nobody").await.unwrap().is_empty());
    }
}
