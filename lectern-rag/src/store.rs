//! Document store trait for persisting ingested documents.

use async_trait::async_trait;
use uuid::Uuid;

use crate::document::{DocumentRecord, DocumentSummary};
use crate::error::Result;

/// A storage backend for [`DocumentRecord`]s.
///
/// This is the narrow seam to the persistence provider: put/get/delete by
/// document id plus per-owner enumeration. Records are written whole at
/// ingest and never mutated afterwards.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::{DocumentStore, InMemoryDocumentStore};
///
/// let store = InMemoryDocumentStore::new();
/// store.put(record).await?;
/// let loaded = store.get(id).await?;
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a record, replacing any previous record under the same id.
    async fn put(&self, record: DocumentRecord) -> Result<()>;

    /// Load a record by id. Returns `None` when the id is unknown.
    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>>;

    /// Delete a record and its vectors. Deleting an unknown id is a no-op.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Enumerate summaries of all documents held by one owner.
    async fn list_for_owner(&self, owner: &str) -> Result<Vec<DocumentSummary>>;
}
