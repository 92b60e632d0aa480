//! File-backed document store.
//!
//! Persists each [`DocumentRecord`] as one pretty-printed JSON file named
//! `<uuid>.json` under a base directory. Records have exactly one
//! canonical schema; a file that does not deserialize into it is a store
//! error, never silently skipped or field-guessed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::document::{DocumentRecord, DocumentSummary};
use crate::error::{RagError, Result};
use crate::store::DocumentStore;

/// A [`DocumentStore`] that keeps one JSON file per document.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::jsonfile::JsonFileDocumentStore;
///
/// let store = JsonFileDocumentStore::new("/var/lib/lectern/documents").await?;
/// store.put(record).await?;
/// ```
#[derive(Debug)]
pub struct JsonFileDocumentStore {
    base_dir: PathBuf,
}

impl JsonFileDocumentStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        tokio::fs::create_dir_all(&base_dir).await.map_err(|e| Self::io_err("create", e))?;
        Ok(Self { base_dir })
    }

    /// The directory holding the record files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }

    fn io_err(operation: &str, e: std::io::Error) -> RagError {
        RagError::Store { backend: "JsonFile".into(), message: format!("{operation}: {e}") }
    }

    fn codec_err(e: serde_json::Error) -> RagError {
        RagError::Store { backend: "JsonFile".into(), message: format!("bad record: {e}") }
    }

    async fn read_record(&self, path: &Path) -> Result<Option<DocumentRecord>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_err("read", e)),
        };
        let record = serde_json::from_str(&content).map_err(Self::codec_err)?;
        Ok(Some(record))
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn put(&self, record: DocumentRecord) -> Result<()> {
        let path = self.record_path(record.id);
        let content = serde_json::to_string_pretty(&record).map_err(Self::codec_err)?;
        tokio::fs::write(&path, content).await.map_err(|e| Self::io_err("write", e))?;
        debug!(document.id = %record.id, path = %path.display(), "persisted document record");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        self.read_record(&self.record_path(id)).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        match tokio::fs::remove_file(self.record_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err("delete", e)),
        }
    }

    async fn list_for_owner(&self, owner: &str) -> Result<Vec<DocumentSummary>> {
        let mut entries =
            tokio::fs::read_dir(&self.base_dir).await.map_err(|e| Self::io_err("list", e))?;

        let mut summaries = Vec::new();
        while let Some(entry) =
            entries.next_entry().await.map_err(|e| Self::io_err("list", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(record) = self.read_record(&path).await? {
                if record.owner == owner {
                    summaries.push(DocumentSummary::from(&record));
                }
            }
        }

        summaries.sort_by_key(|s| s.created_at);
        Ok(summaries)
    }
}
