//! Data types for chunks, persisted documents, and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded span of document text tagged with its source page.
///
/// Produced by the segmenter; immutable once created. `page_number` is
/// 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// The text content of the chunk. Never empty after trimming.
    pub text: String,
    /// The 1-indexed page the chunk was taken from.
    pub page_number: u32,
}

/// A [`Chunk`] with its vector embedding attached.
///
/// Created at ingest time; its position inside the parent document's
/// chunk list doubles as its row in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedChunk {
    /// The chunk text and page metadata.
    #[serde(flatten)]
    pub chunk: Chunk,
    /// The embedding vector for this chunk's text.
    pub embedding: Vec<f32>,
}

/// The canonical persisted representation of one ingested document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRecord {
    /// Server-generated unique identifier.
    pub id: Uuid,
    /// Opaque tenant key supplied by the session layer.
    pub owner: String,
    /// All chunks with embeddings, in segmentation order.
    pub chunks: Vec<EmbeddedChunk>,
    /// When the document was ingested.
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Number of chunks in the record.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the record holds no chunks. Ingest never persists such a
    /// record; this exists for store-level sanity checks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// A lightweight listing entry for one stored document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    /// The document id.
    pub id: Uuid,
    /// Opaque tenant key of the owner.
    pub owner: String,
    /// Number of stored chunks.
    pub chunk_count: usize,
    /// When the document was ingested.
    pub created_at: DateTime<Utc>,
}

impl From<&DocumentRecord> for DocumentSummary {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner.clone(),
            chunk_count: record.chunks.len(),
            created_at: record.created_at,
        }
    }
}

/// A retrieved chunk paired with a relevance score.
///
/// The score is `1 / (1 + d)` over the squared L2 distance `d`, so it is
/// always in `(0, 1]` with higher meaning more similar. Computed per
/// query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk text.
    pub text: String,
    /// The 1-indexed source page.
    pub page_number: u32,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
