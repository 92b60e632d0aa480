//! # lectern-rag
//!
//! The retrieval core of lectern: turns ordered page texts into a
//! per-document semantic index and answers similarity queries against it.
//!
//! Pipeline: page texts → [`segmenter`] → chunks → [`EmbeddingProvider`]
//! → vectors → [`index::VectorIndex`] (persisted per document via a
//! [`DocumentStore`]) → k-NN search → scored [`SearchResult`]s.
//!
//! Indices are exact (squared L2, no approximation), immutable after
//! construction, and cached per document with LRU eviction; evicted
//! indices are rebuilt from the persisted record on the next search.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lectern_rag::{
//!     InMemoryDocumentStore, RetrievalConfig, Retriever,
//!     openai::OpenAIEmbeddingProvider,
//! };
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .embedding_provider(Arc::new(OpenAIEmbeddingProvider::from_env()?))
//!     .store(Arc::new(InMemoryDocumentStore::new()))
//!     .build()?;
//!
//! let document_id = retriever.ingest("user-1", &pages).await?;
//! let hits = retriever.search(document_id, "query text", 5).await?;
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod jsonfile;
pub mod memory;
pub mod openai;
pub mod retriever;
pub mod segmenter;
pub mod store;

pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use document::{Chunk, DocumentRecord, DocumentSummary, EmbeddedChunk, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use jsonfile::JsonFileDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use openai::OpenAIEmbeddingProvider;
pub use retriever::{Retriever, RetrieverBuilder};
pub use segmenter::segment;
pub use store::DocumentStore;
