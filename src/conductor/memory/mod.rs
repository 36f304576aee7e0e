//! Similarity-searchable memory for research context and past reports.
//!
//! Text is split into overlapping chunks, embedded, and persisted to a JSON
//! file. Queries rank stored chunks by cosine similarity.
//!
//! - [`MemoryStore`] is the seam the rest of the crate depends on
//! - [`VectorMemory`] is the file-backed implementation
//! - [`Embedder`] turns text into vectors ([`OllamaEmbedder`] by default)

pub mod embedding;
pub mod splitter;
pub mod store;

pub use embedding::{Embedder, OllamaEmbedder};
pub use splitter::TextSplitter;
pub use store::{MemoryRecord, VectorMemory};

use crate::adk::error::MemoryError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Metadata attached to every stored chunk
pub type Metadata = HashMap<String, String>;

/// Store/retrieve text by similarity
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Split and index `text`. Returns the number of chunks stored.
    async fn put(&self, text: &str, metadata: Metadata) -> Result<usize, MemoryError>;

    /// Up to `k` stored chunks, most similar first
    async fn query(&self, text: &str, k: usize) -> Result<Vec<String>, MemoryError>;

    /// Shutdown hook: make everything written so far durable
    async fn flush(&self) -> Result<(), MemoryError> {
        Ok(())
    }
}
