//! File-backed vector memory.

use super::embedding::{cosine_similarity, Embedder};
use super::splitter::TextSplitter;
use super::{MemoryStore, Metadata};
use crate::adk::error::MemoryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// One stored chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

/// Vector memory persisted as a single JSON file.
///
/// Writers are serialised by the inner lock; the file is rewritten through a
/// temporary sibling and renamed into place so a crash never leaves it torn.
pub struct VectorMemory {
    embedder: Arc<dyn Embedder>,
    splitter: TextSplitter,
    path: Option<PathBuf>,
    records: RwLock<Vec<MemoryRecord>>,
}

impl VectorMemory {
    /// Open (or create) a store backed by `path`
    pub async fn open(
        path: impl Into<PathBuf>,
        embedder: Arc<dyn Embedder>,
        splitter: TextSplitter,
    ) -> Result<Self, MemoryError> {
        let path = path.into();
        let records = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read(&path).await?;
            serde_json::from_slice(&raw).map_err(|e| {
                MemoryError::Persistence(format!("{}: {}", path.display(), e))
            })?
        } else {
            Vec::new()
        };

        log::info!(
            "Opened memory store at {} with {} chunks",
            path.display(),
            records.len()
        );

        Ok(Self {
            embedder,
            splitter,
            path: Some(path),
            records: RwLock::new(records),
        })
    }

    /// A store that is never written to disk
    pub fn in_memory(embedder: Arc<dyn Embedder>, splitter: TextSplitter) -> Self {
        Self {
            embedder,
            splitter,
            path: None,
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn persist(&self, records: &[MemoryRecord]) -> Result<(), MemoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_atomically(path, records).await
    }
}

async fn write_atomically(path: &Path, records: &[MemoryRecord]) -> Result<(), MemoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let data =
        serde_json::to_vec(records).map_err(|e| MemoryError::Persistence(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, data).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl MemoryStore for VectorMemory {
    async fn put(&self, text: &str, metadata: Metadata) -> Result<usize, MemoryError> {
        let chunks = self.splitter.split(text);
        if chunks.is_empty() {
            return Ok(0);
        }

        // Embed before taking the lock so readers are not blocked on the backend
        let mut fresh = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let embedding = self.embedder.embed(&chunk).await?;
            fresh.push(MemoryRecord {
                id: uuid::Uuid::new_v4().to_string(),
                content: chunk,
                metadata: metadata.clone(),
                embedding,
            });
        }

        let added = fresh.len();
        let mut records = self.records.write().await;
        let mut candidate = records.clone();
        candidate.extend(fresh);
        // Commit in memory only once the file holds the same records
        self.persist(&candidate).await?;
        *records = candidate;

        log::info!("Added {} document chunks to memory", added);
        Ok(added)
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<String>, MemoryError> {
        if k == 0 || self.is_empty().await {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(text).await?;
        let records = self.records.read().await;

        let mut scored: Vec<(f32, &MemoryRecord)> = records
            .iter()
            .map(|r| (cosine_similarity(&query, &r.embedding), r))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, r)| r.content.clone())
            .collect())
    }

    async fn flush(&self) -> Result<(), MemoryError> {
        let records = self.records.read().await;
        self.persist(&records).await
    }
}
