//! In-memory vector store.
//!
//! This module provides [`InMemoryVectorStore`], a zero-dependency vector store
//! backed by a `Vec` protected by a `tokio::sync::RwLock`. It is suitable
//! for development, testing, and small-scale use cases. Search is an exact
//! linear scan.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::distance::DistanceMetric;
use crate::document::{DocumentChunk, RetrievedResult};
use crate::error::StoreError;
use crate::vectorstore::{VectorStore, check_k};

const BACKEND: &str = "InMemory";

/// An in-memory vector store ranking chunks by a [`DistanceMetric`].
///
/// Chunks are kept in insertion order, which is also the tie-break order
/// for equal distances. The dimensionality is fixed by the first inserted
/// chunk (or by [`with_dimensions`](Self::with_dimensions)); mismatched
/// chunks and queries are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use mmrag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.insert(&chunks).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    metric: DistanceMetric,
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    dimensions: Option<usize>,
    chunks: Vec<DocumentChunk>,
}

impl InMemoryVectorStore {
    /// Create a new empty store using cosine distance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance metric used for ranking.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Fix the expected embedding dimensionality up front.
    ///
    /// Stored chunks are kept. Once chunks exist their dimensionality is
    /// already fixed, and this call leaves it unchanged.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        let inner = self.inner.get_mut();
        if inner.chunks.is_empty() {
            inner.dimensions = Some(dimensions);
        } else if inner.dimensions != Some(dimensions) {
            warn!(
                backend = BACKEND,
                requested = dimensions,
                "store already holds chunks, keeping their dimensions"
            );
        }
        self
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> usize {
        self.inner.read().await.chunks.len()
    }

    /// Whether the store holds no chunks.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.chunks.is_empty()
    }
}

fn dimension_mismatch(expected: usize, actual: usize) -> StoreError {
    StoreError::Query {
        backend: BACKEND.to_string(),
        message: format!("different vector dimensions: expected {expected}, got {actual}"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, chunks: &[DocumentChunk]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        let mut dimensions = inner.dimensions;
        for chunk in chunks {
            if chunk.embedding.is_empty() {
                return Err(StoreError::Query {
                    backend: BACKEND.to_string(),
                    message: format!("chunk from '{}' has no embedding", chunk.source),
                });
            }
            let expected = *dimensions.get_or_insert(chunk.embedding.len());
            if chunk.embedding.len() != expected {
                return Err(dimension_mismatch(expected, chunk.embedding.len()));
            }
        }

        inner.dimensions = dimensions;
        inner.chunks.extend_from_slice(chunks);
        debug!(backend = BACKEND, count = chunks.len(), "inserted chunks");
        Ok(())
    }

    async fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedResult>, StoreError> {
        check_k(k)?;
        let inner = self.inner.read().await;

        if let Some(expected) = inner.dimensions {
            if !inner.chunks.is_empty() && query.len() != expected {
                return Err(dimension_mismatch(expected, query.len()));
            }
        }

        let mut scored: Vec<(usize, f32)> = inner
            .chunks
            .iter()
            .enumerate()
            .map(|(idx, chunk)| (idx, self.metric.distance(query, &chunk.embedding)))
            .collect();

        // Stable sort: equal distances keep insertion order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(idx, distance)| RetrievedResult::from_distance(&inner.chunks[idx], distance))
            .collect())
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }
}
