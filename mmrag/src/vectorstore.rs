//! Vector store trait for nearest-neighbour search over stored chunks.

use async_trait::async_trait;

use crate::distance::DistanceMetric;
use crate::document::{DocumentChunk, RetrievedResult};
use crate::error::StoreError;

/// A storage backend for [`DocumentChunk`]s with similarity search.
///
/// # Example
///
/// ```rust,ignore
/// use mmrag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.insert(&chunks).await?;
/// let results = store.nearest(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append chunks to the store. Chunks must have embeddings set.
    async fn insert(&self, chunks: &[DocumentChunk]) -> Result<(), StoreError>;

    /// Return the `k` stored chunks closest to `query`.
    ///
    /// Results are ordered by ascending distance (descending score), with
    /// equal distances in insertion order. Each score is `1 - distance`.
    /// An empty store yields an empty `Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] if `k == 0`. Any other failure
    /// aborts the whole query; partial results are never returned.
    async fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedResult>, StoreError>;

    /// The metric [`nearest`](Self::nearest) ranks by.
    fn metric(&self) -> DistanceMetric;
}

pub(crate) fn check_k(k: usize) -> Result<(), StoreError> {
    if k == 0 {
        return Err(StoreError::InvalidQuery("k must be at least 1".to_string()));
    }
    Ok(())
}
