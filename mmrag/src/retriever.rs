//! Query-time retrieval: embed the query, then ask the store for its
//! nearest neighbours.
//!
//! # Example
//!
//! ```rust,ignore
//! use mmrag::{InMemoryVectorStore, Retriever};
//!
//! let retriever = Retriever::new(Arc::new(my_embedder), Arc::new(InMemoryVectorStore::new()));
//! let results = retriever.retrieve("what is pgvector?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::config::DEFAULT_TOP_K;
use crate::document::RetrievedResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Composes an [`EmbeddingProvider`] and a [`VectorStore`].
///
/// Retrieval is a single pass with no filtering, deduplication or
/// re-ranking: the store's ordering is returned as is. Failures are passed
/// through unchanged as [`RagError::Service`] or [`RagError::Store`].
#[derive(Clone)]
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever with the default `top_k` of 5.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { embedding_provider, vector_store, top_k: DEFAULT_TOP_K }
    }

    /// Change the default number of results.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `top_k == 0`.
    pub fn with_top_k(mut self, top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        self.top_k = top_k;
        Ok(self)
    }

    /// The default number of results.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Retrieve the default number of results for `query`.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedResult>> {
        self.retrieve_top_k(query, self.top_k).await
    }

    /// Retrieve at most `k` results for `query`, best first.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidArgument`] if `k == 0` (nothing is called).
    /// - [`RagError::Service`] if embedding the query fails (the store is
    ///   not queried).
    /// - [`RagError::Store`] if the nearest-neighbour query fails.
    pub async fn retrieve_top_k(&self, query: &str, k: usize) -> Result<Vec<RetrievedResult>> {
        if k == 0 {
            return Err(RagError::InvalidArgument("k must be at least 1".to_string()));
        }

        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            e
        })?;

        let results = self.vector_store.nearest(&query_embedding, k).await.map_err(|e| {
            error!(k, error = %e, "vector store search failed");
            e
        })?;

        info!(k, result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}
