//! Text → vector.

use async_trait::async_trait;

use crate::error::ServiceError;

/// Turns text (a query, a document chunk or an image caption) into a dense
/// vector.
///
/// One call is one request to the backend. Vectors from the same provider
/// always have [`dimensions`](Self::dimensions) components, which must match
/// what the vector store holds.
///
/// ```rust,ignore
/// let vector = embedder.embed("Paris is the capital of France.").await?;
/// assert_eq!(vector.len(), embedder.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    ///
    /// Failures are reported as-is; there are no retries.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError>;

    /// Embed several texts, returning vectors in input order.
    ///
    /// Falls back to one [`embed`](Self::embed) call per text.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ServiceError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;
}
