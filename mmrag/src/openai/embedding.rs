//! OpenAI embedding provider using the embeddings API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PROVIDER;
use super::client::{OpenAIHttp, invalid_input, malformed};
use super::config::{DEFAULT_EMBEDDING_DIMENSIONS, OpenAIConfig, native_embedding_dimensions};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, ServiceError};

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// # Configuration
///
/// - `model` – from [`OpenAIConfig::embedding_model`], defaults to `text-embedding-3-small`.
/// - `dimensions` – optional Matryoshka dimension override.
///
/// Empty or whitespace-only input is rejected with
/// [`ServiceError::InvalidInput`] without calling the API.
///
/// # Example
///
/// ```rust,ignore
/// use mmrag::openai::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::new("sk-...")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    http: OpenAIHttp,
    model: String,
    dimensions: usize,
    /// If set, passed to the API for Matryoshka dimension truncation.
    request_dimensions: Option<usize>,
}

impl OpenAIEmbeddingProvider {
    /// Create a provider with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&OpenAIConfig::new(api_key)?)
    }

    /// Create a provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&OpenAIConfig::from_env()?)
    }

    /// Create a provider from a shared configuration.
    ///
    /// The reported dimensionality is
    /// [`OpenAIConfig::embedding_dimensions`] when set, otherwise the
    /// model's native size. Unknown models are assumed to return 1536.
    pub fn from_config(config: &OpenAIConfig) -> Result<Self> {
        let model = config.embedding_model.clone();
        Ok(Self {
            http: OpenAIHttp::new(config)?,
            dimensions: config.embedding_dimensions.unwrap_or_else(|| native_size(&model)),
            request_dimensions: config.embedding_dimensions,
            model,
        })
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    ///
    /// Unless [`with_dimensions`](Self::with_dimensions) was called,
    /// [`dimensions()`](EmbeddingProvider::dimensions) follows the new
    /// model's native size.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        if self.request_dimensions.is_none() {
            self.dimensions = native_size(&self.model);
        }
        self
    }

    /// Set the output dimensions (Matryoshka support).
    ///
    /// When set, the API returns embeddings truncated to this size.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    /// The model used for embedding requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request<'a>(&'a self, texts: &[&'a str]) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
            dimensions: self.request_dimensions,
        }
    }
}

fn native_size(model: &str) -> usize {
    native_embedding_dimensions(model).unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS)
}

// ── OpenAI API request/response types ──

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingResponse {
    /// Return the embeddings in input order, checking the count.
    fn into_embeddings(
        mut self,
        expected: usize,
    ) -> std::result::Result<Vec<Vec<f32>>, ServiceError> {
        if self.data.len() != expected {
            return Err(malformed(format!(
                "expected {expected} embeddings, got {}",
                self.data.len()
            )));
        }
        self.data.sort_by_key(|d| d.index);
        if let Some(empty) = self.data.iter().find(|d| d.embedding.is_empty()) {
            return Err(malformed(format!("embedding at index {} is empty", empty.index)));
        }
        Ok(self.data.into_iter().map(|d| d.embedding).collect())
    }
}

// ── EmbeddingProvider implementation ──

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ServiceError> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| malformed("API returned empty response"))
    }

    async fn embed_batch(
        &self,
        texts: &[&str],
    ) -> std::result::Result<Vec<Vec<f32>>, ServiceError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(pos) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(invalid_input(format!("text at position {pos} is empty")));
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let response: EmbeddingResponse =
            self.http.post_json("embeddings", &self.request(texts)).await?;
        response.into_embeddings(texts.len())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn provider() -> OpenAIEmbeddingProvider {
        OpenAIEmbeddingProvider::new("sk-test").unwrap()
    }

    #[test]
    fn request_serialization() {
        let p = provider();
        let body = serde_json::to_value(p.request(&["hello"])).unwrap();
        assert_eq!(body, json!({"model": "text-embedding-3-small", "input": ["hello"]}));

        let p = provider().with_dimensions(256);
        let body = serde_json::to_value(p.request(&["a", "b"])).unwrap();
        assert_eq!(
            body,
            json!({"model": "text-embedding-3-small", "input": ["a", "b"], "dimensions": 256})
        );
        assert_eq!(p.dimensions(), 256);
    }

    #[test]
    fn dimensions_follow_the_configured_model() {
        let config =
            OpenAIConfig::new("sk-test").unwrap().with_embedding_model("text-embedding-3-large");
        let p = OpenAIEmbeddingProvider::from_config(&config).unwrap();
        assert_eq!(p.model(), "text-embedding-3-large");
        assert_eq!(p.dimensions(), 3072);
        assert_eq!(provider().dimensions(), 1536);

        let p = provider().with_model("text-embedding-3-large");
        assert_eq!(p.dimensions(), 3072);
        let p = provider().with_dimensions(512).with_model("text-embedding-3-large");
        assert_eq!(p.dimensions(), 512);
    }

    #[test]
    fn configured_dimensions_are_requested() {
        let config = OpenAIConfig::new("sk-test")
            .unwrap()
            .with_embedding_model("text-embedding-3-large")
            .with_embedding_dimensions(1024);
        let p = OpenAIEmbeddingProvider::from_config(&config).unwrap();
        assert_eq!(p.dimensions(), 1024);

        let body = serde_json::to_value(p.request(&["hi"])).unwrap();
        assert_eq!(body["dimensions"], 1024);
    }

    #[test]
    fn response_is_reordered_by_index() {
        let response: EmbeddingResponse = serde_json::from_value(json!({
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        }))
        .unwrap();

        let embeddings = response.into_embeddings(2).unwrap();
        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn response_count_mismatch_is_malformed() {
        let response: EmbeddingResponse =
            serde_json::from_value(json!({"data": [{"index": 0, "embedding": [1.0]}]})).unwrap();
        let err = response.into_embeddings(2).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn empty_text_is_rejected_locally() {
        let err = provider().embed("   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        assert!(provider().embed_batch(&[]).await.unwrap().is_empty());
    }
}
