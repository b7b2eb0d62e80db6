//! OpenAI configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// The default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The default model for embeddings.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// Native output size of the known OpenAI embedding models.
pub fn native_embedding_dimensions(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-large" => Some(3072),
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        _ => None,
    }
}

/// The default vision model for image captions.
pub const DEFAULT_CAPTION_MODEL: &str = "gpt-4o";

/// The default model for answer generation.
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-5";

/// Connection and model settings shared by the OpenAI providers.
///
/// # Environment
///
/// [`from_env`](Self::from_env) reads:
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_BASE_URL` (optional, for OpenAI-compatible servers)
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenAIConfig {
    /// The API key sent as a bearer token.
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// The API base URL, without a trailing slash.
    pub base_url: String,
    /// Model used by the embedding provider.
    pub embedding_model: String,
    /// Requested embedding size. `None` uses the model's native size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_dimensions: Option<usize>,
    /// Model used by the caption provider.
    pub caption_model: String,
    /// Model used by the generation provider.
    pub generation_model: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl OpenAIConfig {
    /// Create a configuration with the given API key and default models.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::Config("OpenAI API key must not be empty".to_string()));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimensions: None,
            caption_model: DEFAULT_CAPTION_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            timeout: None,
        })
    }

    /// Create a configuration from `OPENAI_API_KEY` and `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            RagError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        let config = Self::new(api_key)?;
        match std::env::var("OPENAI_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => Ok(config.with_base_url(url)),
            _ => Ok(config),
        }
    }

    /// Point the providers at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the embedding model (e.g. `text-embedding-3-large`).
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Ask the API for embeddings of this size (`text-embedding-3-*` only).
    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = Some(dimensions);
        self
    }

    /// Set the vision model used for captions.
    pub fn with_caption_model(mut self, model: impl Into<String>) -> Self {
        self.caption_model = model.into();
        self
    }

    /// Set the model used for answer generation.
    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .field("caption_model", &self.caption_model)
            .field("generation_model", &self.generation_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OpenAIConfig::new("sk-test").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.caption_model, "gpt-4o");
        assert_eq!(config.generation_model, "gpt-5");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(OpenAIConfig::new(""), Err(RagError::Config(_))));
        assert!(matches!(OpenAIConfig::new("   "), Err(RagError::Config(_))));
    }

    #[test]
    fn endpoints_join_cleanly() {
        let config =
            OpenAIConfig::new("sk-test").unwrap().with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.endpoint("embeddings"), "http://localhost:8080/v1/embeddings");
        assert_eq!(config.endpoint("/responses"), "http://localhost:8080/v1/responses");
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = OpenAIConfig::new("sk-secret").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn native_dimensions_of_known_models() {
        assert_eq!(native_embedding_dimensions("text-embedding-3-large"), Some(3072));
        assert_eq!(native_embedding_dimensions("text-embedding-3-small"), Some(1536));
        assert_eq!(native_embedding_dimensions("text-embedding-ada-002"), Some(1536));
        assert_eq!(native_embedding_dimensions("nomic-embed-text"), None);
    }

    #[test]
    fn debug_hides_api_key() {
        let config = OpenAIConfig::new("sk-secret").unwrap();
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
