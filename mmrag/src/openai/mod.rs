//! OpenAI-backed providers for embeddings, image captions and answers.
//!
//! This module is only available when the `openai` feature is enabled. All
//! three providers talk to the REST API directly through `reqwest` and share
//! one [`OpenAIConfig`].
//!
//! | Provider | Endpoint | Default model |
//! |----------|----------|---------------|
//! | [`OpenAIEmbeddingProvider`] | `/embeddings` | `text-embedding-3-small` |
//! | [`OpenAICaptionProvider`] | `/chat/completions` | `gpt-4o` |
//! | [`OpenAIGenerationProvider`] | `/responses` | `gpt-5` |
//!
//! # Example
//!
//! ```rust,ignore
//! use mmrag::openai::{OpenAIConfig, OpenAIEmbeddingProvider, OpenAIGenerationProvider};
//!
//! let config = OpenAIConfig::from_env()?;
//! let embedder = OpenAIEmbeddingProvider::from_config(&config)?;
//! let generator = OpenAIGenerationProvider::from_config(&config)?;
//! ```

mod caption;
mod client;
mod config;
mod embedding;
mod generation;

pub use caption::{OpenAICaptionProvider, image_data_url};
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_CAPTION_MODEL, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_GENERATION_MODEL, OpenAIConfig, native_embedding_dimensions,
};
pub use embedding::OpenAIEmbeddingProvider;
pub use generation::OpenAIGenerationProvider;

const PROVIDER: &str = "OpenAI";
