//! # mmrag
//!
//! Minimal multimodal retrieval-augmented generation.
//!
//! A query is embedded, the closest stored chunks are fetched from a vector
//! store and scored `1 - distance`, and the results are formatted into a
//! context block that grounds a language model's answer. Images enter the
//! store as text: a vision model captions them and the caption is embedded
//! like any other chunk.
//!
//! ## Components
//!
//! | Trait | Purpose | Implementations |
//! |-------|---------|-----------------|
//! | [`EmbeddingProvider`] | text → vector | `openai::OpenAIEmbeddingProvider` |
//! | [`CaptionProvider`] | image → text | `openai::OpenAICaptionProvider` |
//! | [`GenerationProvider`] | prompt → answer | `openai::OpenAIGenerationProvider` |
//! | [`VectorStore`] | nearest neighbours | [`InMemoryVectorStore`], `pgvector::PgVectorStore` |
//!
//! [`Retriever`] composes an embedder and a store; [`Answerer`] adds a
//! generator. All clients are passed in explicitly, so tests can swap in
//! fakes.
//!
//! ## Features
//!
//! - `openai` – OpenAI providers over `reqwest`
//! - `pgvector` – PostgreSQL + pgvector store over `sqlx`
//! - `full` – both
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mmrag::{Answerer, RagConfig};
//! use mmrag::openai::{OpenAIConfig, OpenAIEmbeddingProvider, OpenAIGenerationProvider};
//! use mmrag::pgvector::PgVectorStore;
//!
//! let openai = OpenAIConfig::from_env()?;
//! let answerer = Answerer::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OpenAIEmbeddingProvider::from_config(&openai)?))
//!     .vector_store(Arc::new(PgVectorStore::connect(&database_url).await?))
//!     .generation_provider(Arc::new(OpenAIGenerationProvider::from_config(&openai)?))
//!     .build()?;
//!
//! let answer = answerer.answer("What is the capital of France?").await?;
//! ```

pub mod answerer;
pub mod caption;
pub mod config;
pub mod distance;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod prompt;
pub mod retriever;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "pgvector")]
pub mod pgvector;

pub use answerer::{Answerer, AnswererBuilder};
pub use caption::{CAPTION_INSTRUCTION, CaptionProvider};
pub use config::{DEFAULT_TOP_K, RagConfig, RagConfigBuilder};
pub use distance::{DistanceMetric, score_from_distance};
pub use document::{Answer, DocumentChunk, Modality, RetrievedResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result, ServiceError, StoreError};
pub use generation::GenerationProvider;
pub use inmemory::InMemoryVectorStore;
pub use prompt::{PromptTemplate, build_context};
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
