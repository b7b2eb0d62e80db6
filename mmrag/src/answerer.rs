//! Grounded answering: retrieve, build a context block, ask the model.
//!
//! # Example
//!
//! ```rust,ignore
//! use mmrag::{Answerer, InMemoryVectorStore, RagConfig};
//!
//! let answerer = Answerer::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .generation_provider(Arc::new(generator))
//!     .build()?;
//!
//! let answer = answerer.answer("What is the capital of France?").await?;
//! println!("{}", answer.text);
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::RagConfig;
use crate::document::Answer;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;
use crate::prompt::{PromptTemplate, build_context};
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// Composes a [`Retriever`] with a [`GenerationProvider`].
///
/// Construct one via [`Answerer::builder()`] or [`Answerer::new`].
pub struct Answerer {
    retriever: Retriever,
    generation_provider: Arc<dyn GenerationProvider>,
    template: PromptTemplate,
}

impl Answerer {
    /// Create an answerer from an existing retriever using the default
    /// prompt template.
    pub fn new(retriever: Retriever, generation_provider: Arc<dyn GenerationProvider>) -> Self {
        Self { retriever, generation_provider, template: PromptTemplate::default() }
    }

    /// Create a new [`AnswererBuilder`].
    pub fn builder() -> AnswererBuilder {
        AnswererBuilder::default()
    }

    /// Replace the prompt template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Return a reference to the retriever.
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Return a reference to the prompt template.
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Answer `query` using the retriever's default number of results.
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        self.answer_top_k(query, self.retriever.top_k()).await
    }

    /// Answer `query` grounded on at most `k` retrieved results.
    ///
    /// When nothing is retrieved the prompt is still sent, with an empty
    /// context block.
    ///
    /// # Errors
    ///
    /// Propagates retrieval errors unchanged, and returns
    /// [`RagError::Service`] if generation fails. No fallback answer is
    /// produced.
    pub async fn answer_top_k(&self, query: &str, k: usize) -> Result<Answer> {
        let supporting = self.retriever.retrieve_top_k(query, k).await?;
        if supporting.is_empty() {
            warn!(k, "no results retrieved, generating with an empty context");
        }

        let context = build_context(&supporting);
        let prompt = self.template.render(&context, query);

        let text = self.generation_provider.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "generation failed");
            e
        })?;

        info!(supporting_count = supporting.len(), answer_len = text.len(), "answer completed");
        Ok(Answer { text, supporting })
    }
}

/// Builder for constructing an [`Answerer`].
///
/// `embedding_provider`, `vector_store` and `generation_provider` are
/// required; `config` and `prompt_template` fall back to their defaults.
#[derive(Default)]
pub struct AnswererBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    generation_provider: Option<Arc<dyn GenerationProvider>>,
    template: Option<PromptTemplate>,
}

impl AnswererBuilder {
    /// Set the retrieval configuration.
    ///
    /// Its metric must be the one the vector store was built with.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the language model used for answers.
    pub fn generation_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation_provider = Some(provider);
        self
    }

    /// Set the prompt template.
    pub fn prompt_template(mut self, template: PromptTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Build the [`Answerer`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing, or if a
    /// config was given whose metric differs from the vector store's.
    pub fn build(self) -> Result<Answerer> {
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let generation_provider = self
            .generation_provider
            .ok_or_else(|| RagError::Config("generation_provider is required".to_string()))?;

        let config = match self.config {
            Some(config) if config.metric != vector_store.metric() => {
                return Err(RagError::Config(format!(
                    "config metric {} does not match the vector store's {}",
                    config.metric,
                    vector_store.metric()
                )));
            }
            Some(config) => config,
            None => RagConfig::default(),
        };

        let retriever = Retriever::new(embedding_provider, vector_store).with_top_k(config.top_k)?;

        Ok(Answerer {
            retriever,
            generation_provider,
            template: self.template.unwrap_or_default(),
        })
    }
}
