//! OpenAI answer generation through the Responses API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PROVIDER;
use super::client::{OpenAIHttp, invalid_input, malformed};
use super::config::OpenAIConfig;
use crate::error::{Result, ServiceError};
use crate::generation::GenerationProvider;

/// A [`GenerationProvider`] that sends one text prompt to
/// `POST /responses` and returns the model's output text.
pub struct OpenAIGenerationProvider {
    http: OpenAIHttp,
    model: String,
}

impl OpenAIGenerationProvider {
    /// Create a provider with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&OpenAIConfig::new(api_key)?)
    }

    /// Create a provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&OpenAIConfig::from_env()?)
    }

    /// Create a provider from a shared configuration.
    pub fn from_config(config: &OpenAIConfig) -> Result<Self> {
        Ok(Self { http: OpenAIHttp::new(config)?, model: config.generation_model.clone() })
    }

    /// The model used for generation.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    /// Present on some OpenAI-compatible servers; the official API only
    /// returns `output`.
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// Concatenate every `output_text` part of every `message` item.
    fn text(self) -> std::result::Result<String, ServiceError> {
        let text = match self.output_text {
            Some(text) if !text.is_empty() => text,
            _ => self
                .output
                .into_iter()
                .filter(|item| item.kind == "message")
                .flat_map(|item| item.content)
                .filter(|part| part.kind == "output_text")
                .filter_map(|part| part.text)
                .collect::<String>(),
        };

        if text.trim().is_empty() {
            return Err(malformed("response contained no output text"));
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerationProvider for OpenAIGenerationProvider {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ServiceError> {
        if prompt.trim().is_empty() {
            return Err(invalid_input("prompt is empty"));
        }

        debug!(
            provider = PROVIDER,
            model = %self.model,
            prompt_len = prompt.len(),
            "generating response"
        );

        let request = ResponsesRequest { model: &self.model, input: prompt };
        let response: ResponsesResponse = self.http.post_json("responses", &request).await?;
        let text = response.text()?;

        debug!(provider = PROVIDER, answer_len = text.len(), "generated response");
        Ok(text)
    }
}
