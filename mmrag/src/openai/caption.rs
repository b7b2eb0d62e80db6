//! OpenAI vision captioning through the chat completions API.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PROVIDER;
use super::client::{OpenAIHttp, invalid_input, malformed};
use super::config::OpenAIConfig;
use crate::caption::{CAPTION_INSTRUCTION, CaptionProvider, sniff_image_mime};
use crate::error::{Result, ServiceError};

/// A [`CaptionProvider`] that sends images inline (as base64 data URLs) to
/// an OpenAI vision model.
///
/// # Example
///
/// ```rust,ignore
/// use mmrag::openai::OpenAICaptionProvider;
///
/// let captioner = OpenAICaptionProvider::from_env()?;
/// let caption = captioner.caption_file("diagram.png").await?;
/// ```
pub struct OpenAICaptionProvider {
    http: OpenAIHttp,
    model: String,
    instruction: String,
}

impl OpenAICaptionProvider {
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
        Ok(Self {
            http: OpenAIHttp::new(config)?,
            model: config.caption_model.clone(),
            instruction: CAPTION_INSTRUCTION.to_string(),
        })
    }

    /// Replace the instruction sent with each image.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// The vision model used for captions.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Read an image file and caption it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidInput`] if the file cannot be read.
    pub async fn caption_file(
        &self,
        path: impl AsRef<Path>,
    ) -> std::result::Result<String, ServiceError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| invalid_input(format!("failed to read {}: {e}", path.display())))?;
        self.caption(&bytes).await
    }

    fn request<'a>(&'a self, data_url: String) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: &self.instruction },
                    ContentPart::ImageUrl { image_url: ImageUrl { url: data_url } },
                ],
            }],
        }
    }
}

/// Encode image bytes as a `data:` URL with a sniffed MIME type.
pub fn image_data_url(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_image_mime(bytes), STANDARD.encode(bytes))
}

// ── Chat completions request/response types ──

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// The trimmed text of the first choice.
    fn caption(self) -> std::result::Result<String, ServiceError> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(malformed("response contained no caption text"));
        }
        Ok(text)
    }
}

#[async_trait]
impl CaptionProvider for OpenAICaptionProvider {
    async fn caption(&self, image: &[u8]) -> std::result::Result<String, ServiceError> {
        if image.is_empty() {
            return Err(invalid_input("image is empty"));
        }

        debug!(
            provider = PROVIDER,
            model = %self.model,
            image_len = image.len(),
            "captioning image"
        );

        let response: ChatResponse =
            self.http.post_json("chat/completions", &self.request(image_data_url(image))).await?;
        let caption = response.caption()?;

        debug!(provider = PROVIDER, caption_len = caption.len(), "captioned image");
        Ok(caption)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const RED_SQUARE: &[u8] = include_bytes!("../../tests/fixtures/red_square.png");

    #[test]
    fn data_url_is_base64() {
        let url = image_data_url(&PNG_HEADER);
        assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");

        let url = image_data_url(&[0xFF, 0xD8, 0xFF, 0xE0]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn request_carries_instruction_and_inline_image() {
        let provider = OpenAICaptionProvider::new("sk-test").unwrap();
        let body = serde_json::to_value(provider.request(image_data_url(&PNG_HEADER))).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": CAPTION_INSTRUCTION},
                        {
                            "type": "image_url",
                            "image_url": {"url": "data:image/png;base64,iVBORw0KGgo="}
                        }
                    ]
                }]
            })
        );
    }

    #[test]
    fn fixture_image_is_sent_as_base64_text() {
        let provider = OpenAICaptionProvider::new("sk-test").unwrap();
        let body = serde_json::to_string(&provider.request(image_data_url(RED_SQUARE))).unwrap();
        assert!(body.is_ascii());

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let url = value["messages"][0]["content"][1]["image_url"]["url"].as_str().unwrap();
        let encoded = url.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), RED_SQUARE);
    }

    #[test]
    fn response_caption_is_trimmed() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "\n  A red bicycle leaning on a brick wall.  \n"
                },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();
        assert_eq!(response.caption().unwrap(), "A red bicycle leaning on a brick wall.");
    }

    #[test]
    fn empty_or_missing_content_is_malformed() {
        let response: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert!(matches!(response.caption(), Err(ServiceError::MalformedResponse { .. })));

        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(response.caption(), Err(ServiceError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn empty_image_is_rejected_locally() {
        let provider = OpenAICaptionProvider::new("sk-test").unwrap();
        let err = provider.caption(&[]).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_invalid_input() {
        let provider = OpenAICaptionProvider::new("sk-test").unwrap();
        let err = provider.caption_file("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { .. }));
    }
}
