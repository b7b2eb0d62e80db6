//! Shared HTTP plumbing for the OpenAI providers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::PROVIDER;
use super::config::OpenAIConfig;
use crate::error::{RagError, Result, ServiceError};

/// A thin JSON-over-HTTPS client for one OpenAI-compatible endpoint family.
#[derive(Debug, Clone)]
pub(crate) struct OpenAIHttp {
    client: reqwest::Client,
    config: OpenAIConfig,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAIHttp {
    pub(crate) fn new(config: &OpenAIConfig) -> Result<Self> {
        // A deserialized config never carries a key.
        if config.api_key.trim().is_empty() {
            return Err(RagError::Config("OpenAI API key must not be empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config: config.clone() })
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// POST `body` to `path` and decode the JSON response.
    pub(crate) async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, path, error = %e, "request failed");
                transport_error(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(provider = PROVIDER, path, error = %e, "failed to read response body");
            transport_error(e)
        })?;

        if !status.is_success() {
            let detail = error_detail(&text);
            error!(provider = PROVIDER, path, %status, "API error");
            return Err(ServiceError::from_status(PROVIDER, status.as_u16(), detail));
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(provider = PROVIDER, path, error = %e, "failed to parse response");
            ServiceError::MalformedResponse {
                provider: PROVIDER.into(),
                message: format!("failed to parse response: {e}"),
            }
        })
    }
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout { provider: PROVIDER.into(), message: e.to_string() }
    } else {
        ServiceError::Transport { provider: PROVIDER.into(), message: e.to_string() }
    }
}

/// Pull the `error.message` field out of an error body, falling back to the
/// raw body.
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

pub(crate) fn invalid_input(message: impl Into<String>) -> ServiceError {
    ServiceError::InvalidInput { provider: PROVIDER.into(), message: message.into() }
}

pub(crate) fn malformed(message: impl Into<String>) -> ServiceError {
    ServiceError::MalformedResponse { provider: PROVIDER.into(), message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_prefers_message_field() {
        let body =
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_detail(body), "Incorrect API key provided");
    }

    #[test]
    fn error_detail_falls_back_to_body() {
        assert_eq!(error_detail("upstream connect error"), "upstream connect error");
    }

    #[test]
    fn deserialized_config_without_key_is_rejected() {
        let config: OpenAIConfig = serde_json::from_str(
            r#"{"base_url": "https://api.openai.com/v1",
                "embedding_model": "text-embedding-3-small",
                "caption_model": "gpt-4o",
                "generation_model": "gpt-5"}"#,
        )
        .unwrap();
        assert!(config.api_key.is_empty());

        let err = OpenAIHttp::new(&config).unwrap_err();
        assert!(matches!(err, RagError::Config(msg) if msg.contains("API key")));
    }

    #[test]
    fn client_builds_with_timeout() {
        let config =
            OpenAIConfig::new("sk-test").unwrap().with_timeout(std::time::Duration::from_secs(5));
        let http = OpenAIHttp::new(&config).unwrap();
        assert_eq!(http.config().timeout, Some(std::time::Duration::from_secs(5)));
    }
}
