//! Generation provider trait for the language model that writes answers.

use async_trait::async_trait;

use crate::error::ServiceError;

/// A language model that turns a single text prompt into a text response.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a response for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}
