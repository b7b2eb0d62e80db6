//! Configuration for retrieval and answering.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::{RagError, Result};

/// The number of results retrieved when the caller does not choose.
pub const DEFAULT_TOP_K: usize = 5;

/// Configuration parameters for the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of top results to retrieve by default.
    pub top_k: usize,
    /// Distance metric the vector store should rank with.
    pub metric: DistanceMetric,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K, metric: DistanceMetric::default() }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of top results to retrieve by default.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `top_k == 0`.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RagConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.metric, DistanceMetric::Cosine);
        assert_eq!(RagConfig::builder().build().unwrap(), config);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        assert!(matches!(RagConfig::builder().top_k(0).build(), Err(RagError::Config(_))));
    }

    #[test]
    fn deserializes_from_json() {
        let config: RagConfig =
            serde_json::from_str(r#"{"top_k": 3, "metric": "inner_product"}"#).unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.metric, DistanceMetric::InnerProduct);
    }
}
