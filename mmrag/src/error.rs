//! Error types for the `mmrag` crate.
//!
//! Leaf clients report their own error type: model-service clients return
//! [`ServiceError`], vector stores return [`StoreError`]. The composed
//! [`Retriever`](crate::Retriever) and [`Answerer`](crate::Answerer) return
//! [`RagError`], which carries either one through unchanged.

use thiserror::Error;

/// A failure talking to an external model service (embedding, captioning
/// or generation).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service rejected the credentials (HTTP 401 / 403).
    #[error("{provider} authentication failed: {message}")]
    Auth {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The service refused the request because of rate limiting (HTTP 429).
    #[error("{provider} rate limit exceeded: {message}")]
    RateLimited {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The request did not complete in time.
    #[error("{provider} request timed out: {message}")]
    Timeout {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("{provider} request failed: {message}")]
    Transport {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{provider} API returned {status}: {message}")]
    Api {
        /// The provider that produced the error.
        provider: String,
        /// The HTTP status code.
        status: u16,
        /// The error detail returned by the service.
        message: String,
    },

    /// The service answered successfully but the body was unusable.
    #[error("{provider} returned a malformed response: {message}")]
    MalformedResponse {
        /// The provider that produced the error.
        provider: String,
        /// A description of what was wrong with the response.
        message: String,
    },

    /// The input was rejected before any request was made.
    #[error("invalid input for {provider}: {message}")]
    InvalidInput {
        /// The provider the input was meant for.
        provider: String,
        /// A description of the problem.
        message: String,
    },
}

impl ServiceError {
    /// Classify a non-success HTTP status into the matching variant.
    pub fn from_status(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        let provider = provider.into();
        let message = message.into();
        match status {
            401 | 403 => Self::Auth { provider, message },
            429 => Self::RateLimited { provider, message },
            408 | 504 => Self::Timeout { provider, message },
            _ => Self::Api { provider, status, message },
        }
    }

    /// The provider that produced this error.
    pub fn provider(&self) -> &str {
        match self {
            Self::Auth { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Api { provider, .. }
            | Self::MalformedResponse { provider, .. }
            | Self::InvalidInput { provider, .. } => provider,
        }
    }
}

/// A failure querying or writing the vector store.
///
/// An empty result set is not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached, or the connection was lost.
    #[error("Vector store connection error ({backend}): {message}")]
    Connection {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The store rejected or failed to execute a query.
    #[error("Vector store query error ({backend}): {message}")]
    Query {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A stored row could not be decoded into a result.
    #[error("Vector store decode error ({backend}): {message}")]
    Decode {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The query arguments were invalid (for example `k == 0`).
    #[error("Invalid vector store query: {0}")]
    InvalidQuery(String),
}

/// Errors returned by the retrieval and answering pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// A model service call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A vector store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument was rejected before any external call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
