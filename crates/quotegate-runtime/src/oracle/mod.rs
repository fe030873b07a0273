//! Oracle abstractions for quotegate-runtime.
//!
//! The oracle is the retrieval-augmented text-generation service both
//! pipeline stages call. It is treated as a black box satisfying a single
//! contract: given a system instruction, a user prompt, a structured-output
//! schema, and an optional retrieval scope, return JSON conforming to the
//! schema or fail.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling; see
//! [`ApiCredential`] for the patterns.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

mod factory;
pub mod secrets;

#[cfg(feature = "openai")]
mod openai;

pub use factory::{OracleFactory, OracleRegistry};
pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "openai")]
pub use openai::{OpenAiOracle, OpenAiOracleFactory, OPENAI_API_KEY_ENV};

/// Errors from oracle providers.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed structured output: {0}")]
    MalformedOutput(String),

    #[error("timeout after {0:?}")]
    Timeout(Duration),

    #[error("oracle not configured: {0}")]
    NotConfigured(String),
}

/// Restriction of retrieval to a single knowledge store.
///
/// Present only on extraction calls. Composition calls carry no scope at
/// all, so the composer cannot pull in unverified material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalScope {
    /// Identifier of the knowledge store bound to the topic.
    pub store_id: String,
}

impl RetrievalScope {
    pub fn new(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
        }
    }
}

/// One oracle invocation.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    /// System instruction establishing the stage's role.
    pub system: String,

    /// User prompt.
    pub user: String,

    /// Name of the structured-output contract.
    pub schema_name: &'static str,

    /// JSON Schema the reply must conform to.
    pub schema: Value,

    /// Retrieval scope; `None` grants no retrieval tool.
    pub retrieval: Option<RetrievalScope>,
}

/// Generation settings for one invocation.
#[derive(Debug, Clone)]
pub struct InvocationConfig {
    /// Model to use.
    pub model: String,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Temperature (0.0 for deterministic).
    pub temperature: f32,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            max_tokens: 800,
            temperature: 0.0,
            timeout: Duration::from_secs(20),
        }
    }
}

/// Oracle abstraction allows swapping generation backends.
///
/// Providers return the parsed JSON value of the structured output; schema
/// validation happens in the pipeline stages so it is uniform across
/// providers, including test doubles.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Execute one invocation.
    async fn invoke(
        &self,
        request: OracleRequest,
        config: &InvocationConfig,
    ) -> Result<Value, OracleError>;

    /// Check if the oracle is usable.
    async fn health_check(&self) -> bool;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_config_default_is_deterministic() {
        let config = InvocationConfig::default();
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, 800);
    }

    #[test]
    fn test_error_display() {
        let err = OracleError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }
}
