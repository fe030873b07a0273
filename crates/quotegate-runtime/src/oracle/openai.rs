//! OpenAI Responses API provider.
//!
//! Implements [`Oracle`] against the Responses endpoint: structured output
//! via a strict `json_schema` text format, retrieval via the `file_search`
//! tool bound to a single vector store when a scope is supplied.
//!
//! ## Security
//!
//! The API key is stored in an [`ApiCredential`]: it cannot be printed via
//! `Debug`, is zeroed on drop, and is only exposed at the point the
//! Authorization header is built.

use super::{
    factory::OracleFactory,
    secrets::{ApiCredential, CredentialSource},
    InvocationConfig, Oracle, OracleError, OracleRequest,
};
use crate::config::OracleConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI oracle provider.
pub struct OpenAiOracle {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiOracle")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiOracle {
    /// Create a provider with a programmatic API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            credential: ApiCredential::new(api_key, CredentialSource::Programmatic, "OpenAI API key"),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from the typed oracle configuration.
    ///
    /// Checks `api_key` in the config first, then the `OPENAI_API_KEY`
    /// environment variable.
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        let credential = ApiCredential::from_option_or_env(
            config.api_key.as_deref(),
            OPENAI_API_KEY_ENV,
            "OpenAI API key",
        )?;

        Ok(Self {
            credential,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        })
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }
}

/// Responses API request format.
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<RequestTool>>,
    text: TextOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RequestTool {
    FileSearch { vector_store_ids: Vec<String> },
}

#[derive(Debug, Serialize)]
struct TextOptions<'a> {
    format: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    #[serde(rename = "type")]
    type_: &'static str,
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

/// Responses API reply format.
#[derive(Debug, Deserialize)]
struct ResponsesReply {
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message { content: Vec<ContentPart> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ResponsesReply {
    /// Concatenated text of all message output parts.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .filter_map(|part| match part {
                ContentPart::OutputText { text } => Some(text.as_str()),
                ContentPart::Other => None,
            })
            .collect()
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn invoke(
        &self,
        request: OracleRequest,
        config: &InvocationConfig,
    ) -> Result<Value, OracleError> {
        let tools = request.retrieval.as_ref().map(|scope| {
            vec![RequestTool::FileSearch {
                vector_store_ids: vec![scope.store_id.clone()],
            }]
        });

        let body = ResponsesRequest {
            model: &config.model,
            instructions: &request.system,
            input: &request.user,
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
            tools,
            text: TextOptions {
                format: JsonSchemaFormat {
                    type_: "json_schema",
                    name: request.schema_name,
                    schema: &request.schema,
                    strict: true,
                },
            },
        };

        // The credential is only exposed here, at the point of use
        let response = self
            .client
            .post(self.endpoint())
            .header(
                "Authorization",
                format!("Bearer {}", self.credential.expose()),
            )
            .header("content-type", "application/json")
            .timeout(config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(config.timeout)
                } else {
                    OracleError::Http(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(OracleError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let raw = response
                .text()
                .await
                .map_err(|e| OracleError::Http(e.to_string()))?;
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|body| body.error.message)
                .unwrap_or(raw);

            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ResponsesReply = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedOutput(e.to_string()))?;

        let text = reply.output_text();
        if text.is_empty() {
            return Err(OracleError::MalformedOutput(
                "reply carried no output text".to_string(),
            ));
        }

        serde_json::from_str(&text).map_err(|e| OracleError::MalformedOutput(e.to_string()))
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Factory for creating OpenAI oracles from configuration.
pub struct OpenAiOracleFactory;

impl OracleFactory for OpenAiOracleFactory {
    fn provider_type(&self) -> &'static str {
        "openai"
    }

    fn create(&self, config: &OracleConfig) -> Result<Arc<dyn Oracle>, OracleError> {
        let oracle = OpenAiOracle::from_config(config)?;
        Ok(Arc::new(oracle))
    }

    fn validate_config(&self, config: &OracleConfig) -> Result<(), OracleError> {
        if let Some(url) = config.base_url.as_deref() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(OracleError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "OpenAI Responses API with file_search retrieval"
    }
}
