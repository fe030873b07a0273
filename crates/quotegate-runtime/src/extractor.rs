//! Evidence extraction: the first oracle stage.
//!
//! One call, restricted to the topic's knowledge store, asking only for
//! verbatim supporting quotes plus a verdict. No answer text is produced
//! here. Transport failure, malformed output, and timeout all collapse to
//! a single [`ExtractionFailed`] outcome; there is no partial credit.

use std::sync::Arc;

use thiserror::Error;

use quotegate_core::{EvidenceSet, Language};

use crate::config::Strictness;
use crate::oracle::{InvocationConfig, Oracle, OracleRequest, RetrievalScope};
use crate::prompts;
use crate::schema::SchemaKind;

/// The single failure outcome of the extraction stage.
#[derive(Error, Debug)]
#[error("evidence extraction failed: {reason}")]
pub struct ExtractionFailed {
    pub reason: String,
}

/// Evidence extraction stage.
pub struct EvidenceExtractor {
    oracle: Arc<dyn Oracle>,
    invocation: InvocationConfig,
    strictness: Strictness,
}

impl EvidenceExtractor {
    pub fn new(oracle: Arc<dyn Oracle>, invocation: InvocationConfig, strictness: Strictness) -> Self {
        Self {
            oracle,
            invocation,
            strictness,
        }
    }

    /// Extract raw (not yet sanitized) evidence for a question.
    ///
    /// Retrieval is restricted to `store_id`; the oracle is attempted
    /// exactly once under the configured timeout.
    pub async fn extract(
        &self,
        store_id: &str,
        question: &str,
        language: Language,
    ) -> Result<EvidenceSet, ExtractionFailed> {
        let request = OracleRequest {
            system: prompts::extractor_system(self.strictness),
            user: prompts::extractor_user(question, language),
            schema_name: SchemaKind::EvidenceSet.name(),
            schema: SchemaKind::EvidenceSet.document().clone(),
            retrieval: Some(RetrievalScope::new(store_id)),
        };

        let invocation = self.oracle.invoke(request, &self.invocation);
        let value = match tokio::time::timeout(self.invocation.timeout, invocation).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "evidence extraction call failed");
                return Err(ExtractionFailed {
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.invocation.timeout, "evidence extraction timed out");
                return Err(ExtractionFailed {
                    reason: format!("timed out after {:?}", self.invocation.timeout),
                });
            }
        };

        if let Err(errors) = SchemaKind::EvidenceSet.validate(&value) {
            tracing::warn!(errors = ?errors, "extractor output failed schema validation");
            return Err(ExtractionFailed {
                reason: format!("schema validation failed: {}", errors.join("; ")),
            });
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(error = %e, "extractor output failed deserialization");
            ExtractionFailed {
                reason: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct ScriptedOracle {
        reply: Result<Value, &'static str>,
    }

    #[async_trait]
    impl Oracle for ScriptedOracle {
        async fn invoke(
            &self,
            request: OracleRequest,
            _config: &InvocationConfig,
        ) -> Result<Value, OracleError> {
            assert!(request.retrieval.is_some(), "extraction must be scoped");
            self.reply
                .clone()
                .map_err(|m| OracleError::Http(m.to_string()))
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn extractor(reply: Result<Value, &'static str>) -> EvidenceExtractor {
        EvidenceExtractor::new(
            Arc::new(ScriptedOracle { reply }),
            InvocationConfig::default(),
            Strictness::Standard,
        )
    }

    #[tokio::test]
    async fn test_valid_reply_parses() {
        let reply = json!({
            "verdict": "FOUND",
            "quotes": [
                { "quote": "Max 2g/day", "sectionHint": "Dosing", "pageHint": "p.4" }
            ],
            "note": ""
        });
        let evidence = extractor(Ok(reply))
            .extract("vs_1", "What is the max dose?", Language::En)
            .await
            .unwrap();
        assert_eq!(evidence.quotes.len(), 1);
        assert_eq!(evidence.quotes[0].quote, "Max 2g/day");
    }

    #[tokio::test]
    async fn test_transport_failure_collapses() {
        let result = extractor(Err("connection refused"))
            .extract("vs_1", "q", Language::En)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_schema_invalid_reply_collapses() {
        let reply = json!({ "verdict": "MAYBE", "quotes": [], "note": "" });
        let result = extractor(Ok(reply)).extract("vs_1", "q", Language::En).await;
        let err = result.unwrap_err();
        assert!(err.reason.contains("schema validation failed"));
    }
}
