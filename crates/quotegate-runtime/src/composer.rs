//! Answer composition: the second oracle stage.
//!
//! The composer sees only the sanitized quotes, embedded verbatim in its
//! prompt; it is granted no retrieval tool, so it cannot pull in
//! additional, unverified material. Failure here never propagates as an
//! exception - the orchestrator degrades to the canned not-found result.

use std::sync::Arc;

use thiserror::Error;

use quotegate_core::{AnswerResult, AnswerStyle, EvidenceSet, Language};

use crate::oracle::{InvocationConfig, Oracle, OracleRequest};
use crate::prompts;
use crate::schema::SchemaKind;

/// The single failure outcome of the composition stage.
#[derive(Error, Debug)]
#[error("answer composition failed: {reason}")]
pub struct CompositionFailed {
    pub reason: String,
}

/// Answer composition stage.
pub struct AnswerComposer {
    oracle: Arc<dyn Oracle>,
    invocation: InvocationConfig,
}

impl AnswerComposer {
    pub fn new(oracle: Arc<dyn Oracle>, invocation: InvocationConfig) -> Self {
        Self { oracle, invocation }
    }

    /// Compose a raw (not yet verified) answer bounded by the evidence.
    ///
    /// The oracle is attempted exactly once under the configured timeout.
    pub async fn compose(
        &self,
        question: &str,
        evidence: &EvidenceSet,
        language: Language,
        style: AnswerStyle,
    ) -> Result<AnswerResult, CompositionFailed> {
        let request = OracleRequest {
            system: prompts::composer_system(style, language),
            user: prompts::composer_user(question, evidence),
            schema_name: SchemaKind::AnswerResult.name(),
            schema: SchemaKind::AnswerResult.document().clone(),
            retrieval: None,
        };

        let invocation = self.oracle.invoke(request, &self.invocation);
        let value = match tokio::time::timeout(self.invocation.timeout, invocation).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "answer composition call failed");
                return Err(CompositionFailed {
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.invocation.timeout, "answer composition timed out");
                return Err(CompositionFailed {
                    reason: format!("timed out after {:?}", self.invocation.timeout),
                });
            }
        };

        if let Err(errors) = SchemaKind::AnswerResult.validate(&value) {
            tracing::warn!(errors = ?errors, "composer output failed schema validation");
            return Err(CompositionFailed {
                reason: format!("schema validation failed: {}", errors.join("; ")),
            });
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(error = %e, "composer output failed deserialization");
            CompositionFailed {
                reason: e.to_string(),
            }
        })
    }
}
