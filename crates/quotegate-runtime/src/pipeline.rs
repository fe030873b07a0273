//! Pipeline orchestrator: extract -> sanitize -> compose -> verify -> render.
//!
//! Data flows strictly forward; no stage reaches backward. The one early
//! exit is extraction failure, which short-circuits to the canned
//! not-found outcome so the composer can never fabricate an answer with
//! zero grounding. Every oracle call runs exactly once per request; there
//! are no retries and no cross-request state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quotegate_core::{
    messages, render, sanitize, verify, AnswerResult, AnswerStyle, ContextError, Language,
    OutputMode, RequestContext, Verdict,
};

use crate::composer::AnswerComposer;
use crate::config::{AppConfig, OracleConfig};
use crate::extractor::EvidenceExtractor;
use crate::oracle::{InvocationConfig, Oracle};
use crate::topics::TopicRegistry;

/// Guardrail tags identifying why a request degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guardrail {
    TopicNotSupported,
    EvidenceExtractionFailed,
    AnswerCompositionFailed,
}

/// Raw client request, as received on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub topic_key: String,
    pub question: String,

    /// Explicit language tag; absent means detect from the question.
    #[serde(default)]
    pub language: Option<String>,

    /// Requested answer style; unknown values fall back to the default.
    #[serde(default)]
    pub answer_style: Option<String>,

    /// Requested output mode; unknown values fall back to the default.
    #[serde(default)]
    pub output_mode: Option<String>,
}

/// Final outcome of one `answer()` invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub verdict: Verdict,

    /// Rendered user-facing reply for the requested output mode.
    pub reply: String,

    /// The verified structured result, quotes attached for audit.
    pub result: AnswerResult,

    pub topic_key: String,

    /// Knowledge store the evidence came from; absent for unknown topics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,

    pub output_mode: OutputMode,
    pub answer_style: AnswerStyle,

    #[serde(rename = "error_guardrail", skip_serializing_if = "Option::is_none")]
    pub error_guardrail: Option<Guardrail>,

    pub answered_at: DateTime<Utc>,
}

impl Outcome {
    /// The locked-down outcome for a topic outside the configured table.
    fn unsupported_topic(ctx: &RequestContext) -> Self {
        Self {
            verdict: Verdict::NotFound,
            reply: messages::topic_unsupported(ctx.language).to_string(),
            result: AnswerResult::canned_not_found(ctx.language),
            topic_key: ctx.topic_key.clone(),
            store_id: None,
            output_mode: ctx.output_mode,
            answer_style: ctx.answer_style,
            error_guardrail: Some(Guardrail::TopicNotSupported),
            answered_at: Utc::now(),
        }
    }

    /// A canned not-found outcome, rendered for the requested mode.
    fn not_found(
        ctx: &RequestContext,
        store_id: String,
        warnings: Vec<String>,
        guardrail: Option<Guardrail>,
    ) -> Self {
        let mut result = AnswerResult::canned_not_found(ctx.language);
        result.warnings = warnings;
        let reply = render(&result, ctx.output_mode, ctx.language);
        Self {
            verdict: Verdict::NotFound,
            reply,
            result,
            topic_key: ctx.topic_key.clone(),
            store_id: Some(store_id),
            output_mode: ctx.output_mode,
            answer_style: ctx.answer_style,
            error_guardrail: guardrail,
            answered_at: Utc::now(),
        }
    }
}

/// The evidence-gated answering pipeline.
///
/// Holds no cross-request state: the topic table is read-only after
/// construction, and every value in flight is scoped to one request.
pub struct AnswerPipeline {
    extractor: EvidenceExtractor,
    composer: AnswerComposer,
    topics: TopicRegistry,
    default_language: Option<Language>,
}

impl AnswerPipeline {
    /// Assemble the pipeline from loaded configuration.
    pub fn new(
        oracle: Arc<dyn Oracle>,
        topics: TopicRegistry,
        config: &AppConfig,
    ) -> Result<Self, crate::config::ConfigError> {
        let default_language = config.pipeline.default_language()?;
        Ok(Self {
            extractor: EvidenceExtractor::new(
                oracle.clone(),
                invocation(&config.oracle, config.pipeline.extraction_timeout),
                config.pipeline.strictness,
            ),
            composer: AnswerComposer::new(
                oracle,
                invocation(&config.oracle, config.pipeline.composition_timeout),
            ),
            topics,
            default_language,
        })
    }

    /// Answer a raw client request.
    ///
    /// Returns `Err` only for client errors (empty topic key or question);
    /// every pipeline-level failure resolves to a valid [`Outcome`].
    pub async fn answer(&self, request: AnswerRequest) -> Result<Outcome, ContextError> {
        let explicit = request.language.as_deref().and_then(Language::from_tag);
        let language = self.resolve_language(explicit, &request.question);
        let answer_style = AnswerStyle::parse(request.answer_style.as_deref().unwrap_or_default());
        let output_mode = OutputMode::parse(request.output_mode.as_deref().unwrap_or_default());

        let ctx = RequestContext::new(
            request.topic_key,
            request.question,
            Some(language),
            answer_style,
            output_mode,
        )?;

        Ok(self.run(ctx).await)
    }

    /// Run the pipeline for a validated context.
    pub async fn run(&self, ctx: RequestContext) -> Outcome {
        tracing::info!(
            topic = %ctx.topic_key,
            language = ctx.language.as_tag(),
            mode = ctx.output_mode.as_str(),
            "answering question"
        );

        let Some(store_id) = self.topics.resolve(&ctx.topic_key).map(str::to_string) else {
            tracing::warn!(topic = %ctx.topic_key, "topic not supported; refusing retrieval");
            return Outcome::unsupported_topic(&ctx);
        };

        let raw_evidence = match self
            .extractor
            .extract(&store_id, &ctx.question, ctx.language)
            .await
        {
            Ok(evidence) => evidence,
            Err(e) => {
                tracing::warn!(error = %e, "degrading to not-found; composer will not run");
                return Outcome::not_found(
                    &ctx,
                    store_id,
                    Vec::new(),
                    Some(Guardrail::EvidenceExtractionFailed),
                );
            }
        };

        let evidence = sanitize(raw_evidence);
        if !evidence.verdict.is_found() {
            let warnings = if evidence.note.is_empty() {
                Vec::new()
            } else {
                vec![evidence.note.clone()]
            };
            return Outcome::not_found(&ctx, store_id, warnings, None);
        }

        let raw_answer = match self
            .composer
            .compose(&ctx.question, &evidence, ctx.language, ctx.answer_style)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "degrading to not-found after composition failure");
                return Outcome::not_found(
                    &ctx,
                    store_id,
                    vec![messages::COMPOSITION_DEGRADED_WARNING.to_string()],
                    Some(Guardrail::AnswerCompositionFailed),
                );
            }
        };

        let result = verify(raw_answer, ctx.language);
        let reply = render(&result, ctx.output_mode, ctx.language);

        tracing::info!(
            topic = %ctx.topic_key,
            verdict = ?result.verdict,
            quotes = result.verbatim.len(),
            "question answered"
        );

        Outcome {
            verdict: result.verdict,
            reply,
            result,
            topic_key: ctx.topic_key,
            store_id: Some(store_id),
            output_mode: ctx.output_mode,
            answer_style: ctx.answer_style,
            error_guardrail: None,
            answered_at: Utc::now(),
        }
    }

    /// Configured topics, for diagnostics.
    pub fn topics(&self) -> &TopicRegistry {
        &self.topics
    }

    /// Explicit tag wins; otherwise the question's script decides, with the
    /// configured default taking over when detection falls through to the
    /// Latin default.
    fn resolve_language(&self, explicit: Option<Language>, question: &str) -> Language {
        if let Some(language) = explicit {
            return language;
        }
        match Language::detect(question) {
            Language::En => self.default_language.unwrap_or(Language::En),
            detected => detected,
        }
    }
}

fn invocation(oracle: &OracleConfig, timeout: Duration) -> InvocationConfig {
    InvocationConfig {
        model: oracle.model.clone(),
        max_tokens: oracle.max_tokens,
        temperature: oracle.temperature,
        timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_parsing() {
        let request: AnswerRequest = serde_json::from_value(json!({
            "topicKey": "azithromycin",
            "question": "What is the max dose?",
            "outputMode": "verbatim"
        }))
        .unwrap();
        assert_eq!(request.topic_key, "azithromycin");
        assert_eq!(request.output_mode.as_deref(), Some("verbatim"));
        assert!(request.language.is_none());
    }

    #[test]
    fn test_guardrail_wire_tags() {
        assert_eq!(
            serde_json::to_string(&Guardrail::EvidenceExtractionFailed).unwrap(),
            "\"evidence_extraction_failed\""
        );
        assert_eq!(
            serde_json::to_string(&Guardrail::AnswerCompositionFailed).unwrap(),
            "\"answer_composition_failed\""
        );
        assert_eq!(
            serde_json::to_string(&Guardrail::TopicNotSupported).unwrap(),
            "\"topic_not_supported\""
        );
    }

    #[test]
    fn test_outcome_envelope_field_names() {
        let ctx = RequestContext::new(
            "azithromycin",
            "What is the max dose?",
            Some(Language::En),
            AnswerStyle::Recommended,
            OutputMode::Hybrid,
        )
        .unwrap();
        let outcome = Outcome::not_found(
            &ctx,
            "vs_1".to_string(),
            Vec::new(),
            Some(Guardrail::EvidenceExtractionFailed),
        );

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["topicKey"], "azithromycin");
        assert_eq!(value["storeId"], "vs_1");
        assert_eq!(value["error_guardrail"], "evidence_extraction_failed");
        assert_eq!(value["verdict"], "NOT_FOUND");
        assert!(value["answeredAt"].is_string());
    }

    #[test]
    fn test_unsupported_topic_outcome_has_no_store() {
        let ctx = RequestContext::new(
            "amoxicillin",
            "What is the max dose?",
            Some(Language::En),
            AnswerStyle::Recommended,
            OutputMode::Hybrid,
        )
        .unwrap();
        let outcome = Outcome::unsupported_topic(&ctx);
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("storeId").is_none());
        assert_eq!(value["error_guardrail"], "topic_not_supported");
        assert_eq!(outcome.reply, messages::topic_unsupported(Language::En));
    }
}
