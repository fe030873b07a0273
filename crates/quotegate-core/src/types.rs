//! Value objects flowing through the answering pipeline.
//!
//! Everything here is a transient, single-request-scoped value: constructed
//! by one stage, consumed by the next, discarded after rendering. Nothing
//! outlives one `answer()` invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;

/// Whether the protocol contains explicit support for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "FOUND")]
    Found,

    #[serde(rename = "NOT_FOUND")]
    NotFound,
}

impl Verdict {
    /// True when the verdict claims explicit support exists.
    pub fn is_found(&self) -> bool {
        matches!(self, Verdict::Found)
    }
}

/// A verbatim quote lifted from the protocol document.
///
/// Identity is the whitespace-collapsed, case-folded quote text; the hints
/// are presentation metadata and never participate in identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvidenceQuote {
    /// Verbatim text copied from the protocol.
    pub quote: String,

    /// Section name where the quote was found, possibly empty.
    pub section_hint: String,

    /// Page reference where the quote was found, possibly empty.
    pub page_hint: String,
}

impl EvidenceQuote {
    /// Create a quote with no location hints.
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            ..Default::default()
        }
    }

    /// Create a quote with section and page hints.
    pub fn with_hints(
        quote: impl Into<String>,
        section_hint: impl Into<String>,
        page_hint: impl Into<String>,
    ) -> Self {
        Self {
            quote: quote.into(),
            section_hint: section_hint.into(),
            page_hint: page_hint.into(),
        }
    }

    /// Deduplication identity: whitespace-collapsed, case-folded quote text.
    pub fn identity(&self) -> String {
        collapse_whitespace(&self.quote).to_lowercase()
    }
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Raw or sanitized output of the evidence extraction stage.
///
/// Invariant after sanitation: `verdict == Found` implies
/// `1 <= quotes.len() <= MAX_QUOTES`. The invariant is enforced by the
/// sanitizer, never assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceSet {
    pub verdict: Verdict,

    /// Supporting quotes in extraction order.
    #[serde(default)]
    pub quotes: Vec<EvidenceQuote>,

    /// Free-text note from the extractor (or the sanitizer).
    #[serde(default)]
    pub note: String,
}

impl EvidenceSet {
    /// An empty not-found set with an explanatory note.
    pub fn not_found(note: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::NotFound,
            quotes: Vec::new(),
            note: note.into(),
        }
    }

    /// A found set carrying the given quotes.
    pub fn found(quotes: Vec<EvidenceQuote>) -> Self {
        Self {
            verdict: Verdict::Found,
            quotes,
            note: String::new(),
        }
    }
}

/// Structured answer produced by the composition stage.
///
/// Invariant after verification: `verdict == Found` implies
/// `verbatim.len() >= 1`. The `verbatim` quotes stay attached regardless of
/// the rendered output mode so callers can audit the raw evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub verdict: Verdict,

    /// Concise answer text, bounded by the supplied evidence.
    #[serde(default)]
    pub short_answer: String,

    /// Evidence quotes the answer relies on, in order.
    #[serde(default)]
    pub verbatim: Vec<EvidenceQuote>,

    /// Human-readable pointer to where the answer lives in the protocol.
    #[serde(default)]
    pub source_hint: String,

    /// Caveats accumulated along the pipeline.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl AnswerResult {
    /// The canned not-found result: explicit localized message, no quotes.
    ///
    /// Every degraded path in the pipeline resolves to this shape.
    pub fn canned_not_found(language: Language) -> Self {
        Self {
            verdict: Verdict::NotFound,
            short_answer: crate::messages::not_found(language).to_string(),
            verbatim: Vec::new(),
            source_hint: String::new(),
            warnings: Vec::new(),
        }
    }
}

/// Requested presentation style for the composed answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStyle {
    #[default]
    Recommended,
    Detailed,
    Bullet,
}

impl AnswerStyle {
    /// Lenient parse; unknown or empty input falls back to the default.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "detailed" => AnswerStyle::Detailed,
            "bullet" | "bullets" => AnswerStyle::Bullet,
            _ => AnswerStyle::Recommended,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerStyle::Recommended => "recommended",
            AnswerStyle::Detailed => "detailed",
            AnswerStyle::Bullet => "bullet",
        }
    }
}

/// Requested rendering of the validated answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Hybrid,
    Verbatim,
    Short,
    Link,
}

impl OutputMode {
    /// Lenient parse; unknown or empty input falls back to the default.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "verbatim" => OutputMode::Verbatim,
            "short" => OutputMode::Short,
            "link" => OutputMode::Link,
            _ => OutputMode::Hybrid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Hybrid => "hybrid",
            OutputMode::Verbatim => "verbatim",
            OutputMode::Short => "short",
            OutputMode::Link => "link",
        }
    }
}

/// Errors building a request context from client input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("topic key must not be empty")]
    EmptyTopicKey,

    #[error("question must not be empty")]
    EmptyQuestion,
}

/// Per-call immutable configuration, created once per incoming request and
/// passed by value through all stages.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub topic_key: String,
    pub question: String,
    pub language: Language,
    pub answer_style: AnswerStyle,
    pub output_mode: OutputMode,
}

impl RequestContext {
    /// Build a context from trimmed client input.
    ///
    /// When `language` is `None` the question's script decides, see
    /// [`Language::detect`]. Empty topic key or question is a client
    /// error, not a pipeline concern.
    pub fn new(
        topic_key: impl Into<String>,
        question: impl Into<String>,
        language: Option<Language>,
        answer_style: AnswerStyle,
        output_mode: OutputMode,
    ) -> Result<Self, ContextError> {
        let topic_key = topic_key.into().trim().to_string();
        let question = question.into().trim().to_string();

        if topic_key.is_empty() {
            return Err(ContextError::EmptyTopicKey);
        }
        if question.is_empty() {
            return Err(ContextError::EmptyQuestion);
        }

        let language = language.unwrap_or_else(|| Language::detect(&question));

        Ok(Self {
            topic_key,
            question,
            language,
            answer_style,
            output_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(
            serde_json::to_string(&Verdict::Found).unwrap(),
            "\"FOUND\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::NotFound).unwrap(),
            "\"NOT_FOUND\""
        );
    }

    #[test]
    fn test_quote_identity_collapses_whitespace_and_case() {
        let a = EvidenceQuote::new("Max  2g/Day");
        let b = EvidenceQuote::new("max 2g/day");
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_quote_wire_field_names() {
        let quote = EvidenceQuote::with_hints("Give 500mg q8h", "Dosing", "p.4");
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["sectionHint"], "Dosing");
        assert_eq!(json["pageHint"], "p.4");
    }

    #[test]
    fn test_answer_result_wire_field_names() {
        let result = AnswerResult {
            verdict: Verdict::Found,
            short_answer: "500mg every 8 hours".to_string(),
            verbatim: vec![EvidenceQuote::new("Give 500mg q8h")],
            source_hint: "Dosing, p.4".to_string(),
            warnings: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["shortAnswer"], "500mg every 8 hours");
        assert_eq!(json["sourceHint"], "Dosing, p.4");
        assert_eq!(json["verdict"], "FOUND");
    }

    #[test]
    fn test_evidence_set_missing_fields_default() {
        let set: EvidenceSet = serde_json::from_str(r#"{"verdict":"NOT_FOUND"}"#).unwrap();
        assert_eq!(set.verdict, Verdict::NotFound);
        assert!(set.quotes.is_empty());
        assert!(set.note.is_empty());
    }

    #[test]
    fn test_style_and_mode_parse_leniently() {
        assert_eq!(AnswerStyle::parse("Detailed "), AnswerStyle::Detailed);
        assert_eq!(AnswerStyle::parse("nonsense"), AnswerStyle::Recommended);
        assert_eq!(OutputMode::parse("VERBATIM"), OutputMode::Verbatim);
        assert_eq!(OutputMode::parse(""), OutputMode::Hybrid);
    }

    #[test]
    fn test_context_rejects_empty_fields() {
        let err = RequestContext::new(
            "  ",
            "What is the dose?",
            None,
            AnswerStyle::default(),
            OutputMode::default(),
        )
        .unwrap_err();
        assert_eq!(err, ContextError::EmptyTopicKey);

        let err = RequestContext::new(
            "azithromycin",
            "\n\t",
            None,
            AnswerStyle::default(),
            OutputMode::default(),
        )
        .unwrap_err();
        assert_eq!(err, ContextError::EmptyQuestion);
    }

    #[test]
    fn test_context_detects_language_when_absent() {
        let ctx = RequestContext::new(
            "azithromycin",
            "Какая максимальная доза?",
            None,
            AnswerStyle::default(),
            OutputMode::default(),
        )
        .unwrap();
        assert_eq!(ctx.language, Language::Ru);
    }
}
