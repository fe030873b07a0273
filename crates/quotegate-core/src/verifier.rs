//! Answer verification: the last gate before rendering.
//!
//! The composer is the same unreliable oracle as the extractor. A composed
//! answer that claims FOUND without carrying forward at least one evidence
//! quote is a sanity violation; it is silently corrected to the canned
//! not-found result, never surfaced as an error to the caller.

use crate::language::Language;
use crate::sanitizer::MAX_QUOTES;
use crate::types::{AnswerResult, Verdict};

/// Defensive cap on the short answer text.
pub const MAX_SHORT_ANSWER_CHARS: usize = 2000;

/// Defensive cap on each verbatim quote.
pub const MAX_QUOTE_CHARS: usize = 500;

/// Defensive cap on the source hint.
pub const MAX_SOURCE_HINT_CHARS: usize = 300;

/// Defensive cap on the warning list.
pub const MAX_WARNINGS: usize = 8;

/// Verify a composed answer against the no-answer-without-evidence rule.
///
/// `FOUND` with an empty `verbatim` list is forced to the canned not-found
/// result for `language`. Everything else passes through with string
/// lengths bounded defensively.
pub fn verify(raw: AnswerResult, language: Language) -> AnswerResult {
    if raw.verdict == Verdict::Found && raw.verbatim.is_empty() {
        tracing::warn!("composer claimed FOUND without evidence quotes; forcing not-found");
        let mut canned = AnswerResult::canned_not_found(language);
        canned.warnings = raw.warnings;
        bound_warnings(&mut canned.warnings);
        return canned;
    }

    let mut result = raw;
    truncate_chars(&mut result.short_answer, MAX_SHORT_ANSWER_CHARS);
    truncate_chars(&mut result.source_hint, MAX_SOURCE_HINT_CHARS);
    result.verbatim.truncate(MAX_QUOTES);
    for quote in &mut result.verbatim {
        truncate_chars(&mut quote.quote, MAX_QUOTE_CHARS);
    }
    bound_warnings(&mut result.warnings);
    result
}

fn bound_warnings(warnings: &mut Vec<String>) {
    warnings.truncate(MAX_WARNINGS);
    for warning in warnings.iter_mut() {
        truncate_chars(warning, MAX_SHORT_ANSWER_CHARS);
    }
}

/// Truncate on a char boundary without reallocating when already in bounds.
fn truncate_chars(s: &mut String, max_chars: usize) {
    if let Some((index, _)) = s.char_indices().nth(max_chars) {
        s.truncate(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages;
    use crate::types::EvidenceQuote;

    fn found_answer() -> AnswerResult {
        AnswerResult {
            verdict: Verdict::Found,
            short_answer: "500mg every 8 hours".to_string(),
            verbatim: vec![EvidenceQuote::with_hints("Give 500mg q8h", "Dosing", "p.4")],
            source_hint: "Dosing, p.4".to_string(),
            warnings: vec![],
        }
    }

    #[test]
    fn test_found_without_quotes_is_downgraded() {
        let raw = AnswerResult {
            verbatim: vec![],
            ..found_answer()
        };
        let verified = verify(raw, Language::En);
        assert_eq!(verified.verdict, Verdict::NotFound);
        assert_eq!(verified.short_answer, messages::not_found(Language::En));
        assert!(verified.verbatim.is_empty());
    }

    #[test]
    fn test_downgrade_keeps_accumulated_warnings() {
        let raw = AnswerResult {
            verbatim: vec![],
            warnings: vec!["prior warning".to_string()],
            ..found_answer()
        };
        let verified = verify(raw, Language::En);
        assert_eq!(verified.warnings, vec!["prior warning".to_string()]);
    }

    #[test]
    fn test_valid_found_passes_through() {
        let raw = found_answer();
        let verified = verify(raw.clone(), Language::En);
        assert_eq!(verified, raw);
    }

    #[test]
    fn test_not_found_passes_through() {
        let raw = AnswerResult::canned_not_found(Language::He);
        let verified = verify(raw.clone(), Language::He);
        assert_eq!(verified, raw);
    }

    #[test]
    fn test_oversized_strings_are_bounded() {
        let mut raw = found_answer();
        raw.short_answer = "x".repeat(MAX_SHORT_ANSWER_CHARS + 50);
        raw.verbatim[0].quote = "q".repeat(MAX_QUOTE_CHARS + 50);
        raw.source_hint = "s".repeat(MAX_SOURCE_HINT_CHARS + 50);

        let verified = verify(raw, Language::En);
        assert_eq!(verified.short_answer.chars().count(), MAX_SHORT_ANSWER_CHARS);
        assert_eq!(verified.verbatim[0].quote.chars().count(), MAX_QUOTE_CHARS);
        assert_eq!(verified.source_hint.chars().count(), MAX_SOURCE_HINT_CHARS);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let mut raw = found_answer();
        raw.short_answer = "д".repeat(MAX_SHORT_ANSWER_CHARS + 1);
        let verified = verify(raw, Language::Ru);
        assert_eq!(verified.short_answer.chars().count(), MAX_SHORT_ANSWER_CHARS);
    }

    #[test]
    fn test_excess_quotes_are_truncated() {
        let mut raw = found_answer();
        raw.verbatim = (0..10)
            .map(|i| EvidenceQuote::new(format!("Quote number {} text", i)))
            .collect();
        let verified = verify(raw, Language::En);
        assert_eq!(verified.verbatim.len(), MAX_QUOTES);
    }
}
