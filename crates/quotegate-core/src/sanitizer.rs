//! Evidence sanitation: the gate between raw oracle output and the composer.
//!
//! The oracle is an untrusted, free-text-generating collaborator. Quotes it
//! returns may be duplicated, padded, or too short to mean anything. This
//! stage is pure and total: it never calls the oracle, never fails, and
//! always returns a set satisfying `Found => 1..=MAX_QUOTES quotes`.

use crate::types::{collapse_whitespace, EvidenceQuote, EvidenceSet, Verdict};

/// Minimum normalized quote length considered usable.
pub const MIN_QUOTE_CHARS: usize = 8;

/// Maximum quotes carried forward into composition.
pub const MAX_QUOTES: usize = 6;

/// Note attached when sanitation empties a claimed-found set.
pub const NO_USABLE_EVIDENCE_NOTE: &str = "no usable evidence extracted";

/// Sanitize a raw evidence set.
///
/// Steps, in order:
/// 1. `NOT_FOUND` discards any quotes and returns immediately.
/// 2. Whitespace-normalize each quote; drop quotes shorter than
///    [`MIN_QUOTE_CHARS`].
/// 3. Deduplicate by case-insensitive normalized text, first-seen order.
/// 4. Zero survivors force the verdict to `NOT_FOUND` with
///    [`NO_USABLE_EVIDENCE_NOTE`].
/// 5. Truncate to [`MAX_QUOTES`].
///
/// Idempotent: sanitizing an already-sanitized set changes nothing.
pub fn sanitize(raw: EvidenceSet) -> EvidenceSet {
    if raw.verdict == Verdict::NotFound {
        return EvidenceSet {
            verdict: Verdict::NotFound,
            quotes: Vec::new(),
            note: raw.note,
        };
    }

    let mut seen: Vec<String> = Vec::new();
    let mut quotes: Vec<EvidenceQuote> = Vec::new();

    for quote in raw.quotes {
        let text = collapse_whitespace(&quote.quote);
        if text.chars().count() < MIN_QUOTE_CHARS {
            tracing::debug!(len = text.chars().count(), "dropping too-short quote");
            continue;
        }

        let identity = text.to_lowercase();
        if seen.contains(&identity) {
            tracing::debug!("dropping duplicate quote");
            continue;
        }
        seen.push(identity);

        quotes.push(EvidenceQuote {
            quote: text,
            section_hint: quote.section_hint.trim().to_string(),
            page_hint: quote.page_hint.trim().to_string(),
        });
    }

    if quotes.is_empty() {
        tracing::warn!("extractor claimed FOUND but no usable quote survived sanitation");
        return EvidenceSet::not_found(NO_USABLE_EVIDENCE_NOTE);
    }

    quotes.truncate(MAX_QUOTES);

    EvidenceSet {
        verdict: Verdict::Found,
        quotes,
        note: raw.note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn found(quotes: &[&str]) -> EvidenceSet {
        EvidenceSet::found(quotes.iter().copied().map(EvidenceQuote::new).collect())
    }

    #[test]
    fn test_not_found_discards_quotes() {
        let raw = EvidenceSet {
            verdict: Verdict::NotFound,
            quotes: vec![EvidenceQuote::new("Max 2g/day for adults")],
            note: "extractor note".to_string(),
        };
        let clean = sanitize(raw);
        assert_eq!(clean.verdict, Verdict::NotFound);
        assert!(clean.quotes.is_empty());
        assert_eq!(clean.note, "extractor note");
    }

    #[test]
    fn test_duplicates_collapse_to_one() {
        let clean = sanitize(found(&["Max 2g/day", "Max 2g/day"]));
        assert_eq!(clean.verdict, Verdict::Found);
        assert_eq!(clean.quotes.len(), 1);
    }

    #[test]
    fn test_dedup_is_case_and_whitespace_insensitive() {
        let clean = sanitize(found(&["Max  2g/day", "max 2g/DAY"]));
        assert_eq!(clean.quotes.len(), 1);
        assert_eq!(clean.quotes[0].quote, "Max 2g/day");
    }

    #[test]
    fn test_short_quote_forces_not_found() {
        let clean = sanitize(found(&["ok"]));
        assert_eq!(clean.verdict, Verdict::NotFound);
        assert!(clean.quotes.is_empty());
        assert_eq!(clean.note, NO_USABLE_EVIDENCE_NOTE);
    }

    #[test]
    fn test_whitespace_only_quote_is_dropped() {
        let clean = sanitize(found(&["   \n\t  "]));
        assert_eq!(clean.verdict, Verdict::NotFound);
    }

    #[test]
    fn test_truncates_to_max_quotes() {
        let texts: Vec<String> = (0..10).map(|i| format!("Quote number {} text", i)).collect();
        let raw = EvidenceSet::found(texts.iter().map(EvidenceQuote::new).collect());
        let clean = sanitize(raw);
        assert_eq!(clean.quotes.len(), MAX_QUOTES);
        assert_eq!(clean.quotes[0].quote, "Quote number 0 text");
    }

    #[test]
    fn test_preserves_first_seen_order() {
        let clean = sanitize(found(&["First supporting quote", "Second supporting quote"]));
        assert_eq!(clean.quotes[0].quote, "First supporting quote");
        assert_eq!(clean.quotes[1].quote, "Second supporting quote");
    }

    #[test]
    fn test_hints_are_trimmed() {
        let raw = EvidenceSet::found(vec![EvidenceQuote::with_hints(
            "Give 500mg q8h",
            " Dosing ",
            " p.4 ",
        )]);
        let clean = sanitize(raw);
        assert_eq!(clean.quotes[0].section_hint, "Dosing");
        assert_eq!(clean.quotes[0].page_hint, "p.4");
    }

    fn arb_quote() -> impl Strategy<Value = EvidenceQuote> {
        (".{0,40}", ".{0,10}", ".{0,10}").prop_map(|(quote, section, page)| EvidenceQuote {
            quote,
            section_hint: section,
            page_hint: page,
        })
    }

    fn arb_evidence_set() -> impl Strategy<Value = EvidenceSet> {
        (
            prop_oneof![Just(Verdict::Found), Just(Verdict::NotFound)],
            prop::collection::vec(arb_quote(), 0..12),
            ".{0,20}",
        )
            .prop_map(|(verdict, quotes, note)| EvidenceSet {
                verdict,
                quotes,
                note,
            })
    }

    proptest! {
        #[test]
        fn prop_found_implies_one_to_six_usable_distinct_quotes(raw in arb_evidence_set()) {
            let clean = sanitize(raw);
            if clean.verdict == Verdict::Found {
                prop_assert!(!clean.quotes.is_empty());
                prop_assert!(clean.quotes.len() <= MAX_QUOTES);
                for quote in &clean.quotes {
                    prop_assert!(quote.quote.chars().count() >= MIN_QUOTE_CHARS);
                }
                let mut identities: Vec<String> =
                    clean.quotes.iter().map(|q| q.identity()).collect();
                let total = identities.len();
                identities.sort();
                identities.dedup();
                prop_assert_eq!(total, identities.len());
            } else {
                prop_assert!(clean.quotes.is_empty());
            }
        }

        #[test]
        fn prop_sanitize_is_idempotent(raw in arb_evidence_set()) {
            let once = sanitize(raw);
            let twice = sanitize(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
