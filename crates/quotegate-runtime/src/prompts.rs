//! System prompts for the two oracle stages.
//!
//! The prompts enforce role separation:
//! - The extractor locates verbatim support; it never answers.
//! - The composer formats an answer out of supplied quotes; it never
//!   retrieves.
//!
//! Strictness and language are configuration inputs applied here, not
//! separate code paths.

use quotegate_core::{AnswerStyle, EvidenceSet, Language};

use crate::config::Strictness;

/// Base system prompt for the evidence extraction stage.
///
/// The framing matters: the extractor is a quote-locating instrument, not
/// an assistant. NOT_FOUND must remain an acceptable outcome or the model
/// will manufacture support.
pub const EXTRACTOR_SYSTEM_PROMPT: &str = r#"
You are an evidence extraction agent for a clinical drug protocol.

Your only task is to locate passages in the protocol that directly support
an answer to the user's question.
You do not answer the question.
You do not summarize, paraphrase, or explain.
You do not infer, and you do not combine conditions across separate passages.

## Extraction Constraints
1. Copy quotes verbatim - character for character, no paraphrase
2. Return at most 6 quotes, in the order you found them
3. For each quote, report the section name and page reference when visible;
   use an empty string when they are not
4. If no passage explicitly supports an answer, return NOT_FOUND with an
   empty quotes list
5. Never use knowledge from outside the provided protocol

## Critical Reminder
A missing answer is a valid outcome. NOT_FOUND is always preferable to a
quote that does not literally appear in the protocol.
"#;

/// Appended to the extractor prompt when strictness is `Strict`.
pub const EXTRACTOR_STRICT_ADDENDUM: &str = r#"
## Strict Mode
- Reject passages that only partially match the question
- Do not return a quote unless it could stand alone as support
- When in doubt between FOUND and NOT_FOUND, return NOT_FOUND
"#;

/// Base system prompt for the answer composition stage.
pub const COMPOSER_SYSTEM_PROMPT: &str = r#"
You are an answer composition agent for a clinical drug protocol.

You receive a question and a fixed set of verbatim quotes extracted from
the protocol. Those quotes are your entire world.

## Composition Constraints
1. Use only facts literally present in the supplied quotes
2. Never add a dose, timing, frequency, or condition that is not quoted
3. Never infer, extrapolate, or combine conditions across quotes
4. If the quotes are insufficient to answer the question, return NOT_FOUND
5. Carry the quotes you relied on into the verbatim field, unchanged
6. Put a short human-readable location reference in sourceHint when the
   quotes carry section or page hints

## Critical Reminder
You are a formatter of evidence, not a medical advisor. An unsupported
claim is worse than no answer.
"#;

/// Full extractor system prompt for the configured strictness.
pub fn extractor_system(strictness: Strictness) -> String {
    match strictness {
        Strictness::Standard => EXTRACTOR_SYSTEM_PROMPT.to_string(),
        Strictness::Strict => format!("{}{}", EXTRACTOR_SYSTEM_PROMPT, EXTRACTOR_STRICT_ADDENDUM),
    }
}

/// User prompt for the extraction stage.
pub fn extractor_user(question: &str, language: Language) -> String {
    format!(
        "Question ({}): {}\n\nReturn the supporting quotes exactly as they appear in the protocol. \
         Write the note field in {}.",
        language.name(),
        question,
        language.name()
    )
}

/// Full composer system prompt for the requested style and language.
pub fn composer_system(style: AnswerStyle, language: Language) -> String {
    format!(
        "{}\n## Answer Shape\n{}\nWrite shortAnswer in {}.\n",
        COMPOSER_SYSTEM_PROMPT,
        style_instruction(style),
        language.name()
    )
}

/// User prompt for the composition stage: the question plus the sanitized
/// quotes embedded verbatim as the sole context.
pub fn composer_user(question: &str, evidence: &EvidenceSet) -> String {
    let mut prompt = format!("Question: {}\n\nProtocol quotes:\n", question);
    for (index, quote) in evidence.quotes.iter().enumerate() {
        prompt.push_str(&format!("{}. \"{}\"", index + 1, quote.quote));
        if !quote.section_hint.is_empty() {
            prompt.push_str(&format!(" (section: {})", quote.section_hint));
        }
        if !quote.page_hint.is_empty() {
            prompt.push_str(&format!(" (page: {})", quote.page_hint));
        }
        prompt.push('\n');
    }
    prompt.push_str("\nAnswer the question using only these quotes.");
    prompt
}

fn style_instruction(style: AnswerStyle) -> &'static str {
    match style {
        AnswerStyle::Recommended => {
            "Give the single recommended course of action in one or two sentences."
        }
        AnswerStyle::Detailed => {
            "Cover every quoted condition and caveat that bears on the question."
        }
        AnswerStyle::Bullet => "Format shortAnswer as hyphen-prefixed bullet lines.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotegate_core::EvidenceQuote;

    #[test]
    fn test_extractor_prompt_forbids_answering() {
        assert!(EXTRACTOR_SYSTEM_PROMPT.contains("You do not answer the question"));
        assert!(EXTRACTOR_SYSTEM_PROMPT.contains("verbatim"));
        assert!(EXTRACTOR_SYSTEM_PROMPT.contains("NOT_FOUND"));
    }

    #[test]
    fn test_strict_mode_appends_addendum() {
        let standard = extractor_system(Strictness::Standard);
        let strict = extractor_system(Strictness::Strict);
        assert!(!standard.contains("Strict Mode"));
        assert!(strict.contains("Strict Mode"));
        assert!(strict.starts_with(EXTRACTOR_SYSTEM_PROMPT));
    }

    #[test]
    fn test_composer_prompt_forbids_invention() {
        assert!(COMPOSER_SYSTEM_PROMPT.contains("only facts literally present"));
        assert!(COMPOSER_SYSTEM_PROMPT.contains("dose, timing, frequency, or condition"));
        assert!(COMPOSER_SYSTEM_PROMPT.contains("NOT_FOUND"));
    }

    #[test]
    fn test_composer_system_carries_style_and_language() {
        let prompt = composer_system(AnswerStyle::Bullet, Language::He);
        assert!(prompt.contains("bullet lines"));
        assert!(prompt.contains("Hebrew"));
    }

    #[test]
    fn test_composer_user_embeds_quotes_with_hints() {
        let evidence = EvidenceSet::found(vec![
            EvidenceQuote::with_hints("Give 500mg q8h", "Dosing", "p.4"),
            EvidenceQuote::new("Take with food"),
        ]);
        let prompt = composer_user("What is the dose?", &evidence);
        assert!(prompt.contains("1. \"Give 500mg q8h\" (section: Dosing) (page: p.4)"));
        assert!(prompt.contains("2. \"Take with food\""));
        assert!(prompt.contains("only these quotes"));
    }

    #[test]
    fn test_extractor_user_names_the_language() {
        let prompt = extractor_user("Какая доза?", Language::Ru);
        assert!(prompt.contains("Russian"));
        assert!(prompt.contains("Какая доза?"));
    }
}
