//! Output-mode rendering of a verified answer.
//!
//! Rendering trusts the already-verified [`AnswerResult`]; it never
//! re-derives verdict logic. Whatever the mode, the verbatim quotes stay
//! attached to the result itself for audit.

use crate::language::Language;
use crate::messages;
use crate::types::{AnswerResult, EvidenceQuote, OutputMode};

/// Render a verified answer for the requested output mode.
pub fn render(result: &AnswerResult, mode: OutputMode, language: Language) -> String {
    match mode {
        OutputMode::Verbatim => render_verbatim(result, language),
        OutputMode::Link => render_link(result, language),
        OutputMode::Short | OutputMode::Hybrid => render_short(result, language),
    }
}

/// Numbered quotes with their section/page hints; the short answer is
/// ignored in this mode.
fn render_verbatim(result: &AnswerResult, language: Language) -> String {
    if result.verbatim.is_empty() {
        return messages::not_found(language).to_string();
    }

    let lines: Vec<String> = result
        .verbatim
        .iter()
        .enumerate()
        .map(|(index, quote)| {
            let mut line = format!("{}) {}", index + 1, quote.quote);
            let hint = location_hint(quote);
            if !hint.is_empty() {
                line.push_str("\n   ");
                line.push_str(&hint);
            }
            line
        })
        .collect();

    lines.join("\n")
}

/// Source hint plus the first quote only.
fn render_link(result: &AnswerResult, language: Language) -> String {
    if result.source_hint.trim().is_empty() {
        return messages::source_not_found(language).to_string();
    }

    match result.verbatim.first() {
        Some(quote) => format!("{}\n{}", result.source_hint, quote.quote),
        None => result.source_hint.clone(),
    }
}

/// The short answer when the verdict is FOUND and non-empty, otherwise the
/// explicit not-found message.
fn render_short(result: &AnswerResult, language: Language) -> String {
    if result.verdict.is_found() && !result.short_answer.trim().is_empty() {
        result.short_answer.clone()
    } else {
        messages::not_found(language).to_string()
    }
}

/// `[Section] page` hint line, empty when neither hint is present.
fn location_hint(quote: &EvidenceQuote) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !quote.section_hint.is_empty() {
        parts.push(format!("[{}]", quote.section_hint));
    }
    if !quote.page_hint.is_empty() {
        parts.push(quote.page_hint.clone());
    }
    parts.join(" ")
}
