//! Canned user-facing messages, localized per supported language.
//!
//! These are the only texts the system may emit without evidence behind
//! them: an explicit not-found, an unsupported topic, or a missing source.

use crate::language::Language;

/// Warning appended when the composition stage fails and the pipeline
/// degrades to the canned not-found result. Audit field, English only.
pub const COMPOSITION_DEGRADED_WARNING: &str =
    "answer composition failed; degraded to not-found";

/// The explicit "no answer in the protocol" message.
pub fn not_found(language: Language) -> &'static str {
    match language {
        Language::En => "The protocol does not contain an explicit answer to this question.",
        Language::He => "לא נמצאה תשובה מפורשת לשאלה זו בפרוטוקול.",
        Language::Ru => "В протоколе не найдено явного ответа на этот вопрос.",
    }
}

/// The locked-down message for topics outside the configured table.
pub fn topic_unsupported(language: Language) -> &'static str {
    match language {
        Language::En => {
            "This topic is not supported. Please choose one of the configured protocol topics."
        }
        Language::He => "נושא זה אינו נתמך. יש לבחור נושא מתוך רשימת הנושאים המוגדרים.",
        Language::Ru => "Эта тема не поддерживается. Выберите одну из настроенных тем протокола.",
    }
}

/// Message for link-mode rendering when no source reference exists.
pub fn source_not_found(language: Language) -> &'static str {
    match language {
        Language::En => "Source reference not found for this answer.",
        Language::He => "לא נמצא מקור לתשובה זו.",
        Language::Ru => "Источник для этого ответа не найден.",
    }
}
