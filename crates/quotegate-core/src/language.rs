//! Language handling for prompts and canned messages.
//!
//! Detection is a script-range heuristic over the question text. It is a
//! presentation concern only: it shapes prompts and rendered messages and
//! never affects whether evidence is considered valid.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HEBREW_SCRIPT: Regex = Regex::new(r"\p{Hebrew}").expect("Invalid regex");
    static ref CYRILLIC_SCRIPT: Regex = Regex::new(r"\p{Cyrillic}").expect("Invalid regex");
}

/// Supported answer languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
    Ru,
}

impl Language {
    /// Detect the language of a question by script range.
    ///
    /// Any Hebrew-script character wins over Cyrillic; any Cyrillic
    /// character wins over the Latin default.
    pub fn detect(text: &str) -> Self {
        if HEBREW_SCRIPT.is_match(text) {
            Language::He
        } else if CYRILLIC_SCRIPT.is_match(text) {
            Language::Ru
        } else {
            Language::En
        }
    }

    /// Parse an explicit language tag such as `"he"` or `"ru-RU"`.
    ///
    /// Region subtags are ignored. Unknown tags yield `None` so the caller
    /// can fall back to detection.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().to_lowercase();
        let primary = primary.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "en" | "english" => Some(Language::En),
            "he" | "iw" | "hebrew" => Some(Language::He),
            "ru" | "russian" => Some(Language::Ru),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
            Language::Ru => "ru",
        }
    }

    /// English name of the language, used in prompt construction.
    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::He => "Hebrew",
            Language::Ru => "Russian",
        }
    }
}
