//! # quotegate-core
//!
//! Deterministic stages of the evidence-gated answering pipeline.
//!
//! This crate holds everything in the pipeline that is a pure function of
//! its inputs: evidence sanitation, answer verification, output-mode
//! rendering, language detection, and the canned messages. It makes no
//! network calls and no LLM calls.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input always produces same output
//! 2. **Total**: sanitize/verify/render never fail; every input maps to a
//!    valid value
//! 3. **Fail closed**: a claimed FOUND without usable evidence is always
//!    corrected to NOT_FOUND, never passed through
//!
//! ## Example
//!
//! ```rust
//! use quotegate_core::{sanitize, verify, render};
//! use quotegate_core::{EvidenceQuote, EvidenceSet, Language, OutputMode};
//!
//! let raw = EvidenceSet::found(vec![
//!     EvidenceQuote::new("Max 2g/day"),
//!     EvidenceQuote::new("Max 2g/day"),
//! ]);
//! let evidence = sanitize(raw);
//! assert_eq!(evidence.quotes.len(), 1);
//! ```

pub mod language;
pub mod messages;
pub mod renderer;
pub mod sanitizer;
pub mod types;
pub mod verifier;

// Re-export main types at crate root
pub use language::Language;
pub use renderer::render;
pub use sanitizer::{sanitize, MAX_QUOTES, MIN_QUOTE_CHARS, NO_USABLE_EVIDENCE_NOTE};
pub use types::{
    collapse_whitespace, AnswerResult, AnswerStyle, ContextError, EvidenceQuote, EvidenceSet,
    OutputMode, RequestContext, Verdict,
};
pub use verifier::{verify, MAX_QUOTE_CHARS, MAX_SHORT_ANSWER_CHARS};
