//! # quotegate-runtime
//!
//! Oracle providers and pipeline orchestration for quotegate.
//!
//! This crate owns everything that talks to the retrieval-augmented
//! oracle: the two call stages (evidence extraction, answer composition),
//! the structured-output schemas those calls declare, the topic-to-store
//! registry, and the orchestrator that wires them to the deterministic
//! stages in `quotegate-core`.
//!
//! ## Safety Property
//!
//! The orchestrator fails closed. If extraction fails for any reason, the
//! composer is never invoked; if composition fails, the result degrades to
//! an explicit not-found. Nothing below the transport layer escapes as an
//! exception.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotegate_runtime::{AnswerPipeline, AnswerRequest, AppConfig, OracleRegistry, TopicRegistry};
//!
//! let config = AppConfig::from_yaml_file("quotegate.yaml")?;
//! let oracle = OracleRegistry::with_defaults().create(&config.oracle)?;
//! let topics = TopicRegistry::from_map(config.topics.clone());
//! let pipeline = AnswerPipeline::new(oracle, topics, &config)?;
//!
//! let outcome = pipeline.answer(AnswerRequest {
//!     topic_key: "azithromycin".into(),
//!     question: "What is the maximum daily dose?".into(),
//!     language: None,
//!     answer_style: None,
//!     output_mode: None,
//! }).await?;
//! println!("{}", outcome.reply);
//! ```

pub mod composer;
pub mod config;
pub mod extractor;
pub mod oracle;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod topics;

// Re-export main types at crate root
pub use composer::{AnswerComposer, CompositionFailed};
pub use config::{AppConfig, ConfigError, OracleConfig, PipelineConfig, Strictness};
pub use extractor::{EvidenceExtractor, ExtractionFailed};
pub use oracle::{
    ApiCredential, InvocationConfig, Oracle, OracleError, OracleRegistry, OracleRequest,
    RetrievalScope,
};
pub use pipeline::{AnswerPipeline, AnswerRequest, Guardrail, Outcome};
pub use schema::SchemaKind;
pub use topics::TopicRegistry;
