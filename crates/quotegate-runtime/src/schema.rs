//! JSON Schema contracts for oracle structured output.
//!
//! The oracle's output is an untrusted boundary: every reply is validated
//! against the declared schema before any field is consulted. The same
//! schema documents are embedded in the oracle request as the
//! structured-output contract.

use std::sync::OnceLock;

use serde_json::Value;
use thiserror::Error;

/// Embedded schemas (loaded at compile time).
const EVIDENCE_SET_SCHEMA_JSON: &str = include_str!("../schemas/evidence_set.schema.json");
const ANSWER_RESULT_SCHEMA_JSON: &str = include_str!("../schemas/answer_result.schema.json");

/// Errors from schema handling.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("failed to load schema: {0}")]
    LoadError(String),
}

/// The two structured-output contracts the pipeline declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    EvidenceSet,
    AnswerResult,
}

impl SchemaKind {
    /// Contract name sent to the oracle.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::EvidenceSet => "evidence_set",
            SchemaKind::AnswerResult => "answer_result",
        }
    }

    fn raw_json(&self) -> &'static str {
        match self {
            SchemaKind::EvidenceSet => EVIDENCE_SET_SCHEMA_JSON,
            SchemaKind::AnswerResult => ANSWER_RESULT_SCHEMA_JSON,
        }
    }

    /// The schema document, parsed once and reused.
    pub fn document(&self) -> &'static Value {
        static EVIDENCE_DOC: OnceLock<Value> = OnceLock::new();
        static ANSWER_DOC: OnceLock<Value> = OnceLock::new();

        let cell = match self {
            SchemaKind::EvidenceSet => &EVIDENCE_DOC,
            SchemaKind::AnswerResult => &ANSWER_DOC,
        };
        cell.get_or_init(|| {
            serde_json::from_str(self.raw_json()).expect("embedded schema is valid JSON")
        })
    }

    fn validator(&self) -> Result<&'static jsonschema::Validator, SchemaError> {
        static EVIDENCE_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> =
            OnceLock::new();
        static ANSWER_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

        let cell = match self {
            SchemaKind::EvidenceSet => &EVIDENCE_VALIDATOR,
            SchemaKind::AnswerResult => &ANSWER_VALIDATOR,
        };
        let result = cell.get_or_init(|| {
            jsonschema::options()
                .build(self.document())
                .map_err(|e| format!("Failed to compile schema: {}", e))
        });

        match result {
            Ok(validator) => Ok(validator),
            Err(e) => Err(SchemaError::LoadError(e.clone())),
        }
    }

    /// Validate an oracle reply against this contract.
    ///
    /// Returns all validation error messages, not just the first, so the
    /// degradation log shows the full shape mismatch.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<String>> {
        let validator = self.validator().map_err(|e| vec![e.to_string()])?;

        let errors: Vec<String> = validator
            .iter_errors(value)
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
