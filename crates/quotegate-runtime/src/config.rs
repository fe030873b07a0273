//! Runtime configuration.
//!
//! All configuration is loaded once at process start into [`AppConfig`]
//! and passed by reference into the pipeline. No pipeline stage performs
//! ambient lookups (environment, globals) at request time; the single
//! exception is the API-key environment fallback, resolved at provider
//! construction.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use quotegate_core::Language;

/// Errors loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no topics configured; the topic table must not be empty")]
    NoTopics,

    #[error("unknown default language tag: {0}")]
    UnknownLanguage(String),
}

/// How aggressively the extractor prompt rejects marginal passages.
///
/// A configuration input, not a code path: both levels run the same
/// pipeline with a different instruction block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    #[default]
    Standard,
    Strict,
}

/// Oracle provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OracleConfig {
    /// Provider key, e.g. `"openai"`.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; falls back to the provider's environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Custom API endpoint base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 for deterministic).
    #[serde(default)]
    pub temperature: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

/// Pipeline-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PipelineConfig {
    /// Extractor prompt strictness.
    pub strictness: Strictness,

    /// Language used when the question's script is inconclusive and the
    /// client sent no explicit tag. `None` keeps the detector's default.
    pub default_language: Option<String>,

    /// Timeout for the evidence extraction call.
    #[serde(deserialize_with = "de_duration")]
    pub extraction_timeout: Duration,

    /// Timeout for the answer composition call.
    #[serde(deserialize_with = "de_duration")]
    pub composition_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            default_language: None,
            extraction_timeout: Duration::from_secs(20),
            composition_timeout: Duration::from_secs(20),
        }
    }
}

impl PipelineConfig {
    /// Resolve the configured default language, if any.
    pub fn default_language(&self) -> Result<Option<Language>, ConfigError> {
        match &self.default_language {
            None => Ok(None),
            Some(tag) => Language::from_tag(tag)
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownLanguage(tag.clone())),
        }
    }
}

/// Durations in config are human-readable strings ("20s", "1m 30s").
fn de_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Full application configuration, constructed once at process start.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Topic key to knowledge-store identifier table.
    pub topics: BTreeMap<String, String>,
}

impl AppConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.topics.is_empty() {
            return Err(ConfigError::NoTopics);
        }
        self.pipeline.default_language()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_YAML: &str = r#"
oracle:
  provider: openai
  model: gpt-4.1-mini
  temperature: 0.0
pipeline:
  strictness: strict
  default_language: he
  extraction_timeout: 25s
  composition_timeout: 15s
topics:
  azithromycin: vs_azithro_001
  amoxicillin: vs_amoxi_002
"#;

    #[test]
    fn test_full_config_round_trip() {
        let config = AppConfig::from_yaml(EXAMPLE_YAML).unwrap();
        assert_eq!(config.oracle.provider, "openai");
        assert_eq!(config.pipeline.strictness, Strictness::Strict);
        assert_eq!(
            config.pipeline.extraction_timeout,
            Duration::from_secs(25)
        );
        assert_eq!(
            config.pipeline.composition_timeout,
            Duration::from_secs(15)
        );
        assert_eq!(config.topics.len(), 2);
        assert_eq!(
            config.pipeline.default_language().unwrap(),
            Some(Language::He)
        );
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_yaml("topics:\n  azithromycin: vs_1\n").unwrap();
        assert_eq!(config.oracle.model, "gpt-4.1-mini");
        assert_eq!(config.oracle.max_tokens, 800);
        assert_eq!(config.pipeline.strictness, Strictness::Standard);
        assert_eq!(
            config.pipeline.extraction_timeout,
            Duration::from_secs(20)
        );
    }

    #[test]
    fn test_empty_topic_table_is_rejected() {
        let result = AppConfig::from_yaml("topics: {}\n");
        assert!(matches!(result, Err(ConfigError::NoTopics)));
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let yaml = "pipeline:\n  default_language: klingon\ntopics:\n  azithromycin: vs_1\n";
        let result = AppConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::UnknownLanguage(_))));
    }

    #[test]
    fn test_bad_duration_is_a_parse_error() {
        let yaml = "pipeline:\n  extraction_timeout: soon\ntopics:\n  azithromycin: vs_1\n";
        assert!(AppConfig::from_yaml(yaml).is_err());
    }
}
