//! Factory pattern for oracle provider construction.
//!
//! Maps the config `provider` string to a constructed provider, so the
//! binary never hardcodes a backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Oracle, OracleError};
use crate::config::OracleConfig;

/// Factory for creating a specific oracle provider from configuration.
pub trait OracleFactory: Send + Sync {
    /// Provider key this factory handles (e.g. `"openai"`).
    fn provider_type(&self) -> &'static str;

    /// Construct a provider from the typed configuration.
    fn create(&self, config: &OracleConfig) -> Result<Arc<dyn Oracle>, OracleError>;

    /// Validate configuration without constructing the provider.
    fn validate_config(&self, _config: &OracleConfig) -> Result<(), OracleError> {
        Ok(())
    }

    /// Human-readable description for diagnostics.
    fn description(&self) -> &'static str;
}

/// Registry of known oracle factories.
pub struct OracleRegistry {
    factories: BTreeMap<&'static str, Box<dyn OracleFactory>>,
}

impl OracleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with all compiled-in providers.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "openai")]
        registry.register(Box::new(super::openai::OpenAiOracleFactory));

        registry
    }

    /// Register a factory, replacing any previous one for the same key.
    pub fn register(&mut self, factory: Box<dyn OracleFactory>) {
        self.factories.insert(factory.provider_type(), factory);
    }

    /// Construct the provider named by the configuration.
    pub fn create(&self, config: &OracleConfig) -> Result<Arc<dyn Oracle>, OracleError> {
        let factory = self.factories.get(config.provider.as_str()).ok_or_else(|| {
            OracleError::NotConfigured(format!(
                "unknown oracle provider '{}', known: {}",
                config.provider,
                self.provider_types().join(", ")
            ))
        })?;

        factory.validate_config(config)?;
        factory.create(config)
    }

    /// Known provider keys, sorted.
    pub fn provider_types(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for OracleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
