//! Topic registry: the `topic key -> knowledge store` lookup table.
//!
//! Loaded once from configuration and read-only at request time. An absent
//! topic means "reject before any oracle traffic", never "search anyway".

use std::collections::BTreeMap;

/// Read-only mapping from topic keys to knowledge-store identifiers.
///
/// Keys are matched after trimming and case-folding, so `" Azithromycin "`
/// resolves the same store as `"azithromycin"`.
#[derive(Debug, Clone, Default)]
pub struct TopicRegistry {
    entries: BTreeMap<String, String>,
}

impl TopicRegistry {
    /// Build a registry from a configured topic table.
    pub fn from_map(topics: BTreeMap<String, String>) -> Self {
        let entries = topics
            .into_iter()
            .map(|(key, store_id)| (key.trim().to_lowercase(), store_id))
            .collect();
        Self { entries }
    }

    /// Resolve a topic key to its knowledge-store identifier.
    pub fn resolve(&self, topic_key: &str) -> Option<&str> {
        self.entries
            .get(&topic_key.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Configured topic keys, sorted.
    pub fn topic_keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
