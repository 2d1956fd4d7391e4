//! Extraction context types
//!
//! An [`ExtractionContext`] maps path placeholder names to scalar values
//! derived from one parent record.

use crate::types::{scalar_to_string, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable placeholder bindings for one child walk
///
/// Built from a single parent record and handed to exactly one level of
/// children. Keys are ordered so that serialized contexts (state partition
/// keys, log lines) are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionContext {
    values: BTreeMap<String, JsonValue>,
}

impl ExtractionContext {
    /// The empty context used by top-level resources
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return a new context with one more binding
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a bound value
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// Check whether a key is bound
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Check if no keys are bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate bindings in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Compact identifier, e.g. `course_id=5,user_id=3`
    pub fn id(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| {
                let rendered = scalar_to_string(v).unwrap_or_else(|| v.to_string());
                format!("{k}={rendered}")
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for ExtractionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "{{{}}}", self.id())
        }
    }
}

/// Rule deriving one context key from a field of the parent record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingRule {
    /// Context key (placeholder name) to bind
    pub key: &'static str,
    /// Field of the parent record supplying the value
    pub source: &'static str,
}

/// Shorthand constructor for binding tables
pub const fn bind(key: &'static str, source: &'static str) -> BindingRule {
    BindingRule { key, source }
}
