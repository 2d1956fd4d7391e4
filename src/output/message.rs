//! Singer-style output messages

use crate::state::State;
use crate::types::{JsonValue, Record};
use serde::{Deserialize, Serialize};

/// A message emitted during sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Record schema, sent once per stream before its first record
    Schema {
        /// Stream name
        stream: String,
        /// JSON Schema document
        schema: JsonValue,
        /// Key fields
        key_properties: Vec<String>,
    },
    /// A single shaped record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: Record,
    },
    /// Checkpoint of all bookmarks
    State {
        /// Full state document
        value: State,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(stream: impl Into<String>, schema: JsonValue, key_properties: &[&str]) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties: key_properties.iter().map(ToString::to_string).collect(),
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: Record) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
        }
    }

    /// Create a state message
    pub fn state(value: State) -> Self {
        Self::State { value }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Stream name, for schema and record messages
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }
}
