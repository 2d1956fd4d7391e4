//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs. Maps are
//! ordered so that the same state always serializes to the same bytes.

use crate::context::ExtractionContext;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.bookmarks.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.bookmarks.entry(stream.to_string()).or_default()
    }

    /// Bookmark value at a scope
    ///
    /// `None` addresses the stream-level bookmark, `Some(context)` the
    /// partition bookmark for that context.
    pub fn bookmark(&self, stream: &str, scope: Option<&ExtractionContext>) -> Option<&str> {
        let stream_state = self.bookmarks.get(stream)?;
        match scope {
            None => stream_state.replication_key_value.as_deref(),
            Some(context) => stream_state
                .get_partition(context)?
                .replication_key_value
                .as_deref(),
        }
    }

    /// Advance the bookmark at a scope
    ///
    /// The stored value only moves forward; returns whether it changed.
    pub fn advance_bookmark(
        &mut self,
        stream: &str,
        replication_key: &str,
        scope: Option<&ExtractionContext>,
        value: &str,
    ) -> bool {
        let stream_state = self.get_stream_mut(stream);
        stream_state.replication_key = Some(replication_key.to_string());

        let slot = match scope {
            None => &mut stream_state.replication_key_value,
            Some(context) => &mut stream_state.get_partition_mut(context).replication_key_value,
        };

        let newer = slot
            .as_deref()
            .map_or(true, |current| {
                compare_replication_values(value, current) == Ordering::Greater
            });
        if newer {
            *slot = Some(value.to_string());
        }
        newer
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamState {
    /// Field the bookmark tracks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Stream-level bookmark value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<String>,

    /// Per-context bookmarks for child streams
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<PartitionState>,
}

impl StreamState {
    /// Create a new empty stream state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get partition state
    pub fn get_partition(&self, context: &ExtractionContext) -> Option<&PartitionState> {
        self.partitions.iter().find(|p| &p.context == context)
    }

    /// Get mutable partition state, creating if needed
    pub fn get_partition_mut(&mut self, context: &ExtractionContext) -> &mut PartitionState {
        let index = match self.partitions.iter().position(|p| &p.context == context) {
            Some(index) => index,
            None => {
                self.partitions.push(PartitionState::new(context.clone()));
                self.partitions.len() - 1
            }
        };
        &mut self.partitions[index]
    }
}

/// State for a single parent context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionState {
    /// Context the bookmark belongs to
    pub context: ExtractionContext,

    /// Bookmark value within this context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<String>,
}

impl PartitionState {
    /// Create an empty partition state for a context
    pub fn new(context: ExtractionContext) -> Self {
        Self {
            context,
            replication_key_value: None,
        }
    }
}

/// Order two replication key values
///
/// Values that both parse as timestamps (RFC 3339, or the offset-less
/// `YYYY-MM-DDTHH:MM:SS` WordPress uses) are compared in time; anything else
/// falls back to string order.
pub fn compare_replication_values(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok())
}
