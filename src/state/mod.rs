//! State management module
//!
//! Handles bookmark tracking and checkpointing between runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - stream bookmarks, with per-context partitions for children
//! - `StateManager` - shared in-memory state with atomic file persistence

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{compare_replication_values, PartitionState, State, StreamState};
