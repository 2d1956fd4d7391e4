//! Engine types
//!
//! Stream selection, the resolved sync plan and run statistics.

use crate::error::Result;
use crate::resources::Catalog;
use std::collections::{BTreeMap, BTreeSet};

/// Streams requested by the caller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every stream in the catalog
    #[default]
    All,
    /// Only the named streams
    Streams(Vec<String>),
}

impl Selection {
    /// Parse a comma-separated stream list; empty or absent means all
    pub fn parse(list: Option<&str>) -> Self {
        let names: Vec<String> = list
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        if names.is_empty() {
            Self::All
        } else {
            Self::Streams(names)
        }
    }

    /// Select specific streams
    pub fn streams<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Streams(names.into_iter().map(Into::into).collect())
    }
}

/// Which streams are emitted and which are only walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    selected: BTreeSet<&'static str>,
    needed: BTreeSet<&'static str>,
}

impl SyncPlan {
    /// Resolve a selection against the catalog
    ///
    /// Every ancestor of a selected stream is needed, since child contexts
    /// come from parent records.
    pub fn resolve(catalog: &Catalog, selection: &Selection) -> Result<Self> {
        let selected: BTreeSet<&'static str> = match selection {
            Selection::All => catalog.resources().map(|r| r.name).collect(),
            Selection::Streams(names) => names
                .iter()
                .map(|name| catalog.require(name).map(|r| r.name))
                .collect::<Result<_>>()?,
        };

        let mut needed = BTreeSet::new();
        for name in &selected {
            needed.extend(catalog.lineage(name)?);
        }

        Ok(Self { selected, needed })
    }

    /// Records of this stream are emitted
    pub fn is_selected(&self, stream: &str) -> bool {
        self.selected.contains(stream)
    }

    /// This stream is walked, either for its records or for its children
    pub fn is_needed(&self, stream: &str) -> bool {
        self.needed.contains(stream)
    }

    /// Number of selected streams
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records emitted per stream
    pub records: BTreeMap<String, usize>,
    /// Paginated walks per stream (one per context)
    pub walks: BTreeMap<String, usize>,
    /// HTTP requests issued
    pub requests: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an emitted record
    pub fn add_record(&mut self, stream: &str) {
        *self.records.entry(stream.to_string()).or_default() += 1;
    }

    /// Count a walk
    pub fn add_walk(&mut self, stream: &str) {
        *self.walks.entry(stream.to_string()).or_default() += 1;
    }

    /// Records emitted for one stream
    pub fn records_for(&self, stream: &str) -> usize {
        self.records.get(stream).copied().unwrap_or(0)
    }

    /// Walks performed for one stream
    pub fn walks_for(&self, stream: &str) -> usize {
        self.walks.get(stream).copied().unwrap_or(0)
    }

    /// Total records emitted
    pub fn total_records(&self) -> usize {
        self.records.values().sum()
    }
}
