//! Execution engine module
//!
//! Drives resource extraction and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `StreamRunner` - pull-based extraction of one resource, and the full
//!   sync of a selection into a sink
//! - `Selection` / `SyncPlan` - which streams are emitted and which are
//!   only walked for their children
//! - `SyncStats` - per-stream record and walk counts
//!
//! A child resource is walked once per parent record, depth-first: all of
//! one parent record's child pages are drained before the next parent
//! record is pulled.

mod types;

pub use types::{Selection, SyncPlan, SyncStats};

use crate::context::{ContextBinder, ExtractionContext, RowShaper};
use crate::error::{Error, Result};
use crate::output::RecordSink;
use crate::pagination::Paginator;
use crate::resources::{Catalog, ResourceDefinition};
use crate::state::{compare_replication_values, StateManager};
use crate::types::{scalar_to_string, Record};
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, info};

/// Orchestrates binding, pagination and row shaping per resource
pub struct StreamRunner {
    catalog: Catalog,
    paginator: Paginator,
    state: StateManager,
    start_date: Option<String>,
}

impl StreamRunner {
    /// Create a new runner
    pub fn new(catalog: Catalog, paginator: Paginator, state: StateManager) -> Self {
        Self {
            catalog,
            paginator,
            state,
            start_date: None,
        }
    }

    /// Lower bound for incremental resources without a bookmark
    #[must_use]
    pub fn with_start_date(mut self, start_date: Option<String>) -> Self {
        self.start_date = start_date;
        self
    }

    /// Get the catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the paginator
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Fetch the first page of the first top-level resource
    ///
    /// Returns the number of rows on that page.
    pub async fn check(&self) -> Result<usize> {
        let resource = self
            .catalog
            .top_level()
            .next()
            .ok_or_else(|| Error::config("catalog has no top-level resource"))?;
        let page = self
            .paginator
            .fetch_page(resource.name, resource.path, &[], 1)
            .await?;
        Ok(page.rows.len())
    }

    // ========================================================================
    // Extraction
    // ========================================================================

    /// Lazily extract every record of a resource
    ///
    /// Top-level resources are walked once with the empty context. Child
    /// resources pull their parent's records one at a time and walk once per
    /// parent record. Ancestors are walked in full; only the requested
    /// resource applies its incremental bookmark.
    pub fn extract<'a>(&'a self, name: &str) -> BoxStream<'a, Result<Record>> {
        self.extract_with(name, true)
    }

    fn extract_with<'a>(&'a self, name: &str, incremental: bool) -> BoxStream<'a, Result<Record>> {
        let resource = match self.catalog.require(name) {
            Ok(resource) => *resource,
            Err(e) => return stream::once(future::ready(Err(e))).boxed(),
        };

        match resource.parent {
            None => self.walk_resource(resource, ExtractionContext::empty(), incremental),
            Some(parent) => self
                .extract_with(parent, false)
                .and_then(move |parent_record| {
                    future::ready(ContextBinder::bind(&resource, &parent_record))
                })
                .map_ok(move |context| self.walk_resource(resource, context, incremental))
                .try_flatten()
                .boxed(),
        }
    }

    /// One paginated walk of a resource under a context, shaped
    fn walk_resource<'a>(
        &'a self,
        resource: ResourceDefinition,
        context: ExtractionContext,
        incremental: bool,
    ) -> BoxStream<'a, Result<Record>> {
        stream::once(async move {
            let query = if incremental {
                self.incremental_query(&resource, &context).await
            } else {
                Vec::new()
            };
            debug!("Walking {} with context {}", resource.name, context);
            let rows = self
                .paginator
                .walk(resource.name, resource.path, &context, query);
            Ok::<_, Error>(
                rows.and_then(move |row| future::ready(RowShaper::shape(&resource, row, &context))),
            )
        })
        .try_flatten()
        .boxed()
    }

    /// Bookmark scope for a walk: per-context partition or stream level
    fn bookmark_scope<'c>(
        resource: &ResourceDefinition,
        context: &'c ExtractionContext,
    ) -> Option<&'c ExtractionContext> {
        if resource.is_child() && !resource.ignore_parent_replication_keys {
            Some(context)
        } else {
            None
        }
    }

    /// Incremental starting value for a walk: the bookmark, else `start_date`
    async fn incremental_start(
        &self,
        resource: &ResourceDefinition,
        context: &ExtractionContext,
    ) -> Option<String> {
        resource.replication?;

        let scope = Self::bookmark_scope(resource, context);
        match self.state.get_bookmark(resource.name, scope).await {
            Some(bookmark) => Some(bookmark),
            None => self.start_date.clone(),
        }
    }

    /// Query carrying the incremental starting value, if any
    async fn incremental_query(
        &self,
        resource: &ResourceDefinition,
        context: &ExtractionContext,
    ) -> Vec<(String, String)> {
        let Some(replication) = resource.replication else {
            return Vec::new();
        };

        self.incremental_start(resource, context)
            .await
            .map(|value| vec![(replication.param.to_string(), value)])
            .unwrap_or_default()
    }

    // ========================================================================
    // Sync
    // ========================================================================

    /// Run every selected stream into a sink
    ///
    /// Schemas for all selected streams are written first. Each record is
    /// written as soon as it is shaped, followed by the walks of its needed
    /// children. A state checkpoint follows each top-level resource.
    ///
    /// An incremental resource with needed children is fetched without its
    /// incremental query; only its records past the bookmark are emitted.
    pub async fn sync(
        &self,
        selection: &Selection,
        sink: &mut dyn RecordSink,
    ) -> Result<SyncStats> {
        let start = Instant::now();
        let requests_before = self.paginator.requests();
        let plan = SyncPlan::resolve(&self.catalog, selection)?;
        let mut stats = SyncStats::new();

        info!("Syncing {} streams", plan.selected_count());

        for resource in self.catalog.resources() {
            if plan.is_selected(resource.name) {
                sink.write_schema(resource.name, &resource.schema(), resource.key_fields)?;
            }
        }

        let roots: Vec<ResourceDefinition> = self
            .catalog
            .top_level()
            .filter(|r| plan.is_needed(r.name))
            .copied()
            .collect();

        for resource in roots {
            info!("Starting {}", resource.name);
            self.sync_resource(
                resource,
                ExtractionContext::empty(),
                &plan,
                &mut *sink,
                &mut stats,
            )
            .await?;

            sink.write_state(&*self.state.state().await)?;
            self.state.checkpoint().await?;
            info!(
                "Finished {}: {} records",
                resource.name,
                stats.records_for(resource.name)
            );
        }

        sink.finish()?;

        stats.requests = self.paginator.requests() - requests_before;
        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Sync complete: {} records, {} requests in {}ms",
            stats.total_records(),
            stats.requests,
            stats.duration_ms
        );

        Ok(stats)
    }

    /// Walk one resource under one context, recursing into children
    fn sync_resource<'a>(
        &'a self,
        resource: ResourceDefinition,
        context: ExtractionContext,
        plan: &'a SyncPlan,
        sink: &'a mut dyn RecordSink,
        stats: &'a mut SyncStats,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let emit = plan.is_selected(resource.name);
            let children: Vec<ResourceDefinition> = self
                .catalog
                .children_of(resource.name)
                .filter(|child| plan.is_needed(child.name))
                .copied()
                .collect();

            let start = if emit {
                self.incremental_start(&resource, &context).await
            } else {
                None
            };

            // A parent with needed children is walked in full so every child
            // context is bound; its incremental start filters emitted records
            let (query, floor) = match (resource.replication, start) {
                (Some(replication), Some(start)) if children.is_empty() => {
                    (vec![(replication.param.to_string(), start)], None)
                }
                (_, start) => (Vec::new(), start),
            };

            debug!("Walking {} with context {}", resource.name, context);
            stats.add_walk(resource.name);

            let mut rows = self
                .paginator
                .walk(resource.name, resource.path, &context, query);
            let mut max_value: Option<String> = None;

            while let Some(row) = rows.try_next().await? {
                let record = RowShaper::shape(&resource, row, &context)?;

                if emit {
                    let value = resource
                        .replication
                        .and_then(|replication| record.get(replication.key))
                        .and_then(scalar_to_string);
                    let fresh = match (floor.as_deref(), value.as_deref()) {
                        (Some(floor), Some(value)) => {
                            compare_replication_values(value, floor) == Ordering::Greater
                        }
                        _ => true,
                    };

                    if fresh {
                        if let Some(value) = value {
                            let newer = max_value.as_deref().map_or(true, |current| {
                                compare_replication_values(&value, current) == Ordering::Greater
                            });
                            if newer {
                                max_value = Some(value);
                            }
                        }
                        sink.write_record(resource.name, &record)?;
                        stats.add_record(resource.name);
                    }
                }

                for child in &children {
                    let child_context = ContextBinder::bind(child, &record)?;
                    self.sync_resource(*child, child_context, plan, &mut *sink, &mut *stats)
                        .await?;
                }
            }

            if let (Some(replication), Some(value)) = (resource.replication, max_value) {
                let scope = Self::bookmark_scope(&resource, &context);
                self.state
                    .advance_bookmark(resource.name, replication.key, scope, &value)
                    .await?;
            }

            Ok(())
        }
        .boxed()
    }
}

impl std::fmt::Debug for StreamRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRunner")
            .field("streams", &self.catalog.len())
            .field("paginator", &self.paginator)
            .field("start_date", &self.start_date)
            .finish_non_exhaustive()
    }
}
