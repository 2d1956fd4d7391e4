//! Parent-child context module
//!
//! Child resources (e.g. users enrolled in a course) are fetched once per
//! parent record. This module provides:
//! - `ExtractionContext` - immutable placeholder bindings for one child walk
//! - `ContextBinder` - derives contexts from parent records
//! - `RowShaper` - injects context keys into child rows

mod binder;
mod types;

pub use binder::{ContextBinder, RowShaper};
pub use types::{bind, BindingRule, ExtractionContext};
