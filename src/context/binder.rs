//! Context binding and row shaping
//!
//! [`ContextBinder`] turns parent records into child contexts and
//! [`RowShaper`] copies context keys back into child rows.

use super::types::ExtractionContext;
use crate::error::{Error, Result};
use crate::resources::ResourceDefinition;
use crate::types::{JsonObject, JsonValue, Record};

/// Derives child contexts from parent records
pub struct ContextBinder;

impl ContextBinder {
    /// One context per parent record, in parent emission order
    ///
    /// A resource without a parent yields exactly one empty context,
    /// regardless of `parent_records`.
    pub fn bindings_for(
        child: &ResourceDefinition,
        parent_records: &[Record],
    ) -> Result<Vec<ExtractionContext>> {
        if child.parent.is_none() {
            return Ok(vec![ExtractionContext::empty()]);
        }

        parent_records
            .iter()
            .map(|record| Self::bind(child, record))
            .collect()
    }

    /// Context for a single parent record
    pub fn bind(child: &ResourceDefinition, parent_record: &Record) -> Result<ExtractionContext> {
        let mut context = ExtractionContext::empty();
        for rule in child.binding {
            let value = parent_record
                .get(rule.source)
                .filter(|v| is_scalar(v))
                .ok_or_else(|| Error::context_binding(child.name, rule.source))?;
            context = context.with(rule.key, value.clone());
        }
        Ok(context)
    }
}

/// Applies per-resource post-fetch transforms
pub struct RowShaper;

impl RowShaper {
    /// Inject the resource's declared context keys into a raw row
    ///
    /// Existing fields are kept; an injected key overwrites a field of the
    /// same name. Rows of resources without injections pass through as-is.
    pub fn shape(
        resource: &ResourceDefinition,
        mut row: JsonObject,
        context: &ExtractionContext,
    ) -> Result<Record> {
        for key in resource.inject {
            let value = context
                .get(key)
                .ok_or_else(|| Error::context_binding(resource.name, *key))?;
            row.insert((*key).to_string(), value.clone());
        }
        Ok(row)
    }
}

fn is_scalar(value: &JsonValue) -> bool {
    matches!(
        value,
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
    )
}
