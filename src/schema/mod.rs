//! Schema module
//!
//! JSON Schema documents built from the static per-resource field tables.

mod fields;
mod types;

pub use fields::{build_schema, field, Field, FieldType};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};

#[cfg(test)]
mod tests;
