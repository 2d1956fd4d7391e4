//! Resource catalog module
//!
//! Every LearnDash collection the tap extracts is a static
//! [`ResourceDefinition`]: path template, key fields, parent link, binding
//! and injection rules, replication settings and declared fields.

mod definitions;
mod types;

pub use definitions::{learndash_resources, API_PREFIX};
pub use types::{Catalog, Replication, ResourceDefinition};

impl Catalog {
    /// The built-in LearnDash catalog
    pub fn learndash() -> Self {
        Self::new(learndash_resources()).expect("built-in LearnDash catalog is valid")
    }
}

#[cfg(test)]
mod tests;
