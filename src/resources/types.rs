//! Resource definition and catalog types

use crate::context::BindingRule;
use crate::error::{Error, Result};
use crate::schema::{build_schema, Field, JsonSchema};
use crate::template::placeholders;
use crate::types::ReplicationMethod;
use std::collections::HashSet;

/// Incremental replication settings for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replication {
    /// Record field tracked as the bookmark (e.g. `modified`)
    pub key: &'static str,
    /// Query parameter carrying the starting value (e.g. `modified_after`)
    pub param: &'static str,
}

/// Static description of one upstream collection
#[derive(Debug, Clone, Copy)]
pub struct ResourceDefinition {
    /// Stream name
    pub name: &'static str,
    /// Path template relative to the API base, may contain `{placeholders}`
    pub path: &'static str,
    /// Fields that uniquely identify a record (possibly empty)
    pub key_fields: &'static [&'static str],
    /// Parent resource name, for child resources
    pub parent: Option<&'static str>,
    /// How a parent record becomes this resource's context
    pub binding: &'static [BindingRule],
    /// Context keys copied into every row
    pub inject: &'static [&'static str],
    /// Incremental replication, if supported
    pub replication: Option<Replication>,
    /// Child bookmarks are tracked independently of the parent context
    pub ignore_parent_replication_keys: bool,
    /// Declared record fields
    pub fields: &'static [Field],
}

impl ResourceDefinition {
    /// A top-level resource with no parent, binding or replication
    pub const fn top_level(
        name: &'static str,
        path: &'static str,
        key_fields: &'static [&'static str],
        fields: &'static [Field],
    ) -> Self {
        Self {
            name,
            path,
            key_fields,
            parent: None,
            binding: &[],
            inject: &[],
            replication: None,
            ignore_parent_replication_keys: false,
            fields,
        }
    }

    /// Check if this resource is fetched once per parent record
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Replication method advertised in the catalog
    pub fn replication_method(&self) -> ReplicationMethod {
        if self.replication.is_some() {
            ReplicationMethod::Incremental
        } else {
            ReplicationMethod::FullTable
        }
    }

    /// Record schema derived from the field table
    pub fn schema(&self) -> JsonSchema {
        build_schema(self.fields, self.key_fields)
    }

    /// Check the definition is internally consistent
    fn validate(&self) -> Result<()> {
        let bound: HashSet<&str> = self.binding.iter().map(|rule| rule.key).collect();

        match (self.parent, self.binding.is_empty()) {
            (Some(_), true) => {
                return Err(Error::config(format!(
                    "Resource '{}' has a parent but no binding rules",
                    self.name
                )));
            }
            (None, false) => {
                return Err(Error::config(format!(
                    "Resource '{}' has binding rules but no parent",
                    self.name
                )));
            }
            _ => {}
        }

        for placeholder in placeholders(self.path) {
            if !bound.contains(placeholder) {
                return Err(Error::config(format!(
                    "Resource '{}' path placeholder '{{{placeholder}}}' is not bound",
                    self.name
                )));
            }
        }

        for key in self.inject {
            if !bound.contains(key) {
                return Err(Error::config(format!(
                    "Resource '{}' injects unbound key '{key}'",
                    self.name
                )));
            }
        }

        if let Some(replication) = &self.replication {
            if !self.fields.iter().any(|f| f.name == replication.key) {
                return Err(Error::config(format!(
                    "Resource '{}' replication key '{}' is not a declared field",
                    self.name, replication.key
                )));
            }
        }

        Ok(())
    }
}

/// Name-indexed set of resource definitions, in declaration order
#[derive(Debug, Clone)]
pub struct Catalog {
    resources: Vec<ResourceDefinition>,
}

impl Catalog {
    /// Build a catalog, validating every definition and parent link
    pub fn new(resources: Vec<ResourceDefinition>) -> Result<Self> {
        let mut names = HashSet::new();
        for resource in &resources {
            if !names.insert(resource.name) {
                return Err(Error::config(format!(
                    "Duplicate resource name '{}'",
                    resource.name
                )));
            }
            resource.validate()?;
        }

        let catalog = Self { resources };
        for resource in &catalog.resources {
            if let Some(parent) = resource.parent {
                if catalog.get(parent).is_none() {
                    return Err(Error::config(format!(
                        "Resource '{}' references unknown parent '{parent}'",
                        resource.name
                    )));
                }
            }
            // Lineage walk fails on cycles
            catalog.lineage(resource.name)?;
        }

        Ok(catalog)
    }

    /// Look up a resource by name
    pub fn get(&self, name: &str) -> Option<&ResourceDefinition> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Look up a resource, failing with `StreamNotFound`
    pub fn require(&self, name: &str) -> Result<&ResourceDefinition> {
        self.get(name).ok_or_else(|| Error::StreamNotFound {
            stream: name.to_string(),
        })
    }

    /// All resources in declaration order
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.iter()
    }

    /// Resources without a parent
    pub fn top_level(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.iter().filter(|r| r.parent.is_none())
    }

    /// Direct children of a resource, in declaration order
    pub fn children_of<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ResourceDefinition> + 'a {
        self.resources
            .iter()
            .filter(move |r| r.parent.is_some_and(|parent| parent == name))
    }

    /// Names from the root ancestor down to `name` itself
    pub fn lineage(&self, name: &str) -> Result<Vec<&'static str>> {
        let mut chain = Vec::new();
        let mut current = self.require(name)?;
        loop {
            if chain.contains(&current.name) {
                return Err(Error::config(format!(
                    "Resource '{name}' has a cyclic parent chain"
                )));
            }
            chain.push(current.name);
            match current.parent {
                Some(parent) => current = self.require(parent)?,
                None => break,
            }
        }
        chain.reverse();
        Ok(chain)
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
