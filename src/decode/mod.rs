//! Response decoder module
//!
//! LearnDash collection endpoints answer with a bare JSON array of row
//! objects. [`JsonDecoder`] turns a page body into those rows, rejecting
//! anything else with a decode error.

mod json;

pub use json::JsonDecoder;

use crate::error::Result;
use crate::types::JsonObject;

/// Trait for decoding a response body into rows
pub trait RecordDecoder: Send + Sync {
    /// Decode a page body into ordered row objects
    fn decode(&self, body: &str) -> Result<Vec<JsonObject>>;
}

#[cfg(test)]
mod tests;
