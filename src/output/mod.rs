//! Output module
//!
//! Sinks that receive the extracted records.
//!
//! # Overview
//!
//! This module provides:
//! - `Message` - Singer `SCHEMA` / `RECORD` / `STATE` messages
//! - `JsonLinesSink` - one JSON message per line (stdout by default)
//! - `ParquetSink` - one Parquet file per stream, typed from the schema
//! - `MemorySink` - collects messages for library callers and tests

mod columnar;
mod message;
mod parquet_sink;
mod sink;
mod writer;

pub use columnar::{arrow_schema, records_to_batch};
pub use message::Message;
pub use parquet_sink::ParquetSink;
pub use sink::{JsonLinesSink, MemorySink, RecordSink};
pub use writer::{ParquetWriter, ParquetWriterConfig};

#[cfg(test)]
mod tests;
