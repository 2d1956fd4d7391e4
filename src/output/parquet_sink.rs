//! Parquet sink
//!
//! Buffers records per stream and writes `<dir>/<stream>.parquet` on
//! `finish`. The last state checkpoint goes to `<dir>/state.json`.

use super::columnar::{arrow_schema, records_to_batch};
use super::sink::RecordSink;
use super::writer::{ParquetWriter, ParquetWriterConfig};
use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use crate::state::State;
use crate::types::Record;
use arrow::datatypes::SchemaRef;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Records of one stream awaiting `finish`
struct StreamBuffer {
    schema: SchemaRef,
    records: Vec<Record>,
}

/// Writes one Parquet file per stream
pub struct ParquetSink {
    dir: PathBuf,
    config: ParquetWriterConfig,
    streams: BTreeMap<String, StreamBuffer>,
    state: Option<State>,
    written: BTreeMap<String, usize>,
}

impl ParquetSink {
    /// Create a sink writing below `dir` (created if missing)
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(dir, ParquetWriterConfig::default())
    }

    /// Create a sink with custom writer settings
    pub fn with_config(dir: impl AsRef<Path>, config: ParquetWriterConfig) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::output(format!("Failed to create output directory {}: {e}", dir.display()))
        })?;

        Ok(Self {
            dir,
            config,
            streams: BTreeMap::new(),
            state: None,
            written: BTreeMap::new(),
        })
    }

    /// Path of a stream's Parquet file
    pub fn stream_path(&self, stream: &str) -> PathBuf {
        self.dir.join(format!("{stream}.parquet"))
    }

    /// Rows written per stream, available after `finish`
    pub fn rows_written(&self) -> &BTreeMap<String, usize> {
        &self.written
    }
}

impl RecordSink for ParquetSink {
    fn write_schema(
        &mut self,
        stream: &str,
        schema: &JsonSchema,
        _key_properties: &[&str],
    ) -> Result<()> {
        self.streams
            .entry(stream.to_string())
            .or_insert_with(|| StreamBuffer {
                schema: Arc::new(arrow_schema(schema)),
                records: Vec::new(),
            });
        Ok(())
    }

    fn write_record(&mut self, stream: &str, record: &Record) -> Result<()> {
        let buffer = self.streams.get_mut(stream).ok_or_else(|| {
            Error::output(format!("Record for stream '{stream}' before its schema"))
        })?;
        buffer.records.push(record.clone());
        Ok(())
    }

    fn write_state(&mut self, state: &State) -> Result<()> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for (stream, buffer) in std::mem::take(&mut self.streams) {
            let batch = records_to_batch(&buffer.records, &buffer.schema)?;
            let path = self.stream_path(&stream);

            let mut writer = ParquetWriter::new(&path, Arc::clone(&buffer.schema), &self.config)?;
            writer.write(&batch)?;
            let rows = writer.close()?;

            info!("Wrote {} rows to {}", rows, path.display());
            self.written.insert(stream, rows);
        }

        if let Some(state) = self.state.take() {
            let path = self.dir.join("state.json");
            std::fs::write(&path, serde_json::to_string_pretty(&state)?)?;
        }

        Ok(())
    }
}
