//! Record sinks
//!
//! A sink receives, in order, the schema of each stream, its records and
//! periodic state checkpoints.

use super::message::Message;
use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use crate::state::State;
use crate::types::Record;
use std::io::Write;

/// Destination for extracted records
pub trait RecordSink: Send {
    /// Announce a stream's schema
    fn write_schema(&mut self, stream: &str, schema: &JsonSchema, key_properties: &[&str])
        -> Result<()>;

    /// Write one record
    fn write_record(&mut self, stream: &str, record: &Record) -> Result<()>;

    /// Write a state checkpoint
    fn write_state(&mut self, state: &State) -> Result<()>;

    /// Flush everything; called once after the last message
    fn finish(&mut self) -> Result<()>;
}

// ============================================================================
// JSON Lines
// ============================================================================

/// Writes one JSON message per line
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    pretty: bool,
}

impl JsonLinesSink<std::io::Stdout> {
    /// Sink writing to stdout
    pub fn stdout(pretty: bool) -> Self {
        Self::new(std::io::stdout(), pretty)
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Create a sink over any writer
    ///
    /// `pretty` output is indented and therefore no longer one line per
    /// message.
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, message: &Message) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, message)?;
        } else {
            serde_json::to_writer(&mut self.writer, message)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn write_schema(
        &mut self,
        stream: &str,
        schema: &JsonSchema,
        key_properties: &[&str],
    ) -> Result<()> {
        self.emit(&Message::schema(stream, schema.to_json(), key_properties))
    }

    fn write_record(&mut self, stream: &str, record: &Record) -> Result<()> {
        self.emit(&Message::record(stream, record.clone()))
    }

    fn write_state(&mut self, state: &State) -> Result<()> {
        self.emit(&Message::state(state.clone()))?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::output(format!("Failed to flush output: {e}")))
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Collects messages in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Vec<Message>,
    finished: bool,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records of one stream, in emission order
    pub fn records(&self, stream: &str) -> Vec<&Record> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record { stream: s, record } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Streams in the order their schemas were announced
    pub fn schema_streams(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Schema { stream, .. } => Some(stream.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Last state checkpoint written
    pub fn last_state(&self) -> Option<&State> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::State { value } => Some(value),
            _ => None,
        })
    }

    /// Whether `finish` was called
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl RecordSink for MemorySink {
    fn write_schema(
        &mut self,
        stream: &str,
        schema: &JsonSchema,
        key_properties: &[&str],
    ) -> Result<()> {
        self.messages
            .push(Message::schema(stream, schema.to_json(), key_properties));
        Ok(())
    }

    fn write_record(&mut self, stream: &str, record: &Record) -> Result<()> {
        self.messages.push(Message::record(stream, record.clone()));
        Ok(())
    }

    fn write_state(&mut self, state: &State) -> Result<()> {
        self.messages.push(Message::state(state.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
