//! Record source implementations

use super::types::{DecoderFormat, RecordSource};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use std::collections::VecDeque;
use std::io::{BufRead, Read};

// ============================================================================
// JSONL Source
// ============================================================================

/// JSON Lines source (one JSON object per line)
///
/// Blank lines are skipped. A malformed or non-object line fails with its
/// line number and the source moves on to the next line.
#[derive(Debug)]
pub struct JsonlSource<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> JsonlSource<R> {
    /// Create a new JSONL source
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead + Send> RecordSource for JsonlSource<R> {
    fn next_record(&mut self) -> Result<Option<JsonObject>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let line = std::str::from_utf8(&self.buf)
                .map_err(|e| Error::decode(self.line, format!("invalid UTF-8: {e}")))?
                .trim();
            if line.is_empty() {
                continue;
            }

            let value: JsonValue = serde_json::from_str(line)
                .map_err(|e| Error::decode(self.line, format!("invalid JSON: {e}")))?;
            return into_object(value).map(Some).map_err(|kind| {
                Error::decode(self.line, format!("expected an object, got {kind}"))
            });
        }
    }

    fn position(&self) -> usize {
        self.line
    }
}

// ============================================================================
// JSON Document Source
// ============================================================================

/// Single JSON document source
///
/// The document is an array of objects, or one object treated as a single
/// record. It is parsed in full on the first call.
#[derive(Debug)]
pub struct JsonArraySource<R> {
    reader: Option<R>,
    records: VecDeque<JsonValue>,
    element: usize,
}

impl<R: Read> JsonArraySource<R> {
    /// Create a new JSON document source
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            records: VecDeque::new(),
            element: 0,
        }
    }

    fn load(&mut self, reader: R) -> Result<()> {
        let document: JsonValue = serde_json::from_reader(reader)
            .map_err(|e| Error::decode(e.line(), format!("invalid JSON document: {e}")))?;
        self.records = match document {
            JsonValue::Array(items) => items.into(),
            JsonValue::Object(_) => VecDeque::from([document]),
            other => {
                return Err(Error::decode(
                    1,
                    format!("expected an array of objects, got {}", kind_of(&other)),
                ))
            }
        };
        Ok(())
    }
}

impl<R: Read + Send> RecordSource for JsonArraySource<R> {
    fn next_record(&mut self) -> Result<Option<JsonObject>> {
        if let Some(reader) = self.reader.take() {
            self.load(reader)?;
        }
        let Some(value) = self.records.pop_front() else {
            return Ok(None);
        };
        self.element += 1;
        into_object(value).map(Some).map_err(|kind| {
            Error::decode(
                self.element,
                format!("element {} is {kind}, expected an object", self.element),
            )
        })
    }

    fn position(&self) -> usize {
        self.element
    }
}

// ============================================================================
// In-Memory Source
// ============================================================================

/// Source over records already in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: VecDeque<JsonObject>,
    position: usize,
}

impl MemorySource {
    /// Create a source over `records`
    pub fn new(records: impl IntoIterator<Item = JsonObject>) -> Self {
        Self {
            records: records.into_iter().collect(),
            position: 0,
        }
    }
}

impl RecordSource for MemorySource {
    fn next_record(&mut self) -> Result<Option<JsonObject>> {
        let record = self.records.pop_front();
        if record.is_some() {
            self.position += 1;
        }
        Ok(record)
    }

    fn position(&self) -> usize {
        self.position
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Build a boxed source for `format` over a reader
pub fn source_for<R: BufRead + Send + 'static>(
    format: DecoderFormat,
    reader: R,
) -> Box<dyn RecordSource> {
    match format {
        DecoderFormat::Jsonl => Box::new(JsonlSource::new(reader)),
        DecoderFormat::Json => Box::new(JsonArraySource::new(reader)),
    }
}

fn into_object(value: JsonValue) -> std::result::Result<JsonObject, &'static str> {
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(kind_of(&other)),
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a bool",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
