//! Record source types and traits
//!
//! Defines the core record source abstraction.

use crate::error::Result;
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// Format of the input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// JSON Lines format (one JSON object per line, default)
    #[default]
    Jsonl,
    /// A single JSON document: an array of objects or one object
    Json,
}

impl std::str::FromStr for DecoderFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(DecoderFormat::Jsonl),
            "json" => Ok(DecoderFormat::Json),
            other => Err(format!("unknown input format '{other}' (expected jsonl or json)")),
        }
    }
}

impl std::fmt::Display for DecoderFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoderFormat::Jsonl => write!(f, "jsonl"),
            DecoderFormat::Json => write!(f, "json"),
        }
    }
}

/// Producer of decoded records, one per call
///
/// `Ok(None)` signals end of input. An `Err` is scoped to one record when
/// [`Error::is_data_error`](crate::Error::is_data_error) holds, and the
/// source can be asked for the next record afterwards.
pub trait RecordSource: Send {
    /// Decode the next record
    fn next_record(&mut self) -> Result<Option<JsonObject>>;

    /// 1-based position of the last record returned (line or element)
    fn position(&self) -> usize;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn next_record(&mut self) -> Result<Option<JsonObject>> {
        (**self).next_record()
    }

    fn position(&self) -> usize {
        (**self).position()
    }
}
