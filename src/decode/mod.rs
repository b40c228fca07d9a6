//! Record source module
//!
//! Supports: JSONL, JSON documents, in-memory records
//!
//! # Overview
//!
//! The decode module turns an input stream into decoded records, one per
//! call, keeping end of input distinct from a decode failure.

mod decoders;
mod types;

pub use decoders::{source_for, JsonArraySource, JsonlSource, MemorySource};
pub use types::{DecoderFormat, RecordSource};

#[cfg(test)]
mod tests;
