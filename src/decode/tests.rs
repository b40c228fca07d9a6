//! Tests for record sources

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Cursor;

fn drain(source: &mut dyn RecordSource) -> Vec<serde_json::Value> {
    let mut out = Vec::new();
    while let Some(record) = source.next_record().unwrap() {
        out.push(serde_json::Value::Object(record));
    }
    out
}

// ============================================================================
// Format Tests
// ============================================================================

#[test]
fn test_decoder_format_default() {
    assert_eq!(DecoderFormat::default(), DecoderFormat::Jsonl);
}

#[test]
fn test_decoder_format_parse() {
    assert_eq!("JSONL".parse::<DecoderFormat>(), Ok(DecoderFormat::Jsonl));
    assert_eq!("ndjson".parse::<DecoderFormat>(), Ok(DecoderFormat::Jsonl));
    assert_eq!("json".parse::<DecoderFormat>(), Ok(DecoderFormat::Json));
    assert!("csv".parse::<DecoderFormat>().is_err());
}

// ============================================================================
// JSONL Tests
// ============================================================================

#[test]
fn test_jsonl_records() {
    let input = "{\"id\":\"1\",\"amt\":\"10.50\"}\n\n{\"id\":\"2\"}\r\n   \n{\"id\":3}";
    let mut source = JsonlSource::new(Cursor::new(input));

    let records = drain(&mut source);
    assert_eq!(
        records,
        vec![
            json!({"id": "1", "amt": "10.50"}),
            json!({"id": "2"}),
            json!({"id": 3}),
        ]
    );
    assert_eq!(source.position(), 5);
}

#[test]
fn test_jsonl_end_of_input_is_repeatable() {
    let mut source = JsonlSource::new(Cursor::new(""));
    assert!(source.next_record().unwrap().is_none());
    assert!(source.next_record().unwrap().is_none());
}

#[test]
fn test_jsonl_bad_line_reports_line_and_continues() {
    let input = "{\"a\":1}\n{not json}\n[1,2]\n{\"a\":2}\n";
    let mut source = JsonlSource::new(Cursor::new(input));

    assert!(source.next_record().unwrap().is_some());

    let err = source.next_record().unwrap_err();
    assert!(matches!(err, Error::Decode { line: 2, .. }), "{err}");
    assert!(err.is_data_error());

    let err = source.next_record().unwrap_err();
    assert!(matches!(err, Error::Decode { line: 3, .. }), "{err}");
    assert!(err.to_string().contains("an array"), "{err}");

    let last = source.next_record().unwrap().unwrap();
    assert_eq!(last.get("a"), Some(&json!(2)));
    assert!(source.next_record().unwrap().is_none());
}

#[test]
fn test_jsonl_invalid_utf8_line_is_decode_error() {
    let input: &[u8] = b"{\"a\":1}\n\xff\xfe\n{\"a\":2}\n";
    let mut source = JsonlSource::new(Cursor::new(input));

    assert!(source.next_record().unwrap().is_some());

    let err = source.next_record().unwrap_err();
    assert!(matches!(err, Error::Decode { line: 2, .. }), "{err}");
    assert!(err.to_string().contains("UTF-8"), "{err}");
    assert!(err.is_data_error());

    let last = source.next_record().unwrap().unwrap();
    assert_eq!(last.get("a"), Some(&json!(2)));
    assert_eq!(source.position(), 3);
    assert!(source.next_record().unwrap().is_none());
}

// ============================================================================
// JSON Document Tests
// ============================================================================

#[test]
fn test_json_array_records() {
    let mut source = JsonArraySource::new(Cursor::new(r#"[{"a":1},{"b":"x"}]"#));
    assert_eq!(drain(&mut source), vec![json!({"a": 1}), json!({"b": "x"})]);
    assert_eq!(source.position(), 2);
}

#[test]
fn test_json_single_object() {
    let mut source = JsonArraySource::new(Cursor::new(r#"{"a":1}"#));
    assert_eq!(drain(&mut source), vec![json!({"a": 1})]);
}

#[test]
fn test_json_non_object_element() {
    let mut source = JsonArraySource::new(Cursor::new(r#"[{"a":1}, 7, {"a":2}]"#));
    assert!(source.next_record().unwrap().is_some());
    let err = source.next_record().unwrap_err();
    assert!(matches!(err, Error::Decode { line: 2, .. }), "{err}");
    assert!(source.next_record().unwrap().is_some());
}

#[test]
fn test_json_invalid_document_ends_source() {
    let mut source = JsonArraySource::new(Cursor::new("[{\"a\":1},"));
    assert!(matches!(
        source.next_record(),
        Err(Error::Decode { .. })
    ));
    assert!(source.next_record().unwrap().is_none());
}

#[test]
fn test_json_scalar_document_rejected() {
    let mut source = JsonArraySource::new(Cursor::new("42"));
    assert!(source.next_record().is_err());
}

// ============================================================================
// Memory and Boxed Source Tests
// ============================================================================

#[test]
fn test_memory_source() {
    let records = vec![
        json!({"a": 1}).as_object().unwrap().clone(),
        json!({"a": 2}).as_object().unwrap().clone(),
    ];
    let mut source = MemorySource::new(records);
    assert_eq!(drain(&mut source).len(), 2);
    assert_eq!(source.position(), 2);
}

#[test]
fn test_source_for_format() {
    let mut source = source_for(DecoderFormat::Json, Cursor::new(r#"[{"a":1}]"#));
    assert_eq!(drain(&mut source).len(), 1);

    let mut source = source_for(DecoderFormat::Jsonl, Cursor::new("{\"a\":1}\n{\"a\":2}\n"));
    assert_eq!(drain(&mut source).len(), 2);
}
