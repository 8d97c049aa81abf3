//! Comprehensive tests for JSON serialization
//!
//! Coverage targets:
//! - Compact and indented output for nested trees
//! - Agreement with serde_json on integer and string trees
//! - Measuring, truncating and streaming writers
//! - Trees nested far deeper than any parse would allow
//! - Aliases, views and parse/serialize round trips

use slotjson::{
    DeserializationOptions, DummyWriter, JsonDocument, SliceWriter, Writer, deserialize_json,
    measure_json, measure_json_pretty, serialize_json, serialize_json_pretty,
    serialize_json_to_io, serialize_json_to_slice, to_json_string, to_json_string_pretty,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample(doc: &mut JsonDocument<'_>) {
    let mut root = doc.to_object();
    root.insert("name", String::from("slot \"json\""));
    root.insert("count", 3_u32);
    root.insert("delta", -7_i64);
    let mut tags = root.create_nested_array("tags").unwrap();
    tags.add(String::from("a"));
    tags.add(String::from("b"));
    let mut inner = root.create_nested_object("inner").unwrap();
    inner.insert("flag", false);
    inner.create_nested_array("empty");
    root.insert("nothing", None::<i32>);
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_compact_output() {
    init_tracing();
    let mut doc = JsonDocument::fixed(4096);
    sample(&mut doc);
    assert_eq!(
        to_json_string(&doc),
        r#"{"name":"slot \"json\"","count":3,"delta":-7,"tags":["a","b"],"inner":{"flag":false,"empty":[]},"nothing":null}"#
    );
}

#[test]
fn test_pretty_output() {
    let mut doc = JsonDocument::fixed(4096);
    sample(&mut doc);
    let expected = r#"{
  "name": "slot \"json\"",
  "count": 3,
  "delta": -7,
  "tags": [
    "a",
    "b"
  ],
  "inner": {
    "flag": false,
    "empty": []
  },
  "nothing": null
}"#;
    assert_eq!(to_json_string_pretty(&doc), expected);
}

#[test]
fn test_matches_serde_json() {
    let mut doc = JsonDocument::fixed(4096);
    sample(&mut doc);
    assert_eq!(to_json_string(&doc), serde_json::to_string(&doc).unwrap());
    assert_eq!(
        to_json_string_pretty(&doc),
        serde_json::to_string_pretty(&doc).unwrap()
    );
}

#[test]
fn test_scalar_roots() {
    let mut doc = JsonDocument::fixed(256);
    assert_eq!(to_json_string(&doc), "null");
    doc.set(true);
    assert_eq!(to_json_string_pretty(&doc), "true");
    doc.set(String::from("x"));
    assert_eq!(to_json_string(&doc), r#""x""#);
}

#[test]
fn test_empty_root_containers() {
    let mut doc = JsonDocument::fixed(256);
    doc.to_array();
    assert_eq!(to_json_string_pretty(&doc), "[]");
    doc.to_object();
    assert_eq!(to_json_string(&doc), "{}");
}

// ============================================================================
// Measuring and writers
// ============================================================================

#[test]
fn test_measure_matches_output() {
    let mut doc = JsonDocument::fixed(4096);
    sample(&mut doc);
    assert_eq!(measure_json(&doc), to_json_string(&doc).len());
    assert_eq!(measure_json_pretty(&doc), to_json_string_pretty(&doc).len());
    assert_eq!(serialize_json(&doc, DummyWriter), measure_json(&doc));
    assert_eq!(serialize_json_pretty(&doc, DummyWriter), measure_json_pretty(&doc));
}

/// `[[...[1]...]]` with `depth` arrays, built node by node
fn deep_chain(depth: usize) -> JsonDocument<'static> {
    let mut doc = JsonDocument::dynamic(1024);
    let mut handle = doc.root_mut().handle();
    for _ in 0..depth {
        handle = doc.node_mut(handle).unwrap().add_element().unwrap().handle();
    }
    assert!(doc.node_mut(handle).unwrap().set(1_u8));
    doc
}

#[test]
fn test_deep_tree_output() {
    const DEPTH: usize = 200_000;
    let doc = deep_chain(DEPTH);

    assert_eq!(measure_json(&doc), 2 * DEPTH + 1);
    assert_eq!(serialize_json(&doc, DummyWriter), 2 * DEPTH + 1);
    let json = to_json_string(&doc);
    assert_eq!(json.len(), 2 * DEPTH + 1);
    assert!(json.starts_with("[[[["));
    assert!(json.ends_with("[1]]]"));
}

#[test]
fn test_deep_tree_pretty_output() {
    let doc = deep_chain(2_000);
    let json = to_json_string_pretty(&doc);
    assert_eq!(measure_json_pretty(&doc), json.len());
    assert!(json.ends_with("\n]"));
}

#[test]
fn test_slice_output_is_prefix() {
    let mut doc = JsonDocument::fixed(4096);
    sample(&mut doc);
    let full = to_json_string(&doc);
    let mut buffer = [0_u8; 16];
    let written = serialize_json_to_slice(&doc, &mut buffer);
    assert_eq!(written, 16);
    assert_eq!(&buffer[..], &full.as_bytes()[..16]);
}

#[test]
fn test_slice_writer_reports_full() {
    let mut buffer = [0_u8; 4];
    let mut writer = SliceWriter::new(&mut buffer);
    assert_eq!(writer.write_text("abc"), 3);
    assert_eq!(writer.write_text("def"), 1);
    assert!(writer.is_full());
    assert_eq!(writer.write_text("g"), 0);
}

#[test]
fn test_io_output() {
    let mut doc = JsonDocument::fixed(4096);
    sample(&mut doc);
    let mut out = Vec::new();
    let written = serialize_json_to_io(&doc, &mut out).unwrap();
    assert_eq!(written, out.len());
    assert_eq!(String::from_utf8(out).unwrap(), to_json_string(&doc));
}

#[test]
fn test_byte_vector_writer() {
    let mut doc = JsonDocument::fixed(256);
    doc.set(vec![1_i32, 2]);
    let mut out = Vec::new();
    assert_eq!(serialize_json(&doc, &mut out), 5);
    assert_eq!(out, b"[1,2]");
}

// ============================================================================
// Aliases and views
// ============================================================================

#[test]
fn test_alias_serializes_target() {
    let mut doc = JsonDocument::fixed(4096);
    let mut root = doc.to_object();
    root.create_nested_array("shared").unwrap().add(1_u8);
    let handle = root.member_mut("shared").unwrap().handle();
    assert!(root.get_or_add_member("view").unwrap().link(handle));

    assert_eq!(to_json_string(&doc), r#"{"shared":[1],"view":[1]}"#);
    assert_eq!(measure_json(&doc), 25);
}

#[test]
fn test_member_view_serializes() {
    let mut doc = JsonDocument::fixed(4096);
    sample(&mut doc);
    let inner = doc.root().member("inner");
    assert_eq!(to_json_string(inner), r#"{"flag":false,"empty":[]}"#);
    let tags = doc.root().member("tags").as_array().unwrap();
    assert_eq!(to_json_string(tags), r#"["a","b"]"#);
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_parse_serialize_round_trip() {
    init_tracing();
    let input = r#"{"a":[1,-2,3.25,"s\n",true,null],"b":{"c":{}},"d":18446744073709551615}"#;
    let mut doc = JsonDocument::fixed(4096);
    deserialize_json(&mut doc, input, DeserializationOptions::default()).unwrap();
    assert_eq!(to_json_string(&doc), input);

    let mut again = JsonDocument::fixed(4096);
    let pretty = to_json_string_pretty(&doc);
    deserialize_json(&mut again, &pretty, DeserializationOptions::default()).unwrap();
    assert_eq!(again, doc);
}
