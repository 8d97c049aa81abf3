//! JSON deserialization into documents
//!
//! Parsing clears the target document and fills it in one forward pass:
//! serde_json tokenizes, and every value is written straight into the slot it
//! belongs to. When the pool runs out, parsing stops with
//! [`Error::NoMemory`] and the part of the tree built so far stays valid.
//!
//! ```
//! use slotjson::deserialization::{DeserializationOptions, deserialize_json};
//! use slotjson_domain::JsonDocument;
//!
//! let mut doc = JsonDocument::fixed(1024);
//! let input = r#"{"sensor":"gps","data":[48.75,2.30]}"#;
//! deserialize_json(&mut doc, input, DeserializationOptions::default()).unwrap();
//! assert_eq!(doc.root().member("sensor").as_str(), Some("gps"));
//! assert_eq!(doc.nesting(), 2);
//! ```

mod json;
pub mod options;

use std::io::{self, Read};

use serde::de::DeserializeSeed;
use slotjson_domain::JsonDocument;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use json::{Abort, Context, CopyStrings, LinkStrings, NodeSeed, StringPolicy};

pub use options::DeserializationOptions;

/// Parse `input` into `doc`, copying every string into the pool
///
/// Anything after the first complete value is ignored.
pub fn deserialize_json<'s>(
    doc: &mut JsonDocument<'s>,
    input: impl AsRef<[u8]>,
    options: DeserializationOptions,
) -> Result<()> {
    let input = input.as_ref();
    doc.clear();
    if is_blank(input) {
        return Err(Error::EmptyInput);
    }
    let mut deserializer = serde_json::Deserializer::from_slice(input);
    let outcome = build(doc, &mut deserializer, CopyStrings, options);
    finish(doc, outcome, options, input.len())
}

/// Parse `input` into `doc`, linking strings instead of copying them
///
/// Strings holding no escape sequence are linked to `input`, which must
/// outlive the document. Escaped strings and keys are unescaped into the pool.
pub fn deserialize_json_in_place<'s>(
    doc: &mut JsonDocument<'s>,
    input: &'s str,
    options: DeserializationOptions,
) -> Result<()> {
    doc.clear();
    if is_blank(input.as_bytes()) {
        return Err(Error::EmptyInput);
    }
    let mut deserializer = serde_json::Deserializer::from_str(input);
    let outcome = build(doc, &mut deserializer, LinkStrings, options);
    finish(doc, outcome, options, input.len())
}

/// Parse JSON read from `reader` into `doc`
///
/// Reading stops after the first complete value.
pub fn deserialize_json_from_reader<'s, R: Read>(
    doc: &mut JsonDocument<'s>,
    reader: R,
    options: DeserializationOptions,
) -> Result<()> {
    doc.clear();
    let mut sniff = Sniff::new(reader);
    let outcome = {
        let mut deserializer = serde_json::Deserializer::from_reader(&mut sniff);
        build(doc, &mut deserializer, CopyStrings, options)
    };
    if !sniff.saw_value && matches!(&outcome.result, Err(err) if err.is_eof()) {
        return Err(Error::EmptyInput);
    }
    finish(doc, outcome, options, sniff.consumed)
}

struct Outcome {
    result: std::result::Result<(), serde_json::Error>,
    abort: Option<Abort>,
    capacity_before: usize,
}

fn build<'de, 's, R, P>(
    doc: &mut JsonDocument<'s>,
    deserializer: &mut serde_json::Deserializer<R>,
    policy: P,
    options: DeserializationOptions,
) -> Outcome
where
    R: serde_json::de::Read<'de>,
    P: StringPolicy<'de, 's>,
{
    let capacity_before = doc.capacity();
    let mut abort = None;
    let ctx = Context::new(policy, options.effective_nesting_limit(), &mut abort);
    let result = NodeSeed::new(doc.root_mut(), ctx).deserialize(deserializer);
    Outcome {
        result,
        abort,
        capacity_before,
    }
}

fn finish(
    doc: &JsonDocument<'_>,
    outcome: Outcome,
    options: DeserializationOptions,
    bytes: usize,
) -> Result<()> {
    if doc.capacity() > outcome.capacity_before {
        trace!(
            "Pool grew from {} to {} bytes during parse",
            outcome.capacity_before,
            doc.capacity()
        );
    }
    match (outcome.result, outcome.abort) {
        (Ok(()), _) => {
            debug!(
                "Deserialized JSON: {} bytes in, {} bytes used",
                bytes,
                doc.memory_usage()
            );
            Ok(())
        }
        (Err(_), Some(Abort::NoMemory)) => {
            warn!(
                "Document memory exhausted after {} of {} bytes",
                doc.memory_usage(),
                doc.capacity()
            );
            Err(Error::NoMemory)
        }
        (Err(_), Some(Abort::TooDeep)) => {
            let limit = options.effective_nesting_limit();
            warn!("Input nests deeper than {}", limit);
            Err(Error::too_deep(limit))
        }
        (Err(err), None) => Err(Error::from(err)),
    }
}

fn is_blank(input: &[u8]) -> bool {
    input.iter().all(|byte| is_whitespace(*byte))
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Reader that notes whether anything but whitespace went through it
struct Sniff<R> {
    inner: R,
    saw_value: bool,
    consumed: usize,
}

impl<R: Read> Sniff<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            saw_value: false,
            consumed: 0,
        }
    }
}

impl<R: Read> Read for Sniff<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.consumed += read;
        if !self.saw_value {
            self.saw_value = !is_blank(&buf[..read]);
        }
        Ok(read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::limits::MAX_NESTING_LIMIT;

    fn parse(doc: &mut JsonDocument<'_>, input: &str) -> Result<()> {
        deserialize_json(doc, input, DeserializationOptions::default())
    }

    #[test]
    fn test_scalars() {
        let mut doc = JsonDocument::fixed(256);
        parse(&mut doc, "true").unwrap();
        assert!(doc.root().as_value::<bool>());
        parse(&mut doc, "-42").unwrap();
        assert_eq!(doc.root().as_value::<i64>(), -42);
        parse(&mut doc, "18446744073709551615").unwrap();
        assert_eq!(doc.root().as_value::<u64>(), u64::MAX);
        parse(&mut doc, "2.5").unwrap();
        assert_eq!(doc.root().as_value::<f64>(), 2.5);
        parse(&mut doc, "null").unwrap();
        assert!(doc.is_null());
    }

    #[test]
    fn test_blank_input() {
        let mut doc = JsonDocument::fixed(256);
        assert_eq!(parse(&mut doc, ""), Err(Error::EmptyInput));
        assert_eq!(parse(&mut doc, " \r\n\t"), Err(Error::EmptyInput));
    }

    #[test]
    fn test_nesting_limit_zero_accepts_scalars_only() {
        let mut doc = JsonDocument::fixed(256);
        let options = DeserializationOptions::new().with_nesting_limit(0);
        assert!(deserialize_json(&mut doc, "7", options).is_ok());
        assert_eq!(
            deserialize_json(&mut doc, "[]", options),
            Err(Error::TooDeep { limit: 0 })
        );
    }

    #[test]
    fn test_limit_above_ceiling_reports_too_deep() {
        let mut doc = JsonDocument::dynamic(1024);
        let input = format!("{}{}", "[".repeat(150), "]".repeat(150));
        let options = DeserializationOptions {
            nesting_limit: 200,
        };
        assert_eq!(
            deserialize_json(&mut doc, &input, options),
            Err(Error::TooDeep {
                limit: MAX_NESTING_LIMIT
            })
        );

        let input = format!("{}{}", "[".repeat(100), "]".repeat(100));
        let options = DeserializationOptions::new().with_nesting_limit(200);
        assert!(deserialize_json(&mut doc, &input, options).is_ok());
        assert_eq!(doc.nesting(), MAX_NESTING_LIMIT);
    }

    #[test]
    fn test_parse_clears_previous_content() {
        let mut doc = JsonDocument::fixed(512);
        parse(&mut doc, r#"{"a":[1,2,3]}"#).unwrap();
        let used = doc.memory_usage();
        parse(&mut doc, r#"{"a":[1,2,3]}"#).unwrap();
        assert_eq!(doc.memory_usage(), used);
    }

    #[test]
    fn test_reader_empty() {
        let mut doc = JsonDocument::fixed(256);
        let result = deserialize_json_from_reader(&mut doc, "  \n".as_bytes(), Default::default());
        assert_eq!(result, Err(Error::EmptyInput));
    }
}
