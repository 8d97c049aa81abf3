//! JSON serialization of documents and views
//!
//! Every entry point accepts anything that converts into a
//! [`VariantConstRef`]: a `&JsonDocument`, a node view, or an array or object
//! view. Aliases are followed, so linked data serializes as if it were copied
//! in place.
//!
//! ```
//! use slotjson::serialization::{measure_json, to_json_string};
//! use slotjson_domain::JsonDocument;
//!
//! let mut doc = JsonDocument::fixed(512);
//! let mut root = doc.to_object();
//! root.insert("sensor", String::from("gps"));
//! root.insert("time", 1351824120_u32);
//!
//! let text = to_json_string(&doc);
//! assert_eq!(text, r#"{"sensor":"gps","time":1351824120}"#);
//! assert_eq!(measure_json(&doc), text.len());
//! ```

pub mod json;
pub mod measure;
pub mod writer;

use slotjson_domain::VariantConstRef;
use tracing::debug;

use crate::error::{Error, Result};

pub use json::{JsonSerializer, PrettyJsonSerializer};
pub use measure::{measure_json, measure_json_pretty};
pub use writer::{DummyWriter, IoWriter, SliceWriter, Writer};

/// Write compact JSON for `source`, returning the bytes the writer accepted
pub fn serialize_json<'a, 's: 'a, W: Writer>(
    source: impl Into<VariantConstRef<'a, 's>>,
    writer: W,
) -> usize {
    let mut serializer = JsonSerializer::new(writer);
    let Ok(()) = source.into().accept(&mut serializer);
    let written = serializer.bytes_written();
    debug!("Serialized JSON: {} bytes", written);
    written
}

/// Write indented JSON for `source`, returning the bytes the writer accepted
pub fn serialize_json_pretty<'a, 's: 'a, W: Writer>(
    source: impl Into<VariantConstRef<'a, 's>>,
    writer: W,
) -> usize {
    let mut serializer = PrettyJsonSerializer::new(writer);
    let Ok(()) = source.into().accept(&mut serializer);
    let written = serializer.bytes_written();
    debug!("Serialized pretty JSON: {} bytes", written);
    written
}

/// Compact JSON for `source` as a new string
pub fn to_json_string<'a, 's: 'a>(source: impl Into<VariantConstRef<'a, 's>>) -> String {
    let source = source.into();
    let mut text = String::with_capacity(measure_json(source));
    serialize_json(source, &mut text);
    text
}

/// Indented JSON for `source` as a new string
pub fn to_json_string_pretty<'a, 's: 'a>(source: impl Into<VariantConstRef<'a, 's>>) -> String {
    let source = source.into();
    let mut text = String::with_capacity(measure_json_pretty(source));
    serialize_json_pretty(source, &mut text);
    text
}

/// Write compact JSON into `buffer`, truncating what does not fit
///
/// Returns the number of bytes written. Compare it with
/// [`measure_json`] to detect truncation.
pub fn serialize_json_to_slice<'a, 's: 'a>(
    source: impl Into<VariantConstRef<'a, 's>>,
    buffer: &mut [u8],
) -> usize {
    serialize_json(source, SliceWriter::new(buffer))
}

/// Write compact JSON to an I/O stream
pub fn serialize_json_to_io<'a, 's: 'a, W: std::io::Write>(
    source: impl Into<VariantConstRef<'a, 's>>,
    stream: W,
) -> Result<usize> {
    let mut writer = IoWriter::new(stream);
    let written = serialize_json(source, &mut writer);
    match writer.take_error() {
        Some(err) => Err(Error::from(err)),
        None => {
            writer.flush()?;
            Ok(written)
        }
    }
}
