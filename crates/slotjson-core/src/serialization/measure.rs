//! Output size without output
//!
//! Measuring runs the regular serializers over a [`DummyWriter`], so the
//! result always equals the length the matching serializer produces.

use slotjson_domain::VariantConstRef;

use super::json::{JsonSerializer, PrettyJsonSerializer};
use super::writer::DummyWriter;

/// Bytes [`serialize_json`](super::serialize_json) would write for `source`
pub fn measure_json<'a, 's: 'a>(source: impl Into<VariantConstRef<'a, 's>>) -> usize {
    let mut serializer = JsonSerializer::new(DummyWriter);
    let Ok(()) = source.into().accept(&mut serializer);
    serializer.bytes_written()
}

/// Bytes [`serialize_json_pretty`](super::serialize_json_pretty) would write
/// for `source`
pub fn measure_json_pretty<'a, 's: 'a>(source: impl Into<VariantConstRef<'a, 's>>) -> usize {
    let mut serializer = PrettyJsonSerializer::new(DummyWriter);
    let Ok(()) = source.into().accept(&mut serializer);
    serializer.bytes_written()
}
