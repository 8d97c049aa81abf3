//! # slotjson
//!
//! JSON documents that live inside a fixed memory budget. The storage engine
//! comes from [`slotjson_domain`]; this crate adds what talks to the outside
//! world: a JSON parser that allocates straight into a document, compact and
//! indented serializers, output measuring, configuration, and the crate
//! error type.
//!
//! ```
//! use slotjson::prelude::*;
//!
//! let mut doc = JsonDocument::fixed(1024);
//! deserialize_json(&mut doc, r#"{"a":[1,2]}"#, DeserializationOptions::default()).unwrap();
//! doc.to_object().insert("b", true);
//! assert_eq!(to_json_string(&doc), r#"{"b":true}"#);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod deserialization;
pub mod error;
pub mod serialization;

pub use slotjson_domain as domain;
pub use slotjson_domain::{
    ArrayConstRef, ArrayRef, Converter, JsonDocument, Linked, MemoryPool, NodeHandle,
    ObjectConstRef, ObjectRef, OverflowError, SLOT_SIZE, VariantConstRef, VariantKind, VariantRef,
    Visitor, json_array_size, json_object_size, json_string_size,
};

// Configuration exports
pub use config::{GrowthPolicy, ParserConfig, PoolConfig, SerializerConfig, SlotJsonConfig};

// Parsing and output exports
pub use deserialization::{
    DeserializationOptions, deserialize_json, deserialize_json_from_reader,
    deserialize_json_in_place,
};
pub use error::{Error, Result};
pub use serialization::{
    DummyWriter, IoWriter, JsonSerializer, PrettyJsonSerializer, SliceWriter, Writer,
    measure_json, measure_json_pretty, serialize_json, serialize_json_pretty,
    serialize_json_to_io, serialize_json_to_slice, to_json_string, to_json_string_pretty,
};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        ArrayRef, Converter, DeserializationOptions, Error, JsonDocument, ObjectRef, Result,
        SlotJsonConfig, VariantConstRef, VariantKind, VariantRef, deserialize_json,
        deserialize_json_in_place, measure_json, serialize_json, to_json_string,
        to_json_string_pretty,
    };
}
