//! `serde::Serialize` for documents and read views
//!
//! serde drives serialization through nested calls, one per container level,
//! so the walk stops with an error past [`SERDE_NESTING_LIMIT`] levels. The
//! crate's own writers have no such limit.

use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::document::JsonDocument;
use crate::refs::{ArrayConstRef, ObjectConstRef, VariantConstRef};
use crate::variant::VariantKind;

/// Deepest container nesting the `Serialize` impls descend into
pub const SERDE_NESTING_LIMIT: usize = 128;

/// A node together with the number of containers above it
struct Nested<'a, 's> {
    node: VariantConstRef<'a, 's>,
    depth: usize,
}

impl Nested<'_, '_> {
    fn enter<E: ser::Error>(&self) -> Result<usize, E> {
        if self.depth >= SERDE_NESTING_LIMIT {
            return Err(E::custom(format_args!(
                "tree nests deeper than {SERDE_NESTING_LIMIT} levels"
            )));
        }
        Ok(self.depth + 1)
    }
}

impl Serialize for Nested<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node;
        match node.kind() {
            VariantKind::Null => serializer.serialize_unit(),
            VariantKind::Bool => serializer.serialize_bool(node.as_value()),
            VariantKind::Signed => serializer.serialize_i64(node.as_value()),
            VariantKind::Unsigned => serializer.serialize_u64(node.as_value()),
            VariantKind::Float => serializer.serialize_f64(node.as_value()),
            VariantKind::String => serializer.serialize_str(node.as_str().unwrap_or_default()),
            VariantKind::Array => match node.as_array() {
                Some(array) => {
                    let depth = self.enter::<S::Error>()?;
                    let mut seq = serializer.serialize_seq(Some(array.len()))?;
                    for node in array.iter() {
                        seq.serialize_element(&Nested { node, depth })?;
                    }
                    seq.end()
                }
                None => serializer.serialize_unit(),
            },
            VariantKind::Object => match node.as_object() {
                Some(object) => {
                    let depth = self.enter::<S::Error>()?;
                    let mut map = serializer.serialize_map(Some(object.len()))?;
                    for (key, node) in object.iter() {
                        map.serialize_entry(key, &Nested { node, depth })?;
                    }
                    map.end()
                }
                None => serializer.serialize_unit(),
            },
        }
    }
}

impl Serialize for VariantConstRef<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested {
            node: *self,
            depth: 0,
        }
        .serialize(serializer)
    }
}

impl Serialize for ArrayConstRef<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VariantConstRef::from(*self).serialize(serializer)
    }
}

impl Serialize for ObjectConstRef<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VariantConstRef::from(*self).serialize(serializer)
    }
}

impl Serialize for JsonDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::SERDE_NESTING_LIMIT;
    use crate::JsonDocument;
    use alloc::string::String;

    #[test]
    fn test_serialize_through_serde_json() {
        let mut doc = JsonDocument::fixed(1024);
        let mut root = doc.to_object();
        root.insert("name", String::from("gauge"));
        root.insert("ok", true);
        let mut values = root.create_nested_array("values").unwrap();
        values.add(-1_i8);
        values.add(2.5_f64);

        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"name":"gauge","ok":true,"values":[-1,2.5]}"#);
    }

    fn chain(depth: usize) -> JsonDocument<'static> {
        let mut doc = JsonDocument::dynamic(256);
        let mut handle = doc.root_mut().handle();
        for _ in 0..depth {
            handle = doc.node_mut(handle).unwrap().add_element().unwrap().handle();
        }
        doc
    }

    #[test]
    fn test_nesting_limit_is_an_error() {
        let at_limit = chain(SERDE_NESTING_LIMIT);
        let json = serde_json::to_string(&at_limit).unwrap();
        assert_eq!(json.len(), 2 * SERDE_NESTING_LIMIT + 4);

        let deep = chain(100_000);
        let err = serde_json::to_string(&deep).unwrap_err();
        assert!(err.to_string().contains("deeper than"));
    }
}
