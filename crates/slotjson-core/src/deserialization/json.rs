//! Tree builder driven by serde_json's tokenizer
//!
//! The builder is a chain of [`DeserializeSeed`]s that write each value
//! straight into the node it belongs to, allocating from the document's pool
//! as tokens arrive. No intermediate value is built.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use slotjson_domain::{ArrayRef, Linked, ObjectRef, VariantRef};

/// Why the builder stopped a parse that was syntactically fine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Abort {
    NoMemory,
    TooDeep,
}

/// How strings borrowed from the input are stored
pub(crate) trait StringPolicy<'de, 's>: Copy {
    fn store(self, node: &mut VariantRef<'_, 's>, text: &'de str) -> bool;

    fn member<'n>(
        self,
        object: &'n mut ObjectRef<'_, 's>,
        key: &'de str,
    ) -> Option<VariantRef<'n, 's>>;
}

/// Copy every string into the pool
#[derive(Debug, Clone, Copy)]
pub(crate) struct CopyStrings;

impl<'de, 's> StringPolicy<'de, 's> for CopyStrings {
    fn store(self, node: &mut VariantRef<'_, 's>, text: &'de str) -> bool {
        node.set_string(text)
    }

    fn member<'n>(
        self,
        object: &'n mut ObjectRef<'_, 's>,
        key: &'de str,
    ) -> Option<VariantRef<'n, 's>> {
        object.get_or_add_member(key)
    }
}

/// Link strings that the input holds verbatim
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinkStrings;

impl<'de: 's, 's> StringPolicy<'de, 's> for LinkStrings {
    fn store(self, node: &mut VariantRef<'_, 's>, text: &'de str) -> bool {
        node.set_string(Linked(text))
    }

    fn member<'n>(
        self,
        object: &'n mut ObjectRef<'_, 's>,
        key: &'de str,
    ) -> Option<VariantRef<'n, 's>> {
        object.get_or_add_member(Linked(key))
    }
}

/// State shared by every seed of one parse
pub(crate) struct Context<'p, P> {
    policy: P,
    depth: usize,
    limit: usize,
    abort: &'p mut Option<Abort>,
}

impl<'p, P: Copy> Context<'p, P> {
    pub(crate) fn new(policy: P, limit: usize, abort: &'p mut Option<Abort>) -> Self {
        Self {
            policy,
            depth: 0,
            limit,
            abort,
        }
    }

    fn child(&mut self) -> Context<'_, P> {
        Context {
            policy: self.policy,
            depth: self.depth + 1,
            limit: self.limit,
            abort: &mut *self.abort,
        }
    }

    fn fail<E: de::Error>(&mut self, abort: Abort) -> E {
        *self.abort = Some(abort);
        match abort {
            Abort::NoMemory => E::custom("document memory exhausted"),
            Abort::TooDeep => E::custom("nesting limit exceeded"),
        }
    }

    fn enter<E: de::Error>(&mut self) -> Result<(), E> {
        if self.depth >= self.limit {
            return Err(self.fail(Abort::TooDeep));
        }
        Ok(())
    }
}

/// Fills one node with the next value of the input
pub(crate) struct NodeSeed<'p, 'n, 's, P> {
    node: VariantRef<'n, 's>,
    ctx: Context<'p, P>,
}

impl<'p, 'n, 's, P> NodeSeed<'p, 'n, 's, P> {
    pub(crate) fn new(node: VariantRef<'n, 's>, ctx: Context<'p, P>) -> Self {
        Self { node, ctx }
    }
}

impl<'de, 's, P: StringPolicy<'de, 's>> DeserializeSeed<'de> for NodeSeed<'_, '_, 's, P> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 's, P: StringPolicy<'de, 's>> Visitor<'de> for NodeSeed<'_, '_, 's, P> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(mut self) -> Result<(), E> {
        self.node.set_null();
        Ok(())
    }

    fn visit_bool<E: de::Error>(mut self, value: bool) -> Result<(), E> {
        self.node.set_bool(value);
        Ok(())
    }

    fn visit_i64<E: de::Error>(mut self, value: i64) -> Result<(), E> {
        self.node.set_signed(value);
        Ok(())
    }

    fn visit_u64<E: de::Error>(mut self, value: u64) -> Result<(), E> {
        self.node.set_unsigned(value);
        Ok(())
    }

    fn visit_f64<E: de::Error>(mut self, value: f64) -> Result<(), E> {
        self.node.set_float(value);
        Ok(())
    }

    fn visit_borrowed_str<E: de::Error>(mut self, value: &'de str) -> Result<(), E> {
        if self.ctx.policy.store(&mut self.node, value) {
            Ok(())
        } else {
            Err(self.ctx.fail(Abort::NoMemory))
        }
    }

    fn visit_str<E: de::Error>(mut self, value: &str) -> Result<(), E> {
        if self.node.set_string(value) {
            Ok(())
        } else {
            Err(self.ctx.fail(Abort::NoMemory))
        }
    }

    fn visit_seq<A: SeqAccess<'de>>(mut self, mut seq: A) -> Result<(), A::Error> {
        self.ctx.enter()?;
        let mut array = self.node.to_array();
        while seq
            .next_element_seed(ElementSeed {
                array: &mut array,
                ctx: self.ctx.child(),
            })?
            .is_some()
        {}
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(mut self, mut map: A) -> Result<(), A::Error> {
        self.ctx.enter()?;
        let mut object = self.node.to_object();
        while let Some(key) = map.next_key_seed(KeySeed)? {
            let member = match key {
                Key::Borrowed(key) => self.ctx.policy.member(&mut object, key),
                Key::Owned(key) => object.get_or_add_member(key.as_str()),
            };
            let Some(member) = member else {
                return Err(self.ctx.fail(Abort::NoMemory));
            };
            map.next_value_seed(NodeSeed::new(member, self.ctx.child()))?;
        }
        Ok(())
    }
}

/// Appends one element to an array, only once the input shows there is one
struct ElementSeed<'p, 'a, 'n, 's, P> {
    array: &'a mut ArrayRef<'n, 's>,
    ctx: Context<'p, P>,
}

impl<'de, 's, P: StringPolicy<'de, 's>> DeserializeSeed<'de> for ElementSeed<'_, '_, '_, 's, P> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(mut self, deserializer: D) -> Result<(), D::Error> {
        let Some(node) = self.array.add_element() else {
            return Err(self.ctx.fail(Abort::NoMemory));
        };
        deserializer.deserialize_any(NodeSeed::new(node, self.ctx))
    }
}

/// An object key, borrowed from the input when it holds no escapes
enum Key<'de> {
    Borrowed(&'de str),
    Owned(String),
}

struct KeySeed;

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = Key<'de>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Key<'de>, D::Error> {
        deserializer.deserialize_str(KeyVisitor)
    }
}

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = Key<'de>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object key")
    }

    fn visit_borrowed_str<E: de::Error>(self, value: &'de str) -> Result<Key<'de>, E> {
        Ok(Key::Borrowed(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Key<'de>, E> {
        Ok(Key::Owned(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Key<'de>, E> {
        Ok(Key::Owned(value))
    }
}
