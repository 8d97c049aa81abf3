//! Depth-first traversal contract
//!
//! Serializers and size estimators consume a tree through [`Visitor`]. The
//! walk resolves aliases, so a visitor only ever sees concrete values.

use smallvec::SmallVec;

use crate::memory::SlotId;
use crate::refs::VariantConstRef;
use crate::variant::VariantData;

/// Receives the nodes of a tree in document order
///
/// For an array the calls are `begin_array`, then for each element
/// `begin_element` followed by the element's own calls, then `end_array`.
/// Objects follow the same shape with `visit_key` announcing each member.
pub trait Visitor {
    /// Error that aborts the walk
    type Error;

    /// A null node, an unbound view or a dangling alias
    fn visit_null(&mut self) -> Result<(), Self::Error>;

    /// A boolean
    fn visit_bool(&mut self, value: bool) -> Result<(), Self::Error>;

    /// A signed integer
    fn visit_signed(&mut self, value: i64) -> Result<(), Self::Error>;

    /// An unsigned integer
    fn visit_unsigned(&mut self, value: u64) -> Result<(), Self::Error>;

    /// A floating point number
    fn visit_float(&mut self, value: f64) -> Result<(), Self::Error>;

    /// A string, copied or linked
    fn visit_string(&mut self, value: &str) -> Result<(), Self::Error>;

    /// Start of an array of `len` elements
    fn begin_array(&mut self, len: usize) -> Result<(), Self::Error>;

    /// Start of the element at `index`
    fn begin_element(&mut self, index: usize) -> Result<(), Self::Error> {
        let _ = index;
        Ok(())
    }

    /// End of the current array
    fn end_array(&mut self) -> Result<(), Self::Error>;

    /// Start of an object of `len` members
    fn begin_object(&mut self, len: usize) -> Result<(), Self::Error>;

    /// Key of the member at `index`; the member's value follows
    fn visit_key(&mut self, key: &str, index: usize) -> Result<(), Self::Error>;

    /// End of the current object
    fn end_object(&mut self) -> Result<(), Self::Error>;
}

/// Pending work of a walk
enum Step {
    /// A node to visit, already resolved; `None` reads as null
    Node(Option<SlotId>),
    /// Remaining elements of an array, starting at `next`
    Elements { next: Option<SlotId>, index: usize },
    /// Remaining members of an object, starting at `next`
    Members { next: Option<SlotId>, index: usize },
}

/// Walk `node` depth first, feeding `visitor`
///
/// The walk keeps its pending work on the heap, so trees of any depth are
/// visited without growing the call stack.
pub fn accept<V: Visitor + ?Sized>(
    node: VariantConstRef<'_, '_>,
    visitor: &mut V,
) -> Result<(), V::Error> {
    let pool = node.pool;
    let mut stack: SmallVec<[Step; 16]> = SmallVec::new();
    stack.push(Step::Node(node.resolved()));

    while let Some(step) = stack.pop() {
        match step {
            Step::Node(None) => visitor.visit_null()?,
            Step::Node(Some(slot)) => match pool.data(slot) {
                VariantData::Null | VariantData::Alias(_) => visitor.visit_null()?,
                VariantData::Bool(value) => visitor.visit_bool(value)?,
                VariantData::Signed(value) => visitor.visit_signed(value)?,
                VariantData::Unsigned(value) => visitor.visit_unsigned(value)?,
                VariantData::Float(value) => visitor.visit_float(value)?,
                VariantData::String(handle) => visitor.visit_string(pool.resolve_str(&handle))?,
                VariantData::Array(coll) => {
                    visitor.begin_array(pool.collection_len(coll))?;
                    stack.push(Step::Elements {
                        next: coll.head(),
                        index: 0,
                    });
                }
                VariantData::Object(coll) => {
                    visitor.begin_object(pool.collection_len(coll))?;
                    stack.push(Step::Members {
                        next: coll.head(),
                        index: 0,
                    });
                }
            },
            Step::Elements { next: None, .. } => visitor.end_array()?,
            Step::Elements {
                next: Some(child),
                index,
            } => {
                visitor.begin_element(index)?;
                stack.push(Step::Elements {
                    next: pool.next_sibling(child),
                    index: index + 1,
                });
                stack.push(Step::Node(pool.resolve(child)));
            }
            Step::Members { next: None, .. } => visitor.end_object()?,
            Step::Members {
                next: Some(child),
                index,
            } => {
                visitor.visit_key(pool.key_of(child).unwrap_or_default(), index)?;
                stack.push(Step::Members {
                    next: pool.next_sibling(child),
                    index: index + 1,
                });
                stack.push(Step::Node(pool.resolve(child)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonDocument;
    use alloc::{format, string::String, vec::Vec};
    use core::convert::Infallible;

    /// Records the event stream as short tokens
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Visitor for Recorder {
        type Error = Infallible;

        fn visit_null(&mut self) -> Result<(), Infallible> {
            self.0.push("null".into());
            Ok(())
        }
        fn visit_bool(&mut self, value: bool) -> Result<(), Infallible> {
            self.0.push(format!("{value}"));
            Ok(())
        }
        fn visit_signed(&mut self, value: i64) -> Result<(), Infallible> {
            self.0.push(format!("i{value}"));
            Ok(())
        }
        fn visit_unsigned(&mut self, value: u64) -> Result<(), Infallible> {
            self.0.push(format!("u{value}"));
            Ok(())
        }
        fn visit_float(&mut self, value: f64) -> Result<(), Infallible> {
            self.0.push(format!("f{value}"));
            Ok(())
        }
        fn visit_string(&mut self, value: &str) -> Result<(), Infallible> {
            self.0.push(format!("'{value}'"));
            Ok(())
        }
        fn begin_array(&mut self, len: usize) -> Result<(), Infallible> {
            self.0.push(format!("[{len}"));
            Ok(())
        }
        fn end_array(&mut self) -> Result<(), Infallible> {
            self.0.push("]".into());
            Ok(())
        }
        fn begin_object(&mut self, len: usize) -> Result<(), Infallible> {
            self.0.push(format!("{{{len}"));
            Ok(())
        }
        fn visit_key(&mut self, key: &str, _index: usize) -> Result<(), Infallible> {
            self.0.push(format!("{key}:"));
            Ok(())
        }
        fn end_object(&mut self) -> Result<(), Infallible> {
            self.0.push("}".into());
            Ok(())
        }
    }

    #[test]
    fn test_walk_order() {
        let mut doc = JsonDocument::fixed(1024);
        let mut root = doc.to_object();
        root.insert("a", 1_u8);
        let mut list = root.create_nested_array("b").unwrap();
        list.add(true);
        list.add_string("x");
        list.add_element();

        let mut recorder = Recorder::default();
        let Ok(()) = doc.root().accept(&mut recorder);
        assert_eq!(
            recorder.0,
            ["{2", "a:", "u1", "b:", "[3", "true", "'x'", "null", "]", "}"]
        );
    }

    #[test]
    fn test_walk_resolves_aliases() {
        let mut doc = JsonDocument::fixed(1024);
        let mut root = doc.to_array();
        root.add(-5_i32);
        root.add_element();
        let target = doc.root().element(0).handle().unwrap();
        let alias = doc.root().element(1).handle().unwrap();
        assert!(doc.link(alias, target));

        let mut recorder = Recorder::default();
        let Ok(()) = doc.root().accept(&mut recorder);
        assert_eq!(recorder.0, ["[2", "i-5", "i-5", "]"]);
    }

    #[test]
    fn test_walk_survives_deep_nesting() {
        let mut doc = JsonDocument::dynamic(1024);
        let mut handle = doc.root_mut().add_element().unwrap().handle();
        for _ in 0..100_000 {
            handle = doc.node_mut(handle).unwrap().add_element().unwrap().handle();
        }

        let mut recorder = Recorder::default();
        let Ok(()) = doc.root().accept(&mut recorder);
        assert_eq!(recorder.0.len(), 2 * 100_001 + 1);
        assert_eq!(recorder.0.first().map(String::as_str), Some("[1"));
        assert_eq!(recorder.0.last().map(String::as_str), Some("]"));
    }
}
