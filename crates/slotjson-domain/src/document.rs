//! The document root
//!
//! A [`JsonDocument`] owns one [`MemoryPool`] and the root node stored in its
//! first slot. It is the entry point for parsers, serializers and accessor
//! views alike.

use crate::converter::Converter;
use crate::error::AllocResult;
use crate::memory::{MemoryPool, NodeHandle, SlotId};
use crate::refs::{ArrayRef, ObjectRef, VariantConstRef, VariantRef};
use crate::strings::JsonString;
use crate::variant::{VariantKind, variants_equal};

/// Budget used by [`JsonDocument::default`]
pub const DEFAULT_DOCUMENT_CAPACITY: usize = 1024;

/// An arena-backed tree of JSON values
///
/// The lifetime `'s` bounds every string linked into the document: linked
/// strings must outlive it, copied ones live in the pool.
///
/// ```
/// use slotjson_domain::JsonDocument;
///
/// let mut doc = JsonDocument::fixed(1024);
/// let mut root = doc.to_object();
/// root.insert("sensor", String::from("gps"));
/// let mut data = root.create_nested_array("data").unwrap();
/// data.add(48.756080);
/// data.add(2.302038);
///
/// assert_eq!(doc.root().member("sensor").as_str(), Some("gps"));
/// assert_eq!(doc.root().member("data").size(), 2);
/// assert_eq!(doc.nesting(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct JsonDocument<'s> {
    pool: MemoryPool<'s>,
}

impl<'s> JsonDocument<'s> {
    /// Document over an existing pool
    ///
    /// The pool is cleared so the document starts out null.
    pub fn with_pool(mut pool: MemoryPool<'s>) -> Self {
        pool.clear();
        Self { pool }
    }

    /// Document with a fixed budget of `capacity` bytes
    pub fn fixed(capacity: usize) -> Self {
        Self::with_pool(MemoryPool::fixed(capacity))
    }

    /// Document whose budget grows without ceiling, starting at `initial`
    pub fn dynamic(initial: usize) -> Self {
        Self::with_pool(MemoryPool::growable(initial, None))
    }

    /// Document whose budget grows from `initial` up to `limit`
    pub fn growable(initial: usize, limit: usize) -> Self {
        Self::with_pool(MemoryPool::growable(initial, Some(limit)))
    }

    /// Document that cannot store anything but scalars at the root
    pub fn unbacked() -> Self {
        Self::with_pool(MemoryPool::unbacked())
    }

    /// The underlying pool
    pub fn pool(&self) -> &MemoryPool<'s> {
        &self.pool
    }

    /// The underlying pool, for collaborators that allocate directly
    pub fn pool_mut(&mut self) -> &mut MemoryPool<'s> {
        &mut self.pool
    }

    /// Reset the pool and the root in constant time
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    /// Bytes in use
    pub fn memory_usage(&self) -> usize {
        self.pool.size()
    }

    /// Current byte budget
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Whether an allocation failed since the last clear
    pub fn overflowed(&self) -> bool {
        self.pool.overflowed()
    }

    /// Lower a growable budget to current usage
    pub fn shrink_to_fit(&mut self) {
        self.pool.shrink_to_fit();
    }

    /// Read view of the root
    pub fn root(&self) -> VariantConstRef<'_, 's> {
        VariantConstRef::new(&self.pool, Some(SlotId::ROOT))
    }

    /// Write view of the root
    pub fn root_mut(&mut self) -> VariantRef<'_, 's> {
        VariantRef::new(&mut self.pool, SlotId::ROOT)
    }

    /// Kind of the root
    pub fn kind(&self) -> VariantKind {
        self.root().kind()
    }

    /// Whether the root is null
    pub fn is_null(&self) -> bool {
        self.root().is_null()
    }

    /// Elements or members at the root
    pub fn size(&self) -> usize {
        self.root().size()
    }

    /// Deepest container nesting of the tree
    pub fn nesting(&self) -> usize {
        self.root().nesting()
    }

    /// Clear the document and make the root an empty array
    pub fn to_array(&mut self) -> ArrayRef<'_, 's> {
        self.clear();
        self.pool.reset_container(SlotId::ROOT, VariantKind::Array);
        ArrayRef::new(&mut self.pool, SlotId::ROOT)
    }

    /// Clear the document and make the root an empty object
    pub fn to_object(&mut self) -> ObjectRef<'_, 's> {
        self.clear();
        self.pool.reset_container(SlotId::ROOT, VariantKind::Object);
        ObjectRef::new(&mut self.pool, SlotId::ROOT)
    }

    /// Clear the document and store `value` at the root
    pub fn set<T: Converter>(&mut self, value: T) -> bool {
        self.clear();
        self.root_mut().set(value)
    }

    /// Clear the document and store a string at the root
    pub fn set_string<S: JsonString<'s>>(&mut self, value: S) -> bool {
        self.clear();
        self.root_mut().set_string(value)
    }

    /// Clear the document and deep-copy `source` into it
    pub fn set_document(&mut self, source: &JsonDocument<'_>) -> bool {
        self.copy_from(source.root())
    }

    /// Clear the document and deep-copy `source` into it
    pub fn copy_from(&mut self, source: VariantConstRef<'_, '_>) -> bool {
        self.clear();
        self.root_mut().copy_from(source)
    }

    /// Append a null element to the root, turning a null root into an array
    pub fn add_element(&mut self) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.add_element(SlotId::ROOT)?;
        Some(VariantRef::new(&mut self.pool, child))
    }

    /// Append `value` to the root array
    pub fn add<T: Converter>(&mut self, value: T) -> bool {
        self.root_mut().add(value)
    }

    /// Root element at `index`, padding with nulls
    pub fn get_or_add_element(&mut self, index: usize) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.get_or_add_element(SlotId::ROOT, index)?;
        Some(VariantRef::new(&mut self.pool, child))
    }

    /// Root member under `key`, created as null when absent
    pub fn get_or_add_member<K: JsonString<'s>>(
        &mut self,
        key: K,
    ) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.get_or_add_member(SlotId::ROOT, key.adapt())?;
        Some(VariantRef::new(&mut self.pool, child))
    }

    /// Root member under `key`; unbound when absent
    pub fn member(&self, key: &str) -> VariantConstRef<'_, 's> {
        self.root().member(key)
    }

    /// Root element at `index`; unbound when absent
    pub fn element(&self, index: usize) -> VariantConstRef<'_, 's> {
        self.root().element(index)
    }

    /// Whether the root object has a member under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.root().contains_key(key)
    }

    /// Unlink the root element at `index`
    pub fn remove_index(&mut self, index: usize) -> bool {
        self.pool.remove_element(SlotId::ROOT, index)
    }

    /// Unlink the root member under `key`
    pub fn remove_key(&mut self, key: &str) -> bool {
        self.pool.remove_member(SlotId::ROOT, key)
    }

    /// Append an empty array to the root array
    pub fn create_nested_array(&mut self) -> Option<ArrayRef<'_, 's>> {
        let child = self.pool.add_element(SlotId::ROOT)?;
        self.pool.reset_container(child, VariantKind::Array);
        Some(ArrayRef::new(&mut self.pool, child))
    }

    /// Append an empty object to the root array
    pub fn create_nested_object(&mut self) -> Option<ObjectRef<'_, 's>> {
        let child = self.pool.add_element(SlotId::ROOT)?;
        self.pool.reset_container(child, VariantKind::Object);
        Some(ObjectRef::new(&mut self.pool, child))
    }

    /// Read view of a node taken earlier, unless the document was cleared
    pub fn node(&self, handle: NodeHandle) -> Option<VariantConstRef<'_, 's>> {
        let slot = self.pool.lookup(handle)?;
        Some(VariantConstRef::new(&self.pool, Some(slot)))
    }

    /// Write view of a node taken earlier, unless the document was cleared
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<VariantRef<'_, 's>> {
        let slot = self.pool.lookup(handle)?;
        Some(VariantRef::new(&mut self.pool, slot))
    }

    /// Make the node at `at` an alias of the node at `target`
    ///
    /// Refused for stale handles and for links that would form a cycle.
    pub fn link(&mut self, at: NodeHandle, target: NodeHandle) -> bool {
        match (self.pool.lookup(at), self.pool.lookup(target)) {
            (Some(at), Some(target)) => self.pool.link(at, target),
            _ => false,
        }
    }

    /// Replace the value at `dst` with a deep copy of the value at `src`
    ///
    /// Strings are shared with the source; `dst` may lie inside `src`.
    pub fn copy_within(&mut self, src: NodeHandle, dst: NodeHandle) -> AllocResult<bool> {
        match (self.pool.lookup(src), self.pool.lookup(dst)) {
            (Some(src), Some(dst)) => self.pool.copy_within(dst, src).map(|()| true),
            _ => Ok(false),
        }
    }
}

impl Default for JsonDocument<'_> {
    fn default() -> Self {
        Self::dynamic(DEFAULT_DOCUMENT_CAPACITY)
    }
}

impl<'a, 's> From<&'a JsonDocument<'s>> for VariantConstRef<'a, 's> {
    fn from(doc: &'a JsonDocument<'s>) -> Self {
        doc.root()
    }
}

impl<'t> PartialEq<JsonDocument<'t>> for JsonDocument<'_> {
    fn eq(&self, other: &JsonDocument<'t>) -> bool {
        variants_equal(&self.pool, Some(SlotId::ROOT), &other.pool, Some(SlotId::ROOT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{SLOT_SIZE, json_object_size};
    use alloc::string::String;

    #[test]
    fn test_new_document_is_null_and_empty() {
        let doc = JsonDocument::fixed(128);
        assert!(doc.is_null());
        assert_eq!(doc.memory_usage(), 0);
        assert_eq!(doc.size(), 0);
        assert_eq!(doc.nesting(), 0);
    }

    #[test]
    fn test_set_clears_first() {
        let mut doc = JsonDocument::fixed(4 * SLOT_SIZE + 32);
        doc.to_array().add(String::from("abc"));
        assert!(doc.memory_usage() > 0);
        assert!(doc.set(7_u32));
        assert_eq!(doc.memory_usage(), 0);
        assert_eq!(doc.root().as_value::<u32>(), 7);
    }

    #[test]
    fn test_scalar_root_fits_unbacked_document() {
        let mut doc = JsonDocument::unbacked();
        assert!(doc.set(true));
        assert!(!doc.set(String::from("x")));
        assert!(doc.overflowed());
        assert!(doc.is_null());
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut doc = JsonDocument::fixed(json_object_size(2) + 8);
        let handle = doc.get_or_add_member("k").unwrap().handle();
        assert!(doc.node(handle).is_some());
        doc.clear();
        assert!(doc.node(handle).is_none());
        assert!(doc.node_mut(handle).is_none());
    }

    #[test]
    fn test_copy_within_duplicates_subtree() {
        let mut doc = JsonDocument::fixed(16 * SLOT_SIZE + 32);
        let mut root = doc.to_object();
        let mut src = root.create_nested_object("src").unwrap();
        src.insert("n", 1_i32);
        root.get_or_add_member("dst");

        let src = doc.member("src").handle().unwrap();
        let dst = doc.member("dst").handle().unwrap();
        assert_eq!(doc.copy_within(src, dst), Ok(true));
        assert_eq!(doc.member("dst"), doc.member("src"));

        // the copy is independent of the original
        doc.node_mut(src).unwrap().member_mut("n").unwrap().set(2_i32);
        assert_eq!(doc.member("dst").member("n").as_value::<i32>(), 1);
    }

    #[test]
    fn test_documents_compare_deeply() {
        let mut left = JsonDocument::fixed(1024);
        let mut right = JsonDocument::fixed(2048);
        left.to_array().add(1_i64);
        right.to_array().add(1.0_f64);
        assert_eq!(left, right);
        right.add(2_u8);
        assert_ne!(left, right);
    }
}
