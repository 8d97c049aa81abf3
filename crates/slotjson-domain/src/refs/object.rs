use core::fmt;

use super::{ArrayRef, VariantConstRef, VariantRef};
use crate::collection::Children;
use crate::converter::Converter;
use crate::memory::{MemoryPool, SlotId};
use crate::strings::JsonString;
use crate::variant::{VariantKind, variants_equal};

/// Read-only view of an object
#[derive(Clone, Copy)]
pub struct ObjectConstRef<'a, 's> {
    pub(crate) pool: &'a MemoryPool<'s>,
    pub(crate) slot: SlotId,
}

impl<'a, 's> ObjectConstRef<'a, 's> {
    pub(crate) fn new(pool: &'a MemoryPool<'s>, slot: SlotId) -> Self {
        Self { pool, slot }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.pool.child_count(self.slot)
    }

    /// Whether the object has no members
    pub fn is_empty(&self) -> bool {
        self.pool
            .collection(self.slot)
            .is_none_or(|coll| coll.is_empty())
    }

    /// Member under `key`, unbound when absent
    pub fn member(&self, key: &str) -> VariantConstRef<'a, 's> {
        VariantConstRef::new(self.pool, self.pool.member(self.slot, key))
    }

    /// Whether a member under `key` exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.pool.member(self.slot, key).is_some()
    }

    /// Members as `(key, value)` pairs in insertion order
    pub fn iter(&self) -> ObjectIter<'a, 's> {
        let coll = self.pool.collection(self.slot).unwrap_or_default();
        ObjectIter {
            pool: self.pool,
            children: self.pool.children(coll),
        }
    }

    /// Member keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a, 's> {
        self.iter().map(|(key, _)| key)
    }

    /// The object as a generic node
    pub fn as_variant(&self) -> VariantConstRef<'a, 's> {
        VariantConstRef::new(self.pool, Some(self.slot))
    }
}

impl<'a, 's> IntoIterator for ObjectConstRef<'a, 's> {
    type Item = (&'a str, VariantConstRef<'a, 's>);
    type IntoIter = ObjectIter<'a, 's>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 's> From<ObjectConstRef<'a, 's>> for VariantConstRef<'a, 's> {
    fn from(object: ObjectConstRef<'a, 's>) -> Self {
        object.as_variant()
    }
}

impl<'b, 't> PartialEq<ObjectConstRef<'b, 't>> for ObjectConstRef<'_, '_> {
    fn eq(&self, other: &ObjectConstRef<'b, 't>) -> bool {
        variants_equal(self.pool, Some(self.slot), other.pool, Some(other.slot))
    }
}

impl fmt::Debug for ObjectConstRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over the members of an object
#[derive(Debug, Clone)]
pub struct ObjectIter<'a, 's> {
    pool: &'a MemoryPool<'s>,
    children: Children<'a, 's>,
}

impl<'a, 's> Iterator for ObjectIter<'a, 's> {
    type Item = (&'a str, VariantConstRef<'a, 's>);

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next()?;
        let key = self.pool.key_of(child).unwrap_or_default();
        Some((key, VariantConstRef::new(self.pool, Some(child))))
    }
}

/// Mutable view of an object
pub struct ObjectRef<'a, 's> {
    pub(crate) pool: &'a mut MemoryPool<'s>,
    pub(crate) slot: SlotId,
}

impl<'a, 's> ObjectRef<'a, 's> {
    pub(crate) fn new(pool: &'a mut MemoryPool<'s>, slot: SlotId) -> Self {
        Self { pool, slot }
    }

    /// Read-only view of the same object
    pub fn as_const(&self) -> ObjectConstRef<'_, 's> {
        ObjectConstRef::new(&*self.pool, self.slot)
    }

    /// Give up write access, keeping the borrow
    pub fn into_const(self) -> ObjectConstRef<'a, 's> {
        ObjectConstRef::new(self.pool, self.slot)
    }

    /// Shorter-lived write view of the same object
    pub fn reborrow(&mut self) -> ObjectRef<'_, 's> {
        ObjectRef::new(self.pool, self.slot)
    }

    /// The object as a generic writable node
    pub fn as_variant(&mut self) -> VariantRef<'_, 's> {
        VariantRef::new(self.pool, self.slot)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.as_const().len()
    }

    /// Whether the object has no members
    pub fn is_empty(&self) -> bool {
        self.as_const().is_empty()
    }

    /// Member under `key`, read-only
    pub fn member(&self, key: &str) -> VariantConstRef<'_, 's> {
        self.as_const().member(key)
    }

    /// Whether a member under `key` exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.as_const().contains_key(key)
    }

    /// Members in insertion order
    pub fn iter(&self) -> ObjectIter<'_, 's> {
        self.as_const().iter()
    }

    /// Existing member under `key`
    pub fn member_mut(&mut self, key: &str) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.member(self.slot, key)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Member under `key`, appended as null when absent
    pub fn get_or_add_member<K: JsonString<'s>>(
        &mut self,
        key: K,
    ) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.get_or_add_member(self.slot, key.adapt())?;
        Some(VariantRef::new(self.pool, child))
    }

    fn insert_with(
        &mut self,
        key: crate::strings::AdaptedString<'_, 's>,
        write: impl FnOnce(&mut VariantRef<'_, 's>) -> bool,
    ) -> bool {
        let existed = self.pool.member(self.slot, key.as_str()).is_some();
        let Some(child) = self.pool.get_or_add_member(self.slot, key) else {
            return false;
        };
        if write(&mut VariantRef::new(self.pool, child)) {
            return true;
        }
        if !existed {
            self.pool.unlink(self.slot, child);
        }
        false
    }

    /// Store `value` under `key`, overwriting in place when the key exists
    ///
    /// On overflow a new member is not added and an existing one keeps its
    /// value.
    pub fn insert<K: JsonString<'s>, T: Converter>(&mut self, key: K, value: T) -> bool {
        self.insert_with(key.adapt(), |node| node.set(value))
    }

    /// Store a string under `key`, each under the policy its type selects
    pub fn insert_string<K, S>(&mut self, key: K, value: S) -> bool
    where
        K: JsonString<'s>,
        S: JsonString<'s>,
    {
        self.insert_with(key.adapt(), |node| node.set_string(&value))
    }

    /// Add an empty array under `key`, replacing any existing value
    pub fn create_nested_array<K: JsonString<'s>>(
        &mut self,
        key: K,
    ) -> Option<ArrayRef<'_, 's>> {
        let child = self.pool.get_or_add_member(self.slot, key.adapt())?;
        self.pool.reset_container(child, VariantKind::Array);
        Some(ArrayRef::new(self.pool, child))
    }

    /// Add an empty object under `key`, replacing any existing value
    pub fn create_nested_object<K: JsonString<'s>>(
        &mut self,
        key: K,
    ) -> Option<ObjectRef<'_, 's>> {
        let child = self.pool.get_or_add_member(self.slot, key.adapt())?;
        self.pool.reset_container(child, VariantKind::Object);
        Some(ObjectRef::new(self.pool, child))
    }

    /// Unlink the member under `key`; its space is kept until the pool clears
    pub fn remove(&mut self, key: &str) -> bool {
        self.pool.remove_member(self.slot, key)
    }

    /// Detach every member
    pub fn clear(&mut self) {
        self.pool.clear_children(self.slot);
    }

    /// Replace the members with deep copies of `source`'s members
    pub fn copy_from(&mut self, source: ObjectConstRef<'_, '_>) -> bool {
        self.pool
            .copy_from_pool(self.slot, source.pool, Some(source.slot))
            .is_ok()
    }
}

impl<'b, 't> PartialEq<ObjectConstRef<'b, 't>> for ObjectRef<'_, '_> {
    fn eq(&self, other: &ObjectConstRef<'b, 't>) -> bool {
        self.as_const() == *other
    }
}

impl fmt::Debug for ObjectRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_const().fmt(f)
    }
}
