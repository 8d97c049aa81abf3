use core::fmt;

use super::{ObjectRef, VariantConstRef, VariantRef};
use crate::collection::Children;
use crate::converter::Converter;
use crate::memory::{MemoryPool, SlotId};
use crate::strings::JsonString;
use crate::variant::{VariantKind, variants_equal};

/// Read-only view of an array
#[derive(Clone, Copy)]
pub struct ArrayConstRef<'a, 's> {
    pub(crate) pool: &'a MemoryPool<'s>,
    pub(crate) slot: SlotId,
}

impl<'a, 's> ArrayConstRef<'a, 's> {
    pub(crate) fn new(pool: &'a MemoryPool<'s>, slot: SlotId) -> Self {
        Self { pool, slot }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.pool.child_count(self.slot)
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.pool
            .collection(self.slot)
            .is_none_or(|coll| coll.is_empty())
    }

    /// Element at `index`, unbound when out of range
    pub fn element(&self, index: usize) -> VariantConstRef<'a, 's> {
        VariantConstRef::new(self.pool, self.pool.element(self.slot, index))
    }

    /// Elements in order
    pub fn iter(&self) -> ArrayIter<'a, 's> {
        let coll = self.pool.collection(self.slot).unwrap_or_default();
        ArrayIter {
            pool: self.pool,
            children: self.pool.children(coll),
        }
    }

    /// The array as a generic node
    pub fn as_variant(&self) -> VariantConstRef<'a, 's> {
        VariantConstRef::new(self.pool, Some(self.slot))
    }
}

impl<'a, 's> IntoIterator for ArrayConstRef<'a, 's> {
    type Item = VariantConstRef<'a, 's>;
    type IntoIter = ArrayIter<'a, 's>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 's> From<ArrayConstRef<'a, 's>> for VariantConstRef<'a, 's> {
    fn from(array: ArrayConstRef<'a, 's>) -> Self {
        array.as_variant()
    }
}

impl<'b, 't> PartialEq<ArrayConstRef<'b, 't>> for ArrayConstRef<'_, '_> {
    fn eq(&self, other: &ArrayConstRef<'b, 't>) -> bool {
        variants_equal(self.pool, Some(self.slot), other.pool, Some(other.slot))
    }
}

impl fmt::Debug for ArrayConstRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the elements of an array
#[derive(Debug, Clone)]
pub struct ArrayIter<'a, 's> {
    pool: &'a MemoryPool<'s>,
    children: Children<'a, 's>,
}

impl<'a, 's> Iterator for ArrayIter<'a, 's> {
    type Item = VariantConstRef<'a, 's>;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next()?;
        Some(VariantConstRef::new(self.pool, Some(child)))
    }
}

/// Mutable view of an array
pub struct ArrayRef<'a, 's> {
    pub(crate) pool: &'a mut MemoryPool<'s>,
    pub(crate) slot: SlotId,
}

impl<'a, 's> ArrayRef<'a, 's> {
    pub(crate) fn new(pool: &'a mut MemoryPool<'s>, slot: SlotId) -> Self {
        Self { pool, slot }
    }

    /// Read-only view of the same array
    pub fn as_const(&self) -> ArrayConstRef<'_, 's> {
        ArrayConstRef::new(&*self.pool, self.slot)
    }

    /// Give up write access, keeping the borrow
    pub fn into_const(self) -> ArrayConstRef<'a, 's> {
        ArrayConstRef::new(self.pool, self.slot)
    }

    /// Shorter-lived write view of the same array
    pub fn reborrow(&mut self) -> ArrayRef<'_, 's> {
        ArrayRef::new(self.pool, self.slot)
    }

    /// The array as a generic writable node
    pub fn as_variant(&mut self) -> VariantRef<'_, 's> {
        VariantRef::new(self.pool, self.slot)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.as_const().len()
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.as_const().is_empty()
    }

    /// Element at `index`, read-only
    pub fn element(&self, index: usize) -> VariantConstRef<'_, 's> {
        self.as_const().element(index)
    }

    /// Elements in order
    pub fn iter(&self) -> ArrayIter<'_, 's> {
        self.as_const().iter()
    }

    /// Append a null element
    pub fn add_element(&mut self) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.add_element(self.slot)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Append `value`; on overflow nothing is appended
    pub fn add<T: Converter>(&mut self, value: T) -> bool {
        let Some(child) = self.pool.add_element(self.slot) else {
            return false;
        };
        if value.to_json(&mut VariantRef::new(self.pool, child)).is_ok() {
            return true;
        }
        self.pool.unlink(self.slot, child);
        false
    }

    /// Append a string under the policy its type selects
    pub fn add_string<S: JsonString<'s>>(&mut self, value: S) -> bool {
        let Some(child) = self.pool.add_element(self.slot) else {
            return false;
        };
        if VariantRef::new(self.pool, child).set_string(value) {
            return true;
        }
        self.pool.unlink(self.slot, child);
        false
    }

    /// Append an empty array
    pub fn create_nested_array(&mut self) -> Option<ArrayRef<'_, 's>> {
        let child = self.pool.add_element(self.slot)?;
        self.pool.reset_container(child, VariantKind::Array);
        Some(ArrayRef::new(self.pool, child))
    }

    /// Append an empty object
    pub fn create_nested_object(&mut self) -> Option<ObjectRef<'_, 's>> {
        let child = self.pool.add_element(self.slot)?;
        self.pool.reset_container(child, VariantKind::Object);
        Some(ObjectRef::new(self.pool, child))
    }

    /// Existing element at `index`
    pub fn element_mut(&mut self, index: usize) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.element(self.slot, index)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Element at `index`, padding with nulls as needed
    pub fn get_or_add_element(&mut self, index: usize) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.get_or_add_element(self.slot, index)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Unlink the element at `index`; its space is kept until the pool clears
    pub fn remove(&mut self, index: usize) -> bool {
        self.pool.remove_element(self.slot, index)
    }

    /// Detach every element
    pub fn clear(&mut self) {
        self.pool.clear_children(self.slot);
    }

    /// Replace the elements with deep copies of `source`'s elements
    pub fn copy_from(&mut self, source: ArrayConstRef<'_, '_>) -> bool {
        self.pool
            .copy_from_pool(self.slot, source.pool, Some(source.slot))
            .is_ok()
    }
}

impl<'b, 't> PartialEq<ArrayConstRef<'b, 't>> for ArrayRef<'_, '_> {
    fn eq(&self, other: &ArrayConstRef<'b, 't>) -> bool {
        self.as_const() == *other
    }
}

impl fmt::Debug for ArrayRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_const().fmt(f)
    }
}
