use core::fmt;

use super::{ArrayConstRef, ArrayRef, ObjectConstRef, ObjectRef};
use crate::converter::Converter;
use crate::error::AllocResult;
use crate::memory::{MemoryPool, NodeHandle, SlotId};
use crate::strings::{JsonString, StringHandle};
use crate::variant::number::Number;
use crate::variant::{VariantData, VariantKind, variants_equal};
use crate::visitor::{Visitor, accept};

/// Read-only view of one node
///
/// Views are cheap to copy and many may coexist. A view that addresses
/// nothing (a missing member, an out of range element) is *unbound* and reads
/// as null.
#[derive(Clone, Copy)]
pub struct VariantConstRef<'a, 's> {
    pub(crate) pool: &'a MemoryPool<'s>,
    pub(crate) slot: Option<SlotId>,
}

impl<'a, 's> VariantConstRef<'a, 's> {
    pub(crate) fn new(pool: &'a MemoryPool<'s>, slot: Option<SlotId>) -> Self {
        Self { pool, slot }
    }

    fn data(&self) -> VariantData<'s> {
        self.slot
            .map_or(VariantData::Null, |slot| self.pool.resolved_data(slot))
    }

    pub(crate) fn resolved(&self) -> Option<SlotId> {
        self.slot.and_then(|slot| self.pool.resolve(slot))
    }

    /// Whether the view addresses no node at all
    pub fn is_unbound(&self) -> bool {
        self.slot.is_none()
    }

    /// Kind of the resolved node
    pub fn kind(&self) -> VariantKind {
        self.data().kind()
    }

    /// Whether the node is null, unbound or a dangling alias
    pub fn is_null(&self) -> bool {
        self.kind() == VariantKind::Null
    }

    /// Whether the node holds a value compatible with `T`
    pub fn is<T: Converter>(&self) -> bool {
        T::check_json(*self)
    }

    /// Read the node as `T`, or `T`'s fallback when the shape does not match
    pub fn as_value<T: Converter>(&self) -> T {
        T::from_json(*self)
    }

    /// String content, if the node holds a string
    pub fn as_str(&self) -> Option<&'a str> {
        let handle = self.data().string_handle()?;
        Some(self.pool.resolve_str(&handle))
    }

    /// Whether the node holds a string stored by address
    pub fn is_linked_string(&self) -> bool {
        matches!(
            self.data().string_handle(),
            Some(StringHandle::Linked(_))
        )
    }

    /// Stored number, without parsing strings
    pub(crate) fn stored_number(&self) -> Option<Number> {
        Number::from_data(&self.data())
    }

    /// Stored number, or the number a string node spells
    pub(crate) fn number(&self) -> Option<Number> {
        self.stored_number()
            .or_else(|| self.as_str().and_then(Number::parse))
    }

    pub(crate) fn bool_value(&self) -> Option<bool> {
        match self.data() {
            VariantData::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Array view, if the node is an array
    pub fn as_array(&self) -> Option<ArrayConstRef<'a, 's>> {
        let (slot, _) = self
            .pool
            .resolved_collection(self.slot?, VariantKind::Array)?;
        Some(ArrayConstRef::new(self.pool, slot))
    }

    /// Object view, if the node is an object
    pub fn as_object(&self) -> Option<ObjectConstRef<'a, 's>> {
        let (slot, _) = self
            .pool
            .resolved_collection(self.slot?, VariantKind::Object)?;
        Some(ObjectConstRef::new(self.pool, slot))
    }

    /// Member under `key`; unbound when absent or when this is not an object
    pub fn member(&self, key: &str) -> VariantConstRef<'a, 's> {
        let slot = self.slot.and_then(|slot| self.pool.member(slot, key));
        VariantConstRef::new(self.pool, slot)
    }

    /// Element at `index`; unbound when absent or when this is not an array
    pub fn element(&self, index: usize) -> VariantConstRef<'a, 's> {
        let slot = self.slot.and_then(|slot| self.pool.element(slot, index));
        VariantConstRef::new(self.pool, slot)
    }

    /// Whether this is an object with a member under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        !self.member(key).is_unbound()
    }

    /// Number of elements or members, zero for scalars
    pub fn size(&self) -> usize {
        self.slot.map_or(0, |slot| self.pool.child_count(slot))
    }

    /// Depth of container nesting below this node
    pub fn nesting(&self) -> usize {
        self.slot.map_or(0, |slot| self.pool.nesting(slot))
    }

    /// Detached address of this node for later [`VariantRef::link`] or
    /// [`JsonDocument::node`](crate::JsonDocument::node)
    pub fn handle(&self) -> Option<NodeHandle> {
        self.slot.map(|slot| self.pool.handle(slot))
    }

    /// Walk the resolved tree depth first
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        accept(*self, visitor)
    }
}

impl<'b, 't> PartialEq<VariantConstRef<'b, 't>> for VariantConstRef<'_, '_> {
    fn eq(&self, other: &VariantConstRef<'b, 't>) -> bool {
        variants_equal(self.pool, self.slot, other.pool, other.slot)
    }
}

impl fmt::Debug for VariantConstRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("VariantConstRef");
        out.field("kind", &self.kind());
        match self.data() {
            VariantData::Bool(value) => out.field("value", &value),
            VariantData::Signed(value) => out.field("value", &value),
            VariantData::Unsigned(value) => out.field("value", &value),
            VariantData::Float(value) => out.field("value", &value),
            VariantData::String(_) => out.field("value", &self.as_str()),
            VariantData::Array(_) | VariantData::Object(_) => out.field("size", &self.size()),
            VariantData::Null | VariantData::Alias(_) => &mut out,
        };
        out.finish()
    }
}

/// Mutable view of one node
///
/// Holds the document's pool exclusively, so at most one write view is alive
/// at a time. Value writes go through aliases to the node they resolve to;
/// [`link`](Self::link), [`to_array`](Self::to_array),
/// [`to_object`](Self::to_object) and [`to_null`](Self::to_null) act on this
/// node itself and replace any alias it holds.
pub struct VariantRef<'a, 's> {
    pub(crate) pool: &'a mut MemoryPool<'s>,
    pub(crate) slot: SlotId,
}

impl<'a, 's> VariantRef<'a, 's> {
    pub(crate) fn new(pool: &'a mut MemoryPool<'s>, slot: SlotId) -> Self {
        Self { pool, slot }
    }

    /// Read-only view of the same node
    pub fn as_const(&self) -> VariantConstRef<'_, 's> {
        VariantConstRef::new(&*self.pool, Some(self.slot))
    }

    /// Give up write access, keeping the borrow
    pub fn into_const(self) -> VariantConstRef<'a, 's> {
        VariantConstRef::new(self.pool, Some(self.slot))
    }

    /// Shorter-lived write view of the same node
    pub fn reborrow(&mut self) -> VariantRef<'_, 's> {
        VariantRef::new(self.pool, self.slot)
    }

    /// Detached address of this node
    pub fn handle(&self) -> NodeHandle {
        self.pool.handle(self.slot)
    }

    /// Kind of the resolved node
    pub fn kind(&self) -> VariantKind {
        self.as_const().kind()
    }

    /// Whether the resolved node is null
    pub fn is_null(&self) -> bool {
        self.as_const().is_null()
    }

    /// Whether the node holds a value compatible with `T`
    pub fn is<T: Converter>(&self) -> bool {
        self.as_const().is::<T>()
    }

    /// Read the node as `T`
    pub fn as_value<T: Converter>(&self) -> T {
        self.as_const().as_value()
    }

    /// String content, if the node holds a string
    pub fn as_str(&self) -> Option<&str> {
        self.as_const().as_str()
    }

    /// Number of elements or members
    pub fn size(&self) -> usize {
        self.pool.child_count(self.slot)
    }

    /// Depth of container nesting below this node
    pub fn nesting(&self) -> usize {
        self.pool.nesting(self.slot)
    }

    /// Member under `key`, read-only
    pub fn member(&self, key: &str) -> VariantConstRef<'_, 's> {
        self.as_const().member(key)
    }

    /// Element at `index`, read-only
    pub fn element(&self, index: usize) -> VariantConstRef<'_, 's> {
        self.as_const().element(index)
    }

    /// Store `value`; `false` when the pool ran out of room
    ///
    /// A failed store leaves the previous value in place.
    pub fn set<T: Converter>(&mut self, value: T) -> bool {
        value.to_json(self).is_ok()
    }

    /// Store `value`, reporting the overflow
    pub fn try_set<T: Converter>(&mut self, value: &T) -> AllocResult<()> {
        value.to_json(self)
    }

    pub(crate) fn store(&mut self, data: VariantData<'s>) {
        self.pool.store(self.slot, data);
    }

    /// Store null
    pub fn set_null(&mut self) {
        self.store(VariantData::Null);
    }

    /// Store a boolean
    pub fn set_bool(&mut self, value: bool) {
        self.store(VariantData::Bool(value));
    }

    /// Store a signed integer
    pub fn set_signed(&mut self, value: i64) {
        self.store(VariantData::Signed(value));
    }

    /// Store an unsigned integer
    pub fn set_unsigned(&mut self, value: u64) {
        self.store(VariantData::Unsigned(value));
    }

    /// Store a floating point number
    pub fn set_float(&mut self, value: f64) {
        self.store(VariantData::Float(value));
    }

    /// Store a string under the policy its type selects
    pub fn set_string<S: JsonString<'s>>(&mut self, value: S) -> bool {
        self.try_set_string(value).is_ok()
    }

    /// Store a string, reporting the overflow
    pub fn try_set_string<S: JsonString<'s>>(&mut self, value: S) -> AllocResult<()> {
        let handle = self.pool.allocate_string(value.adapt())?;
        self.store(VariantData::String(handle));
        Ok(())
    }

    /// Turn this node into an alias of `target`
    ///
    /// Refused for stale handles and for targets that would make the alias
    /// reach itself.
    pub fn link(&mut self, target: NodeHandle) -> bool {
        match self.pool.lookup(target) {
            Some(target) => self.pool.link(self.slot, target),
            None => false,
        }
    }

    /// Replace this node, alias included, with null
    pub fn to_null(&mut self) {
        self.pool.set_data(self.slot, VariantData::Null);
    }

    /// Replace this node, alias included, with an empty array
    pub fn to_array(&mut self) -> ArrayRef<'_, 's> {
        self.pool.reset_container(self.slot, VariantKind::Array);
        ArrayRef::new(self.pool, self.slot)
    }

    /// Replace this node, alias included, with an empty object
    pub fn to_object(&mut self) -> ObjectRef<'_, 's> {
        self.pool.reset_container(self.slot, VariantKind::Object);
        ObjectRef::new(self.pool, self.slot)
    }

    /// Write view of the array this node resolves to
    pub fn as_array_mut(&mut self) -> Option<ArrayRef<'_, 's>> {
        let (slot, _) = self.pool.resolved_collection(self.slot, VariantKind::Array)?;
        Some(ArrayRef::new(self.pool, slot))
    }

    /// Write view of the object this node resolves to
    pub fn as_object_mut(&mut self) -> Option<ObjectRef<'_, 's>> {
        let (slot, _) = self.pool.resolved_collection(self.slot, VariantKind::Object)?;
        Some(ObjectRef::new(self.pool, slot))
    }

    /// Append a null element, turning a null node into an array
    pub fn add_element(&mut self) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.add_element(self.slot)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Append `value`, turning a null node into an array
    ///
    /// When `value` does not fit the node keeps its previous value, null
    /// included.
    pub fn add<T: Converter>(&mut self, value: T) -> bool {
        let target = self.pool.write_target(self.slot);
        let previous = self.pool.data(target);
        let Some(child) = self.pool.add_element(self.slot) else {
            return false;
        };
        if value.to_json(&mut VariantRef::new(self.pool, child)).is_ok() {
            return true;
        }
        match previous {
            VariantData::Array(_) => {
                self.pool.unlink(target, child);
            }
            _ => self.pool.set_data(target, previous),
        }
        false
    }

    /// Element at `index`, padding with nulls as needed
    pub fn get_or_add_element(&mut self, index: usize) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.get_or_add_element(self.slot, index)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Existing element at `index`
    pub fn element_mut(&mut self, index: usize) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.element(self.slot, index)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Existing member under `key`
    pub fn member_mut(&mut self, key: &str) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.member(self.slot, key)?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Member under `key`, created as null when absent
    pub fn get_or_add_member<K: JsonString<'s>>(
        &mut self,
        key: K,
    ) -> Option<VariantRef<'_, 's>> {
        let child = self.pool.get_or_add_member(self.slot, key.adapt())?;
        Some(VariantRef::new(self.pool, child))
    }

    /// Unlink the element at `index`
    pub fn remove_index(&mut self, index: usize) -> bool {
        self.pool.remove_element(self.slot, index)
    }

    /// Unlink the member under `key`
    pub fn remove_key(&mut self, key: &str) -> bool {
        self.pool.remove_member(self.slot, key)
    }

    /// Set the resolved node to null
    pub fn clear(&mut self) {
        self.set_null();
    }

    /// Replace the value with a deep copy of `source`, usually from another
    /// document
    pub fn copy_from(&mut self, source: VariantConstRef<'_, '_>) -> bool {
        self.pool
            .copy_from_pool(self.slot, source.pool, source.slot)
            .is_ok()
    }
}

impl<'b, 't> PartialEq<VariantConstRef<'b, 't>> for VariantRef<'_, '_> {
    fn eq(&self, other: &VariantConstRef<'b, 't>) -> bool {
        self.as_const() == *other
    }
}

impl fmt::Debug for VariantRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_const().fmt(f)
    }
}
