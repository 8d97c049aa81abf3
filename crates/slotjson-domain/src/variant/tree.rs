//! Tree operations on the pool: alias resolution, materialization and
//! collection mutation addressed by slot

use alloc::{vec, vec::Vec};
use smallvec::SmallVec;

use super::{VariantData, VariantKind};
use crate::collection::CollectionData;
use crate::memory::{MemoryPool, SlotId};
use crate::strings::AdaptedString;

/// Longest alias chain followed before a node reads as null
pub const ALIAS_CHAIN_LIMIT: usize = 32;

type SlotStack = SmallVec<[(SlotId, usize); 16]>;

/// What a write finds at a node it wants to use as a container
enum Shape {
    Existing(SlotId, CollectionData),
    Vacant,
    Mismatch,
}

impl<'s> MemoryPool<'s> {
    /// Follow aliases from `slot` to the first concrete node
    ///
    /// Returns `None` for a dangling alias or a chain longer than
    /// [`ALIAS_CHAIN_LIMIT`].
    pub(crate) fn resolve(&self, slot: SlotId) -> Option<SlotId> {
        let mut current = slot;
        for _ in 0..=ALIAS_CHAIN_LIMIT {
            match self.slot(current)?.data {
                VariantData::Alias(target) => current = target,
                _ => return Some(current),
            }
        }
        None
    }

    pub(crate) fn resolved_data(&self, slot: SlotId) -> VariantData<'s> {
        self.resolve(slot)
            .map_or(VariantData::Null, |target| self.data(target))
    }

    /// Node a value write through `slot` lands on
    pub(crate) fn write_target(&self, slot: SlotId) -> SlotId {
        self.resolve(slot).unwrap_or(slot)
    }

    /// Replace the payload at `slot`, keeping its key and sibling link
    pub(crate) fn set_data(&mut self, slot: SlotId, data: VariantData<'s>) {
        if let Some(slot) = self.slot_mut(slot) {
            slot.data = data;
        }
    }

    /// Write a scalar through any aliases at `slot`
    pub(crate) fn store(&mut self, slot: SlotId, data: VariantData<'s>) {
        let target = self.write_target(slot);
        self.set_data(target, data);
    }

    fn shape(&self, slot: SlotId, kind: VariantKind) -> Shape {
        let resolved = self.resolve(slot);
        let data = resolved.map_or(VariantData::Null, |target| self.data(target));
        match (resolved, data.collection()) {
            (Some(target), Some(coll)) if data.kind() == kind => Shape::Existing(target, coll),
            _ if matches!(data, VariantData::Null) => Shape::Vacant,
            _ => Shape::Mismatch,
        }
    }

    /// Container of `kind` at `slot`, creating an empty one over null
    ///
    /// The container lands on the node `slot` resolves to, so an alias of a
    /// null node fills its target. A dangling alias is replaced itself. Any
    /// other kind is left untouched and yields `None`.
    pub(crate) fn materialize(&mut self, slot: SlotId, kind: VariantKind) -> Option<SlotId> {
        match self.shape(slot, kind) {
            Shape::Existing(target, _) => Some(target),
            Shape::Vacant => {
                let target = self.write_target(slot);
                self.set_data(target, VariantData::empty_container(kind)?);
                Some(target)
            }
            Shape::Mismatch => None,
        }
    }

    /// Convert `slot` itself into an empty container, discarding its value
    pub(crate) fn reset_container(&mut self, slot: SlotId, kind: VariantKind) -> bool {
        match VariantData::empty_container(kind) {
            Some(data) if self.contains(slot) => {
                self.set_data(slot, data);
                true
            }
            _ => false,
        }
    }

    /// Collection of `kind` reachable from `slot` for reading
    pub(crate) fn resolved_collection(
        &self,
        slot: SlotId,
        kind: VariantKind,
    ) -> Option<(SlotId, CollectionData)> {
        match self.shape(slot, kind) {
            Shape::Existing(target, coll) => Some((target, coll)),
            _ => None,
        }
    }

    pub(crate) fn add_element(&mut self, slot: SlotId) -> Option<SlotId> {
        if let Shape::Mismatch = self.shape(slot, VariantKind::Array) {
            return None;
        }
        self.reserve(1, 0).ok()?;
        let container = self.materialize(slot, VariantKind::Array)?;
        let child = self.allocate_node().ok()?;
        self.append(container, child);
        Some(child)
    }

    pub(crate) fn element(&self, slot: SlotId, index: usize) -> Option<SlotId> {
        let (_, coll) = self.resolved_collection(slot, VariantKind::Array)?;
        self.child_at(coll, index)
    }

    /// Element at `index`, padding the array with nulls up to it
    ///
    /// Either every missing element is created or none is.
    pub(crate) fn get_or_add_element(&mut self, slot: SlotId, index: usize) -> Option<SlotId> {
        let len = match self.shape(slot, VariantKind::Array) {
            Shape::Existing(_, coll) => {
                if let Some(found) = self.child_at(coll, index) {
                    return Some(found);
                }
                self.collection_len(coll)
            }
            Shape::Vacant => 0,
            Shape::Mismatch => return None,
        };
        let missing = index.checked_sub(len)?.checked_add(1)?;
        self.reserve(missing, 0).ok()?;
        let container = self.materialize(slot, VariantKind::Array)?;
        let mut last = None;
        for _ in 0..missing {
            let child = self.allocate_node().ok()?;
            self.append(container, child);
            last = Some(child);
        }
        last
    }

    pub(crate) fn member(&self, slot: SlotId, key: &str) -> Option<SlotId> {
        let (_, coll) = self.resolved_collection(slot, VariantKind::Object)?;
        self.find_member(coll, key)
    }

    /// Member under `key`, appending a null member when absent
    ///
    /// An existing member keeps its position.
    pub(crate) fn get_or_add_member(
        &mut self,
        slot: SlotId,
        key: AdaptedString<'_, 's>,
    ) -> Option<SlotId> {
        match self.shape(slot, VariantKind::Object) {
            Shape::Existing(_, coll) => {
                if let Some(found) = self.find_member(coll, key.as_str()) {
                    return Some(found);
                }
            }
            Shape::Vacant => {}
            Shape::Mismatch => return None,
        }
        let key_cost = self.string_cost(&key);
        self.reserve(1, key_cost).ok()?;
        let container = self.materialize(slot, VariantKind::Object)?;
        let key = self.allocate_string(key).ok()?;
        let child = self.allocate_node().ok()?;
        if let Some(child_slot) = self.slot_mut(child) {
            child_slot.key = Some(key);
        }
        self.append(container, child);
        Some(child)
    }

    pub(crate) fn remove_element(&mut self, slot: SlotId, index: usize) -> bool {
        let Some((container, coll)) = self.resolved_collection(slot, VariantKind::Array) else {
            return false;
        };
        match self.child_at(coll, index) {
            Some(child) => self.unlink(container, child),
            None => false,
        }
    }

    pub(crate) fn remove_member(&mut self, slot: SlotId, key: &str) -> bool {
        let Some((container, coll)) = self.resolved_collection(slot, VariantKind::Object) else {
            return false;
        };
        match self.find_member(coll, key) {
            Some(child) => self.unlink(container, child),
            None => false,
        }
    }

    /// Detach every child of the container at `slot`
    pub(crate) fn clear_children(&mut self, slot: SlotId) {
        if let Some(target) = self.resolve(slot) {
            self.clear_collection(target);
        }
    }

    /// Number of children of the container at `slot`, zero for scalars
    pub(crate) fn child_count(&self, slot: SlotId) -> usize {
        self.resolved_data(slot)
            .collection()
            .map_or(0, |coll| self.collection_len(coll))
    }

    /// Deepest chain of container nesting below `slot`
    ///
    /// Scalars are 0, an empty container is 1.
    pub(crate) fn nesting(&self, slot: SlotId) -> usize {
        let mut deepest = 0;
        let mut stack = SlotStack::new();
        stack.push((slot, 0));
        while let Some((current, depth)) = stack.pop() {
            let Some(coll) = self.resolved_data(current).collection() else {
                continue;
            };
            let depth = depth + 1;
            deepest = deepest.max(depth);
            stack.extend(self.children(coll).map(|child| (child, depth)));
        }
        deepest
    }

    /// Whether `needle` is reachable from `from` through children or aliases
    pub(crate) fn reaches(&self, from: SlotId, needle: SlotId) -> bool {
        let mut visited = vec![false; self.node_count() + 1];
        let mut stack: Vec<SlotId> = vec![from];
        while let Some(current) = stack.pop() {
            if current == needle {
                return true;
            }
            match visited.get_mut(current.index()) {
                Some(seen) if !*seen => *seen = true,
                _ => continue,
            }
            match self.data(current) {
                VariantData::Alias(target) => stack.push(target),
                VariantData::Array(coll) | VariantData::Object(coll) => {
                    stack.extend(self.children(coll));
                }
                _ => {}
            }
        }
        false
    }

    /// Make `slot` an alias of `target`
    ///
    /// Refused when `target` does not exist or when the alias would close a
    /// cycle, i.e. `slot` is reachable from `target`.
    pub(crate) fn link(&mut self, slot: SlotId, target: SlotId) -> bool {
        if !self.contains(slot) || !self.contains(target) || self.reaches(target, slot) {
            return false;
        }
        self.set_data(slot, VariantData::Alias(target));
        true
    }
}
