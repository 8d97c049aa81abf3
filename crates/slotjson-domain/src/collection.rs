//! Linked sequences of nodes
//!
//! Arrays and objects share one representation: a chain of slots joined by
//! their `next` links, with a cached tail so appends stay O(1). Size and
//! positional lookups walk the chain.

use crate::memory::{MemoryPool, SlotId};
use crate::strings::StringHandle;

/// Head and tail of a chain of member slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionData {
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl CollectionData {
    /// First member, if any
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    /// Whether the chain has no members
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Walks a chain of slots in insertion order
#[derive(Debug, Clone)]
pub(crate) struct Children<'a, 's> {
    pool: &'a MemoryPool<'s>,
    cursor: Option<SlotId>,
}

impl Iterator for Children<'_, '_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let current = self.cursor?;
        self.cursor = self.pool.next_sibling(current);
        Some(current)
    }
}

impl<'s> MemoryPool<'s> {
    /// Collection stored at `container`, without alias resolution
    pub(crate) fn collection(&self, container: SlotId) -> Option<CollectionData> {
        self.data(container).collection()
    }

    fn store_collection(&mut self, container: SlotId, coll: CollectionData) {
        if let Some(slot) = self.slot_mut(container) {
            slot.data = slot.data.with_collection(coll);
        }
    }

    pub(crate) fn children(&self, coll: CollectionData) -> Children<'_, 's> {
        Children {
            pool: self,
            cursor: coll.head,
        }
    }

    /// Slot following `slot` in its collection
    pub(crate) fn next_sibling(&self, slot: SlotId) -> Option<SlotId> {
        self.slot(slot).and_then(|slot| slot.next)
    }

    /// Link the detached slot `child` after the tail of `coll`
    pub(crate) fn chain(&mut self, coll: &mut CollectionData, child: SlotId) {
        if let Some(slot) = self.slot_mut(child) {
            slot.next = None;
        }
        match coll.tail {
            Some(tail) => {
                if let Some(slot) = self.slot_mut(tail) {
                    slot.next = Some(child);
                }
            }
            None => coll.head = Some(child),
        }
        coll.tail = Some(child);
    }

    /// Append the detached slot `child` to the collection at `container`
    pub(crate) fn append(&mut self, container: SlotId, child: SlotId) {
        let Some(mut coll) = self.collection(container) else {
            return;
        };
        self.chain(&mut coll, child);
        self.store_collection(container, coll);
    }

    pub(crate) fn collection_len(&self, coll: CollectionData) -> usize {
        self.children(coll).count()
    }

    pub(crate) fn child_at(&self, coll: CollectionData, index: usize) -> Option<SlotId> {
        self.children(coll).nth(index)
    }

    pub(crate) fn key_of(&self, slot: SlotId) -> Option<&str> {
        let key: StringHandle<'s> = self.slot(slot)?.key?;
        Some(self.resolve_str(&key))
    }

    /// First member of `coll` whose key equals `key`
    pub(crate) fn find_member(&self, coll: CollectionData, key: &str) -> Option<SlotId> {
        self.children(coll)
            .find(|&member| self.key_of(member) == Some(key))
    }

    /// Splice `target` out of the collection at `container`
    ///
    /// The slot itself stays allocated until the pool is cleared.
    pub(crate) fn unlink(&mut self, container: SlotId, target: SlotId) -> bool {
        let Some(mut coll) = self.collection(container) else {
            return false;
        };
        let mut previous = None;
        let mut cursor = coll.head;
        while let Some(current) = cursor {
            let next = self.slot(current).and_then(|slot| slot.next);
            if current == target {
                match previous {
                    Some(previous) => {
                        if let Some(slot) = self.slot_mut(previous) {
                            slot.next = next;
                        }
                    }
                    None => coll.head = next,
                }
                if coll.tail == Some(target) {
                    coll.tail = previous;
                }
                self.store_collection(container, coll);
                return true;
            }
            previous = Some(current);
            cursor = next;
        }
        false
    }

    /// Detach every member of the collection at `container`
    pub(crate) fn clear_collection(&mut self, container: SlotId) {
        if self.collection(container).is_some() {
            self.store_collection(container, CollectionData::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::SLOT_SIZE;
    use crate::variant::VariantData;

    fn array_pool() -> MemoryPool<'static> {
        let mut pool = MemoryPool::fixed(16 * SLOT_SIZE);
        pool.set_data(SlotId::ROOT, VariantData::Array(CollectionData::default()));
        pool
    }

    fn append_n(pool: &mut MemoryPool<'_>, count: usize) -> alloc::vec::Vec<SlotId> {
        (0..count)
            .map(|_| {
                let child = pool.allocate_node().unwrap();
                pool.append(SlotId::ROOT, child);
                child
            })
            .collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut pool = array_pool();
        let ids = append_n(&mut pool, 3);
        let coll = pool.collection(SlotId::ROOT).unwrap();
        assert!(pool.children(coll).eq(ids.iter().copied()));
        assert_eq!(pool.collection_len(coll), 3);
        assert_eq!(pool.child_at(coll, 1), Some(ids[1]));
        assert_eq!(pool.child_at(coll, 3), None);
    }

    #[test]
    fn test_unlink_head_middle_and_tail() {
        let mut pool = array_pool();
        let ids = append_n(&mut pool, 4);

        assert!(pool.unlink(SlotId::ROOT, ids[0]));
        assert!(pool.unlink(SlotId::ROOT, ids[2]));
        assert!(pool.unlink(SlotId::ROOT, ids[3]));
        assert!(!pool.unlink(SlotId::ROOT, ids[3]));

        let coll = pool.collection(SlotId::ROOT).unwrap();
        assert!(pool.children(coll).eq([ids[1]]));

        // the tail moved back, so appends land after the survivor
        let fresh = pool.allocate_node().unwrap();
        pool.append(SlotId::ROOT, fresh);
        let coll = pool.collection(SlotId::ROOT).unwrap();
        assert!(pool.children(coll).eq([ids[1], fresh]));
    }

    #[test]
    fn test_clear_collection_keeps_pool_usage() {
        let mut pool = array_pool();
        append_n(&mut pool, 2);
        let used = pool.size();
        pool.clear_collection(SlotId::ROOT);
        assert!(pool.collection(SlotId::ROOT).unwrap().is_empty());
        assert_eq!(pool.size(), used);
    }
}
