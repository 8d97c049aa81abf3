//! Deep copies between pools and within one pool
//!
//! A copy is built as a detached subtree and attached to the destination only
//! once every node and string has been allocated. When the pool runs out of
//! room midway the destination keeps its previous value; the slots already
//! taken are simply never linked. Pending nodes wait on a work stack, not the
//! call stack.

use smallvec::SmallVec;

use super::VariantData;
use crate::collection::CollectionData;
use crate::error::AllocResult;
use crate::memory::{MemoryPool, SlotId};
use crate::strings::{AdaptedString, StringHandle};

/// Source nodes still to copy, each paired with its detached destination slot
type PairStack = SmallVec<[(SlotId, SlotId); 16]>;

impl<'s> MemoryPool<'s> {
    /// Replace the value at `dst` with a deep copy of `src` from another pool
    ///
    /// Strings and keys are always copied since `source` may not outlive this
    /// pool. An unbound `src` copies as null.
    pub(crate) fn copy_from_pool(
        &mut self,
        dst: SlotId,
        source: &MemoryPool<'_>,
        src: Option<SlotId>,
    ) -> AllocResult<()> {
        let data = match src {
            Some(src) => self.import(source, src)?,
            None => VariantData::Null,
        };
        self.store(dst, data);
        Ok(())
    }

    fn import_str<'t>(
        &mut self,
        source: &MemoryPool<'t>,
        handle: &StringHandle<'t>,
    ) -> AllocResult<StringHandle<'s>> {
        self.allocate_string(AdaptedString::Copied(source.resolve_str(handle)))
    }

    fn import(&mut self, source: &MemoryPool<'_>, src: SlotId) -> AllocResult<VariantData<'s>> {
        let mut pending = PairStack::new();
        let root = self.import_node(source, src, &mut pending)?;
        while let Some((from, to)) = pending.pop() {
            let data = self.import_node(source, from, &mut pending)?;
            self.set_data(to, data);
        }
        Ok(root)
    }

    /// Copy one node; children get empty detached slots queued in `pending`
    fn import_node(
        &mut self,
        source: &MemoryPool<'_>,
        src: SlotId,
        pending: &mut PairStack,
    ) -> AllocResult<VariantData<'s>> {
        Ok(match source.resolved_data(src) {
            VariantData::Null | VariantData::Alias(_) => VariantData::Null,
            VariantData::Bool(value) => VariantData::Bool(value),
            VariantData::Signed(value) => VariantData::Signed(value),
            VariantData::Unsigned(value) => VariantData::Unsigned(value),
            VariantData::Float(value) => VariantData::Float(value),
            VariantData::String(handle) => VariantData::String(self.import_str(source, &handle)?),
            VariantData::Array(coll) => {
                VariantData::Array(self.import_children(source, coll, pending)?)
            }
            VariantData::Object(coll) => {
                VariantData::Object(self.import_children(source, coll, pending)?)
            }
        })
    }

    fn import_children(
        &mut self,
        source: &MemoryPool<'_>,
        coll: CollectionData,
        pending: &mut PairStack,
    ) -> AllocResult<CollectionData> {
        let mut copied = CollectionData::default();
        for child in source.children(coll) {
            let key = match source.slot(child).and_then(|slot| slot.key) {
                Some(key) => Some(self.import_str(source, &key)?),
                None => None,
            };
            let id = self.allocate_node()?;
            if let Some(slot) = self.slot_mut(id) {
                slot.key = key;
            }
            self.chain(&mut copied, id);
            pending.push((child, id));
        }
        Ok(copied)
    }

    /// Replace the value at `dst` with a deep copy of `src` from this pool
    ///
    /// String payloads and keys are shared with the source; only nodes are
    /// allocated. `dst` may lie inside `src`.
    pub(crate) fn copy_within(&mut self, dst: SlotId, src: SlotId) -> AllocResult<()> {
        let mut pending = PairStack::new();
        let data = self.duplicate_node(src, &mut pending)?;
        while let Some((from, to)) = pending.pop() {
            let value = self.duplicate_node(from, &mut pending)?;
            self.set_data(to, value);
        }
        self.store(dst, data);
        Ok(())
    }

    fn duplicate_node(
        &mut self,
        src: SlotId,
        pending: &mut PairStack,
    ) -> AllocResult<VariantData<'s>> {
        let data = self.resolved_data(src);
        let Some(coll) = data.collection() else {
            return Ok(match data {
                VariantData::Alias(_) => VariantData::Null,
                scalar => scalar,
            });
        };
        let children: SmallVec<[SlotId; 8]> = self.children(coll).collect();
        let mut copied = CollectionData::default();
        for child in children {
            let key = self.slot(child).and_then(|slot| slot.key);
            let id = self.allocate_node()?;
            if let Some(slot) = self.slot_mut(id) {
                slot.key = key;
            }
            self.chain(&mut copied, id);
            pending.push((child, id));
        }
        Ok(data.with_collection(copied))
    }
}
