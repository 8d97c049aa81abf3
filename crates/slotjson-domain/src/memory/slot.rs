//! Slot addressing and the capacity formula

use crate::strings::StringHandle;
use crate::variant::VariantData;

/// Index of a node record inside a pool
///
/// Slot `0` is the document root and is never handed out by
/// [`MemoryPool::allocate_node`](super::MemoryPool::allocate_node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

impl SlotId {
    /// The document root
    pub const ROOT: SlotId = SlotId(0);

    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(SlotId)
    }

    /// Position in the pool's slot table
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the root slot
    pub fn is_root(self) -> bool {
        self.0 == 0
    }
}

/// A node address that survives across borrows of the document
///
/// Handles remember the pool generation they were taken under. Once the
/// document is cleared the generation moves on and every older handle is
/// rejected instead of silently addressing a recycled slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    slot: SlotId,
    generation: u32,
}

impl NodeHandle {
    pub(crate) fn new(slot: SlotId, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Addressed slot
    pub fn slot(self) -> SlotId {
        self.slot
    }

    /// Pool generation at the time the handle was taken
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// One node record: value, sibling link and optional member key
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VariantSlot<'s> {
    pub(crate) data: VariantData<'s>,
    pub(crate) next: Option<SlotId>,
    pub(crate) key: Option<StringHandle<'s>>,
}

impl VariantSlot<'_> {
    pub(crate) const EMPTY: VariantSlot<'static> = VariantSlot {
        data: VariantData::Null,
        next: None,
        key: None,
    };
}

/// Bytes charged against a pool's capacity for every node
pub const SLOT_SIZE: usize = core::mem::size_of::<VariantSlot<'static>>();

/// Capacity needed by an array of `len` elements, saturating at `usize::MAX`
pub const fn json_array_size(len: usize) -> usize {
    len.saturating_mul(SLOT_SIZE)
}

/// Capacity needed by an object of `len` members, keys excluded
pub const fn json_object_size(len: usize) -> usize {
    len.saturating_mul(SLOT_SIZE)
}

/// Capacity needed to copy a string of `len` bytes
pub const fn json_string_size(len: usize) -> usize {
    len
}
