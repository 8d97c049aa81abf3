//! The arena backing one document
//!
//! Nodes live in a slot table and copied string payloads in a separate byte
//! region, so the two allocation streams never fragment each other. Both draw
//! from a single byte budget (`capacity`): nodes advance [`slot_offset`] from
//! the front, strings lower [`string_offset`] from the back, and a request that
//! would make the two cross fails and raises the sticky overflow flag.
//!
//! Nothing is freed piecemeal. [`MemoryPool::clear`] is the only reclamation
//! and it runs in constant time.
//!
//! [`slot_offset`]: MemoryPool::slot_offset
//! [`string_offset`]: MemoryPool::string_offset

use alloc::{string::String, vec::Vec};

use super::slot::{NodeHandle, SLOT_SIZE, SlotId, VariantSlot};
use crate::error::{AllocResult, OverflowError};
use crate::strings::{AdaptedString, StrSpan, StringHandle};
use crate::variant::VariantData;

/// Smallest budget a growable pool grows to
const MIN_GROWTH: usize = 256;

/// How a pool obtains its byte budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolMode {
    /// No budget; every allocation overflows
    Unbacked,
    /// Budget fixed at construction
    Fixed,
    /// Budget doubles on demand up to an optional ceiling
    Growable {
        /// Largest budget the pool may reach
        limit: Option<usize>,
    },
}

/// Arena of node slots and string bytes
#[derive(Debug, Clone)]
pub struct MemoryPool<'s> {
    slots: Vec<VariantSlot<'s>>,
    strings: String,
    capacity: usize,
    mode: PoolMode,
    overflowed: bool,
    generation: u32,
    deduplicate: bool,
}

impl<'s> MemoryPool<'s> {
    fn with_mode(capacity: usize, mode: PoolMode) -> Self {
        let mut slots = Vec::new();
        slots.push(VariantSlot::EMPTY);
        Self {
            slots,
            strings: String::new(),
            capacity,
            mode,
            overflowed: false,
            generation: 0,
            deduplicate: true,
        }
    }

    /// A pool that cannot allocate anything
    pub fn unbacked() -> Self {
        Self::with_mode(0, PoolMode::Unbacked)
    }

    /// A pool with a fixed budget of `capacity` bytes
    ///
    /// The slot table is reserved up front. If the host refuses that
    /// reservation the pool degrades to a zero budget rather than aborting.
    pub fn fixed(capacity: usize) -> Self {
        let mut pool = Self::with_mode(capacity, PoolMode::Fixed);
        if pool.slots.try_reserve_exact(capacity / SLOT_SIZE).is_err() {
            pool.capacity = 0;
        }
        pool
    }

    /// A pool starting at `initial` bytes that grows up to `limit`
    pub fn growable(initial: usize, limit: Option<usize>) -> Self {
        let initial = limit.map_or(initial, |limit| initial.min(limit));
        Self::with_mode(initial, PoolMode::Growable { limit })
    }

    /// Toggle reuse of identical copied strings
    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate = enabled;
        self
    }

    /// Construction mode
    pub fn mode(&self) -> PoolMode {
        self.mode
    }

    /// Current byte budget
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes in use by nodes and copied strings
    ///
    /// The root node is not charged.
    pub fn size(&self) -> usize {
        self.slot_offset() + self.strings.len()
    }

    /// Bytes still free
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.size())
    }

    /// Whether an allocation has failed since the last [`clear`](Self::clear)
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Incremented by every [`clear`](Self::clear)
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether identical copied strings share storage
    pub fn deduplicates(&self) -> bool {
        self.deduplicate
    }

    /// High-water mark of the node end
    pub fn slot_offset(&self) -> usize {
        (self.slots.len() - 1) * SLOT_SIZE
    }

    /// Low-water mark of the string end
    pub fn string_offset(&self) -> usize {
        self.capacity.saturating_sub(self.strings.len())
    }

    /// Number of nodes allocated, root excluded
    pub fn node_count(&self) -> usize {
        self.slots.len() - 1
    }

    /// Release every node and string and reset the overflow flag
    ///
    /// All previously taken [`NodeHandle`]s become stale.
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        self.slots[0] = VariantSlot::EMPTY;
        self.strings.clear();
        self.overflowed = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Lower a growable budget to current usage and return spare host memory
    pub fn shrink_to_fit(&mut self) {
        if let PoolMode::Growable { .. } = self.mode {
            self.capacity = self.size();
            self.slots.shrink_to_fit();
            self.strings.shrink_to_fit();
        }
    }

    fn fail(&mut self, requested: usize) -> OverflowError {
        self.overflowed = true;
        OverflowError {
            requested,
            available: self.available(),
        }
    }

    fn grow(&mut self, needed: usize) -> bool {
        let PoolMode::Growable { limit } = self.mode else {
            return false;
        };
        let target = self.size().saturating_add(needed);
        let mut budget = self.capacity.max(MIN_GROWTH);
        while budget < target {
            budget = budget.saturating_mul(2);
        }
        if let Some(limit) = limit {
            budget = budget.min(limit);
        }
        if budget < target {
            return false;
        }
        self.capacity = budget;
        true
    }

    /// Make room for `slots` nodes and `string_bytes` bytes of text at once
    ///
    /// Multi-step operations call this first so they either complete or leave
    /// the tree untouched.
    pub fn reserve(&mut self, slots: usize, string_bytes: usize) -> AllocResult<()> {
        let Some(requested) = slots
            .checked_mul(SLOT_SIZE)
            .and_then(|bytes| bytes.checked_add(string_bytes))
        else {
            return Err(self.fail(usize::MAX));
        };
        if requested == 0 {
            return Ok(());
        }
        if requested > self.available() && !self.grow(requested) {
            return Err(self.fail(requested));
        }
        if self.slots.try_reserve(slots).is_err() || self.strings.try_reserve(string_bytes).is_err()
        {
            return Err(self.fail(requested));
        }
        Ok(())
    }

    /// Take one slot from the node end
    pub fn allocate_node(&mut self) -> AllocResult<SlotId> {
        self.reserve(1, 0)?;
        let Some(id) = SlotId::from_index(self.slots.len()) else {
            return Err(self.fail(SLOT_SIZE));
        };
        self.slots.push(VariantSlot::EMPTY);
        Ok(id)
    }

    /// Bytes [`allocate_string`](Self::allocate_string) would charge for `text`
    pub fn string_cost(&self, text: &AdaptedString<'_, 's>) -> usize {
        match text {
            AdaptedString::Linked(_) => 0,
            AdaptedString::Copied(text) if self.find_copy(text).is_some() => 0,
            AdaptedString::Copied(text) => text.len(),
        }
    }

    fn find_copy(&self, text: &str) -> Option<usize> {
        if self.deduplicate {
            self.strings.find(text)
        } else {
            None
        }
    }

    /// Store a string according to its storage policy
    ///
    /// Linked strings cost nothing. Copied strings reuse an identical run
    /// already in the string region when deduplication is on.
    pub fn allocate_string(&mut self, text: AdaptedString<'_, 's>) -> AllocResult<StringHandle<'s>> {
        let text = match text {
            AdaptedString::Linked(text) => return Ok(StringHandle::Linked(text)),
            AdaptedString::Copied(text) => text,
        };
        let Ok(len) = u32::try_from(text.len()) else {
            return Err(self.fail(text.len()));
        };
        if let Some(offset) = self.find_copy(text).and_then(|at| u32::try_from(at).ok()) {
            return Ok(StringHandle::Owned(StrSpan::new(offset, len)));
        }
        self.reserve(0, text.len())?;
        let Ok(offset) = u32::try_from(self.strings.len()) else {
            return Err(self.fail(text.len()));
        };
        self.strings.push_str(text);
        Ok(StringHandle::Owned(StrSpan::new(offset, len)))
    }

    /// Text of a stored string
    pub fn resolve_str<'a>(&'a self, handle: &StringHandle<'s>) -> &'a str {
        match *handle {
            StringHandle::Owned(span) => self.strings.get(span.range()).unwrap_or_default(),
            StringHandle::Linked(text) => text,
        }
    }

    /// Generation-stamped address of `slot`
    pub fn handle(&self, slot: SlotId) -> NodeHandle {
        NodeHandle::new(slot, self.generation)
    }

    /// Slot behind `handle`, unless it predates the last clear
    pub fn lookup(&self, handle: NodeHandle) -> Option<SlotId> {
        let slot = handle.slot();
        (handle.generation() == self.generation && slot.index() < self.slots.len()).then_some(slot)
    }

    pub(crate) fn contains(&self, slot: SlotId) -> bool {
        slot.index() < self.slots.len()
    }

    pub(crate) fn slot(&self, slot: SlotId) -> Option<&VariantSlot<'s>> {
        self.slots.get(slot.index())
    }

    pub(crate) fn slot_mut(&mut self, slot: SlotId) -> Option<&mut VariantSlot<'s>> {
        self.slots.get_mut(slot.index())
    }

    pub(crate) fn data(&self, slot: SlotId) -> VariantData<'s> {
        self.slot(slot).map_or(VariantData::Null, |slot| slot.data)
    }
}

impl Default for MemoryPool<'_> {
    fn default() -> Self {
        Self::unbacked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbacked_pool_always_overflows() {
        let mut pool = MemoryPool::unbacked();
        assert_eq!(pool.capacity(), 0);
        assert!(pool.allocate_node().is_err());
        assert!(pool.overflowed());
        assert_eq!(pool.size(), 0);
    }

    #[test]
    fn test_fixed_pool_exhaustion() {
        let mut pool = MemoryPool::fixed(2 * SLOT_SIZE);
        assert!(pool.allocate_node().is_ok());
        assert!(pool.allocate_node().is_ok());
        assert!(!pool.overflowed());

        let err = pool.allocate_node().unwrap_err();
        assert_eq!(err.requested, SLOT_SIZE);
        assert_eq!(err.available, 0);
        assert!(pool.overflowed());
        assert_eq!(pool.size(), 2 * SLOT_SIZE);
    }

    #[test]
    fn test_overflow_is_sticky_until_clear() {
        let mut pool = MemoryPool::fixed(SLOT_SIZE);
        pool.allocate_node().unwrap();
        assert!(pool.allocate_node().is_err());

        // a smaller request that would fit does not reset the flag
        assert!(pool.allocate_string(AdaptedString::Linked("x")).is_ok());
        assert!(pool.overflowed());

        pool.clear();
        assert!(!pool.overflowed());
        assert_eq!(pool.size(), 0);
        assert!(pool.allocate_node().is_ok());
    }

    #[test]
    fn test_string_offsets_never_cross() {
        let mut pool = MemoryPool::fixed(SLOT_SIZE + 4);
        pool.allocate_node().unwrap();
        assert_eq!(pool.slot_offset(), SLOT_SIZE);
        pool.allocate_string(AdaptedString::Copied("abcd")).unwrap();
        assert_eq!(pool.string_offset(), SLOT_SIZE);
        assert!(pool.allocate_string(AdaptedString::Copied("e")).is_err());
        assert!(pool.slot_offset() <= pool.string_offset());
    }

    #[test]
    fn test_copied_strings_are_deduplicated() {
        let mut pool = MemoryPool::fixed(64);
        let first = pool.allocate_string(AdaptedString::Copied("hello")).unwrap();
        let second = pool.allocate_string(AdaptedString::Copied("hello")).unwrap();
        assert_eq!(first, second);
        assert_eq!(pool.size(), 5);
        assert_eq!(pool.resolve_str(&second), "hello");
        assert_eq!(pool.string_cost(&AdaptedString::Copied("hello")), 0);
    }

    #[test]
    fn test_deduplication_can_be_disabled() {
        let mut pool = MemoryPool::fixed(64).with_deduplication(false);
        pool.allocate_string(AdaptedString::Copied("abc")).unwrap();
        pool.allocate_string(AdaptedString::Copied("abc")).unwrap();
        assert_eq!(pool.size(), 6);
    }

    #[test]
    fn test_linked_strings_are_free() {
        let mut pool = MemoryPool::unbacked();
        let handle = pool.allocate_string(AdaptedString::Linked("static")).unwrap();
        assert_eq!(pool.resolve_str(&handle), "static");
        assert!(!pool.overflowed());
    }

    #[test]
    fn test_growable_pool_doubles_up_to_limit() {
        let mut pool = MemoryPool::growable(0, Some(4 * SLOT_SIZE));
        for _ in 0..4 {
            pool.allocate_node().unwrap();
        }
        assert_eq!(pool.capacity(), 4 * SLOT_SIZE);
        assert!(pool.allocate_node().is_err());
        assert!(pool.overflowed());
    }

    #[test]
    fn test_growable_pool_without_limit() {
        let mut pool = MemoryPool::growable(16, None);
        for _ in 0..100 {
            pool.allocate_node().unwrap();
        }
        assert!(pool.capacity() >= pool.size());
        pool.shrink_to_fit();
        assert_eq!(pool.capacity(), pool.size());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_reserve_is_all_or_nothing() {
        let mut pool = MemoryPool::fixed(3 * SLOT_SIZE);
        assert!(pool.reserve(4, 0).is_err());
        assert_eq!(pool.size(), 0);
        assert!(pool.overflowed());
        assert!(pool.reserve(usize::MAX, 1).is_err());
    }

    #[test]
    fn test_handles_go_stale_after_clear() {
        let mut pool = MemoryPool::fixed(4 * SLOT_SIZE);
        let id = pool.allocate_node().unwrap();
        let handle = pool.handle(id);
        assert_eq!(pool.lookup(handle), Some(id));

        pool.clear();
        assert_eq!(pool.lookup(handle), None);
        assert_eq!(pool.generation(), 1);
    }
}
