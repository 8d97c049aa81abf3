//! Allocation outcome types
//!
//! Running out of arena space is an expected condition, not a bug: every call
//! that allocates returns [`AllocResult`] and the pool additionally records a
//! sticky overflow flag that collaborators can poll after a batch of work.

/// Result of any call that allocates from a [`MemoryPool`](crate::memory::MemoryPool)
pub type AllocResult<T> = Result<T, OverflowError>;

/// An allocation request the pool could not satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("memory pool overflow: {requested} bytes requested, {available} available")]
pub struct OverflowError {
    /// Bytes the failed request needed
    pub requested: usize,
    /// Bytes still free in the pool when the request failed
    pub available: usize,
}
