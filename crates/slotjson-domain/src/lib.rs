//! slotjson domain layer: arena-backed JSON document storage
//!
//! This crate holds the document engine with no I/O and no logging: a
//! bump-style [`MemoryPool`] of fixed-size node slots and string bytes, the
//! tagged-union node stored in each slot, linked collections for arrays and
//! objects, alias resolution, and the accessor views used to read and mutate
//! the tree.
//!
//! ## Architecture
//!
//! - **Memory**: [`MemoryPool`] allocates slots and strings from one byte
//!   budget and never frees piecemeal. Overflow is reported through
//!   [`AllocResult`] and a sticky flag, never a panic.
//! - **Tree**: each slot holds one value, a sibling link and an optional key.
//!   Slots are addressed by index, so [`clear`](JsonDocument::clear) is O(1)
//!   and stale [`NodeHandle`]s are detected by generation.
//! - **Views**: [`VariantConstRef`], [`ArrayConstRef`] and [`ObjectConstRef`]
//!   read; [`VariantRef`], [`ArrayRef`] and [`ObjectRef`] write.
//! - **Extension**: [`Converter`] moves custom types in and out of nodes and
//!   [`Visitor`] walks a tree for serializers.
//!
//! ## Features
//!
//! - `std` (default): standard library support
//! - `serde`: `serde::Serialize` for documents and read views

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod collection;
pub mod converter;
pub mod document;
pub mod error;
pub mod memory;
pub mod refs;
pub mod strings;
pub mod variant;
pub mod visitor;

#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(feature = "serde")]
pub use serde_impl::SERDE_NESTING_LIMIT;

pub use collection::CollectionData;
pub use converter::Converter;
pub use document::{DEFAULT_DOCUMENT_CAPACITY, JsonDocument};
pub use error::{AllocResult, OverflowError};
pub use memory::{
    MemoryPool, NodeHandle, PoolMode, SLOT_SIZE, SlotId, json_array_size, json_object_size,
    json_string_size,
};
pub use refs::{
    ArrayConstRef, ArrayIter, ArrayRef, ObjectConstRef, ObjectIter, ObjectRef, VariantConstRef,
    VariantRef,
};
pub use strings::{
    AdaptedString, JsonString, Linked, StrSpan, StringHandle, StringStoragePolicy,
    storage_policy,
};
pub use variant::{ALIAS_CHAIN_LIMIT, VariantKind};
pub use visitor::{Visitor, accept};
