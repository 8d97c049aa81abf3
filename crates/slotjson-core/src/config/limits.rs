//! Compile-time defaults and bounds for documents and parsing
//!
//! # Sizing
//!
//! - **DEFAULT_CAPACITY**: budget of a document built from a default
//!   configuration. A node costs [`SLOT_SIZE`](slotjson_domain::SLOT_SIZE)
//!   bytes; use [`json_array_size`](slotjson_domain::json_array_size) and
//!   [`json_object_size`](slotjson_domain::json_object_size) to size a fixed
//!   budget for a known shape.
//!
//! - **DEFAULT_NESTING_LIMIT**: containers a parser enters before it gives up.
//!   Parsing recurses once per level, so this bounds stack use on hostile
//!   input.
//!
//! - **MAX_NESTING_LIMIT**: ceiling for a configured nesting limit. It stays
//!   below the tokenizer's own recursion guard so deep input is always
//!   reported as too deep rather than as a syntax error.

/// Default document budget in bytes
pub const DEFAULT_CAPACITY: usize = slotjson_domain::DEFAULT_DOCUMENT_CAPACITY;

/// Default number of nested containers a parser accepts
pub const DEFAULT_NESTING_LIMIT: usize = 10;

/// Largest nesting limit a configuration may request
pub const MAX_NESTING_LIMIT: usize = 100;

/// Largest document budget a configuration may request
///
/// String offsets are stored in 32 bits.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// Longest alias chain followed before a node reads as null
pub const ALIAS_CHAIN_LIMIT: usize = slotjson_domain::ALIAS_CHAIN_LIMIT;
