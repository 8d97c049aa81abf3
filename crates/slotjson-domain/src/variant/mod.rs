//! Node payloads and the tree operations built on them

mod compare;
mod copy;
mod data;
pub(crate) mod number;
mod tree;

pub(crate) use compare::variants_equal;
pub(crate) use data::VariantData;
pub use data::VariantKind;
pub use tree::ALIAS_CHAIN_LIMIT;
