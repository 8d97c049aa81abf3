//! Deep equality between nodes, possibly of different pools

use smallvec::SmallVec;

use super::VariantData;
use super::number::{Number, numeric_eq};
use crate::memory::{MemoryPool, SlotId};

/// Whether two nodes hold equal trees
///
/// Arrays compare pairwise in order. Objects compare by key in both
/// directions: every left member must equal the right member of the same key,
/// and member counts must match. An unbound node equals null.
pub(crate) fn variants_equal(
    left_pool: &MemoryPool<'_>,
    left: Option<SlotId>,
    right_pool: &MemoryPool<'_>,
    right: Option<SlotId>,
) -> bool {
    let mut pending: SmallVec<[(Option<SlotId>, Option<SlotId>); 16]> = SmallVec::new();
    pending.push((left, right));

    while let Some((left, right)) = pending.pop() {
        let left_data = left.map_or(VariantData::Null, |slot| left_pool.resolved_data(slot));
        let right_data = right.map_or(VariantData::Null, |slot| right_pool.resolved_data(slot));

        let equal = match (left_data, right_data) {
            (VariantData::Null, VariantData::Null) => true,
            (VariantData::Bool(a), VariantData::Bool(b)) => a == b,
            (VariantData::String(a), VariantData::String(b)) => {
                left_pool.resolve_str(&a) == right_pool.resolve_str(&b)
            }
            (VariantData::Array(a), VariantData::Array(b)) => {
                let mut lefts = left_pool.children(a);
                let mut rights = right_pool.children(b);
                loop {
                    match (lefts.next(), rights.next()) {
                        (None, None) => break true,
                        (Some(l), Some(r)) => pending.push((Some(l), Some(r))),
                        _ => break false,
                    }
                }
            }
            (VariantData::Object(a), VariantData::Object(b)) => {
                left_pool.collection_len(a) == right_pool.collection_len(b)
                    && left_pool.children(a).all(|member| {
                        let other = left_pool
                            .key_of(member)
                            .and_then(|key| right_pool.find_member(b, key));
                        match other {
                            Some(other) => {
                                pending.push((Some(member), Some(other)));
                                true
                            }
                            None => false,
                        }
                    })
            }
            (a, b) => match (Number::from_data(&a), Number::from_data(&b)) {
                (Some(a), Some(b)) => numeric_eq(a, b),
                _ => false,
            },
        };
        if !equal {
            return false;
        }
    }
    true
}
