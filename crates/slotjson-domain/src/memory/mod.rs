//! Arena allocation for document nodes and strings

mod pool;
mod slot;

pub use pool::{MemoryPool, PoolMode};
pub use slot::{
    NodeHandle, SLOT_SIZE, SlotId, json_array_size, json_object_size, json_string_size,
};
