//! Accessor views over a document's tree
//!
//! Every view is a pool reference plus a slot index; none holds a copy of the
//! data. Read views (`*ConstRef`) share the pool and are `Copy`. Write views
//! borrow it exclusively. There is no conversion from a read view to a write
//! view, so asking for a mutable path through read-only data does not compile:
//!
//! ```compile_fail
//! use slotjson_domain::{JsonDocument, ObjectRef};
//!
//! let doc = JsonDocument::fixed(256);
//! let view = doc.root();
//! let object: ObjectRef<'_, '_> = view.as_object().unwrap();
//! ```

mod array;
mod object;
mod variant;

pub use array::{ArrayConstRef, ArrayIter, ArrayRef};
pub use object::{ObjectConstRef, ObjectIter, ObjectRef};
pub use variant::{VariantConstRef, VariantRef};
