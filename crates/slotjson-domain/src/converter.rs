//! Typed conversion in and out of the tree
//!
//! [`Converter`] is the extension point for value types. Implement it once
//! for a type and every view accepts it in `set`, `add`, `insert`, `is` and
//! `as_value`:
//!
//! ```
//! use slotjson_domain::{AllocResult, Converter, JsonDocument, VariantConstRef, VariantRef};
//!
//! #[derive(Debug, PartialEq)]
//! struct Celsius(f64);
//!
//! impl Converter for Celsius {
//!     fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
//!         dst.set_float(self.0);
//!         Ok(())
//!     }
//!
//!     fn from_json(src: VariantConstRef<'_, '_>) -> Self {
//!         Celsius(src.as_value())
//!     }
//!
//!     fn check_json(src: VariantConstRef<'_, '_>) -> bool {
//!         src.is::<f64>()
//!     }
//! }
//!
//! let mut doc = JsonDocument::fixed(256);
//! assert!(doc.set(Celsius(21.5)));
//! assert!(doc.root().is::<Celsius>());
//! assert_eq!(doc.root().as_value::<Celsius>(), Celsius(21.5));
//! ```
//!
//! Read views never yield write views, so a conversion that would need
//! mutable access to read-only data has no implementation to call.

use alloc::{string::String, vec::Vec};

use crate::collection::CollectionData;
use crate::error::AllocResult;
use crate::refs::{VariantConstRef, VariantRef};
use crate::variant::{VariantData, VariantKind};

/// Moves a value type in and out of a node
pub trait Converter: Sized {
    /// Write `self` into `dst`
    ///
    /// Fails only when the pool cannot hold the value.
    fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()>;

    /// Read a value out of `src`, falling back to a type-appropriate default
    /// when the stored shape does not match
    fn from_json(src: VariantConstRef<'_, '_>) -> Self;

    /// Whether `src` currently holds a shape compatible with `Self`
    fn check_json(src: VariantConstRef<'_, '_>) -> bool;
}

impl Converter for bool {
    fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
        dst.set_bool(*self);
        Ok(())
    }

    fn from_json(src: VariantConstRef<'_, '_>) -> Self {
        match src.bool_value() {
            Some(value) => value,
            None => src.stored_number().is_some_and(|number| !number.is_zero()),
        }
    }

    fn check_json(src: VariantConstRef<'_, '_>) -> bool {
        src.kind() == VariantKind::Bool
    }
}

fn integer_from_json<T: TryFrom<i128> + Default>(src: VariantConstRef<'_, '_>) -> T {
    if let Some(value) = src.bool_value() {
        return T::try_from(i128::from(value)).unwrap_or_default();
    }
    src.number()
        .and_then(|number| number.to_integer())
        .unwrap_or_default()
}

fn integer_check_json<T: TryFrom<i128>>(src: VariantConstRef<'_, '_>) -> bool {
    src.stored_number()
        .filter(|number| number.exact_integer().is_some())
        .and_then(|number| number.to_integer::<T>())
        .is_some()
}

macro_rules! signed_converter {
    ($($ty:ty),*) => {$(
        impl Converter for $ty {
            fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
                dst.set_signed(*self as i64);
                Ok(())
            }

            fn from_json(src: VariantConstRef<'_, '_>) -> Self {
                integer_from_json(src)
            }

            fn check_json(src: VariantConstRef<'_, '_>) -> bool {
                integer_check_json::<Self>(src)
            }
        }
    )*};
}

macro_rules! unsigned_converter {
    ($($ty:ty),*) => {$(
        impl Converter for $ty {
            fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
                dst.set_unsigned(*self as u64);
                Ok(())
            }

            fn from_json(src: VariantConstRef<'_, '_>) -> Self {
                integer_from_json(src)
            }

            fn check_json(src: VariantConstRef<'_, '_>) -> bool {
                integer_check_json::<Self>(src)
            }
        }
    )*};
}

signed_converter!(i8, i16, i32, i64, isize);
unsigned_converter!(u8, u16, u32, u64, usize);

impl Converter for f64 {
    fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
        dst.set_float(*self);
        Ok(())
    }

    fn from_json(src: VariantConstRef<'_, '_>) -> Self {
        src.number().map_or(0.0, |number| number.to_f64())
    }

    fn check_json(src: VariantConstRef<'_, '_>) -> bool {
        src.stored_number().is_some()
    }
}

impl Converter for f32 {
    fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
        dst.set_float(f64::from(*self));
        Ok(())
    }

    fn from_json(src: VariantConstRef<'_, '_>) -> Self {
        f64::from_json(src) as f32
    }

    fn check_json(src: VariantConstRef<'_, '_>) -> bool {
        f64::check_json(src)
    }
}

impl Converter for String {
    fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
        dst.try_set_string(self.as_str())
    }

    fn from_json(src: VariantConstRef<'_, '_>) -> Self {
        src.as_str().map(String::from).unwrap_or_default()
    }

    fn check_json(src: VariantConstRef<'_, '_>) -> bool {
        src.kind() == VariantKind::String
    }
}

impl<T: Converter> Converter for Option<T> {
    fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
        match self {
            Some(value) => value.to_json(dst),
            None => {
                dst.set_null();
                Ok(())
            }
        }
    }

    fn from_json(src: VariantConstRef<'_, '_>) -> Self {
        (!src.is_null()).then(|| T::from_json(src))
    }

    fn check_json(src: VariantConstRef<'_, '_>) -> bool {
        src.is_null() || T::check_json(src)
    }
}

impl<T: Converter> Converter for Vec<T> {
    /// Writes an array
    ///
    /// Elements are filled in a detached collection that replaces the node
    /// only once every element fits, so a failed write leaves `dst` as it was.
    fn to_json(&self, dst: &mut VariantRef<'_, '_>) -> AllocResult<()> {
        let pool = &mut *dst.pool;
        pool.reserve(self.len(), 0)?;
        let mut elements = CollectionData::default();
        for item in self {
            let child = pool.allocate_node()?;
            item.to_json(&mut VariantRef::new(pool, child))?;
            pool.chain(&mut elements, child);
        }
        pool.store(dst.slot, VariantData::Array(elements));
        Ok(())
    }

    fn from_json(src: VariantConstRef<'_, '_>) -> Self {
        src.as_array()
            .map(|array| array.iter().map(T::from_json).collect())
            .unwrap_or_default()
    }

    fn check_json(src: VariantConstRef<'_, '_>) -> bool {
        src.as_array()
            .is_some_and(|array| array.iter().all(T::check_json))
    }
}
