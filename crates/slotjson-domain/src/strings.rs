//! String storage policy
//!
//! Every string that enters a document, as a value or as an object key, is
//! either copied into the pool's string region or linked by address. The
//! choice is a pure function of the argument's type:
//!
//! | Argument | Policy |
//! |---|---|
//! | `&str`, `String`, `Box<str>`, `Cow<str>` | [`StringStoragePolicy::Copy`] |
//! | [`Linked`] | [`StringStoragePolicy::Link`] |
//!
//! Linked strings cost no pool space. Their lifetime `'s` is the lifetime
//! parameter of the document, so the borrow checker refuses to link a buffer
//! that would be freed while the document still refers to it.

use alloc::{borrow::Cow, boxed::Box, string::String};
use core::ops::Range;

/// Whether a string's bytes are copied into the pool or referenced in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringStoragePolicy {
    /// Bytes are copied into the pool's string region
    Copy,
    /// Only the address and length are stored
    Link,
}

/// Location of a copied string inside a pool's string region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrSpan {
    offset: u32,
    len: u32,
}

impl StrSpan {
    pub(crate) fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    pub(crate) fn range(self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }

    /// Length in bytes
    pub fn len(self) -> usize {
        self.len as usize
    }

    /// Whether the span covers no bytes
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A string stored in a document, as a value or as a member key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringHandle<'s> {
    /// Copied into the pool
    Owned(StrSpan),
    /// Referenced in place; lives at least as long as the document
    Linked(&'s str),
}

impl StringHandle<'_> {
    /// Policy this string was stored under
    pub fn policy(&self) -> StringStoragePolicy {
        match self {
            StringHandle::Owned(_) => StringStoragePolicy::Copy,
            StringHandle::Linked(_) => StringStoragePolicy::Link,
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        match self {
            StringHandle::Owned(span) => span.len(),
            StringHandle::Linked(text) => text.len(),
        }
    }

    /// Whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A string argument after its storage policy has been decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptedString<'a, 's> {
    /// Transient bytes that must be copied before the call returns
    Copied(&'a str),
    /// Bytes that outlive the document and may be linked
    Linked(&'s str),
}

impl AdaptedString<'_, '_> {
    /// The string content
    pub fn as_str(&self) -> &str {
        match *self {
            AdaptedString::Copied(text) => text,
            AdaptedString::Linked(text) => text,
        }
    }

    /// Storage policy selected for this argument
    pub fn policy(&self) -> StringStoragePolicy {
        match self {
            AdaptedString::Copied(_) => StringStoragePolicy::Copy,
            AdaptedString::Linked(_) => StringStoragePolicy::Link,
        }
    }
}

/// Marks a string as long-lived so documents store it by address
///
/// ```
/// use slotjson_domain::{JsonDocument, Linked};
///
/// let mut doc = JsonDocument::fixed(512);
/// let mut root = doc.to_object();
/// assert!(root.insert_string(Linked("status"), Linked("ok")));
/// // neither the key nor the value consumed string space
/// assert_eq!(doc.memory_usage(), slotjson_domain::json_object_size(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Linked<'s>(pub &'s str);

/// String arguments accepted by document operations that store text
pub trait JsonString<'s> {
    /// Decide the storage policy and expose the content
    fn adapt(&self) -> AdaptedString<'_, 's>;
}

impl<'s> JsonString<'s> for str {
    fn adapt(&self) -> AdaptedString<'_, 's> {
        AdaptedString::Copied(self)
    }
}

impl<'s> JsonString<'s> for String {
    fn adapt(&self) -> AdaptedString<'_, 's> {
        AdaptedString::Copied(self.as_str())
    }
}

impl<'s> JsonString<'s> for Box<str> {
    fn adapt(&self) -> AdaptedString<'_, 's> {
        AdaptedString::Copied(self)
    }
}

impl<'s> JsonString<'s> for Cow<'_, str> {
    fn adapt(&self) -> AdaptedString<'_, 's> {
        AdaptedString::Copied(self.as_ref())
    }
}

impl<'s> JsonString<'s> for Linked<'s> {
    fn adapt(&self) -> AdaptedString<'_, 's> {
        AdaptedString::Linked(self.0)
    }
}

impl<'s> JsonString<'s> for AdaptedString<'_, 's> {
    fn adapt(&self) -> AdaptedString<'_, 's> {
        *self
    }
}

impl<'s, T: JsonString<'s> + ?Sized> JsonString<'s> for &T {
    fn adapt(&self) -> AdaptedString<'_, 's> {
        (**self).adapt()
    }
}

/// Storage policy a document applies to `value`
pub fn storage_policy<'s, S: JsonString<'s> + ?Sized>(value: &S) -> StringStoragePolicy {
    value.adapt().policy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_policy_by_argument_type() {
        assert_eq!(storage_policy("literal"), StringStoragePolicy::Copy);
        assert_eq!(
            storage_policy(&"owned".to_string()),
            StringStoragePolicy::Copy
        );
        assert_eq!(
            storage_policy(&Cow::Borrowed("cow")),
            StringStoragePolicy::Copy
        );
        assert_eq!(storage_policy(&Linked("static")), StringStoragePolicy::Link);
    }

    #[test]
    fn test_adapted_string_content() {
        let owned = "transient".to_string();
        let adapted: AdaptedString<'_, 'static> = owned.adapt();
        assert_eq!(adapted.as_str(), "transient");
        assert_eq!(Linked("x").adapt().as_str(), "x");
    }

    #[test]
    fn test_span_range() {
        let span = StrSpan::new(4, 3);
        assert_eq!(span.range(), 4..7);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert!(StrSpan::new(9, 0).is_empty());
    }

    #[test]
    fn test_handle_policy() {
        assert_eq!(
            StringHandle::Owned(StrSpan::new(0, 2)).policy(),
            StringStoragePolicy::Copy
        );
        let linked = StringHandle::Linked("abc");
        assert_eq!(linked.policy(), StringStoragePolicy::Link);
        assert_eq!(linked.len(), 3);
    }
}
