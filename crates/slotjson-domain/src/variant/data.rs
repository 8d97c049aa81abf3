use crate::collection::CollectionData;
use crate::memory::SlotId;
use crate::strings::StringHandle;

/// Payload of one node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum VariantData<'s> {
    #[default]
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    String(StringHandle<'s>),
    Array(CollectionData),
    Object(CollectionData),
    Alias(SlotId),
}

/// Logical kind of a resolved node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// No value
    Null,
    /// `true` or `false`
    Bool,
    /// Negative integer, or any integer stored from a signed type
    Signed,
    /// Integer stored from an unsigned type
    Unsigned,
    /// Floating point number
    Float,
    /// Copied or linked string
    String,
    /// Ordered elements
    Array,
    /// Keyed members in insertion order
    Object,
}

impl VariantKind {
    /// Whether the kind is one of the three numeric kinds
    pub fn is_number(self) -> bool {
        matches!(
            self,
            VariantKind::Signed | VariantKind::Unsigned | VariantKind::Float
        )
    }

    /// Whether the kind holds children
    pub fn is_collection(self) -> bool {
        matches!(self, VariantKind::Array | VariantKind::Object)
    }
}

impl<'s> VariantData<'s> {
    /// Kind as seen by readers; an unresolved alias reads as null
    pub(crate) fn kind(&self) -> VariantKind {
        match self {
            VariantData::Null | VariantData::Alias(_) => VariantKind::Null,
            VariantData::Bool(_) => VariantKind::Bool,
            VariantData::Signed(_) => VariantKind::Signed,
            VariantData::Unsigned(_) => VariantKind::Unsigned,
            VariantData::Float(_) => VariantKind::Float,
            VariantData::String(_) => VariantKind::String,
            VariantData::Array(_) => VariantKind::Array,
            VariantData::Object(_) => VariantKind::Object,
        }
    }

    pub(crate) fn string_handle(&self) -> Option<StringHandle<'s>> {
        match self {
            VariantData::String(handle) => Some(*handle),
            _ => None,
        }
    }

    pub(crate) fn collection(&self) -> Option<CollectionData> {
        match self {
            VariantData::Array(coll) | VariantData::Object(coll) => Some(*coll),
            _ => None,
        }
    }

    /// Same container kind with a replaced chain; scalars are returned as is
    pub(crate) fn with_collection(self, coll: CollectionData) -> Self {
        match self {
            VariantData::Array(_) => VariantData::Array(coll),
            VariantData::Object(_) => VariantData::Object(coll),
            other => other,
        }
    }

    /// Empty container of `kind`, for materialization
    pub(crate) fn empty_container(kind: VariantKind) -> Option<Self> {
        match kind {
            VariantKind::Array => Some(VariantData::Array(CollectionData::default())),
            VariantKind::Object => Some(VariantData::Object(CollectionData::default())),
            _ => None,
        }
    }
}
