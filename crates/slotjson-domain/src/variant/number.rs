//! Numeric representation shared by readers, converters and comparison

use super::VariantData;

/// Largest float magnitude converted to an integer before giving up
const FLOAT_TO_INT_BOUND: f64 = 1e38;

/// A number extracted from a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    pub(crate) fn from_data(data: &VariantData<'_>) -> Option<Self> {
        match *data {
            VariantData::Signed(value) => Some(Number::Signed(value)),
            VariantData::Unsigned(value) => Some(Number::Unsigned(value)),
            VariantData::Float(value) => Some(Number::Float(value)),
            _ => None,
        }
    }

    /// Parse decimal text, preferring the narrowest exact representation
    pub(crate) fn parse(text: &str) -> Option<Self> {
        if let Ok(value) = text.parse::<u64>() {
            return Some(Number::Unsigned(value));
        }
        if let Ok(value) = text.parse::<i64>() {
            return Some(Number::Signed(value));
        }
        text.parse::<f64>().ok().map(Number::Float)
    }

    /// Exact integer value, if this is an integer
    pub(crate) fn exact_integer(self) -> Option<i128> {
        match self {
            Number::Signed(value) => Some(i128::from(value)),
            Number::Unsigned(value) => Some(i128::from(value)),
            Number::Float(_) => None,
        }
    }

    /// Convert to an integer type; floats truncate toward zero
    ///
    /// Returns `None` when the value does not fit `T`.
    pub(crate) fn to_integer<T: TryFrom<i128>>(self) -> Option<T> {
        let wide = match self {
            Number::Float(value) if value > -FLOAT_TO_INT_BOUND && value < FLOAT_TO_INT_BOUND => {
                value as i128
            }
            Number::Float(_) => return None,
            other => other.exact_integer()?,
        };
        T::try_from(wide).ok()
    }

    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Number::Signed(value) => value as f64,
            Number::Unsigned(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Number::Signed(value) => value == 0,
            Number::Unsigned(value) => value == 0,
            Number::Float(value) => value == 0.0,
        }
    }
}

/// Numeric equality across representations
///
/// A float equals an integer only when it is integral and of the same value.
pub(crate) fn numeric_eq(left: Number, right: Number) -> bool {
    match (left, right) {
        (Number::Float(left), Number::Float(right)) => left == right,
        (Number::Float(float), other) | (other, Number::Float(float)) => {
            match (float_as_exact_integer(float), other.exact_integer()) {
                (Some(float), Some(integer)) => float == integer,
                _ => false,
            }
        }
        (left, right) => left.exact_integer() == right.exact_integer(),
    }
}

fn float_as_exact_integer(value: f64) -> Option<i128> {
    if !(value > -FLOAT_TO_INT_BOUND && value < FLOAT_TO_INT_BOUND) {
        return None;
    }
    let integer = value as i128;
    (integer as f64 == value).then_some(integer)
}
