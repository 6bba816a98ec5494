//! Error types for entity decoding.

use std::fmt;

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors that can occur while decoding and applying entity updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// Bitstream error.
    Bitstream(bitstream::BitError),

    /// More than one property shares a lookup name.
    ///
    /// This is a defect in upstream schema flattening, not a recoverable
    /// runtime condition.
    DuplicateProperty { name: String },

    /// A required property is absent from the entity's class.
    MissingProperty { name: String },

    /// A decoded field index is outside the entity's property list.
    ///
    /// Indicates a corrupted or desynchronized stream; decoding of the
    /// stream must stop.
    IndexOutOfRange { index: usize, count: usize },

    /// An update record names more changed properties than the limit allows.
    TooManyUpdates { limit: usize, actual: usize },

    /// A decoded string exceeds the byte limit.
    StringTooLong { limit: usize, actual: usize },

    /// A decoded array exceeds the schema's element limit.
    ArrayTooLong { limit: usize, actual: usize },

    /// A value's shape does not match what the operation expects.
    ValueShape {
        expected: &'static str,
        found: &'static str,
    },

    /// The cell exponent property holds a value no grid can use.
    InvalidCellExponent { exponent: i64 },

    /// Field indices being encoded must be strictly ascending.
    IndexNotAscending { previous: usize, index: usize },

    /// A field index delta is too large to encode (0xFFF is reserved as the
    /// end-of-list marker).
    DeltaOutOfRange { delta: usize },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::DuplicateProperty { name } => {
                write!(f, "more than one property named {name:?}")
            }
            Self::MissingProperty { name } => {
                write!(f, "property {name:?} not found")
            }
            Self::IndexOutOfRange { index, count } => {
                write!(
                    f,
                    "field index {index} out of range for {count} properties"
                )
            }
            Self::TooManyUpdates { limit, actual } => {
                write!(f, "update names {actual} properties, limit is {limit}")
            }
            Self::StringTooLong { limit, actual } => {
                write!(f, "string of {actual} bytes exceeds limit {limit}")
            }
            Self::ArrayTooLong { limit, actual } => {
                write!(f, "array of {actual} elements exceeds limit {limit}")
            }
            Self::ValueShape { expected, found } => {
                write!(f, "expected {expected} value but got {found}")
            }
            Self::InvalidCellExponent { exponent } => {
                write!(f, "cell exponent {exponent} is not a usable grid width")
            }
            Self::IndexNotAscending { previous, index } => {
                write!(
                    f,
                    "field index {index} does not ascend past previous {previous}"
                )
            }
            Self::DeltaOutOfRange { delta } => {
                write!(f, "field index delta {delta} exceeds the encodable range")
            }
        }
    }
}

impl std::error::Error for EntityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for EntityError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}
