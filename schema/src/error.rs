//! Server-class validation errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a server class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaError {
    /// Invalid bit width for a fixed-width integer or quantized float.
    InvalidBitWidth { bits: u8 },

    /// Quantized float low/high bounds are inverted or equal.
    InvalidFloatRange { low: f32, high: f32 },

    /// Array properties must hold at least one element.
    InvalidArrayLength { max_len: u16 },

    /// Arrays of arrays are not representable on the wire.
    NestedArray,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitWidth { bits } => {
                write!(f, "invalid property bit width {bits}")
            }
            Self::InvalidFloatRange { low, high } => {
                write!(f, "invalid quantized float range [{low}, {high}]")
            }
            Self::InvalidArrayLength { max_len } => {
                write!(f, "invalid array max length {max_len}")
            }
            Self::NestedArray => {
                write!(f, "array element type cannot itself be an array")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
