//! Property codec definitions.

/// The wire encoding for a floating-point component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatCodec {
    /// Linearly quantized into `bits` between `low` and `high`.
    Quantized { bits: u8, low: f32, high: f32 },

    /// Raw 32-bit IEEE float sent verbatim.
    Raw,
}

/// The decode rule for a property (representation only).
///
/// The codec says how a value is laid out on the wire; which properties use
/// which codec is decided by the upstream send-table flattening and is
/// opaque to this crate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropCodec {
    /// Bit-packed integer with fixed width.
    Int { bits: u8, signed: bool },

    /// Single float component.
    Float(FloatCodec),

    /// Length-prefixed byte string (9-bit length).
    String,

    /// Three float components, one per axis.
    Vector(FloatCodec),

    /// Length-prefixed sequence of a single element codec.
    Array { max_len: u16, element: Box<PropCodec> },
}

impl PropCodec {
    /// Creates an unsigned integer property codec.
    #[must_use]
    pub const fn int(bits: u8) -> Self {
        Self::Int {
            bits,
            signed: false,
        }
    }

    /// Creates a signed integer property codec.
    #[must_use]
    pub const fn sint(bits: u8) -> Self {
        Self::Int { bits, signed: true }
    }

    /// Creates a quantized float property codec.
    #[must_use]
    pub const fn quantized_float(bits: u8, low: f32, high: f32) -> Self {
        Self::Float(FloatCodec::Quantized { bits, low, high })
    }

    /// Creates a raw 32-bit float property codec.
    #[must_use]
    pub const fn raw_float() -> Self {
        Self::Float(FloatCodec::Raw)
    }

    /// Creates a string property codec.
    #[must_use]
    pub const fn string() -> Self {
        Self::String
    }

    /// Creates a vector property codec with the given per-axis encoding.
    #[must_use]
    pub const fn vector(component: FloatCodec) -> Self {
        Self::Vector(component)
    }

    /// Creates an array property codec.
    #[must_use]
    pub fn array(max_len: u16, element: Self) -> Self {
        Self::Array {
            max_len,
            element: Box::new(element),
        }
    }
}

/// Number of bits used for an array length prefix holding up to `max_len`
/// elements.
#[must_use]
pub const fn array_length_bits(max_len: u16) -> u8 {
    (u16::BITS - max_len.leading_zeros()) as u8
}
