//! Property values and their wire codecs.

use bitstream::{BitReader, BitWriter};
use schema::{array_length_bits, FloatCodec, PropCodec};

use crate::error::{EntityError, EntityResult};
use crate::limits::DecodeLimits;

/// Bits in a string value's byte-length prefix.
const STRING_LENGTH_BITS: u8 = 9;

/// A three-component world-space vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A decoded property value.
///
/// Exactly one variant is active at a time. Which variant is legal for a
/// given property is determined by its entry's codec, not enforced by the
/// union itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f32),
    String(String),
    Vector(Vector),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Returns the zero/empty value a property starts with under `codec`.
    #[must_use]
    pub fn default_for(codec: &PropCodec) -> Self {
        match codec {
            PropCodec::Int { .. } => Self::Int(0),
            PropCodec::Float(_) => Self::Float(0.0),
            PropCodec::String => Self::String(String::new()),
            PropCodec::Vector(_) => Self::Vector(Vector::ZERO),
            PropCodec::Array { .. } => Self::Array(Vec::new()),
        }
    }

    /// Returns the shape name of the active variant.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Vector(_) => "vector",
            Self::Array(_) => "array",
        }
    }

    /// Returns the integer value, if this is an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float value, if this is a float.
    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the vector value, if this is a vector.
    #[must_use]
    pub const fn as_vector(&self) -> Option<Vector> {
        match self {
            Self::Vector(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the array elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// Shape name a codec decodes into, for error reporting.
const fn codec_shape(codec: &PropCodec) -> &'static str {
    match codec {
        PropCodec::Int { .. } => "integer",
        PropCodec::Float(_) => "float",
        PropCodec::String => "string",
        PropCodec::Vector(_) => "vector",
        PropCodec::Array { .. } => "array",
    }
}

/// Decodes one value of the codec's shape from the stream.
pub fn decode_value(
    codec: &PropCodec,
    reader: &mut BitReader<'_>,
    limits: &DecodeLimits,
) -> EntityResult<PropertyValue> {
    match codec {
        PropCodec::Int { bits, signed } => {
            let value = if *signed {
                reader.read_signed_bits(*bits)?
            } else {
                reader.read_bits(*bits)? as i64
            };
            Ok(PropertyValue::Int(value))
        }
        PropCodec::Float(component) => Ok(PropertyValue::Float(decode_float(component, reader)?)),
        PropCodec::String => {
            let len = reader.read_bits(STRING_LENGTH_BITS)? as usize;
            if len > limits.max_string_bytes {
                return Err(EntityError::StringTooLong {
                    limit: limits.max_string_bytes,
                    actual: len,
                });
            }
            let bytes = reader.read_bytes(len)?;
            // The stream is not trusted to carry valid text.
            Ok(PropertyValue::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        }
        PropCodec::Vector(component) => {
            let x = f64::from(decode_float(component, reader)?);
            let y = f64::from(decode_float(component, reader)?);
            let z = f64::from(decode_float(component, reader)?);
            Ok(PropertyValue::Vector(Vector::new(x, y, z)))
        }
        PropCodec::Array { max_len, element } => {
            let len = reader.read_bits(array_length_bits(*max_len))? as usize;
            if len > *max_len as usize {
                return Err(EntityError::ArrayTooLong {
                    limit: *max_len as usize,
                    actual: len,
                });
            }
            let mut values = Vec::with_capacity(len);
            for _ in 0..len {
                values.push(decode_value(element, reader, limits)?);
            }
            Ok(PropertyValue::Array(values))
        }
    }
}

/// Encodes one value of the codec's shape into the stream.
///
/// The encoding mirror of [`decode_value`], used to author baselines and
/// update records.
pub fn encode_value(
    codec: &PropCodec,
    value: &PropertyValue,
    writer: &mut BitWriter,
) -> EntityResult<()> {
    match (codec, value) {
        (PropCodec::Int { bits, signed }, PropertyValue::Int(v)) => {
            if *signed {
                writer.write_signed_bits(*v, *bits)?;
            } else {
                writer.write_bits(*v as u64, *bits)?;
            }
            Ok(())
        }
        (PropCodec::Float(component), PropertyValue::Float(v)) => {
            encode_float(component, *v, writer)
        }
        (PropCodec::String, PropertyValue::String(s)) => {
            writer.write_bits(s.len() as u64, STRING_LENGTH_BITS)?;
            writer.write_bytes(s.as_bytes());
            Ok(())
        }
        (PropCodec::Vector(component), PropertyValue::Vector(v)) => {
            encode_float(component, v.x as f32, writer)?;
            encode_float(component, v.y as f32, writer)?;
            encode_float(component, v.z as f32, writer)
        }
        (PropCodec::Array { max_len, element }, PropertyValue::Array(values)) => {
            if values.len() > *max_len as usize {
                return Err(EntityError::ArrayTooLong {
                    limit: *max_len as usize,
                    actual: values.len(),
                });
            }
            writer.write_bits(values.len() as u64, array_length_bits(*max_len))?;
            for element_value in values {
                encode_value(element, element_value, writer)?;
            }
            Ok(())
        }
        (codec, value) => Err(EntityError::ValueShape {
            expected: codec_shape(codec),
            found: value.shape(),
        }),
    }
}

fn decode_float(component: &FloatCodec, reader: &mut BitReader<'_>) -> EntityResult<f32> {
    match component {
        FloatCodec::Raw => Ok(reader.read_f32()?),
        FloatCodec::Quantized { bits, low, high } => {
            let raw = reader.read_bits(*bits)?;
            let max = (1u64 << *bits) - 1;
            let fraction = raw as f32 / max as f32;
            Ok(low + (high - low) * fraction)
        }
    }
}

fn encode_float(component: &FloatCodec, value: f32, writer: &mut BitWriter) -> EntityResult<()> {
    match component {
        FloatCodec::Raw => {
            writer.write_f32(value);
            Ok(())
        }
        FloatCodec::Quantized { bits, low, high } => {
            let max = (1u64 << *bits) - 1;
            let fraction = (value.clamp(*low, *high) - low) / (high - low);
            let raw = (fraction * max as f32).round() as u64;
            writer.write_bits(raw.min(max), *bits)?;
            Ok(())
        }
    }
}
