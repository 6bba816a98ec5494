//! Server-class descriptors and validation.

use crate::codec::{FloatCodec, PropCodec};
use crate::error::{SchemaError, SchemaResult};

/// A flattened property entry: name plus the codec its values decode with.
///
/// Entries are immutable once the class is built; the entry's position in
/// the class is the stable property index used on the wire.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropEntry {
    pub name: String,
    pub codec: PropCodec,
}

impl PropEntry {
    /// Creates a flattened property entry.
    #[must_use]
    pub fn new(name: impl Into<String>, codec: PropCodec) -> Self {
        Self {
            name: name.into(),
            codec,
        }
    }
}

/// A server class: an ordered list of flattened property entries shared by
/// every entity of that class.
///
/// Duplicate entry names are not rejected here. The wire protocol addresses
/// properties by index, so a class with a repeated name still decodes;
/// name-based lookup is where the duplicate becomes a fatal condition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerClass {
    id: u16,
    name: String,
    entries: Vec<PropEntry>,
}

impl ServerClass {
    /// Creates a server class after validating every entry codec.
    pub fn new(id: u16, name: impl Into<String>, entries: Vec<PropEntry>) -> SchemaResult<Self> {
        let class = Self {
            id,
            name: name.into(),
            entries,
        };
        class.validate()?;
        Ok(class)
    }

    /// Creates a server-class builder.
    #[must_use]
    pub fn builder(id: u16, name: impl Into<String>) -> ServerClassBuilder {
        ServerClassBuilder {
            id,
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the class ID.
    #[must_use]
    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the flattened property entries in wire order.
    #[must_use]
    pub fn entries(&self) -> &[PropEntry] {
        &self.entries
    }

    /// Returns the entry at a property index, if in range.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&PropEntry> {
        self.entries.get(index)
    }

    /// Validates every entry codec.
    pub fn validate(&self) -> SchemaResult<()> {
        for entry in &self.entries {
            validate_codec(&entry.codec)?;
        }
        Ok(())
    }
}

/// Builder for [`ServerClass`].
#[derive(Debug)]
pub struct ServerClassBuilder {
    id: u16,
    name: String,
    entries: Vec<PropEntry>,
}

impl ServerClassBuilder {
    /// Adds a flattened property entry.
    #[must_use]
    pub fn entry(mut self, entry: PropEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Builds the server class after validation.
    pub fn build(self) -> SchemaResult<ServerClass> {
        ServerClass::new(self.id, self.name, self.entries)
    }
}

fn validate_codec(codec: &PropCodec) -> SchemaResult<()> {
    match codec {
        PropCodec::Int { bits, .. } => validate_bits(*bits),
        PropCodec::Float(component) | PropCodec::Vector(component) => {
            validate_float(*component)
        }
        PropCodec::String => Ok(()),
        PropCodec::Array { max_len, element } => {
            if *max_len == 0 {
                return Err(SchemaError::InvalidArrayLength { max_len: *max_len });
            }
            if matches!(**element, PropCodec::Array { .. }) {
                return Err(SchemaError::NestedArray);
            }
            validate_codec(element)
        }
    }
}

fn validate_bits(bits: u8) -> SchemaResult<()> {
    if bits == 0 || bits > 32 {
        return Err(SchemaError::InvalidBitWidth { bits });
    }
    Ok(())
}

fn validate_float(component: FloatCodec) -> SchemaResult<()> {
    match component {
        FloatCodec::Raw => Ok(()),
        FloatCodec::Quantized { bits, low, high } => {
            validate_bits(bits)?;
            if low >= high {
                return Err(SchemaError::InvalidFloatRange { low, high });
            }
            Ok(())
        }
    }
}
