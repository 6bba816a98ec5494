//! Server-class descriptors and property codec definitions for the propdec
//! replay decoder.
//!
//! This crate defines how an entity's state is described for decoding:
//! - Server classes with their ordered, flattened property entries
//! - Property codecs (integers, quantized/raw floats, strings, vectors,
//!   arrays)
//! - Construction-time validation of codec parameters
//!
//! # Design Principles
//!
//! - **Descriptors are pre-built** - Flattening raw send-table metadata into
//!   entry lists happens upstream; this crate only models the result.
//! - **Index is identity** - An entry's position in the class is the stable
//!   property index used on the wire and in every API.
//! - **Shared, immutable** - One class descriptor is shared by every entity
//!   of that class and never changes after construction.

mod class;
mod codec;
mod error;

pub use class::{PropEntry, ServerClass, ServerClassBuilder};
pub use codec::{array_length_bits, FloatCodec, PropCodec};
pub use error::{SchemaError, SchemaResult};
