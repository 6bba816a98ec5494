//! Delta-compressed entity state decoding.
//!
//! Replay streams carry per-entity update records: a variable-length list
//! of changed property indices followed by the new value of each. This
//! crate turns those records into observable state. An [`Entity`] holds one
//! [`Property`] per flattened class entry; [`Entity::apply_update`] decodes
//! a record against the class schema and fires each changed property's
//! observers, and [`Entity::capture_baseline`] snapshots a class's default
//! record for cheap seeding of later instances.
//!
//! # Design Principles
//!
//! - **Schema-driven.** Wire layout comes entirely from the
//!   [`ServerClass`](schema::ServerClass); entities never guess widths.
//! - **Caller-owned scratch.** Update decoding borrows its index buffer
//!   from an explicit [`IndexPool`], so steady-state decoding does not
//!   allocate and pooling policy stays in the caller's hands.
//! - **Explicit limits.** Attacker-controlled lengths are checked against
//!   [`DecodeLimits`] before memory is committed.
//! - **Fail closed.** Any malformed record aborts with an [`EntityError`];
//!   partial updates may have fired observers, but no error is ever
//!   silently swallowed.

mod delta;
mod entity;
mod error;
mod limits;
mod property;
mod scratch;
mod value;

pub use delta::{read_field_index, write_field_index, write_field_list_end};
pub use entity::{Baseline, Entity};
pub use error::{EntityError, EntityResult};
pub use limits::DecodeLimits;
pub use property::{BindTarget, Property, UpdateHandler};
pub use scratch::IndexPool;
pub use value::{decode_value, encode_value, PropertyValue, Vector};
