//! Immutable integer positions and their conversion to opaque host types.
//!
//! This crate defines:
//! - [`ChunkPosition`]: an immutable integer 3D vector with value semantics.
//! - [`Vector3D`]: the mutable real vector it converts to and from.
//! - [`PositionConverter`]: reads and builds the host's own position objects, even
//!   when a host build renames their fields.
//! - [`LayoutTable`]: per-version field-descriptor tables for host types.

pub mod converter;
pub mod error;
pub mod host;
pub mod position;
pub mod reflect;
pub mod table;
pub mod vector;

// Re-export for downstream crates so they can build vectors without declaring a direct
// dependency on `nalgebra`.
pub use nalgebra;

pub use converter::{EquivalentConverter, PositionConverter};
pub use error::{Error, Result};
pub use host::HostObject;
pub use position::ChunkPosition;
pub use reflect::{
    FieldAccessError, FieldDescriptor, FieldValue, LayoutReflector, PrimitiveKind, Reflector,
    Structure, StructureModifier, TypeLayout,
};
pub use table::{LayoutTable, NegotiatedLayouts};
pub use vector::Vector3D;

/// Runtime name of the host's position type.
pub const DEFAULT_EXTERNAL_TYPE: &str = "net.minecraft.server.ChunkPosition";

/// Conventional names of the coordinate fields, in `x`, `y`, `z` order.
pub const COORDINATE_NAMES: [&str; 3] = ["x", "y", "z"];

/// Minimum number of `int` fields an external position type must declare.
pub const MIN_INT_FIELDS: usize = 3;
