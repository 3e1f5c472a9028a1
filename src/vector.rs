//! Mutable real-valued 3D vector.
//!
//! This is the vector type the rest of a host integration passes around (entity
//! locations, velocities). It is mutable and fractional; [`ChunkPosition`] is its
//! immutable integer counterpart.
//!
//! [`ChunkPosition`]: crate::ChunkPosition

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A mutable 3D vector with `f64` components.
///
/// Internally uses [`nalgebra::Vector3<f64>`] for downstream math convenience.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3D(pub Vector3<f64>);

impl Vector3D {
    /// Convenience constructor.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.0.x = x;
        self
    }

    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.0.y = y;
        self
    }

    pub fn set_z(&mut self, z: f64) -> &mut Self {
        self.0.z = z;
        self
    }

    /// Block coordinate of the x component (floored).
    pub fn block_x(&self) -> i32 {
        floor_to_block(self.0.x)
    }

    /// Block coordinate of the y component (floored).
    pub fn block_y(&self) -> i32 {
        floor_to_block(self.0.y)
    }

    /// Block coordinate of the z component (floored).
    pub fn block_z(&self) -> i32 {
        floor_to_block(self.0.z)
    }
}

impl Default for Vector3D {
    fn default() -> Self {
        Self(Vector3::zeros())
    }
}

impl From<Vector3<f64>> for Vector3D {
    fn from(value: Vector3<f64>) -> Self {
        Self(value)
    }
}

impl From<Vector3D> for Vector3<f64> {
    fn from(value: Vector3D) -> Self {
        value.0
    }
}

// Saturating float-to-int cast; NaN maps to 0.
#[inline]
fn floor_to_block(value: f64) -> i32 {
    value.floor() as i32
}
