//! Immutable integer 3D position.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::Vector3D;

/// An immutable integer 3D vector, such as a block or chunk coordinate.
///
/// Arithmetic wraps on overflow, like the host's native integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPosition {
    x: i32,
    y: i32,
    z: i32,
}

impl ChunkPosition {
    /// The origin `(0, 0, 0)`.
    pub const ORIGIN: ChunkPosition = ChunkPosition::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Copies the block coordinates of a mutable real vector.
    pub fn from_vector(vector: Option<&Vector3D>) -> Result<Self> {
        vector
            .map(Self::from)
            .ok_or_else(|| Error::InvalidArgument("vector cannot be absent".to_string()))
    }

    /// Converts to an equivalent real 3D vector.
    pub fn to_vector(&self) -> Vector3D {
        Vector3D::new(self.x as f64, self.y as f64, self.z as f64)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn add(self, other: ChunkPosition) -> Self {
        Self::new(
            self.x.wrapping_add(other.x),
            self.y.wrapping_add(other.y),
            self.z.wrapping_add(other.z),
        )
    }

    pub fn subtract(self, other: ChunkPosition) -> Self {
        Self::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }

    /// Like [`add`](Self::add), for callers holding a possibly absent position.
    pub fn try_add(self, other: Option<&ChunkPosition>) -> Result<Self> {
        other
            .map(|other| self.add(*other))
            .ok_or_else(|| Error::InvalidArgument("other cannot be absent".to_string()))
    }

    /// Like [`subtract`](Self::subtract), for callers holding a possibly absent position.
    pub fn try_subtract(self, other: Option<&ChunkPosition>) -> Result<Self> {
        other
            .map(|other| self.subtract(*other))
            .ok_or_else(|| Error::InvalidArgument("other cannot be absent".to_string()))
    }

    /// Multiplies each dimension by `factor`.
    pub fn multiply(self, factor: i32) -> Self {
        Self::new(
            self.x.wrapping_mul(factor),
            self.y.wrapping_mul(factor),
            self.z.wrapping_mul(factor),
        )
    }

    /// Divides each dimension by `divisor`, truncating toward zero.
    pub fn divide(self, divisor: i32) -> Result<Self> {
        if divisor == 0 {
            return Err(Error::InvalidArgument("cannot divide by zero".to_string()));
        }

        Ok(Self::new(
            self.x.wrapping_div(divisor),
            self.y.wrapping_div(divisor),
            self.z.wrapping_div(divisor),
        ))
    }

    /// Combined hash of the coordinates, stable across processes.
    pub fn hash_code(&self) -> i32 {
        [self.x, self.y, self.z]
            .iter()
            .fold(1i32, |acc, v| acc.wrapping_mul(31).wrapping_add(*v))
    }
}

impl From<&Vector3D> for ChunkPosition {
    fn from(vector: &Vector3D) -> Self {
        Self::new(vector.block_x(), vector.block_y(), vector.block_z())
    }
}

impl From<ChunkPosition> for Vector3D {
    fn from(position: ChunkPosition) -> Self {
        position.to_vector()
    }
}

impl From<ChunkPosition> for nalgebra::Vector3<f64> {
    fn from(position: ChunkPosition) -> Self {
        position.to_vector().0
    }
}

impl From<(i32, i32, i32)> for ChunkPosition {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i32; 3]> for ChunkPosition {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for ChunkPosition {
    type Output = ChunkPosition;

    fn add(self, rhs: ChunkPosition) -> ChunkPosition {
        ChunkPosition::add(self, rhs)
    }
}

impl Sub for ChunkPosition {
    type Output = ChunkPosition;

    fn sub(self, rhs: ChunkPosition) -> ChunkPosition {
        self.subtract(rhs)
    }
}

impl Mul<i32> for ChunkPosition {
    type Output = ChunkPosition;

    fn mul(self, rhs: i32) -> ChunkPosition {
        self.multiply(rhs)
    }
}

impl fmt::Display for ChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    const SAMPLES: [(i32, i32, i32); 6] = [
        (0, 0, 0),
        (1, 2, 3),
        (-7, 64, 12),
        (i32::MAX, i32::MIN, -1),
        (30_000_000, -255, 4),
        (-1, -1, -1),
    ];

    fn std_hash(position: &ChunkPosition) -> u64 {
        let mut hasher = DefaultHasher::new();
        position.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn construction_keeps_coordinates() {
        for (x, y, z) in SAMPLES {
            let position = ChunkPosition::new(x, y, z);
            assert_eq!((position.x(), position.y(), position.z()), (x, y, z));
        }
    }

    #[test]
    fn add_then_subtract_is_identity() {
        for a in SAMPLES.map(ChunkPosition::from) {
            for b in SAMPLES.map(ChunkPosition::from) {
                assert_eq!(a.add(b).subtract(b), a);
                assert_eq!(a + b - b, a);
            }
        }
    }

    #[test]
    fn multiply_scales_each_coordinate() {
        let a = ChunkPosition::new(3, -4, 5);
        for k in [-3, -1, 1, 2, 16] {
            assert_eq!(a.multiply(k), ChunkPosition::new(3 * k, -4 * k, 5 * k));
            assert_eq!(a * k, a.multiply(k));
        }
    }

    #[test]
    fn divide_truncates_toward_zero() {
        assert_eq!(
            ChunkPosition::new(10, 10, 10).divide(3).unwrap(),
            ChunkPosition::new(3, 3, 3)
        );
        assert_eq!(
            ChunkPosition::new(-7, 7, -1).divide(2).unwrap(),
            ChunkPosition::new(-3, 3, 0)
        );
    }

    #[test]
    fn divide_by_zero_is_invalid_argument() {
        for a in SAMPLES.map(ChunkPosition::from) {
            assert!(matches!(a.divide(0), Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn overflow_wraps() {
        let max = ChunkPosition::new(i32::MAX, i32::MIN, 0);

        assert_eq!(
            max.add(ChunkPosition::new(1, 0, 0)),
            ChunkPosition::new(i32::MIN, i32::MIN, 0)
        );
        assert_eq!(
            max.divide(-1).unwrap(),
            ChunkPosition::new(-i32::MAX, i32::MIN, 0)
        );
    }

    #[test]
    fn origin_is_additive_identity() {
        assert_eq!(
            ChunkPosition::ORIGIN.add(ChunkPosition::new(1, 2, 3)),
            ChunkPosition::new(1, 2, 3)
        );
        assert_eq!(ChunkPosition::ORIGIN, ChunkPosition::default());
    }

    #[test]
    fn absent_operands_are_rejected() {
        let a = ChunkPosition::new(1, 1, 1);

        assert!(matches!(a.try_add(None), Err(Error::InvalidArgument(_))));
        assert!(matches!(a.try_subtract(None), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            ChunkPosition::from_vector(None),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            a.try_add(Some(&ChunkPosition::new(1, 2, 3))).unwrap(),
            ChunkPosition::new(2, 3, 4)
        );
        assert_eq!(
            a.try_subtract(Some(&ChunkPosition::new(1, 2, 3))).unwrap(),
            ChunkPosition::new(0, -1, -2)
        );
    }

    #[test]
    fn vector_round_trip_matches_direct_truncation() {
        let vectors = [
            Vector3D::new(0.5, 63.99, -0.5),
            Vector3D::new(-12.01, 7.0, 1e6 + 0.25),
            Vector3D::new(3.0, -3.0, 0.0),
        ];

        for v in vectors {
            let position = ChunkPosition::from_vector(Some(&v)).unwrap();
            let again = ChunkPosition::from(&position.to_vector());

            assert_eq!(again, position);
            assert_eq!(
                (again.x(), again.y(), again.z()),
                (v.block_x(), v.block_y(), v.block_z())
            );
        }
    }

    #[test]
    fn equal_positions_hash_equally() {
        for (x, y, z) in SAMPLES {
            let a = ChunkPosition::new(x, y, z);
            let b = ChunkPosition::new(x, y, z);

            assert_eq!(a, b);
            assert_eq!(std_hash(&a), std_hash(&b));
            assert_eq!(a.hash_code(), b.hash_code());
        }
    }

    #[test]
    fn differing_in_one_coordinate_is_unequal() {
        let base = ChunkPosition::new(1, 2, 3);

        assert_ne!(base, ChunkPosition::new(0, 2, 3));
        assert_ne!(base, ChunkPosition::new(1, 0, 3));
        assert_ne!(base, ChunkPosition::new(1, 2, 0));
    }

    #[test]
    fn hash_code_is_order_sensitive_and_stable() {
        // ((31 + 1) * 31 + 2) * 31 + 3
        assert_eq!(ChunkPosition::new(1, 2, 3).hash_code(), 30817);
        assert_eq!(ChunkPosition::ORIGIN.hash_code(), 29791);
        assert_ne!(
            ChunkPosition::new(1, 2, 3).hash_code(),
            ChunkPosition::new(3, 2, 1).hash_code()
        );
    }

    #[test]
    fn serializes_as_named_coordinates() {
        let position = ChunkPosition::new(2, -3, 4);
        let json = serde_json::to_value(position).unwrap();

        assert_eq!(json, serde_json::json!({ "x": 2, "y": -3, "z": 4 }));
        assert_eq!(
            serde_json::from_value::<ChunkPosition>(json).unwrap(),
            position
        );
    }

    #[test]
    fn displays_as_tuple() {
        assert_eq!(ChunkPosition::new(1, -2, 3).to_string(), "(1, -2, 3)");
    }
}
