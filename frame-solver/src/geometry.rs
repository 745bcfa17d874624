//! Plane geometry primitives
//!
//! Coordinates follow the structural convention used throughout the crate:
//! `x` points right and `z` points down. Plotting code flips `z` to get an
//! upward `y`.

use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// An immutable point in the x-z plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Z coordinate (positive downward)
    pub z: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Length of the vector from the origin to this point
    pub fn modulus(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Calculate distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (*other - *self).modulus()
    }

    /// Check that both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.z - other.z)
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}
