//! Spatial math for trajectory interpolation and distance calculations.
//!
//! All geometry is expressed in a local Cartesian frame (meters). Flights
//! planned in 2D simply keep `z = 0`, so there is a single 3D code path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A point (or displacement) in the local 3D frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Position) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Straight-line distance to another point.
    pub fn distance_to(self, other: Position) -> f64 {
        euclidean_distance(self, other)
    }

    /// Point at `ratio` of the way from `self` to `other` (unclamped).
    pub fn lerp(self, other: Position, ratio: f64) -> Position {
        self + (other - self) * ratio
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<(f64, f64, f64)> for Position {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Position::new(x, y, z)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Calculate 3D Euclidean distance between two points in meters.
pub fn euclidean_distance(p1: Position, p2: Position) -> f64 {
    (p1 - p2).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_known_distance() {
        let dist = euclidean_distance(Position::new(0.0, 0.0, 0.0), Position::new(3.0, 4.0, 12.0));
        assert!((dist - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_same_point() {
        let p = Position::new(33.6, -117.8, 50.0);
        assert_eq!(euclidean_distance(p, p), 0.0);
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(10.0, -4.0, 2.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Position::new(5.0, -2.0, 1.0));
    }

    #[test]
    fn z_defaults_to_zero_when_missing() {
        let p: Position = serde_json::from_str(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert_eq!(p, Position::new(1.0, 2.0, 0.0));
    }
}
