/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Vector3D type for wave and polarization directions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

/// Vectors shorter than this are treated as null
pub const NULL_TOLERANCE: f64 = 1e-10;

/// Represents a 3D direction such as a wave or polarization vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vector3D {
    /// Create a new 3D vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Components as an array, in x, y, z order
    pub fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Calculate the length (magnitude) of the vector
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Whether every component is zero within [`NULL_TOLERANCE`]
    pub fn is_null(&self) -> bool {
        self.length() <= NULL_TOLERANCE
    }

    /// Calculate the dot product with another vector
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Whether the two vectors are perpendicular, i.e. the cosine of their
    /// angle is within [`NULL_TOLERANCE`] of zero
    pub fn is_perpendicular(&self, other: &Self) -> bool {
        self.dot(other).abs() <= NULL_TOLERANCE * self.length() * other.length()
    }

    /// Calculate the cross product with another vector
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Unit vector along this one, or `None` for a null vector
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len > NULL_TOLERANCE {
            Some(Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_operations() {
        let v1 = Vector3D::new(1.0, 2.0, 3.0);
        let v2 = Vector3D::new(4.0, 5.0, 6.0);

        assert_relative_eq!(v1.length(), 3.741657, epsilon = 1e-6);
        assert_relative_eq!(v1.dot(&v2), 32.0, epsilon = 1e-6);

        let cross = v1.cross(&v2);
        assert_relative_eq!(cross.x, -3.0, epsilon = 1e-6);
        assert_relative_eq!(cross.y, 6.0, epsilon = 1e-6);
        assert_relative_eq!(cross.z, -3.0, epsilon = 1e-6);

        let norm = v1.normalize().unwrap();
        assert_relative_eq!(norm.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_null_and_perpendicular() {
        assert!(Vector3D::default().is_null());
        assert!(Vector3D::default().normalize().is_none());

        let kin = Vector3D::new(0.0, 0.0, -1.0);
        assert!(kin.is_perpendicular(&Vector3D::new(0.0, 1.0, 0.0)));
        assert!(kin.is_perpendicular(&Vector3D::new(1.0, 0.0, 1e-12)));
        assert!(!kin.is_perpendicular(&Vector3D::new(0.0, 1.0, 1e-6)));
    }

    #[test]
    fn test_perpendicular_ignores_length() {
        let kin = Vector3D::new(0.0, 0.0, -1e6);
        assert!(kin.is_perpendicular(&Vector3D::new(1e6, 0.0, 1e-6)));

        let tilted = Vector3D::new(0.0, 1.0, 1e-6);
        assert!(!kin.is_perpendicular(&tilted));
        assert!(!Vector3D::new(0.0, 0.0, -1e-6).is_perpendicular(&tilted));
    }
}
