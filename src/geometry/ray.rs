//! Ray and construction line geometry

use crate::types::Vector3;

/// A line that starts at a point and extends infinitely in one direction
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub base_point: Vector3,
    /// Unit direction vector
    pub direction: Vector3,
}

/// A construction line, infinite in both directions
#[derive(Debug, Clone, PartialEq)]
pub struct XLine {
    pub base_point: Vector3,
    pub direction: Vector3,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            base_point: Vector3::ZERO,
            direction: Vector3::new(1.0, 0.0, 0.0),
        }
    }
}

impl Default for XLine {
    fn default() -> Self {
        XLine {
            base_point: Vector3::ZERO,
            direction: Vector3::new(1.0, 0.0, 0.0),
        }
    }
}
