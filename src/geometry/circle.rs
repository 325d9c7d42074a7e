//! Circle and arc geometry

use std::f64::consts::PI;

use crate::types::Vector3;

/// A full circle
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Center point, in object coordinates
    pub center: Vector3,
    pub radius: f64,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    /// Extrusion direction
    pub normal: Vector3,
}

impl Circle {
    /// Create a circle with the default extrusion and no thickness
    pub fn from_center_radius(center: Vector3, radius: f64) -> Self {
        Circle {
            center,
            radius,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::from_center_radius(Vector3::ZERO, 1.0)
    }
}

/// A circular arc, angles in radians measured counterclockwise from the
/// object X axis
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Vector3,
    pub radius: f64,
    pub thickness: f64,
    pub normal: Vector3,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    /// Included angle, always in `[0, 2π)`.
    pub fn sweep(&self) -> f64 {
        (self.end_angle - self.start_angle).rem_euclid(2.0 * PI)
    }
}

impl Default for Arc {
    fn default() -> Self {
        Arc {
            center: Vector3::ZERO,
            radius: 1.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
            start_angle: 0.0,
            end_angle: PI,
        }
    }
}
