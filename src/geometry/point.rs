//! Point geometry

use crate::types::Vector3;

/// A single point
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub location: Vector3,
    pub thickness: f64,
    pub normal: Vector3,
    /// Angle of the X axis of the point's display UCS
    pub x_axis_angle: f64,
}

impl Default for Point {
    fn default() -> Self {
        Point {
            location: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
            x_axis_angle: 0.0,
        }
    }
}
