//! Ellipse geometry

use crate::types::Vector3;

/// An ellipse or elliptical arc
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    /// Center point, in world coordinates
    pub center: Vector3,
    /// Endpoint of the major axis, relative to the center
    pub major_axis: Vector3,
    /// Extrusion direction
    pub normal: Vector3,
    /// Ratio of minor axis to major axis
    pub minor_axis_ratio: f64,
    /// Start parameter (0 for a full ellipse)
    pub start_parameter: f64,
    /// End parameter (2π for a full ellipse)
    pub end_parameter: f64,
}

impl Ellipse {
    pub fn major_radius(&self) -> f64 {
        let v = self.major_axis;
        (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
    }

    pub fn minor_radius(&self) -> f64 {
        self.major_radius() * self.minor_axis_ratio
    }

    /// Whether the parameters span the whole ellipse
    pub fn is_full(&self) -> bool {
        (self.end_parameter - self.start_parameter - std::f64::consts::TAU).abs() < 1e-10
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Ellipse {
            center: Vector3::ZERO,
            major_axis: Vector3::new(1.0, 0.0, 0.0),
            normal: Vector3::UNIT_Z,
            minor_axis_ratio: 0.5,
            start_parameter: 0.0,
            end_parameter: std::f64::consts::TAU,
        }
    }
}
