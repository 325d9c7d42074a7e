//! Line geometry

use crate::types::Vector3;

/// A straight segment between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Vector3,
    pub end: Vector3,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    pub normal: Vector3,
}

impl Line {
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    pub fn length(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let dz = self.end.z - self.start.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Whether both endpoints lie in the Z = 0 plane
    pub fn is_planar(&self) -> bool {
        self.start.z == 0.0 && self.end.z == 0.0
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::from_points(Vector3::ZERO, Vector3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        let line = Line::from_points(Vector3::ZERO, Vector3::new(3.0, 4.0, 0.0));
        assert_eq!(line.length(), 5.0);
        assert!(line.is_planar());
    }
}
