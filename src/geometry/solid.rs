//! Filled 2D solid and 3D face geometry

use bitflags::bitflags;

use crate::types::Vector3;

/// A filled triangle or quadrilateral.
///
/// Corners are stored in the order the file keeps them, which draws the
/// third and fourth corners crossed. A triangle repeats the third corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub first_corner: Vector3,
    pub second_corner: Vector3,
    pub third_corner: Vector3,
    pub fourth_corner: Vector3,
    pub thickness: f64,
    pub normal: Vector3,
}

impl Solid {
    pub fn is_triangle(&self) -> bool {
        self.third_corner == self.fourth_corner
    }
}

impl Default for Solid {
    fn default() -> Self {
        Solid {
            first_corner: Vector3::ZERO,
            second_corner: Vector3::ZERO,
            third_corner: Vector3::ZERO,
            fourth_corner: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }
}

bitflags! {
    /// Invisible edge flags for Face3D
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InvisibleEdgeFlags: i16 {
        const FIRST = 0x1;
        const SECOND = 0x2;
        const THIRD = 0x4;
        const FOURTH = 0x8;
    }
}

/// A three- or four-sided face in space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face3D {
    pub first_corner: Vector3,
    pub second_corner: Vector3,
    pub third_corner: Vector3,
    pub fourth_corner: Vector3,
    pub invisible_edges: InvisibleEdgeFlags,
}

impl Face3D {
    pub fn corners(&self) -> [Vector3; 4] {
        [
            self.first_corner,
            self.second_corner,
            self.third_corner,
            self.fourth_corner,
        ]
    }
}
