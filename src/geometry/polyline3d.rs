//! 3D polyline geometry

use crate::types::{Handle, Vector3};

/// A vertex of a 3D polyline (a `VERTEX_3D` object)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex3D {
    pub handle: Handle,
    pub flags: u8,
    pub position: Vector3,
}

/// A 3D polyline with its vertices resolved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline3D {
    /// Spline fit type flags
    pub spline_flags: u8,
    /// Bit 0 set means closed
    pub closed_flags: u8,
    pub vertices: Vec<Vertex3D>,
}

impl Polyline3D {
    pub fn is_closed(&self) -> bool {
        self.closed_flags & 1 != 0
    }

    pub fn points(&self) -> impl Iterator<Item = Vector3> + '_ {
        self.vertices.iter().map(|v| v.position)
    }
}
