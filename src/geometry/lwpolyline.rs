//! Lightweight polyline geometry (2D polyline with bulges)

use bitflags::bitflags;

use crate::types::{Vector2, Vector3};

bitflags! {
    /// Flag word stored at the start of a lightweight polyline. Most bits
    /// announce which optional fields follow.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LwPolylineFlags: i16 {
        /// Extrusion direction stored (otherwise unit Z)
        const HAS_EXTRUSION = 0x0001;
        /// Thickness stored
        const HAS_THICKNESS = 0x0002;
        /// Constant width stored
        const HAS_CONSTANT_WIDTH = 0x0004;
        /// Elevation stored
        const HAS_ELEVATION = 0x0008;
        /// Bulge count and bulges stored
        const HAS_BULGES = 0x0010;
        /// Width count and per-vertex widths stored
        const HAS_WIDTHS = 0x0020;
        /// Linetype pattern generated continuously around vertices
        const PLINEGEN = 0x0100;
        /// Closed polyline
        const CLOSED = 0x0200;
    }
}

/// A vertex in a lightweight polyline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LwVertex {
    /// Location of the vertex, in object coordinates
    pub location: Vector2,
    /// Bulge value (for arc segments)
    /// 0 = straight line, positive = counterclockwise arc, negative = clockwise arc
    pub bulge: f64,
    pub start_width: f64,
    pub end_width: f64,
}

impl LwVertex {
    pub fn new(location: Vector2) -> Self {
        LwVertex {
            location,
            ..Default::default()
        }
    }
}

/// A lightweight (2D) polyline
#[derive(Debug, Clone, PartialEq)]
pub struct LwPolyline {
    pub flags: LwPolylineFlags,
    pub vertices: Vec<LwVertex>,
    /// Every stored bulge in file order, including any past the last vertex
    pub bulges: Vec<f64>,
    pub constant_width: f64,
    pub elevation: f64,
    pub thickness: f64,
    pub normal: Vector3,
}

impl LwPolyline {
    pub fn is_closed(&self) -> bool {
        self.flags.contains(LwPolylineFlags::CLOSED)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex locations lifted to 3D at the polyline's elevation.
    pub fn points(&self) -> impl Iterator<Item = Vector3> + '_ {
        self.vertices
            .iter()
            .map(move |v| v.location.with_z(self.elevation))
    }
}

impl Default for LwPolyline {
    fn default() -> Self {
        LwPolyline {
            flags: LwPolylineFlags::empty(),
            vertices: Vec::new(),
            bulges: Vec::new(),
            constant_width: 0.0,
            elevation: 0.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }
}
