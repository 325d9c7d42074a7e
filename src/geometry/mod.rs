//! Decoded geometry records.
//!
//! Every geometry-bearing object decodes to one [`Geometry`] variant. Values
//! are produced fresh on each decode and owned by the caller.

pub mod circle;
pub mod ellipse;
pub mod line;
pub mod lwpolyline;
pub mod point;
pub mod polyline3d;
pub mod ray;
pub mod solid;
pub mod text;

pub use circle::{Arc, Circle};
pub use ellipse::Ellipse;
pub use line::Line;
pub use lwpolyline::{LwPolyline, LwPolylineFlags, LwVertex};
pub use point::Point;
pub use polyline3d::{Polyline3D, Vertex3D};
pub use ray::{Ray, XLine};
pub use solid::{Face3D, InvisibleEdgeFlags, Solid};
pub use text::{Text, TextDataFlags, TextHorizontalAlignment, TextVerticalAlignment};

use crate::io::dwg::object_type::DwgObjectType;

/// A decoded geometry-bearing entity
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Point(Point),
    Line(Line),
    LwPolyline(LwPolyline),
    Text(Text),
    Polyline3D(Polyline3D),
    Ray(Ray),
    XLine(XLine),
    Solid(Solid),
    Face3D(Face3D),
}

impl Geometry {
    /// The object type this geometry was decoded from
    pub fn object_type(&self) -> DwgObjectType {
        match self {
            Geometry::Circle(_) => DwgObjectType::Circle,
            Geometry::Arc(_) => DwgObjectType::Arc,
            Geometry::Ellipse(_) => DwgObjectType::Ellipse,
            Geometry::Point(_) => DwgObjectType::Point,
            Geometry::Line(_) => DwgObjectType::Line,
            Geometry::LwPolyline(_) => DwgObjectType::LwPolyline,
            Geometry::Text(_) => DwgObjectType::Text,
            Geometry::Polyline3D(_) => DwgObjectType::Polyline3D,
            Geometry::Ray(_) => DwgObjectType::Ray,
            Geometry::XLine(_) => DwgObjectType::Xline,
            Geometry::Solid(_) => DwgObjectType::Solid,
            Geometry::Face3D(_) => DwgObjectType::Face3D,
        }
    }

    /// Type name, e.g. `LWPOLYLINE`
    pub fn name(&self) -> &'static str {
        self.object_type().name()
    }
}

macro_rules! impl_from_geometry {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Geometry::$variant(value)
                }
            }
        )*
    };
}

impl_from_geometry!(Circle, Arc, Ellipse, Point, Line, LwPolyline, Text, Polyline3D, Ray, XLine, Solid, Face3D);
