//! DWG object type codes.
//!
//! Built-in object types have fixed numeric codes. Codes from
//! [`CUSTOM_CLASS_BASE`] upwards index the classes section instead
//! (`classes[code - 500]`).

use crate::classes::DwgClassList;
use crate::io::dwg::constants::CUSTOM_CLASS_BASE;

/// Fixed DWG object type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum DwgObjectType {
    Unused = 0,
    Text = 1,
    Attrib = 2,
    Attdef = 3,
    Block = 4,
    Endblk = 5,
    Seqend = 6,
    Insert = 7,
    Minsert = 8,
    Vertex2D = 0x0A,
    Vertex3D = 0x0B,
    VertexMesh = 0x0C,
    VertexPface = 0x0D,
    VertexPfaceFace = 0x0E,
    Polyline2D = 0x0F,
    Polyline3D = 0x10,
    Arc = 0x11,
    Circle = 0x12,
    Line = 0x13,
    DimensionOrdinate = 0x14,
    DimensionLinear = 0x15,
    DimensionAligned = 0x16,
    DimensionAng3Pt = 0x17,
    DimensionAng2Ln = 0x18,
    DimensionRadius = 0x19,
    DimensionDiameter = 0x1A,
    Point = 0x1B,
    Face3D = 0x1C,
    PolylinePface = 0x1D,
    PolylineMesh = 0x1E,
    Solid = 0x1F,
    Trace = 0x20,
    Shape = 0x21,
    Viewport = 0x22,
    Ellipse = 0x23,
    Spline = 0x24,
    Region = 0x25,
    Solid3D = 0x26,
    Body = 0x27,
    Ray = 0x28,
    Xline = 0x29,
    Dictionary = 0x2A,
    OleFrame = 0x2B,
    Mtext = 0x2C,
    Leader = 0x2D,
    Tolerance = 0x2E,
    Mline = 0x2F,
    BlockControlObj = 0x30,
    BlockHeader = 0x31,
    LayerControlObj = 0x32,
    Layer = 0x33,
    StyleControlObj = 0x34,
    Style = 0x35,
    LtypeControlObj = 0x38,
    Ltype = 0x39,
    ViewControlObj = 0x3C,
    View = 0x3D,
    UcsControlObj = 0x3E,
    Ucs = 0x3F,
    VportControlObj = 0x40,
    Vport = 0x41,
    AppidControlObj = 0x42,
    Appid = 0x43,
    DimstyleControlObj = 0x44,
    Dimstyle = 0x45,
    VpEntHdrCtrlObj = 0x46,
    VpEntHdr = 0x47,
    Group = 0x48,
    MlineStyle = 0x49,
    Ole2Frame = 0x4A,
    Dummy = 0x4B,
    LongTransaction = 0x4C,
    LwPolyline = 0x4D,
    Hatch = 0x4E,
    XRecord = 0x4F,
    AcDbPlaceholder = 0x50,
    VbaProject = 0x51,
    Layout = 0x52,
    AcadProxyEntity = 0x1F2,
    AcadProxyObject = 0x1F3,
}

impl DwgObjectType {
    /// Look up a built-in type. `None` means the code is either a custom
    /// class or not assigned at all.
    pub fn from_code(code: i16) -> Option<Self> {
        use DwgObjectType::*;
        let t = match code {
            0 => Unused,
            1 => Text,
            2 => Attrib,
            3 => Attdef,
            4 => Block,
            5 => Endblk,
            6 => Seqend,
            7 => Insert,
            8 => Minsert,
            0x0A => Vertex2D,
            0x0B => Vertex3D,
            0x0C => VertexMesh,
            0x0D => VertexPface,
            0x0E => VertexPfaceFace,
            0x0F => Polyline2D,
            0x10 => Polyline3D,
            0x11 => Arc,
            0x12 => Circle,
            0x13 => Line,
            0x14 => DimensionOrdinate,
            0x15 => DimensionLinear,
            0x16 => DimensionAligned,
            0x17 => DimensionAng3Pt,
            0x18 => DimensionAng2Ln,
            0x19 => DimensionRadius,
            0x1A => DimensionDiameter,
            0x1B => Point,
            0x1C => Face3D,
            0x1D => PolylinePface,
            0x1E => PolylineMesh,
            0x1F => Solid,
            0x20 => Trace,
            0x21 => Shape,
            0x22 => Viewport,
            0x23 => Ellipse,
            0x24 => Spline,
            0x25 => Region,
            0x26 => Solid3D,
            0x27 => Body,
            0x28 => Ray,
            0x29 => Xline,
            0x2A => Dictionary,
            0x2B => OleFrame,
            0x2C => Mtext,
            0x2D => Leader,
            0x2E => Tolerance,
            0x2F => Mline,
            0x30 => BlockControlObj,
            0x31 => BlockHeader,
            0x32 => LayerControlObj,
            0x33 => Layer,
            0x34 => StyleControlObj,
            0x35 => Style,
            0x38 => LtypeControlObj,
            0x39 => Ltype,
            0x3C => ViewControlObj,
            0x3D => View,
            0x3E => UcsControlObj,
            0x3F => Ucs,
            0x40 => VportControlObj,
            0x41 => Vport,
            0x42 => AppidControlObj,
            0x43 => Appid,
            0x44 => DimstyleControlObj,
            0x45 => Dimstyle,
            0x46 => VpEntHdrCtrlObj,
            0x47 => VpEntHdr,
            0x48 => Group,
            0x49 => MlineStyle,
            0x4A => Ole2Frame,
            0x4B => Dummy,
            0x4C => LongTransaction,
            0x4D => LwPolyline,
            0x4E => Hatch,
            0x4F => XRecord,
            0x50 => AcDbPlaceholder,
            0x51 => VbaProject,
            0x52 => Layout,
            0x1F2 => AcadProxyEntity,
            0x1F3 => AcadProxyObject,
            _ => return None,
        };
        Some(t)
    }

    /// Get the raw code.
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Fixed type name.
    pub fn name(self) -> &'static str {
        use DwgObjectType::*;
        match self {
            Unused => "UNUSED",
            Text => "TEXT",
            Attrib => "ATTRIB",
            Attdef => "ATTDEF",
            Block => "BLOCK",
            Endblk => "ENDBLK",
            Seqend => "SEQEND",
            Insert => "INSERT",
            Minsert => "MINSERT",
            Vertex2D => "VERTEX_2D",
            Vertex3D => "VERTEX_3D",
            VertexMesh => "VERTEX_MESH",
            VertexPface => "VERTEX_PFACE",
            VertexPfaceFace => "VERTEX_PFACE_FACE",
            Polyline2D => "POLYLINE_2D",
            Polyline3D => "POLYLINE_3D",
            Arc => "ARC",
            Circle => "CIRCLE",
            Line => "LINE",
            DimensionOrdinate => "DIMENSION_ORDINATE",
            DimensionLinear => "DIMENSION_LINEAR",
            DimensionAligned => "DIMENSION_ALIGNED",
            DimensionAng3Pt => "DIMENSION_ANG_3PT",
            DimensionAng2Ln => "DIMENSION_ANG_2LN",
            DimensionRadius => "DIMENSION_RADIUS",
            DimensionDiameter => "DIMENSION_DIAMETER",
            Point => "POINT",
            Face3D => "3DFACE",
            PolylinePface => "POLYLINE_PFACE",
            PolylineMesh => "POLYLINE_MESH",
            Solid => "SOLID",
            Trace => "TRACE",
            Shape => "SHAPE",
            Viewport => "VIEWPORT",
            Ellipse => "ELLIPSE",
            Spline => "SPLINE",
            Region => "REGION",
            Solid3D => "3DSOLID",
            Body => "BODY",
            Ray => "RAY",
            Xline => "XLINE",
            Dictionary => "DICTIONARY",
            OleFrame => "OLEFRAME",
            Mtext => "MTEXT",
            Leader => "LEADER",
            Tolerance => "TOLERANCE",
            Mline => "MLINE",
            BlockControlObj => "BLOCK_CONTROL",
            BlockHeader => "BLOCK_HEADER",
            LayerControlObj => "LAYER_CONTROL",
            Layer => "LAYER",
            StyleControlObj => "STYLE_CONTROL",
            Style => "STYLE",
            LtypeControlObj => "LTYPE_CONTROL",
            Ltype => "LTYPE",
            ViewControlObj => "VIEW_CONTROL",
            View => "VIEW",
            UcsControlObj => "UCS_CONTROL",
            Ucs => "UCS",
            VportControlObj => "VPORT_CONTROL",
            Vport => "VPORT",
            AppidControlObj => "APPID_CONTROL",
            Appid => "APPID",
            DimstyleControlObj => "DIMSTYLE_CONTROL",
            Dimstyle => "DIMSTYLE",
            VpEntHdrCtrlObj => "VP_ENT_HDR_CONTROL",
            VpEntHdr => "VP_ENT_HDR",
            Group => "GROUP",
            MlineStyle => "MLINESTYLE",
            Ole2Frame => "OLE2FRAME",
            Dummy => "DUMMY",
            LongTransaction => "LONG_TRANSACTION",
            LwPolyline => "LWPOLYLINE",
            Hatch => "HATCH",
            XRecord => "XRECORD",
            AcDbPlaceholder => "ACDBPLACEHOLDER",
            VbaProject => "VBA_PROJECT",
            Layout => "LAYOUT",
            AcadProxyEntity => "ACAD_PROXY_ENTITY",
            AcadProxyObject => "ACAD_PROXY_OBJECT",
        }
    }

    /// Whether objects of this type decode to a [`Geometry`](crate::geometry::Geometry).
    pub fn is_geometry(self) -> bool {
        matches!(
            self,
            DwgObjectType::Text
                | DwgObjectType::Polyline3D
                | DwgObjectType::Arc
                | DwgObjectType::Circle
                | DwgObjectType::Line
                | DwgObjectType::Point
                | DwgObjectType::Face3D
                | DwgObjectType::Solid
                | DwgObjectType::Ellipse
                | DwgObjectType::Ray
                | DwgObjectType::Xline
                | DwgObjectType::LwPolyline
        )
    }
}

/// Resolve the name of a type code.
///
/// Built-in codes use the fixed table; anything else falls back to the
/// native (C++) class name of `classes[code - 500]`. `None` when neither
/// applies.
pub fn resolve_type_name(code: i16, classes: &DwgClassList) -> Option<&str> {
    if let Some(t) = DwgObjectType::from_code(code) {
        return Some(t.name());
    }
    if code < CUSTOM_CLASS_BASE {
        return None;
    }
    classes
        .by_type_code(code)
        .map(|class| class.cpp_class_name.as_str())
}
