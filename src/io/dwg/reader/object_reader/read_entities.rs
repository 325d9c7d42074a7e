//! Type-specific entity data readers.
//!
//! Each reader starts right after the common entity data and returns the
//! finished [`Geometry`]. Entity-specific handles are taken from the handle
//! stream after the common references.

use std::io::{Read, Seek};

use ahash::AHashSet;

use crate::error::{DwgError, Result};
use crate::geometry::{
    Arc, Circle, Ellipse, Face3D, Geometry, InvisibleEdgeFlags, Line, LwPolyline,
    LwPolylineFlags, LwVertex, Point, Polyline3D, Ray, Solid, Text, TextDataFlags, Vertex3D,
    XLine,
};
use crate::io::dwg::object_type::DwgObjectType;
use crate::io::dwg::reader::bit_reader::DwgBitReader;
use crate::types::{Handle, Vector2, Vector3};

use super::common::CommonEntityHeader;
use super::{DwgObjectReader, StreamSet};

/// Read a BL element count, rejecting counts the remaining data could not
/// hold at `min_bits` bits per element.
fn read_count(reader: &mut DwgBitReader, min_bits: u64, what: &str) -> Result<usize> {
    let count = reader.read_bit_long()?;
    let count = u64::try_from(count)
        .map_err(|_| DwgError::InvalidFormat(format!("negative {what} count {count}")))?;
    if count.saturating_mul(min_bits) > reader.remaining_bits() {
        return Err(DwgError::InvalidFormat(format!(
            "{what} count {count} exceeds the object data"
        )));
    }
    Ok(count as usize)
}

impl<'a, R: Read + Seek> DwgObjectReader<'a, R> {
    pub(super) fn read_circle(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        // Center 3BD 10
        let center = r.read_3bit_double()?;
        // Radius BD 40
        let radius = r.read_bit_double()?;
        // Thickness BT 39
        let thickness = r.read_bit_thickness()?;
        // Extrusion BE 210
        let normal = r.read_bit_extrusion()?;

        Ok(Circle {
            center,
            radius,
            thickness,
            normal,
        }
        .into())
    }

    pub(super) fn read_arc(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        let center = r.read_3bit_double()?;
        let radius = r.read_bit_double()?;
        let thickness = r.read_bit_thickness()?;
        let normal = r.read_bit_extrusion()?;
        // Start angle BD 50
        let start_angle = r.read_bit_double()?;
        // End angle BD 51
        let end_angle = r.read_bit_double()?;

        Ok(Arc {
            center,
            radius,
            thickness,
            normal,
            start_angle,
            end_angle,
        }
        .into())
    }

    pub(super) fn read_ellipse(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        // Center 3BD 10
        let center = r.read_3bit_double()?;
        // SM axis vec 3BD 11 (semi-major axis vector, relative to center)
        let major_axis = r.read_3bit_double()?;
        // Extrusion 3BD 210
        let normal = r.read_3bit_double()?;
        // Axis ratio BD 40
        let minor_axis_ratio = r.read_bit_double()?;
        // Beginning angle BD 41
        let start_parameter = r.read_bit_double()?;
        // Ending angle BD 42
        let end_parameter = r.read_bit_double()?;

        Ok(Ellipse {
            center,
            major_axis,
            normal,
            minor_axis_ratio,
            start_parameter,
            end_parameter,
        }
        .into())
    }

    pub(super) fn read_point(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        let location = r.read_3bit_double()?;
        let thickness = r.read_bit_thickness()?;
        let normal = r.read_bit_extrusion()?;
        // X-axis ang BD 50
        let x_axis_angle = r.read_bit_double()?;

        Ok(Point {
            location,
            thickness,
            normal,
            x_axis_angle,
        }
        .into())
    }

    pub(super) fn read_line(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;

        // Z's are zero bit B
        let z_is_zero = r.read_bit()?;
        // Start Point x RD 10
        let start_x = r.read_raw_double()?;
        // End Point x DD 11 (default: start x)
        let end_x = r.read_bit_double_with_default(start_x)?;
        // Start Point y RD 20
        let start_y = r.read_raw_double()?;
        // End Point y DD 21 (default: start y)
        let end_y = r.read_bit_double_with_default(start_y)?;

        let (start_z, end_z) = if z_is_zero {
            (0.0, 0.0)
        } else {
            // Start Point z RD 30
            let start_z = r.read_raw_double()?;
            // End Point z DD 31 (default: start z)
            let end_z = r.read_bit_double_with_default(start_z)?;
            (start_z, end_z)
        };

        // Thickness BD 39
        let thickness = r.read_bit_double()?;
        // Extrusion BE 210
        let normal = r.read_bit_extrusion()?;

        Ok(Line {
            start: Vector3::new(start_x, start_y, start_z),
            end: Vector3::new(end_x, end_y, end_z),
            thickness,
            normal,
        }
        .into())
    }

    pub(super) fn read_lwpolyline(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        let mut pline = LwPolyline::default();

        // Flag BS 70
        pline.flags = LwPolylineFlags::from_bits_retain(r.read_bit_short()?);

        // Const width BD 43
        if pline.flags.contains(LwPolylineFlags::HAS_CONSTANT_WIDTH) {
            pline.constant_width = r.read_bit_double()?;
        }
        // Elevation BD 38
        if pline.flags.contains(LwPolylineFlags::HAS_ELEVATION) {
            pline.elevation = r.read_bit_double()?;
        }
        // Thickness BD 39
        if pline.flags.contains(LwPolylineFlags::HAS_THICKNESS) {
            pline.thickness = r.read_bit_double()?;
        }
        // Normal 3BD 210
        if pline.flags.contains(LwPolylineFlags::HAS_EXTRUSION) {
            pline.normal = r.read_3bit_double()?;
        }

        // Num points BL 90
        let num_points = read_count(r, 4, "vertex")?;
        // Num bulges BL
        let num_bulges = if pline.flags.contains(LwPolylineFlags::HAS_BULGES) {
            read_count(r, 2, "bulge")?
        } else {
            0
        };
        // Num widths BL
        let num_widths = if pline.flags.contains(LwPolylineFlags::HAS_WIDTHS) {
            read_count(r, 4, "width")?
        } else {
            0
        };

        // First point 2RD, the rest 2DD against the previous point.
        let mut previous = Vector2::ZERO;
        for i in 0..num_points {
            let location = if i == 0 {
                r.read_2raw_double()?
            } else {
                r.read_2bit_double_with_default(previous)?
            };
            pline.vertices.push(LwVertex::new(location));
            previous = location;
        }

        // Bulges BD 42
        pline.bulges.reserve(num_bulges);
        for i in 0..num_bulges {
            let bulge = r.read_bit_double()?;
            if let Some(v) = pline.vertices.get_mut(i) {
                v.bulge = bulge;
            }
            pline.bulges.push(bulge);
        }

        // Widths 2BD 40/41
        for i in 0..num_widths {
            let start_width = r.read_bit_double()?;
            let end_width = r.read_bit_double()?;
            if let Some(v) = pline.vertices.get_mut(i) {
                v.start_width = start_width;
                v.end_width = end_width;
            }
        }

        if num_bulges > num_points || num_widths > num_points {
            self.notify(
                format!(
                    "lightweight polyline stores {num_bulges} bulges and {num_widths} widths for {num_points} vertices"
                ),
                streams.offset,
            );
        }

        Ok(pline.into())
    }

    pub(super) fn read_text(
        &mut self,
        streams: &mut StreamSet,
        header: &CommonEntityHeader,
    ) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        let mut text = Text::default();

        // DataFlags RC: a set bit means the field is omitted.
        let flags = TextDataFlags::from_bits_retain(r.read_raw_char()?);

        // Elevation RD --- present if !(DataFlags & 0x01)
        if !flags.contains(TextDataFlags::NO_ELEVATION) {
            text.elevation = r.read_raw_double()?;
        }
        // Insertion pt 2RD 10
        text.insertion_point = r.read_2raw_double()?;
        // Alignment pt 2DD 11 --- present if !(DataFlags & 0x02), insertion pt as default
        text.alignment_point = if flags.contains(TextDataFlags::NO_ALIGNMENT_POINT) {
            text.insertion_point
        } else {
            r.read_2bit_double_with_default(text.insertion_point)?
        };
        // Extrusion BE 210
        text.normal = r.read_bit_extrusion()?;
        // Thickness BT 39
        text.thickness = r.read_bit_thickness()?;
        // Oblique ang RD 51 --- present if !(DataFlags & 0x04)
        if !flags.contains(TextDataFlags::NO_OBLIQUE_ANGLE) {
            text.oblique_angle = r.read_raw_double()?;
        }
        // Rotation ang RD 50 --- present if !(DataFlags & 0x08)
        if !flags.contains(TextDataFlags::NO_ROTATION) {
            text.rotation = r.read_raw_double()?;
        }
        // Height RD 40
        text.height = r.read_raw_double()?;
        // Width factor RD 41 --- present if !(DataFlags & 0x10)
        if !flags.contains(TextDataFlags::NO_WIDTH_FACTOR) {
            text.width_factor = r.read_raw_double()?;
        }
        // Text value TV 1
        text.value = r.read_variable_text()?;
        // Generation BS 71 --- present if !(DataFlags & 0x20)
        if !flags.contains(TextDataFlags::NO_GENERATION) {
            text.generation = r.read_bit_short()?;
        }
        // Horiz align. BS 72 --- present if !(DataFlags & 0x40)
        if !flags.contains(TextDataFlags::NO_HORIZONTAL_ALIGNMENT) {
            text.horizontal_alignment = r.read_bit_short()?.into();
        }
        // Vert align. BS 73 --- present if !(DataFlags & 0x80)
        if !flags.contains(TextDataFlags::NO_VERTICAL_ALIGNMENT) {
            text.vertical_alignment = r.read_bit_short()?.into();
        }

        // H 7 STYLE (hard pointer)
        text.style = streams.handles_reader.read_handle_resolved(header.handle)?;

        Ok(text.into())
    }

    pub(super) fn read_ray(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        // Point 3BD 10
        let base_point = r.read_3bit_double()?;
        // Vector 3BD 11
        let direction = r.read_3bit_double()?;
        Ok(Ray {
            base_point,
            direction,
        }
        .into())
    }

    pub(super) fn read_xline(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        let base_point = r.read_3bit_double()?;
        let direction = r.read_3bit_double()?;
        Ok(XLine {
            base_point,
            direction,
        }
        .into())
    }

    pub(super) fn read_solid(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;
        // Thickness BT 39
        let thickness = r.read_bit_thickness()?;
        // Elevation BD --- Z for all 4 points
        let elevation = r.read_bit_double()?;
        // 1st corner 2RD 10 ... 4th corner 2RD 13
        let mut corners = [Vector3::ZERO; 4];
        for corner in corners.iter_mut() {
            *corner = r.read_2raw_double()?.with_z(elevation);
        }
        // Extrusion BE 210
        let normal = r.read_bit_extrusion()?;

        let [first_corner, second_corner, third_corner, fourth_corner] = corners;
        Ok(Solid {
            first_corner,
            second_corner,
            third_corner,
            fourth_corner,
            thickness,
            normal,
        }
        .into())
    }

    pub(super) fn read_face_3d(&mut self, streams: &mut StreamSet) -> Result<Geometry> {
        let r = &mut streams.object_reader;

        // Has no flag ind. B
        let has_no_flags = r.read_bit()?;
        // Z is zero bit B
        let z_is_zero = r.read_bit()?;

        // 1st corner x RD 10, y RD 20, z RD 30 (present if !z_is_zero)
        let x = r.read_raw_double()?;
        let y = r.read_raw_double()?;
        let z = if z_is_zero { 0.0 } else { r.read_raw_double()? };
        let first_corner = Vector3::new(x, y, z);

        // 2nd..4th corner 3DD, each defaulting to the corner before it
        let second_corner = r.read_3bit_double_with_default(first_corner)?;
        let third_corner = r.read_3bit_double_with_default(second_corner)?;
        let fourth_corner = r.read_3bit_double_with_default(third_corner)?;

        // Invis flags BS 70 --- present if !has_no_flags
        let invisible_edges = if has_no_flags {
            InvisibleEdgeFlags::empty()
        } else {
            InvisibleEdgeFlags::from_bits_truncate(r.read_bit_short()?)
        };

        Ok(Face3D {
            first_corner,
            second_corner,
            third_corner,
            fourth_corner,
            invisible_edges,
        }
        .into())
    }

    pub(super) fn read_polyline_3d(
        &mut self,
        streams: &mut StreamSet,
        header: &CommonEntityHeader,
    ) -> Result<Geometry> {
        let mut pline = Polyline3D {
            // Flags RC 70 (spline fit type)
            spline_flags: streams.object_reader.read_raw_char()?,
            // Flags RC 70 (closed)
            closed_flags: streams.object_reader.read_raw_char()?,
            vertices: Vec::new(),
        };

        let owner = header.handle;
        // H first VERTEX (soft pointer)
        let first = streams.handles_reader.read_handle_resolved(owner)?;
        // H last VERTEX (soft pointer)
        let last = streams.handles_reader.read_handle_resolved(owner)?;
        // H SEQEND (hard owner)
        let _seqend = streams.handles_reader.read_handle_resolved(owner)?;

        if first.is_null() {
            return Ok(pline.into());
        }

        let mut visited = AHashSet::new();
        let mut current = first;
        loop {
            if !visited.insert(current) {
                return Err(DwgError::InvalidFormat(format!(
                    "vertex chain of polyline {owner} loops back to {current}"
                )));
            }

            let (vertex, next) = self.read_vertex_3d(current)?;
            pline.vertices.push(vertex);

            if current == last || next.is_null() {
                break;
            }
            if !self.object_map.contains(next) {
                self.notify(
                    format!("vertex chain of polyline {owner} ends at missing handle {next}"),
                    streams.offset,
                );
                break;
            }
            current = next;
        }

        Ok(pline.into())
    }

    /// Decode one `VERTEX_3D` object, returning it and the handle of the
    /// vertex after it.
    fn read_vertex_3d(&mut self, handle: Handle) -> Result<(Vertex3D, Handle)> {
        let offset = self.object_map.offset_of(handle).ok_or_else(|| {
            DwgError::InvalidFormat(format!("vertex {handle} is not in the object map"))
        })?;

        let mut streams = self.get_entity_streams(offset)?;
        let raw_type = streams.object_reader.read_bit_short()?;
        if raw_type != DwgObjectType::Vertex3D.code() {
            return Err(DwgError::InvalidFormat(format!(
                "object {handle} at {offset:#X} has type {raw_type}, expected VERTEX_3D"
            )));
        }

        let (vertex_header, refs) = self.read_common_entity_data(&mut streams)?;

        // Flags RC 70
        let flags = streams.object_reader.read_raw_char()?;
        // Point 3BD 10
        let position = streams.object_reader.read_3bit_double()?;

        let next = if vertex_header.no_links {
            vertex_header.handle.next()
        } else {
            refs.next_entity.unwrap_or(Handle::NULL)
        };

        Ok((
            Vertex3D {
                handle: vertex_header.handle,
                flags,
                position,
            },
            next,
        ))
    }
}
