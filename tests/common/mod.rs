//! Shared test utilities for dwgcore integration tests.
//!
//! Builds synthetic R2000 drawings in memory and offers entity shorthands
//! so each test crate only states what it checks. Import via `mod common;`.

#![allow(dead_code)]

pub mod bit_writer;
pub mod fixture;

use std::io::{Cursor, Read, Seek, SeekFrom};

use dwgcore::{decode_sections, DwgReaderConfiguration, DwgSections, Result};

pub use bit_writer::BitWriter;
pub use fixture::{codes, ClassDef, DwgFixture, EntityObject, LAYER_HANDLE};

// ===========================================================================
// Type codes
// ===========================================================================

pub const TEXT: i16 = 0x01;
pub const VERTEX_3D: i16 = 0x0B;
pub const POLYLINE_3D: i16 = 0x10;
pub const ARC: i16 = 0x11;
pub const CIRCLE: i16 = 0x12;
pub const LINE: i16 = 0x13;
pub const POINT: i16 = 0x1B;
pub const FACE_3D: i16 = 0x1C;
pub const SOLID: i16 = 0x1F;
pub const ELLIPSE: i16 = 0x23;
pub const RAY: i16 = 0x28;
pub const XLINE: i16 = 0x29;
pub const LAYER: i16 = 0x33;
pub const LWPOLYLINE: i16 = 0x4D;

// ===========================================================================
// Decode helpers
// ===========================================================================

pub fn sections_of(bytes: &[u8]) -> Result<DwgSections> {
    decode_sections(&mut Cursor::new(bytes), &DwgReaderConfiguration::default())
}

pub fn sections_with(bytes: &[u8], config: DwgReaderConfiguration) -> Result<DwgSections> {
    decode_sections(&mut Cursor::new(bytes), &config)
}

pub fn strict_crc() -> DwgReaderConfiguration {
    DwgReaderConfiguration {
        verify_crc: true,
        ..Default::default()
    }
}

pub fn failsafe() -> DwgReaderConfiguration {
    DwgReaderConfiguration {
        failsafe: true,
        ..Default::default()
    }
}

/// A source that fails the test on any I/O.
pub struct PanickingSource;

impl Read for PanickingSource {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        panic!("unexpected read");
    }
}

impl Seek for PanickingSource {
    fn seek(&mut self, _pos: SeekFrom) -> std::io::Result<u64> {
        panic!("unexpected seek");
    }
}

// ===========================================================================
// Entity shorthands
// ===========================================================================

pub fn circle(handle: u64, center: (f64, f64, f64), radius: f64) -> EntityObject {
    EntityObject::new(CIRCLE, handle).with_data(|w| {
        w.write_3bit_double(center.0, center.1, center.2);
        w.write_bit_double(radius);
        w.write_bit_thickness(0.0);
        w.write_bit_extrusion(None);
    })
}

pub fn arc(handle: u64, center: (f64, f64, f64), radius: f64, start: f64, end: f64) -> EntityObject {
    EntityObject::new(ARC, handle).with_data(|w| {
        w.write_3bit_double(center.0, center.1, center.2);
        w.write_bit_double(radius);
        w.write_bit_thickness(0.0);
        w.write_bit_extrusion(None);
        w.write_bit_double(start);
        w.write_bit_double(end);
    })
}

/// LINE with z values; zero z uses the "z's are zero" shortcut.
pub fn line(handle: u64, start: (f64, f64, f64), end: (f64, f64, f64)) -> EntityObject {
    EntityObject::new(LINE, handle).with_data(|w| {
        let flat = start.2 == 0.0 && end.2 == 0.0;
        w.write_bit(flat);
        w.write_raw_double(start.0);
        w.write_bit_double_with_default(end.0, start.0);
        w.write_raw_double(start.1);
        w.write_bit_double_with_default(end.1, start.1);
        if !flat {
            w.write_raw_double(start.2);
            w.write_bit_double_with_default(end.2, start.2);
        }
        w.write_bit_double(0.0);
        w.write_bit_extrusion(None);
    })
}

pub fn point(handle: u64, location: (f64, f64, f64)) -> EntityObject {
    EntityObject::new(POINT, handle).with_data(|w| {
        w.write_3bit_double(location.0, location.1, location.2);
        w.write_bit_thickness(0.0);
        w.write_bit_extrusion(None);
        w.write_bit_double(0.0);
    })
}

/// LWPOLYLINE with plain vertices and no optional fields.
pub fn lwpolyline(handle: u64, vertices: &[(f64, f64)]) -> EntityObject {
    let vertices = vertices.to_vec();
    EntityObject::new(LWPOLYLINE, handle).with_data(move |w| {
        w.write_bit_short(0);
        w.write_bit_long(vertices.len() as i32);
        let mut previous = (0.0, 0.0);
        for (i, &(x, y)) in vertices.iter().enumerate() {
            if i == 0 {
                w.write_2raw_double(x, y);
            } else {
                w.write_bit_double_with_default(x, previous.0);
                w.write_bit_double_with_default(y, previous.1);
            }
            previous = (x, y);
        }
    })
}

/// TEXT with every optional field omitted except the value.
pub fn text(handle: u64, insertion: (f64, f64), height: f64, value: &[u8], style: u64) -> EntityObject {
    let value = value.to_vec();
    EntityObject::new(TEXT, handle)
        .with_data(move |w| {
            // Data flags: every optional field omitted
            w.write_byte(0xFF);
            w.write_2raw_double(insertion.0, insertion.1);
            w.write_bit_extrusion(None);
            w.write_bit_thickness(0.0);
            w.write_raw_double(height);
            w.write_variable_text(&value);
        })
        .with_handles(move |w| w.write_handle(codes::HARD_POINTER, style))
}

/// VERTEX_3D without links; the next vertex is `handle + 1`.
pub fn vertex_3d(handle: u64, position: (f64, f64, f64)) -> EntityObject {
    EntityObject::new(VERTEX_3D, handle).with_data(|w| {
        w.write_byte(0x20);
        w.write_3bit_double(position.0, position.1, position.2);
    })
}

pub fn polyline_3d(handle: u64, first: u64, last: u64, seqend: u64) -> EntityObject {
    EntityObject::new(POLYLINE_3D, handle)
        .with_data(|w| {
            w.write_byte(0);
            w.write_byte(0);
        })
        .with_handles(|w| {
            w.write_handle(codes::SOFT_POINTER, first);
            w.write_handle(codes::SOFT_POINTER, last);
            w.write_handle(codes::HARD_OWNER, seqend);
        })
}

/// Drawing with one entity.
pub fn single(entity: EntityObject) -> Vec<u8> {
    DwgFixture::new().entity(entity).build().bytes
}
