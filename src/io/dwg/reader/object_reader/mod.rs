//! DWG Object Reader, decodes single objects from the object data area.
//!
//! # Architecture
//!
//! Objects are located through the object map and decoded one at a time:
//!
//! 1. Seek to the object's file offset and read a short probe holding the
//!    modular-short size.
//! 2. Re-read exactly the object region (size prefix, body, CRC) and check
//!    the CRC.
//! 3. Split the body into the data stream and the handle stream, which
//!    starts `size_in_bits` bits after the size prefix.
//! 4. Read the common entity data, then dispatch on the type code.
//!
//! Each call owns its byte region; nothing is shared between decodes except
//! the read-only object map.

pub mod common;
pub mod read_entities;

use std::io::{Read, Seek, SeekFrom};

use encoding_rs::Encoding;

use crate::error::{DwgError, Result};
use crate::geometry::Geometry;
use crate::io::dwg::constants::{DwgSectionKind, CRC_SEED, OBJECT_SIZE_PROBE_LENGTH};
use crate::io::dwg::crc::{check_crc, crc8};
use crate::io::dwg::object_type::DwgObjectType;
use crate::io::dwg::reader::bit_reader::DwgBitReader;
use crate::io::dwg::reader::handle_reader::ObjectMap;
use crate::notification::{NotificationCollection, NotificationType};

pub use common::{CommonEntityHeader, EntityReferences};

/// Data and handle cursors over one object region.
pub(crate) struct StreamSet {
    /// Main data stream, positioned after the size prefix.
    pub object_reader: DwgBitReader,
    /// Handle stream.
    pub handles_reader: DwgBitReader,
    /// Bit position of the first bit after the size prefix.
    pub object_initial_pos: u64,
    /// Object size in bytes (from the MS prefix, excluding the CRC).
    pub object_size: u32,
    /// File offset of the object.
    pub offset: u64,
    pub checksum_valid: bool,
}

/// One fully decoded geometry object.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntity {
    pub header: CommonEntityHeader,
    pub references: EntityReferences,
    pub geometry: Geometry,
    /// Whether the object CRC matched
    pub checksum_valid: bool,
    /// Non-fatal events met while decoding
    pub notifications: NotificationCollection,
}

/// Decodes geometry objects from a seekable source.
pub struct DwgObjectReader<'a, R: Read + Seek> {
    source: &'a mut R,
    object_map: &'a ObjectMap,
    file_length: u64,
    encoding: &'static Encoding,
    verify_crc: bool,
    notifications: NotificationCollection,
}

impl<'a, R: Read + Seek> DwgObjectReader<'a, R> {
    pub fn new(
        source: &'a mut R,
        object_map: &'a ObjectMap,
        file_length: u64,
        encoding: &'static Encoding,
        verify_crc: bool,
    ) -> Self {
        Self {
            source,
            object_map,
            file_length,
            encoding,
            verify_crc,
            notifications: NotificationCollection::new(),
        }
    }

    /// Decode the geometry object stored at `offset`.
    ///
    /// Faults are wrapped with the object's offset.
    pub fn read_entity(mut self, offset: u64) -> Result<DecodedEntity> {
        let result = self.read_entity_at(offset);
        result
            .map(|(header, references, geometry, checksum_valid)| DecodedEntity {
                header,
                references,
                geometry,
                checksum_valid,
                notifications: self.notifications,
            })
            .map_err(|e| e.in_section(DwgSectionKind::Object, offset))
    }

    fn read_entity_at(
        &mut self,
        offset: u64,
    ) -> Result<(CommonEntityHeader, EntityReferences, Geometry, bool)> {
        let mut streams = self.get_entity_streams(offset)?;

        // BS: object type
        let raw_type = streams.object_reader.read_bit_short()?;
        let object_type = DwgObjectType::from_code(raw_type)
            .filter(|t| t.is_geometry())
            .ok_or(DwgError::UnknownObjectType {
                code: raw_type,
                offset,
            })?;

        let (mut header, references) = self.read_common_entity_data(&mut streams)?;
        header.object_type = raw_type;

        let geometry = match object_type {
            DwgObjectType::Text => self.read_text(&mut streams, &header)?,
            DwgObjectType::Polyline3D => self.read_polyline_3d(&mut streams, &header)?,
            DwgObjectType::Arc => self.read_arc(&mut streams)?,
            DwgObjectType::Circle => self.read_circle(&mut streams)?,
            DwgObjectType::Line => self.read_line(&mut streams)?,
            DwgObjectType::Point => self.read_point(&mut streams)?,
            DwgObjectType::Face3D => self.read_face_3d(&mut streams)?,
            DwgObjectType::Solid => self.read_solid(&mut streams)?,
            DwgObjectType::Ellipse => self.read_ellipse(&mut streams)?,
            DwgObjectType::Ray => self.read_ray(&mut streams)?,
            DwgObjectType::Xline => self.read_xline(&mut streams)?,
            DwgObjectType::LwPolyline => self.read_lwpolyline(&mut streams)?,
            _ => {
                return Err(DwgError::UnknownObjectType {
                    code: raw_type,
                    offset,
                })
            }
        };

        Ok((header, references, geometry, streams.checksum_valid))
    }

    /// Read the object region at `offset` and set up its streams.
    pub(crate) fn get_entity_streams(&mut self, offset: u64) -> Result<StreamSet> {
        // MS: size of the object, not including the CRC
        let probe = self.read_at(offset, OBJECT_SIZE_PROBE_LENGTH as u64)?;
        let mut size_reader = DwgBitReader::new(probe);
        let size = size_reader.read_modular_short()?;
        let prefix_len = size_reader.position();

        let region_len = prefix_len + size as u64 + 2;
        let data = self.read_at_exact(offset, region_len)?;

        let body_len = (prefix_len + size as u64) as usize;
        let stored = u16::from_le_bytes([data[body_len], data[body_len + 1]]);
        let computed = crc8(CRC_SEED, &data[..body_len]);
        let checksum_valid = check_crc(
            DwgSectionKind::Object,
            offset,
            stored,
            computed,
            self.verify_crc,
            &mut self.notifications,
        )?;

        let body = data[..body_len].to_vec();
        let object_initial_pos = prefix_len * 8;

        let mut object_reader = DwgBitReader::with_encoding(body, self.encoding);
        object_reader.set_position_in_bits(object_initial_pos)?;
        let handles_reader = object_reader.clone();

        Ok(StreamSet {
            object_reader,
            handles_reader,
            object_initial_pos,
            object_size: size,
            offset,
            checksum_valid,
        })
    }

    /// Read up to `length` bytes at `offset`, clipped to the end of the file.
    fn read_at(&mut self, offset: u64, length: u64) -> Result<Vec<u8>> {
        if offset >= self.file_length {
            return Err(DwgError::Overrun {
                position: offset.saturating_mul(8),
                requested: length.saturating_mul(8),
                length: self.file_length.saturating_mul(8),
            });
        }
        let length = length.min(self.file_length - offset);
        self.read_at_exact(offset, length)
    }

    /// Read exactly `length` bytes at `offset`.
    fn read_at_exact(&mut self, offset: u64, length: u64) -> Result<Vec<u8>> {
        if offset.saturating_add(length) > self.file_length {
            return Err(DwgError::Overrun {
                position: offset.saturating_mul(8),
                requested: length.saturating_mul(8),
                length: self.file_length.saturating_mul(8),
            });
        }
        let mut buf = vec![0u8; length as usize];
        self.source.seek(SeekFrom::Start(offset))?;
        self.source.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn notify(&mut self, message: impl Into<String>, offset: u64) {
        self.notifications
            .notify_at(NotificationType::Warning, offset, message);
    }
}
