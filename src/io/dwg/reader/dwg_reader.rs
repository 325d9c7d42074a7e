//! DWG reader orchestrator, the main entry point for reading DWG files.
//!
//! Decoding runs in two phases. [`decode_sections`] reads the preamble,
//! validates the header-variable sentinels, decodes the classes and the
//! object map and builds the list of geometry objects. After that, every
//! geometry object can be decoded on its own with [`decode_geometry`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use dwgcore::io::dwg::reader::DwgReader;
//!
//! let mut reader = DwgReader::from_file("sample.dwg")?;
//! for i in 0..reader.geometry_count()? {
//!     println!("{}", reader.geometry(i)?.name());
//! }
//! # Ok::<(), dwgcore::DwgError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;
use rayon::prelude::*;

use crate::classes::DwgClassList;
use crate::error::{DwgError, Result};
use crate::geometry::Geometry;
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::Handle;

use super::super::constants::{
    sentinels, DwgSectionKind, DEFAULT_PROBE_LENGTH, VERSION_AC1015,
};
use super::super::file_header::{
    DwgFileHeaderAC15, DwgSectionLocatorRecord, SectionLocatorTable,
};
use super::super::object_type::{resolve_type_name, DwgObjectType};
use super::bit_reader::DwgBitReader;
use super::handle_reader::ObjectMap;
use super::object_reader::{DecodedEntity, DwgObjectReader};
use super::{DwgClassesReader, DwgHandleReader};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration options for the DWG reader.
#[derive(Debug, Clone)]
pub struct DwgReaderConfiguration {
    /// When `true`, objects whose type cannot be probed or resolved while
    /// building the geometry list are reported as notifications and skipped
    /// instead of aborting the read.
    ///
    /// Default: `false` (strict mode).
    pub failsafe: bool,

    /// When `true`, a CRC mismatch in the classes section, the object map
    /// or an object body is a [`DwgError::ChecksumMismatch`]. Otherwise it
    /// is recorded as a warning.
    ///
    /// Default: `false`.
    pub verify_crc: bool,

    /// Bytes read when probing an object's type code.
    pub probe_length: usize,
}

impl Default for DwgReaderConfiguration {
    fn default() -> Self {
        Self {
            failsafe: false,
            verify_crc: false,
            probe_length: DEFAULT_PROBE_LENGTH,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoded sections
// ---------------------------------------------------------------------------

/// Location of one geometry object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryLocation {
    pub handle: Handle,
    /// Absolute file offset of the object
    pub offset: u64,
    pub object_type: DwgObjectType,
}

/// Everything decoded before individual geometries are requested.
///
/// Immutable once built; any number of decodes may share it.
#[derive(Debug, Clone)]
pub struct DwgSections {
    pub file_header: DwgFileHeaderAC15,
    pub classes: DwgClassList,
    /// All stored objects, geometry or not
    pub object_map: ObjectMap,
    /// Geometry objects in object-map order
    pub geometries: Vec<GeometryLocation>,
    pub notifications: NotificationCollection,
    pub file_length: u64,
    /// Whether object CRC mismatches are faults
    pub verify_crc: bool,
}

impl DwgSections {
    pub fn section_table(&self) -> &SectionLocatorTable {
        &self.file_header.records
    }

    /// Text encoding of the drawing.
    pub fn encoding(&self) -> &'static Encoding {
        self.file_header.encoding()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }
}

// ---------------------------------------------------------------------------
// Free-standing API
// ---------------------------------------------------------------------------

/// Decode the preamble, classes and object map of an R2000 drawing.
pub fn decode_sections<S: Read + Seek>(
    source: &mut S,
    config: &DwgReaderConfiguration,
) -> Result<DwgSections> {
    DwgReader::from_reader(source)?
        .with_config(config.clone())
        .decode()
}

/// Number of geometry objects found by [`decode_sections`].
pub fn geometry_count(sections: &DwgSections) -> usize {
    sections.geometry_count()
}

/// Decode geometry number `index`.
///
/// The index is checked before any I/O takes place.
pub fn decode_geometry<S: Read + Seek>(
    source: &mut S,
    sections: &DwgSections,
    index: usize,
) -> Result<Geometry> {
    decode_entity(source, sections, index).map(|entity| entity.geometry)
}

/// Decode geometry number `index` together with its common entity data
/// and references.
pub fn decode_entity<S: Read + Seek>(
    source: &mut S,
    sections: &DwgSections,
    index: usize,
) -> Result<DecodedEntity> {
    let location = sections
        .geometries
        .get(index)
        .ok_or(DwgError::IndexOutOfBounds {
            index,
            count: sections.geometries.len(),
        })?;

    DwgObjectReader::new(
        source,
        &sections.object_map,
        sections.file_length,
        sections.encoding(),
        sections.verify_crc,
    )
    .read_entity(location.offset)
}

/// Decode every geometry of an in-memory drawing in parallel.
///
/// Each decode runs on its own cursor over `bytes`. Results are in geometry
/// index order.
pub fn decode_all_geometries_par(bytes: &[u8], sections: &DwgSections) -> Vec<Result<Geometry>> {
    (0..sections.geometry_count())
        .into_par_iter()
        .map(|index| {
            let mut cursor = Cursor::new(bytes);
            decode_geometry(&mut cursor, sections, index)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// DwgReader
// ---------------------------------------------------------------------------

/// DWG file reader over an owned byte stream.
///
/// # Architecture
///
/// The read pipeline is:
///
/// 1. Read the 6-byte version string from the file start.
/// 2. Read the file header and its section-locator table.
/// 3. Check the sentinels around the header variables.
/// 4. Read the classes (locator slot 1).
/// 5. Read the object map (locator slot 2) and probe every object's type.
/// 6. Decode geometries on demand.
pub struct DwgReader<R: Read + Seek> {
    /// Underlying byte stream.
    reader: R,

    /// User configuration.
    config: DwgReaderConfiguration,

    file_length: u64,

    /// Decoded sections, filled by the first read.
    sections: Option<DwgSections>,

    /// Notifications collected during reading.
    notifications: NotificationCollection,
}

impl DwgReader<BufReader<File>> {
    /// Open a DWG file by path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> DwgReader<R> {
    /// Create a DWG reader from any seekable byte stream.
    ///
    /// Only `AC1015` drawings are accepted.
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let file_length = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        // Read the 6-byte version string (e.g. "AC1015").
        let mut version_buf = [0u8; 6];
        reader.read_exact(&mut version_buf)?;
        if &version_buf != VERSION_AC1015 {
            return Err(DwgError::UnsupportedVersion(
                String::from_utf8_lossy(&version_buf).into_owned(),
            ));
        }

        Ok(Self {
            reader,
            config: DwgReaderConfiguration::default(),
            file_length,
            sections: None,
            notifications: NotificationCollection::new(),
        })
    }

    /// Set configuration options.
    pub fn with_config(mut self, config: DwgReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Decode the sections once and return them.
    pub fn read_sections(&mut self) -> Result<&DwgSections> {
        let sections = match self.sections.take() {
            Some(sections) => sections,
            None => self.decode()?,
        };
        Ok(self.sections.insert(sections))
    }

    /// Number of geometry objects in the drawing.
    pub fn geometry_count(&mut self) -> Result<usize> {
        Ok(self.read_sections()?.geometry_count())
    }

    /// Decode geometry number `index`.
    pub fn geometry(&mut self, index: usize) -> Result<Geometry> {
        self.entity(index).map(|entity| entity.geometry)
    }

    /// Decode geometry number `index` with its common data and references.
    pub fn entity(&mut self, index: usize) -> Result<DecodedEntity> {
        self.read_sections()?;
        let Some(sections) = self.sections.as_ref() else {
            return Err(DwgError::InvalidFormat("sections not decoded".into()));
        };
        let entity = decode_entity(&mut self.reader, sections, index)?;
        self.notifications.append(&mut entity.notifications.clone());
        Ok(entity)
    }

    /// Notifications gathered so far.
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Run the section pipeline.
    fn decode(&mut self) -> Result<DwgSections> {
        // Step 1: Read the file header.
        let file_header = self
            .read_file_header_ac15()
            .map_err(|e| e.in_section(DwgSectionKind::FileHeader, 0))?;

        // Step 2: Header variables are only bounded, not decoded.
        let header_record = *file_header.records.get(DwgSectionKind::HeaderVariables)?;
        self.read_header_sentinels(&header_record)
            .map_err(|e| e.in_section(DwgSectionKind::HeaderVariables, header_record.seeker))?;

        // Step 3: Classes.
        let classes = self.read_classes(&file_header)?;

        // Step 4: Object map and geometry filter.
        let object_map = self.read_object_map(&file_header)?;
        let geometries = self.read_geometry_locations(&object_map, &classes)?;

        Ok(DwgSections {
            file_header,
            classes,
            object_map,
            geometries,
            notifications: self.notifications.clone(),
            file_length: self.file_length,
            verify_crc: self.config.verify_crc,
        })
    }

    // ------------------------------------------------------------------
    // File header reading
    // ------------------------------------------------------------------

    /// Read AC15 (R13–R2000) file header.
    ///
    /// Format:
    /// - 6 bytes: version string (already read)
    /// - 7 bytes: zeros, byte 5 holds the maintenance version
    /// - 4 bytes: preview address
    /// - 2 bytes: undocumented
    /// - 2 bytes: code page
    /// - 4 bytes: number of section locator records
    /// - N × 9 bytes: section locator records (number, seeker, size)
    /// - 2 bytes: CRC
    /// - 16 bytes: end sentinel
    fn read_file_header_ac15(&mut self) -> Result<DwgFileHeaderAC15> {
        self.reader.seek(SeekFrom::Start(6))?;

        // 0x06: 7 bytes, 5 zeros + ACADMAINTVER + 0x01.
        let mut padding = [0u8; 7];
        self.reader.read_exact(&mut padding)?;
        let maintenance_version = padding[5];

        // 0x0D: Preview image address (4 bytes, LE).
        let preview_address = self.reader.read_u32::<LittleEndian>()? as u64;

        // 0x11: 2 undocumented bytes.
        let mut undocumented = [0u8; 2];
        self.reader.read_exact(&mut undocumented)?;

        // 0x13: Drawing code page (2 bytes, u16 LE).
        let code_page = self.reader.read_u16::<LittleEndian>()?;

        // 0x15: Number of section locator records (4 bytes, i32 LE).
        let num_records = self.reader.read_i32::<LittleEndian>()?;
        let num_records = u64::try_from(num_records).map_err(|_| {
            DwgError::InvalidSectionTable(format!("negative record count {num_records}"))
        })?;
        if num_records.saturating_mul(9) > self.file_length {
            return Err(DwgError::InvalidSectionTable(format!(
                "{num_records} locator records cannot fit in {} bytes",
                self.file_length
            )));
        }

        // Each record: Number (1 byte) + Seeker (4 bytes) + Size (4 bytes) = 9 bytes.
        let mut records = Vec::with_capacity(num_records as usize);
        for _ in 0..num_records {
            let number = self.reader.read_u8()?;
            let seeker = self.reader.read_u32::<LittleEndian>()? as u64;
            let size = self.reader.read_u32::<LittleEndian>()? as u64;
            records.push(DwgSectionLocatorRecord::new(number, seeker, size));
        }

        // RS: CRC, not verified.
        let crc = self.reader.read_u16::<LittleEndian>()?;

        // End sentinel.
        let sentinel_offset = self.reader.stream_position()?;
        let mut sentinel = [0u8; 16];
        self.reader.read_exact(&mut sentinel)?;
        if sentinel != sentinels::FILE_HEADER_END {
            return Err(DwgError::InvalidSentinel {
                section: DwgSectionKind::FileHeader,
                offset: sentinel_offset,
            });
        }

        let header = DwgFileHeaderAC15 {
            maintenance_version,
            preview_address,
            code_page,
            records: SectionLocatorTable::new(records),
            crc,
        };
        self.validate_section_table(&header.records)?;
        Ok(header)
    }

    /// The three core sections must be present and inside the file.
    fn validate_section_table(&self, table: &SectionLocatorTable) -> Result<()> {
        if table.len() < 3 {
            return Err(DwgError::InvalidSectionTable(format!(
                "{} locator records, at least 3 required",
                table.len()
            )));
        }
        for kind in [
            DwgSectionKind::HeaderVariables,
            DwgSectionKind::Classes,
            DwgSectionKind::ObjectMap,
        ] {
            let record = table.get(kind)?;
            if !record.fits_within(self.file_length) {
                return Err(DwgError::InvalidSectionTable(format!(
                    "{kind} at {:#X} with size {} exceeds file length {}",
                    record.seeker, record.size, self.file_length
                )));
            }
        }
        Ok(())
    }

    /// Validate the sentinels bounding the header variables.
    fn read_header_sentinels(&mut self, record: &DwgSectionLocatorRecord) -> Result<()> {
        // Start sentinel, RL size, end sentinel at the very least.
        if record.size < 36 {
            return Err(DwgError::InvalidSectionTable(format!(
                "header variables size {} is too small",
                record.size
            )));
        }

        self.reader.seek(SeekFrom::Start(record.seeker))?;
        let mut sentinel = [0u8; 16];
        self.reader.read_exact(&mut sentinel)?;
        if sentinel != sentinels::HEADER_START {
            return Err(DwgError::InvalidSentinel {
                section: DwgSectionKind::HeaderVariables,
                offset: record.seeker,
            });
        }

        // RL: size of the variables, not decoded further.
        let _size = self.reader.read_u32::<LittleEndian>()?;

        let end_offset = record.end() - 16;
        self.reader.seek(SeekFrom::Start(end_offset))?;
        self.reader.read_exact(&mut sentinel)?;
        if sentinel != sentinels::HEADER_END {
            return Err(DwgError::InvalidSentinel {
                section: DwgSectionKind::HeaderVariables,
                offset: end_offset,
            });
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Section reading
    // ------------------------------------------------------------------

    /// Read the raw bytes of one section.
    fn get_section_stream(&mut self, record: &DwgSectionLocatorRecord) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; record.size as usize];
        self.reader.seek(SeekFrom::Start(record.seeker))?;
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_classes(&mut self, file_header: &DwgFileHeaderAC15) -> Result<DwgClassList> {
        let record = *file_header.records.get(DwgSectionKind::Classes)?;
        let data = self
            .get_section_stream(&record)
            .map_err(|e| e.in_section(DwgSectionKind::Classes, record.seeker))?;

        DwgClassesReader::new(data, record.seeker, file_header.encoding())
            .read(self.config.verify_crc, &mut self.notifications)
            .map_err(|e| e.in_section(DwgSectionKind::Classes, record.seeker))
    }

    fn read_object_map(&mut self, file_header: &DwgFileHeaderAC15) -> Result<ObjectMap> {
        let record = *file_header.records.get(DwgSectionKind::ObjectMap)?;
        let data = self
            .get_section_stream(&record)
            .map_err(|e| e.in_section(DwgSectionKind::ObjectMap, record.seeker))?;

        DwgHandleReader::new(data, record.seeker)
            .read(self.config.verify_crc, &mut self.notifications)
            .map_err(|e| e.in_section(DwgSectionKind::ObjectMap, record.seeker))
    }

    /// Probe every mapped object and keep the geometry-bearing ones.
    fn read_geometry_locations(
        &mut self,
        object_map: &ObjectMap,
        classes: &DwgClassList,
    ) -> Result<Vec<GeometryLocation>> {
        let mut geometries = Vec::new();

        for entry in object_map.entries() {
            let probed = self.probe_object_type(entry.offset).and_then(|code| {
                match DwgObjectType::from_code(code) {
                    Some(object_type) => Ok(Some(object_type).filter(|t| t.is_geometry())),
                    None => resolve_type_name(code, classes).map(|_| None).ok_or(
                        DwgError::UnknownObjectType {
                            code,
                            offset: entry.offset,
                        },
                    ),
                }
            });

            match probed {
                Ok(Some(object_type)) => geometries.push(GeometryLocation {
                    handle: entry.handle,
                    offset: entry.offset,
                    object_type,
                }),
                Ok(None) => {}
                Err(e) if self.config.failsafe => {
                    self.notifications.notify_at(
                        NotificationType::Error,
                        entry.offset,
                        format!("object {} skipped: {e}", entry.handle),
                    );
                }
                Err(e) => return Err(e.in_section(DwgSectionKind::Object, entry.offset)),
            }
        }

        Ok(geometries)
    }

    /// Read the type code of the object at `offset` from a short probe.
    fn probe_object_type(&mut self, offset: u64) -> Result<i16> {
        if offset >= self.file_length {
            return Err(DwgError::Overrun {
                position: offset.saturating_mul(8),
                requested: (self.config.probe_length as u64).saturating_mul(8),
                length: self.file_length.saturating_mul(8),
            });
        }
        let length = (self.config.probe_length as u64).min(self.file_length - offset);
        let mut probe = vec![0u8; length as usize];
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(&mut probe)?;

        let mut reader = DwgBitReader::new(probe);
        // MS: object size
        reader.read_modular_short()?;
        // BS: object type
        reader.read_bit_short()
    }
}
