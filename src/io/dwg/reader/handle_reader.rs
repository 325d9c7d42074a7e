//! DWG Handle/Object Map section reader.
//!
//! Reads the handle-to-file-offset map from the `AcDb:Handles` section.
//! The section is a chain of subsections:
//!
//! ```text
//! RS (big-endian)  size, counting the pair bytes and the CRC
//!                  (MC handle, signed MC offset delta) pairs
//! RS (big-endian)  CRC over the size bytes and the pairs
//! ```
//!
//! A subsection whose size is 2 ends the chain. Handles are stored as-is;
//! offsets are delta-coded, and accumulation restarts at every subsection.

use byteorder::{BigEndian, ByteOrder};
use indexmap::IndexMap;

use crate::error::{DwgError, Result};
use crate::io::dwg::constants::{DwgSectionKind, CRC_SEED};
use crate::io::dwg::crc::{check_crc, crc8};
use crate::io::dwg::reader::bit_reader::DwgBitReader;
use crate::notification::NotificationCollection;
use crate::types::Handle;

/// Subsection size that marks the end of the chain (CRC only, no pairs).
const TERMINATOR_SIZE: usize = 2;

/// One pair as stored: the handle and the offset delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMapDelta {
    pub handle: u64,
    pub offset_delta: i64,
}

/// One subsection of the object map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMapSubsection {
    /// File offset of the subsection's size field
    pub offset: u64,
    pub deltas: Vec<ObjectMapDelta>,
    /// Stored CRC
    pub crc: u16,
}

/// A stored object: its handle and the absolute file offset of its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectMapEntry {
    pub handle: Handle,
    pub offset: u64,
}

/// Expand delta-coded subsections into absolute entries.
///
/// Each subsection starts from offset 0, so entry 0 of a subsection carries
/// an absolute offset and every later entry adds its delta to the previous
/// one. Nothing carries over from one subsection to the next. Handles are
/// taken as stored. An offset that drops below zero is a format fault.
pub fn reconstruct_offsets(subsections: &[ObjectMapSubsection]) -> Result<Vec<ObjectMapEntry>> {
    let mut entries = Vec::with_capacity(subsections.iter().map(|s| s.deltas.len()).sum());

    for subsection in subsections {
        // Set the "last loc" to 0L
        let mut last_loc: i64 = 0;

        for delta in &subsection.deltas {
            last_loc = last_loc.checked_add(delta.offset_delta).ok_or_else(|| {
                DwgError::InvalidFormat("object map offset overflows".to_string())
            })?;
            let offset = u64::try_from(last_loc).map_err(|_| {
                DwgError::InvalidFormat(format!(
                    "object map subsection at {:#X} yields negative offset {last_loc}",
                    subsection.offset
                ))
            })?;
            entries.push(ObjectMapEntry {
                handle: Handle::new(delta.handle),
                offset,
            });
        }
    }

    Ok(entries)
}

/// The decoded object map.
#[derive(Debug, Clone, Default)]
pub struct ObjectMap {
    subsections: Vec<ObjectMapSubsection>,
    entries: Vec<ObjectMapEntry>,
    index: IndexMap<Handle, u64, ahash::RandomState>,
}

impl ObjectMap {
    /// Build the map from decoded subsections.
    ///
    /// The lookup index keeps the first offset seen for a handle; the entry
    /// list keeps every pair in file order.
    pub fn new(subsections: Vec<ObjectMapSubsection>) -> Result<Self> {
        let entries = reconstruct_offsets(&subsections)?;
        let mut index: IndexMap<Handle, u64, ahash::RandomState> =
            IndexMap::with_capacity_and_hasher(entries.len(), ahash::RandomState::new());
        for entry in &entries {
            index.entry(entry.handle).or_insert(entry.offset);
        }
        Ok(Self {
            subsections,
            entries,
            index,
        })
    }

    pub fn subsections(&self) -> &[ObjectMapSubsection] {
        &self.subsections
    }

    /// All reconstructed entries in file order.
    pub fn entries(&self) -> &[ObjectMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File offset of the object with the given handle.
    pub fn offset_of(&self, handle: Handle) -> Option<u64> {
        self.index.get(&handle).copied()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.index.contains_key(&handle)
    }
}

/// Reader for the DWG `AcDb:Handles` (object map) section.
pub struct DwgHandleReader {
    /// Raw section bytes.
    data: Vec<u8>,
    /// File offset of the section.
    offset: u64,
}

impl DwgHandleReader {
    pub fn new(data: Vec<u8>, offset: u64) -> Self {
        Self { data, offset }
    }

    /// Read every subsection up to the terminator.
    pub fn read(
        &self,
        verify_crc: bool,
        notifications: &mut NotificationCollection,
    ) -> Result<ObjectMap> {
        let mut subsections = Vec::new();
        let mut pos = 0usize;

        // Repeat until section size == 2 (the last empty section, except CRC):
        loop {
            // Short: size of this section. Note this is in BIGENDIAN order (MSB first)
            let size = BigEndian::read_u16(self.slice(pos, 2)?) as usize;
            if size == TERMINATOR_SIZE {
                break;
            }
            if size < TERMINATOR_SIZE {
                return Err(DwgError::InvalidFormat(format!(
                    "object map subsection at {:#X} declares size {size}",
                    self.offset + pos as u64
                )));
            }

            let body = self.slice(pos + 2, size)?;
            let (pairs, crc_bytes) = body.split_at(size - 2);

            let mut reader = DwgBitReader::new(pairs.to_vec());
            let mut deltas = Vec::new();
            // Repeat until out of data for this section:
            while (reader.position() as usize) < pairs.len() {
                // Handle as modular char
                let handle = reader.read_modular_char()?;
                // Offset of location in file from last loc as signed modular char
                let offset_delta = reader.read_signed_modular_char()?;
                deltas.push(ObjectMapDelta {
                    handle,
                    offset_delta,
                });
            }

            // CRC (most significant byte followed by least significant byte)
            let stored = BigEndian::read_u16(crc_bytes);
            let computed = crc8(CRC_SEED, &self.data[pos..pos + size]);
            check_crc(
                DwgSectionKind::ObjectMap,
                self.offset + pos as u64,
                stored,
                computed,
                verify_crc,
                notifications,
            )?;

            subsections.push(ObjectMapSubsection {
                offset: self.offset + pos as u64,
                deltas,
                crc: stored,
            });
            pos += 2 + size;
        }

        ObjectMap::new(subsections)
    }

    fn slice(&self, start: usize, length: usize) -> Result<&[u8]> {
        self.data
            .get(start..start.saturating_add(length))
            .ok_or(DwgError::Overrun {
                position: (start as u64).saturating_mul(8),
                requested: (length as u64).saturating_mul(8),
                length: (self.data.len() as u64).saturating_mul(8),
            })
    }
}
