//! Constants, sentinel bytes, and magic numbers for the R2000 DWG layout.

use std::fmt;

/// Version marker at the start of every R2000 drawing.
pub const VERSION_AC1015: &[u8; 6] = b"AC1015";

/// Type codes at or above this value index the classes section.
pub const CUSTOM_CLASS_BASE: i16 = 500;

/// Seed for every section and object CRC in the R2000 layout.
pub const CRC_SEED: u16 = 0xC0C1;

/// Bytes read when probing an object's type in the object-map filter.
pub const DEFAULT_PROBE_LENGTH: usize = 100;

/// Bytes read to obtain an object's modular-short length prefix.
pub const OBJECT_SIZE_PROBE_LENGTH: usize = 8;

/// Sentinel bytes for section boundaries (16-byte markers).
pub mod sentinels {
    /// AcDb:Header section start sentinel
    pub const HEADER_START: [u8; 16] = [
        0xCF, 0x7B, 0x1F, 0x23, 0xFD, 0xDE, 0x38, 0xA9, 0x5F, 0x7C, 0x68, 0xB8, 0x4E, 0x6D,
        0x33, 0x5F,
    ];
    /// AcDb:Header section end sentinel
    pub const HEADER_END: [u8; 16] = [
        0x30, 0x84, 0xE0, 0xDC, 0x02, 0x21, 0xC7, 0x56, 0xA0, 0x83, 0x97, 0x47, 0xB1, 0x92,
        0xCC, 0xA0,
    ];
    /// AcDb:Classes section start sentinel
    pub const CLASSES_START: [u8; 16] = [
        0x8D, 0xA1, 0xC4, 0xB8, 0xC4, 0xA9, 0xF8, 0xC5, 0xC0, 0xDC, 0xF4, 0x5F, 0xE7, 0xCF,
        0xB6, 0x8A,
    ];
    /// AcDb:Classes section end sentinel
    pub const CLASSES_END: [u8; 16] = [
        0x72, 0x5E, 0x3B, 0x47, 0x3B, 0x56, 0x07, 0x3A, 0x3F, 0x23, 0x0B, 0xA0, 0x18, 0x30,
        0x49, 0x75,
    ];
    /// End of the file preamble
    pub const FILE_HEADER_END: [u8; 16] = [
        0x95, 0xA0, 0x4E, 0x28, 0x99, 0x82, 0x1A, 0xE5, 0x5E, 0x41, 0xE0, 0x5F, 0x9D, 0x3A,
        0x4D, 0x00,
    ];
}

/// Logical regions of an R2000 drawing, used for error context and
/// section-locator lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DwgSectionKind {
    /// Preamble and section-locator table
    FileHeader,
    /// AcDb:Header (header variables)
    HeaderVariables,
    /// AcDb:Classes
    Classes,
    /// AcDb:Handles (object map)
    ObjectMap,
    /// A single object body
    Object,
}

impl DwgSectionKind {
    /// The canonical AcDb section name.
    pub fn name(self) -> &'static str {
        match self {
            Self::FileHeader => "FileHeader",
            Self::HeaderVariables => "AcDb:Header",
            Self::Classes => "AcDb:Classes",
            Self::ObjectMap => "AcDb:Handles",
            Self::Object => "AcDb:AcDbObjects",
        }
    }

    /// Slot in the section-locator table, for sections that have one.
    pub fn locator_index(self) -> Option<u8> {
        match self {
            Self::HeaderVariables => Some(0),
            Self::Classes => Some(1),
            Self::ObjectMap => Some(2),
            Self::FileHeader | Self::Object => None,
        }
    }
}

impl fmt::Display for DwgSectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
