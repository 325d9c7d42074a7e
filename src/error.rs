//! Error types for dwgcore

use std::io;
use thiserror::Error;

use crate::io::dwg::constants::DwgSectionKind;

/// Main error type for DWG decoding.
///
/// Variants fall into the groups the decoder distinguishes:
/// structural faults (`InvalidSentinel`, `Overrun`, `InvalidSectionTable`,
/// `InvalidFormat`), type faults (`UnknownObjectType`), index faults
/// (`IndexOutOfBounds`) and strict-mode checksum faults (`ChecksumMismatch`).
/// Faults raised while a section is being decoded are wrapped in
/// [`DwgError::Section`] so the caller knows where they happened.
#[derive(Debug, Error)]
pub enum DwgError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The version marker is not one this decoder understands
    #[error("Unsupported DWG version: {0:?}")]
    UnsupportedVersion(String),

    /// A 16-byte sentinel did not match its fixed value
    #[error("Invalid {section} sentinel at offset {offset:#X}")]
    InvalidSentinel {
        section: DwgSectionKind,
        offset: u64,
    },

    /// A read would have gone past the end of the byte region
    #[error("Read overrun at bit {position}: {requested} bits requested, region holds {length} bits")]
    Overrun {
        position: u64,
        requested: u64,
        length: u64,
    },

    /// Missing or out-of-bounds section locator record
    #[error("Invalid section table: {0}")]
    InvalidSectionTable(String),

    /// Malformed value inside an otherwise readable region
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Type code resolves to neither a built-in type nor a declared class
    #[error("Unknown object type {code} at offset {offset:#X}")]
    UnknownObjectType { code: i16, offset: u64 },

    /// Requested geometry index is outside the geometry list
    #[error("Geometry index {index} out of range (count {count})")]
    IndexOutOfBounds { index: usize, count: usize },

    /// CRC checksum mismatch (only raised when CRC verification is enabled)
    #[error("CRC checksum mismatch in {section}: expected {expected:#06X}, got {actual:#06X}")]
    ChecksumMismatch {
        section: DwgSectionKind,
        expected: u16,
        actual: u16,
    },

    /// A fault raised while decoding a specific section
    #[error("{section} at offset {offset:#X}: {source}")]
    Section {
        section: DwgSectionKind,
        offset: u64,
        #[source]
        source: Box<DwgError>,
    },
}

/// Result type alias for dwgcore operations
pub type Result<T> = std::result::Result<T, DwgError>;

impl DwgError {
    /// Attach section context to an error.
    ///
    /// Errors that already carry context are returned unchanged so the
    /// innermost location wins.
    pub fn in_section(self, section: DwgSectionKind, offset: u64) -> Self {
        match self {
            DwgError::Section { .. } => self,
            other => DwgError::Section {
                section,
                offset,
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any section context stripped.
    pub fn root(&self) -> &DwgError {
        match self {
            DwgError::Section { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is a structural-integrity fault (corrupt or
    /// inconsistent file layout).
    pub fn is_structural(&self) -> bool {
        matches!(
            self.root(),
            DwgError::InvalidSentinel { .. }
                | DwgError::Overrun { .. }
                | DwgError::InvalidSectionTable(_)
                | DwgError::InvalidFormat(_)
        )
    }
}
