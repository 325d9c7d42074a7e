//! DWG file header structures.
//!
//! The R2000 preamble holds the version marker, the preview address, the
//! drawing code page and the section-locator table.

mod section_locator;

pub use section_locator::{DwgSectionLocatorRecord, SectionLocatorTable};

use encoding_rs::Encoding;

use crate::io::dwg::reader::bit_reader::encoding_from_code_page;

/// Decoded R2000 preamble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DwgFileHeaderAC15 {
    /// Byte 0x0B: maintenance release of the writing application
    pub maintenance_version: u8,
    /// Byte offset of the thumbnail image
    pub preview_address: u64,
    pub code_page: u16,
    pub records: SectionLocatorTable,
    /// Stored preamble CRC (not verified)
    pub crc: u16,
}

impl DwgFileHeaderAC15 {
    /// Text encoding selected by the drawing code page.
    pub fn encoding(&self) -> &'static Encoding {
        encoding_from_code_page(self.code_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_follows_code_page() {
        let header = DwgFileHeaderAC15 {
            code_page: 0x03,
            ..Default::default()
        };
        assert_eq!(header.encoding(), encoding_rs::WINDOWS_1251);
    }
}
