//! DWG Classes section reader.
//!
//! Reads custom class definitions from the `AcDb:Classes` section. The
//! section contains type information for every object class used in the
//! drawing beyond the built-in ones.
//!
//! Layout:
//!
//! ```text
//! SN  classes start sentinel
//! RL  n, size of the class data area
//!     n bytes of class records (bit stream)
//! RS  CRC over the size and the data
//! SN  classes end sentinel
//! ```

use encoding_rs::Encoding;

use crate::classes::{DwgClass, DwgClassList};
use crate::error::{DwgError, Result};
use crate::io::dwg::constants::{sentinels, DwgSectionKind, CRC_SEED};
use crate::io::dwg::crc::{check_crc, crc8};
use crate::io::dwg::reader::bit_reader::DwgBitReader;
use crate::notification::NotificationCollection;

/// Reader for the DWG `AcDb:Classes` section.
pub struct DwgClassesReader {
    /// Raw section bytes, sentinel to sentinel.
    data: Vec<u8>,
    /// File offset of the section, for error context.
    offset: u64,
    encoding: &'static Encoding,
}

impl DwgClassesReader {
    pub fn new(data: Vec<u8>, offset: u64, encoding: &'static Encoding) -> Self {
        Self {
            data,
            offset,
            encoding,
        }
    }

    /// Read all class definitions from the section.
    ///
    /// `verify_crc` selects whether a CRC mismatch is fatal or only recorded
    /// in `notifications`.
    pub fn read(
        &self,
        verify_crc: bool,
        notifications: &mut NotificationCollection,
    ) -> Result<DwgClassList> {
        let mut reader = DwgBitReader::with_encoding(self.data.clone(), self.encoding);

        // SN: 0x8D 0xA1 0xC4 0xB8 0xC4 0xA9 0xF8 0xC5 0xC0 0xDC 0xF4 0x5F 0xE7 0xCF 0xB6 0x8A
        let sentinel = reader.read_sentinel()?;
        if sentinel != sentinels::CLASSES_START {
            return Err(DwgError::InvalidSentinel {
                section: DwgSectionKind::Classes,
                offset: self.offset,
            });
        }

        // RL: size of class data area
        let size = reader.read_raw_long()?;
        let size = usize::try_from(size)
            .map_err(|_| DwgError::InvalidFormat(format!("negative classes size {size}")))?;
        let data = reader.read_bytes(size)?;

        let classes = self.read_classes(data, size)?;

        // RS: CRC
        let stored = reader.read_raw_ushort()?;
        let computed = crc8(CRC_SEED, &self.data[16..20 + size]);
        check_crc(
            DwgSectionKind::Classes,
            self.offset,
            stored,
            computed,
            verify_crc,
            notifications,
        )?;

        // SN: 0x72 0x5E 0x3B 0x47 0x3B 0x56 0x07 0x3A 0x3F 0x23 0x0B 0xA0 0x18 0x30 0x49 0x75
        let end_position = reader.position();
        let sentinel = reader.read_sentinel()?;
        if sentinel != sentinels::CLASSES_END {
            return Err(DwgError::InvalidSentinel {
                section: DwgSectionKind::Classes,
                offset: self.offset + end_position,
            });
        }

        Ok(classes)
    }

    /// Read class records until the data area is used up.
    fn read_classes(&self, data: Vec<u8>, size: usize) -> Result<DwgClassList> {
        let mut classes = DwgClassList::new();
        let mut reader = DwgBitReader::with_encoding(data, self.encoding);

        // The last byte holds padding bits, never a full record.
        while (reader.position() as usize) + 1 < size {
            classes.push(Self::read_class(&mut reader)?);
        }

        Ok(classes)
    }

    /// Read a single class definition from the stream.
    fn read_class(reader: &mut DwgBitReader) -> Result<DwgClass> {
        Ok(DwgClass {
            // BS: classnum
            class_number: reader.read_bit_short()?,
            // BS: version – in R14, becomes a flag indicating whether objects can be moved, edited, etc.
            version: reader.read_bit_short()?,
            // TV: appname
            app_name: reader.read_variable_text()?,
            // TV: cplusplusclassname
            cpp_class_name: reader.read_variable_text()?,
            // TV: classdxfname
            dxf_name: reader.read_variable_text()?,
            // B: wasazombie
            was_zombie: reader.read_bit()?,
            // BS: itemclassid -- 0x1F2 for classes which produce entities, 0x1F3 for classes which produce objects.
            item_class_id: reader.read_bit_short()?,
        })
    }
}
