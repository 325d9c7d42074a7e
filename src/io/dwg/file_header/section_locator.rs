//! DWG section locator record.
//!
//! The R2000 preamble lists one record per top-level section; record 0 is
//! the header variables, 1 the classes, 2 the object map.

use crate::error::{DwgError, Result};
use crate::io::dwg::constants::DwgSectionKind;

/// File offset and size of one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DwgSectionLocatorRecord {
    /// Section number (index).
    pub number: u8,
    /// Byte offset into the DWG file.
    pub seeker: u64,
    /// Size of the section in bytes.
    pub size: u64,
}

impl DwgSectionLocatorRecord {
    pub fn new(number: u8, seeker: u64, size: u64) -> Self {
        Self {
            number,
            seeker,
            size,
        }
    }

    /// First byte past the section.
    pub fn end(&self) -> u64 {
        self.seeker.saturating_add(self.size)
    }

    /// Whether the whole section lies inside a file of `file_length` bytes.
    pub fn fits_within(&self, file_length: u64) -> bool {
        self.seeker
            .checked_add(self.size)
            .map_or(false, |end| end <= file_length)
    }
}

/// The locator records in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLocatorTable {
    records: Vec<DwgSectionLocatorRecord>,
}

impl SectionLocatorTable {
    pub fn new(records: Vec<DwgSectionLocatorRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DwgSectionLocatorRecord] {
        &self.records
    }

    /// Look up a record by its section number.
    pub fn by_number(&self, number: u8) -> Option<&DwgSectionLocatorRecord> {
        self.records.iter().find(|r| r.number == number)
    }

    /// Locator record for a top-level section.
    pub fn get(&self, section: DwgSectionKind) -> Result<&DwgSectionLocatorRecord> {
        section
            .locator_index()
            .and_then(|n| self.by_number(n))
            .ok_or_else(|| {
                DwgError::InvalidSectionTable(format!("no locator record for {section}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let rec = DwgSectionLocatorRecord::default();
        assert_eq!(rec.number, 0);
        assert_eq!(rec.seeker, 0);
        assert_eq!(rec.size, 0);
    }

    #[test]
    fn test_fits_within() {
        let rec = DwgSectionLocatorRecord::new(2, 0x100, 0x20);
        assert_eq!(rec.end(), 0x120);
        assert!(rec.fits_within(0x120));
        assert!(!rec.fits_within(0x11F));
        assert!(!DwgSectionLocatorRecord::new(0, u64::MAX, 2).fits_within(u64::MAX));
    }

    #[test]
    fn test_table_lookup() {
        let table = SectionLocatorTable::new(vec![
            DwgSectionLocatorRecord::new(0, 0x61, 0x400),
            DwgSectionLocatorRecord::new(1, 0x461, 0x80),
        ]);
        assert_eq!(table.get(DwgSectionKind::Classes).unwrap().seeker, 0x461);
        assert!(matches!(
            table.get(DwgSectionKind::ObjectMap),
            Err(DwgError::InvalidSectionTable(_))
        ));
        assert!(table.get(DwgSectionKind::Object).is_err());
    }
}
