//! DWG file format reader support.
//!
//! This module implements reading of AutoCAD R2000 (`AC1015`) DWG binary
//! files.
//!
//! # Module Structure
//!
//! - [`constants`] — Magic numbers, sentinel bytes, section kinds
//! - [`crc`] — CRC-8 (16-bit) computation and checking
//! - [`reference_type`] — DWG handle reference codes and resolution
//! - [`object_type`] — Built-in object type codes
//! - [`file_header`] — DWG file header structures (AC15)
//! - [`reader`] — Bit reader and section readers

pub mod constants;
pub mod crc;
pub mod file_header;
pub mod object_type;
pub mod reader;
pub mod reference_type;

// Re-export commonly used types
pub use constants::DwgSectionKind;
pub use file_header::{DwgFileHeaderAC15, DwgSectionLocatorRecord, SectionLocatorTable};
pub use object_type::DwgObjectType;
pub use reader::{
    decode_all_geometries_par, decode_entity, decode_geometry, decode_sections, geometry_count,
    DwgReader, DwgReaderConfiguration, DwgSections, GeometryLocation,
};
pub use reference_type::{DwgReferenceType, HandleReference};
