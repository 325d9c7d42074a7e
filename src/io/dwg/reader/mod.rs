//! DWG bit-level stream reader and section readers.
//!
//! This module contains the reader side of the DWG I/O system:
//!
//! ## Stream reader
//! - [`bit_reader`] — bit cursor with the DWG compressed encodings
//!
//! ## Section readers
//! - [`classes_reader`] — classes section (custom class definitions)
//! - [`handle_reader`] — object map (handle to file offset)
//! - [`object_reader`] — individual geometry objects
//! - [`dwg_reader`] — file header, section pipeline and public API

pub mod bit_reader;
pub mod classes_reader;
pub mod dwg_reader;
pub mod handle_reader;
pub mod object_reader;

pub use bit_reader::{encoding_from_code_page, DwgBitReader};
pub use classes_reader::DwgClassesReader;
pub use dwg_reader::{
    decode_all_geometries_par, decode_entity, decode_geometry, decode_sections, geometry_count,
    DwgReader, DwgReaderConfiguration, DwgSections, GeometryLocation,
};
pub use handle_reader::{DwgHandleReader, ObjectMap, ObjectMapEntry};
pub use object_reader::{CommonEntityHeader, DecodedEntity, DwgObjectReader, EntityReferences};
