//! File format readers.

pub mod dwg;

pub use dwg::{DwgReader, DwgReaderConfiguration};
