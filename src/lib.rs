//! # dwgcore
//!
//! A pure Rust decoder for AutoCAD R2000 (`AC1015`) DWG files.
//!
//! The library reads the file preamble, the custom classes and the object
//! map, then decodes geometry-bearing entities on demand into owned
//! [`Geometry`] values.
//!
//! ## Features
//!
//! - Bit-level reader for every DWG R2000 compressed encoding
//! - Circles, arcs, ellipses, points, lines, lightweight and 3D polylines,
//!   text, rays, construction lines, solids and 3D faces
//! - Independent per-object decoding, safe to run in parallel
//! - Strict or lenient CRC policy, failsafe section reading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dwgcore::{decode_geometry, decode_sections, DwgReaderConfiguration};
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let mut source = BufReader::new(File::open("sample.dwg")?);
//! let sections = decode_sections(&mut source, &DwgReaderConfiguration::default())?;
//!
//! for i in 0..sections.geometry_count() {
//!     let geometry = decode_geometry(&mut source, &sections, i)?;
//!     println!("{}: {:?}", geometry.name(), geometry);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`io::dwg::reader::DwgBitReader`] - bit cursor over a byte region
//! - [`io::dwg::reader::DwgSections`] - immutable result of section decoding
//! - [`geometry::Geometry`] - closed set of decoded entity records
//! - [`DwgError`] - structured faults carrying section and offset

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classes;
pub mod error;
pub mod geometry;
pub mod io;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{DwgError, Result};
pub use types::{Handle, Vector2, Vector3};

// Re-export geometry types
pub use geometry::{
    Arc, Circle, Ellipse, Face3D, Geometry, Line, LwPolyline, Point, Polyline3D, Ray, Solid, Text,
    XLine,
};

pub use classes::{DwgClass, DwgClassList};
pub use notification::{Notification, NotificationCollection, NotificationType};

// Re-export I/O types
pub use io::dwg::{
    decode_all_geometries_par, decode_entity, decode_geometry, decode_sections, geometry_count,
    DwgReader, DwgReaderConfiguration, DwgSections, GeometryLocation,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
