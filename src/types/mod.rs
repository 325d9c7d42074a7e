//! Core value types shared by the decoder and the geometry model

pub mod handle;
pub mod vector;

pub use handle::Handle;
pub use vector::{Vector2, Vector3};
