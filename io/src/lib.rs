//! Image and disparity map I/O
//!
//! PNG loading into float images, 32-bit float grayscale TIFF persistence,
//! and rendering of float maps to 8-bit PNG.

pub mod png;
pub mod render;
pub mod tiff;

pub use png::*;
pub use render::*;
pub use tiff::*;

pub use sv_core::{Error, Result};
