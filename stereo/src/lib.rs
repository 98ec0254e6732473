//! Adaptive-weights stereo matching
//!
//! Dense disparity estimation between a rectified stereo pair using
//! bilaterally weighted patches (Yoon-Kweon), followed by left/right
//! occlusion detection and weighted-median densification.

pub mod aggregate;
pub mod cost;
pub mod fill;
pub mod gradient;
pub mod kernels;
pub mod median;
pub mod occlusion;
pub mod params;
pub mod pipeline;
pub mod support;

pub use aggregate::*;
pub use cost::*;
pub use fill::*;
pub use gradient::*;
pub use kernels::*;
pub use median::*;
pub use occlusion::*;
pub use params::*;
pub use pipeline::*;
pub use support::*;

pub use sv_core::{DisparityMap, Error, FloatImage, Result};
