//! Rendering of float maps to 8-bit color PNG.

use image::{Rgb, RgbImage};
use sv_core::{Error, Result};

/// Color of NaN or out-of-range pixels: cyan.
const INVALID_COLOR: [u8; 3] = [0, 255, 255];

/// Map float values to gray levels with the affine `gray = a*value + b`.
///
/// `a` and `b` are chosen so `v_min` maps to `gray_min` and `v_max` to
/// `gray_max` (the defaults invert: near disparities bright). Values outside
/// `[v_min, v_max]` or non-finite render as cyan.
pub fn render_gray(
    values: &[f32],
    width: u32,
    height: u32,
    v_min: f32,
    v_max: f32,
    gray_min: i32,
    gray_max: i32,
) -> Result<RgbImage> {
    if values.len() != (width * height) as usize {
        return Err(Error::SizeMismatch(format!(
            "{} values do not fill a {}x{} image",
            values.len(),
            width,
            height
        )));
    }
    if v_max <= v_min {
        return Err(Error::InvalidInput(format!(
            "vMax ({v_max}) must be greater than vMin ({v_min})"
        )));
    }

    let a = (gray_max - gray_min) as f32 / (v_max - v_min);
    let b = (gray_min as f32 * v_max - gray_max as f32 * v_min) / (v_max - v_min);

    let mut out = RgbImage::new(width, height);
    for (pixel, &v) in out.pixels_mut().zip(values) {
        *pixel = if v.is_finite() && v_min <= v && v <= v_max {
            let g = (a * v + b + 0.5).clamp(0.0, 255.0) as u8;
            Rgb([g, g, g])
        } else {
            Rgb(INVALID_COLOR)
        };
    }
    Ok(out)
}
