//! PNG loading and saving.

use std::path::Path;

use image::DynamicImage;
use sv_core::{FloatImage, Result};

/// Load a PNG as an interleaved RGB float image with values in [0, 255].
///
/// 8-bit samples keep their exact integer values; 16-bit samples are scaled
/// by 255/65535. Grayscale inputs are expanded to three equal channels.
pub fn load_color(path: &Path) -> Result<FloatImage> {
    let img = image::open(path)?;
    let (width, height) = (img.width(), img.height());

    let data: Vec<f32> = match img {
        DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => {
            let rgb = img.to_rgb16();
            rgb.as_raw()
                .iter()
                .map(|&v| v as f32 * (255.0 / 65535.0))
                .collect()
        }
        _ => {
            let rgb = img.to_rgb8();
            rgb.as_raw().iter().map(|&v| v as f32).collect()
        }
    };

    FloatImage::from_raw(data, width, height, 3)
}

/// Save a single-channel float image as 8-bit grayscale PNG, clamping to
/// [0, 255].
pub fn save_gray(path: &Path, values: &[f32], width: u32, height: u32) -> Result<()> {
    let pixels: Vec<u8> = values
        .iter()
        .map(|&v| v.clamp(0.0, 255.0) as u8)
        .collect();
    let img = image::GrayImage::from_raw(width, height, pixels).ok_or_else(|| {
        sv_core::Error::SizeMismatch(format!(
            "{} values do not fill a {}x{} gray image",
            values.len(),
            width,
            height
        ))
    })?;
    img.save(path)?;
    Ok(())
}
