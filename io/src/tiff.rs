//! 32-bit float grayscale TIFF persistence.
//!
//! Disparity maps travel between the pipeline stages and the rendering tool
//! as float TIFF, so finite values must survive bit-exactly.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};

use sv_core::{DisparityMap, Error, Result};

fn codec_error(e: tiff::TiffError) -> Error {
    Error::Codec(e.to_string())
}

/// Write raw float samples as a single-strip grayscale TIFF.
pub fn write_gray_f32(path: &Path, data: &[f32], width: u32, height: u32) -> Result<()> {
    if data.len() != (width * height) as usize {
        return Err(Error::SizeMismatch(format!(
            "{} samples do not fill a {}x{} image",
            data.len(),
            width,
            height
        )));
    }
    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file)).map_err(codec_error)?;
    encoder
        .write_image::<colortype::Gray32Float>(width, height, data)
        .map_err(codec_error)?;
    Ok(())
}

/// Read a grayscale float TIFF back as `(samples, width, height)`.
pub fn read_gray_f32(path: &Path) -> Result<(Vec<f32>, u32, u32)> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file)).map_err(codec_error)?;
    let (width, height) = decoder.dimensions().map_err(codec_error)?;
    match decoder.read_image().map_err(codec_error)? {
        DecodingResult::F32(samples) => Ok((samples, width, height)),
        _ => Err(Error::Codec(format!(
            "{} does not hold 32-bit float samples",
            path.display()
        ))),
    }
}

/// Persist a disparity map, staging invalid pixels as NaN.
///
/// Finite values inside the search interval are written unchanged; the
/// occlusion sentinel and anything else outside the interval become NaN.
/// This is the only place the pipeline produces NaN.
pub fn write_disparity(path: &Path, map: &DisparityMap) -> Result<()> {
    let staged: Vec<f32> = map
        .data
        .iter()
        .map(|&v| if v.is_finite() && map.in_range(v) { v } else { f32::NAN })
        .collect();
    write_gray_f32(path, &staged, map.width, map.height)
}
