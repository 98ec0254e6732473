//! Horizontal finite-difference gradient.

use sv_core::{Error, FloatImage, Result};

/// Central-difference x-gradient of a single-channel image.
///
/// Interior columns use `(I(x+1) - I(x-1)) / 2`; the first and last columns
/// use the one-sided difference. Sign is preserved.
pub fn grad_x(gray: &FloatImage) -> Result<FloatImage> {
    if gray.channels() != 1 {
        return Err(Error::InvalidInput(format!(
            "gradient expects a single-channel image, got {} channels",
            gray.channels()
        )));
    }
    let w = gray.width() as usize;
    let h = gray.height() as usize;
    let src = gray.as_slice();
    let mut out = vec![0.0f32; w * h];

    if w > 1 {
        for y in 0..h {
            let row = &src[y * w..(y + 1) * w];
            let dst = &mut out[y * w..(y + 1) * w];
            dst[0] = row[1] - row[0];
            for x in 1..w - 1 {
                dst[x] = 0.5 * (row[x + 1] - row[x - 1]);
            }
            dst[w - 1] = row[w - 1] - row[w - 2];
        }
    }

    FloatImage::from_raw(out, gray.width(), gray.height(), 1)
}
