//! Float image buffer with cheap shared views.
//!
//! `Clone` shares the pixel store; large temporaries (gradients, cost layers)
//! are passed around without copying. Use [`FloatImage::deep_clone`] for an
//! independent copy. Channels are interleaved, RGBRGB...

use std::sync::Arc;

use crate::{Error, Result};

/// Rec. 601 luma coefficients.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Interleaved W x H x C grid of `f32`, C in {1, 3}.
///
/// Pixel values of loaded images are in [0, 255]. The backing buffer is
/// immutable once wrapped; algorithm passes build fresh buffers and wrap them
/// with [`FloatImage::from_raw`] on completion.
#[derive(Clone)]
pub struct FloatImage {
    data: Arc<Vec<f32>>,
    width: u32,
    height: u32,
    channels: u32,
}

impl FloatImage {
    /// Zero-filled image of the given dimensions.
    pub fn new(width: u32, height: u32, channels: u32) -> Result<Self> {
        Self::from_raw(
            vec![0.0; (width * height * channels) as usize],
            width,
            height,
            channels,
        )
    }

    /// Wrap an existing pixel buffer, taking ownership.
    pub fn from_raw(data: Vec<f32>, width: u32, height: u32, channels: u32) -> Result<Self> {
        if channels != 1 && channels != 3 {
            return Err(Error::InvalidInput(format!(
                "channels must be 1 or 3, got {channels}"
            )));
        }
        let expected = (width * height * channels) as usize;
        if data.len() != expected {
            return Err(Error::SizeMismatch(format!(
                "pixel buffer holds {} values, {}x{}x{} needs {}",
                data.len(),
                width,
                height,
                channels,
                expected
            )));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            channels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32, c: u32) -> f32 {
        self.data[((y * self.width + x) * self.channels + c) as usize]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Independent copy of the pixel store.
    pub fn deep_clone(&self) -> Self {
        Self {
            data: Arc::new(self.data.as_ref().clone()),
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// True when both images share the same pixel store.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Extract one channel as a single-channel image.
    pub fn channel(&self, c: u32) -> Result<Self> {
        if c >= self.channels {
            return Err(Error::InvalidInput(format!(
                "channel {c} requested from a {}-channel image",
                self.channels
            )));
        }
        let mut plane = Vec::with_capacity((self.width * self.height) as usize);
        for px in self.data.chunks_exact(self.channels as usize) {
            plane.push(px[c as usize]);
        }
        Self::from_raw(plane, self.width, self.height, 1)
    }

    /// Luma conversion preserving the [0, 255] scale.
    ///
    /// Single-channel images are returned as a shared view.
    pub fn gray(&self) -> Self {
        if self.channels == 1 {
            return self.clone();
        }
        let gray = self
            .data
            .chunks_exact(3)
            .map(|px| LUMA_WEIGHTS[0] * px[0] + LUMA_WEIGHTS[1] * px[1] + LUMA_WEIGHTS[2] * px[2])
            .collect();
        Self {
            data: Arc::new(gray),
            width: self.width,
            height: self.height,
            channels: 1,
        }
    }
}
