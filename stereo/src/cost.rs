//! Raw matching cost volume.
//!
//! One single-channel layer per disparity, each a truncated linear
//! combination of the color L1 distance and the x-gradient absolute
//! difference.

use rayon::prelude::*;
use sv_core::FloatImage;

use crate::params::MatchParams;

/// Ordered per-disparity cost layers over the reference grid.
pub struct CostVolume {
    layers: Vec<Vec<f32>>,
    min_disparity: i32,
}

impl CostVolume {
    /// Build all layers for `d` in `[min_disparity, max_disparity]`.
    /// Layers are independent and computed in parallel.
    pub fn build(
        left: &FloatImage,
        right: &FloatImage,
        grad_left: &FloatImage,
        grad_right: &FloatImage,
        min_disparity: i32,
        max_disparity: i32,
        params: &MatchParams,
    ) -> Self {
        let layers = (min_disparity..=max_disparity)
            .into_par_iter()
            .map(|d| cost_layer(left, right, grad_left, grad_right, d, params))
            .collect();
        Self {
            layers,
            min_disparity,
        }
    }

    /// Cost layer for disparity `d`.
    #[inline]
    pub fn layer(&self, d: i32) -> &[f32] {
        &self.layers[(d - self.min_disparity) as usize]
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }
}

/// Pixelwise cost at disparity `d`.
///
/// Where `x + d` leaves the image both terms saturate at their thresholds,
/// so the layer value equals the upper bound there.
fn cost_layer(
    left: &FloatImage,
    right: &FloatImage,
    grad_left: &FloatImage,
    grad_right: &FloatImage,
    d: i32,
    params: &MatchParams,
) -> Vec<f32> {
    let w = left.width();
    let h = left.height();
    let channels = left.channels();
    let mut cost = Vec::with_capacity((w * h) as usize);

    for y in 0..h {
        for x in 0..w {
            let mut color_cost = params.color_threshold;
            let mut gradient_cost = params.gradient_threshold;

            let tx = x as i32 + d;
            if tx >= 0 && tx < w as i32 {
                let tx = tx as u32;
                let mut l1 = 0.0f32;
                for c in 0..channels {
                    l1 += (left.get(x, y, c) - right.get(tx, y, c)).abs();
                }
                color_cost = (l1 / channels as f32).min(params.color_threshold);
                gradient_cost = (grad_left.get(x, y, 0) - grad_right.get(tx, y, 0))
                    .abs()
                    .min(params.gradient_threshold);
            }

            cost.push((1.0 - params.alpha) * color_cost + params.alpha * gradient_cost);
        }
    }

    cost
}
