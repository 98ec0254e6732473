//! Weighted-median densification of occluded pixels.

use rayon::prelude::*;
use sv_core::{DisparityMap, Error, FloatImage, Result};

use crate::params::OcclusionParams;

/// Replace occluded pixels by the weighted median of neighboring reliable
/// disparities.
///
/// For each occluded pixel of `disparity` a histogram over the integer
/// disparities of the search interval is accumulated from `dense` samples in
/// the median window, each weighted by a spatial Gaussian and a color kernel
/// on the guidance image. The smallest disparity whose cumulative weight
/// reaches half the total wins. Windows without any valid sample keep the
/// `dense` fallback value. Non-occluded pixels are left untouched.
pub fn densify_occlusions(
    dense: &DisparityMap,
    guidance: &FloatImage,
    disparity: &mut DisparityMap,
    params: &OcclusionParams,
) -> Result<()> {
    if dense.width != disparity.width || dense.height != disparity.height {
        return Err(Error::SizeMismatch(format!(
            "dense map {}x{} does not cover the disparity grid {}x{}",
            dense.width, dense.height, disparity.width, disparity.height
        )));
    }
    if guidance.width() != disparity.width || guidance.height() != disparity.height {
        return Err(Error::SizeMismatch(format!(
            "guidance image {}x{} does not cover the disparity grid {}x{}",
            guidance.width(),
            guidance.height(),
            disparity.width,
            disparity.height
        )));
    }
    params.validate()?;

    let width = disparity.width as i32;
    let height = disparity.height as i32;
    let d_min = disparity.min_disparity;
    let d_max = disparity.max_disparity;
    let bins = (d_max - d_min + 1) as usize;
    let sentinel = disparity.occlusion_sentinel();
    let radius = params.median_radius;
    let channels = guidance.channels();
    let sigma_space_sq = 2.0 * params.sigma_space * params.sigma_space;
    let color_scale = channels as f32 * params.sigma_color;

    disparity
        .data
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            let mut histogram = vec![0.0f32; bins];

            for x in 0..width {
                if row[x as usize] != sentinel {
                    continue;
                }

                histogram.fill(0.0);
                let mut total = 0.0f32;
                let mut center = [0.0f32; 3];
                for c in 0..channels {
                    center[c as usize] = guidance.get(x as u32, y as u32, c);
                }

                for dy in -radius..=radius {
                    let yy = y + dy;
                    if yy < 0 || yy >= height {
                        continue;
                    }
                    for dx in -radius..=radius {
                        let xx = x + dx;
                        if xx < 0 || xx >= width {
                            continue;
                        }
                        let sample = dense.get(xx as u32, yy as u32);
                        if !dense.in_range(sample) {
                            continue;
                        }

                        let spatial = (-((dx * dx + dy * dy) as f32) / sigma_space_sq).exp();
                        let mut l1 = 0.0f32;
                        for c in 0..channels {
                            l1 += (guidance.get(xx as u32, yy as u32, c) - center[c as usize])
                                .abs();
                        }
                        let range = (-l1 / color_scale).exp();

                        let weight = spatial * range;
                        histogram[(sample.round() as i32 - d_min) as usize] += weight;
                        total += weight;
                    }
                }

                row[x as usize] = if total > 0.0 {
                    weighted_median(&histogram, total, d_min)
                } else {
                    dense.get(x as u32, y as u32)
                };
            }
        });

    Ok(())
}

/// Smallest disparity whose cumulative weight reaches half the total.
fn weighted_median(histogram: &[f32], total: f32, d_min: i32) -> f32 {
    let half = 0.5 * total;
    let mut cumulative = 0.0f32;
    for (bin, &weight) in histogram.iter().enumerate() {
        cumulative += weight;
        if cumulative >= half {
            return (d_min + bin as i32) as f32;
        }
    }
    (d_min + histogram.len() as i32 - 1) as f32
}

/// Per-channel spatial median filter.
///
/// Used to smooth the reference image before it guides the densifier. At the
/// borders the median is taken over the in-image samples only.
pub fn median_color(image: &FloatImage, radius: i32) -> Result<FloatImage> {
    let width = image.width() as i32;
    let height = image.height() as i32;
    let channels = image.channels();
    let mut out = Vec::with_capacity((image.width() * image.height() * channels) as usize);
    let mut samples = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                samples.clear();
                for dy in -radius..=radius {
                    let yy = y + dy;
                    if yy < 0 || yy >= height {
                        continue;
                    }
                    for dx in -radius..=radius {
                        let xx = x + dx;
                        if xx < 0 || xx >= width {
                            continue;
                        }
                        samples.push(image.get(xx as u32, yy as u32, c));
                    }
                }
                samples.sort_by(|a, b| a.total_cmp(b));
                out.push(samples[samples.len() / 2]);
            }
        }
    }

    FloatImage::from_raw(out, image.width(), image.height(), channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_guidance(width: u32, height: u32) -> FloatImage {
        FloatImage::from_raw(vec![128.0; (width * height * 3) as usize], width, height, 3)
            .unwrap()
    }

    #[test]
    fn densification_is_identity_on_non_occluded_pixels() {
        let width = 6;
        let mut disparity = DisparityMap::new(width, 3, -5, 0);
        for y in 0..3 {
            for x in 0..width {
                disparity.set(x, y, -(x as f32 % 3.0));
            }
        }
        let dense = disparity.clone();
        let before = disparity.data.clone();

        densify_occlusions(
            &dense,
            &uniform_guidance(width, 3),
            &mut disparity,
            &OcclusionParams::default(),
        )
        .unwrap();
        assert_eq!(disparity.data, before);
    }

    #[test]
    fn occluded_pixel_takes_the_window_majority() {
        let width = 5;
        let mut disparity = DisparityMap::new(width, 1, -5, 0);
        let mut dense = DisparityMap::new(width, 1, -5, 0);
        for x in 0..width {
            if x != 2 {
                disparity.set(x, 0, -3.0);
            }
            dense.set(x, 0, -3.0);
        }

        let params = OcclusionParams {
            median_radius: 2,
            ..Default::default()
        };
        densify_occlusions(&dense, &uniform_guidance(width, 1), &mut disparity, &params)
            .unwrap();
        assert_eq!(disparity.get(2, 0), -3.0);
    }

    #[test]
    fn empty_window_keeps_the_dense_fallback() {
        let width = 3;
        let mut disparity = DisparityMap::new(width, 1, -5, 0);
        let mut dense = DisparityMap::new(width, 1, -5, 0);
        // No valid sample anywhere; the dense map still carries the fill
        // value, here below the valid interval.
        for x in 0..width {
            dense.set(x, 0, -6.0);
        }

        let params = OcclusionParams {
            median_radius: 1,
            ..Default::default()
        };
        densify_occlusions(&dense, &uniform_guidance(width, 1), &mut disparity, &params)
            .unwrap();
        assert_eq!(disparity.get(1, 0), -6.0);
    }

    #[test]
    fn median_splits_between_near_and_far_by_weight() {
        // Window row: two -4 samples right next to the center vs three -1
        // samples further out. Spatial decay makes the near pair dominate.
        let width = 7;
        let mut disparity = DisparityMap::new(width, 1, -5, 0);
        let mut dense = DisparityMap::new(width, 1, -5, 0);
        disparity.set(5, 0, -1.0);
        disparity.set(6, 0, -1.0);
        for (x, v) in [(2, -4.0), (3, -4.0), (4, -1.0), (5, -1.0), (6, -1.0)] {
            dense.set(x, 0, v);
        }

        let params = OcclusionParams {
            median_radius: 3,
            sigma_space: 1.0,
            ..Default::default()
        };
        densify_occlusions(&dense, &uniform_guidance(width, 1), &mut disparity, &params)
            .unwrap();
        assert_eq!(disparity.get(3, 0), -4.0);
    }

    #[test]
    fn densifying_twice_is_idempotent() {
        let width = 6;
        let mut disparity = DisparityMap::new(width, 2, -5, 0);
        let mut dense = DisparityMap::new(width, 2, -5, 0);
        for y in 0..2 {
            for x in 0..width {
                let v = if x < 3 { -2.0 } else { -4.0 };
                dense.set(x, y, v);
                if x != 1 && x != 4 {
                    disparity.set(x, y, v);
                }
            }
        }

        let params = OcclusionParams {
            median_radius: 2,
            ..Default::default()
        };
        let guidance = uniform_guidance(width, 2);

        densify_occlusions(&dense, &guidance, &mut disparity, &params).unwrap();
        let once = disparity.data.clone();

        // The first pass filled every occluded pixel with an in-range value,
        // so a second pass has nothing left to touch.
        densify_occlusions(&dense, &guidance, &mut disparity, &params).unwrap();
        assert_eq!(disparity.data, once);
    }

    #[test]
    fn median_color_keeps_flat_regions_and_removes_speckle() {
        let mut data = vec![50.0; 5 * 5];
        data[2 * 5 + 2] = 250.0; // lone outlier
        let image = FloatImage::from_raw(data, 5, 5, 1).unwrap();

        let filtered = median_color(&image, 1).unwrap();
        assert_eq!(filtered.get(2, 2, 0), 50.0);
        assert_eq!(filtered.get(0, 0, 0), 50.0);
    }
}
