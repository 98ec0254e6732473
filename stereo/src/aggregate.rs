//! Adaptive-weights cost aggregation and WTA disparity selection.
//!
//! For each reference pixel the raw costs are averaged under a bilateral
//! support window of the reference image combined with one of the target
//! image, and the disparity with the lowest aggregated cost wins. Both the
//! forward (1 -> 2) and backward (2 -> 1) maps come out of the same sweep.

use rayon::prelude::*;
use sv_core::{DisparityMap, Error, FloatImage, Result};
use tracing::debug;

use crate::cost::CostVolume;
use crate::gradient::grad_x;
use crate::kernels::WeightTables;
use crate::params::{MatchParams, WeightCombination};
use crate::support::fill_support;

/// Pointwise combination of reference and target support weights.
///
/// Implemented by zero-sized operator types so the aggregation inner loop is
/// monomorphized per operator; the enum is dispatched once per run.
trait CombineWeights: Send + Sync {
    /// Whether target supports are needed at all.
    const USES_TARGET: bool;

    fn combine(reference: f32, target: f32) -> f32;
}

struct LeftWeight;
struct MaxWeight;
struct MinWeight;
struct MultWeight;
struct PlusWeight;

impl CombineWeights for LeftWeight {
    const USES_TARGET: bool = false;
    #[inline]
    fn combine(reference: f32, _target: f32) -> f32 {
        reference
    }
}

impl CombineWeights for MaxWeight {
    const USES_TARGET: bool = true;
    #[inline]
    fn combine(reference: f32, target: f32) -> f32 {
        reference.max(target)
    }
}

impl CombineWeights for MinWeight {
    const USES_TARGET: bool = true;
    #[inline]
    fn combine(reference: f32, target: f32) -> f32 {
        reference.min(target)
    }
}

impl CombineWeights for MultWeight {
    const USES_TARGET: bool = true;
    #[inline]
    fn combine(reference: f32, target: f32) -> f32 {
        reference * target
    }
}

impl CombineWeights for PlusWeight {
    const USES_TARGET: bool = true;
    #[inline]
    fn combine(reference: f32, target: f32) -> f32 {
        reference + target
    }
}

/// Adaptive-weights stereo matcher.
pub struct AdaptiveWeightsMatcher {
    pub min_disparity: i32,
    pub max_disparity: i32,
    pub params: MatchParams,
    pub combination: WeightCombination,
}

impl Default for AdaptiveWeightsMatcher {
    fn default() -> Self {
        Self {
            min_disparity: 0,
            max_disparity: 64,
            params: MatchParams::default(),
            combination: WeightCombination::default(),
        }
    }
}

impl AdaptiveWeightsMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disparity_range(mut self, min: i32, max: i32) -> Self {
        self.min_disparity = min;
        self.max_disparity = max;
        self
    }

    pub fn with_params(mut self, params: MatchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_combination(mut self, combination: WeightCombination) -> Self {
        self.combination = combination;
        self
    }

    /// Compute the forward and backward disparity maps.
    ///
    /// The backward map stores the negated reference-side disparity. Pixels
    /// for which no candidate ever produced a finite aggregated cost keep the
    /// occlusion sentinel `min_disparity - 1`.
    pub fn compute(
        &self,
        left: &FloatImage,
        right: &FloatImage,
    ) -> Result<(DisparityMap, DisparityMap)> {
        if left.width() != right.width() || left.height() != right.height() {
            return Err(Error::SizeMismatch(format!(
                "stereo pair differs: {}x{} vs {}x{}",
                left.width(),
                left.height(),
                right.width(),
                right.height()
            )));
        }
        if left.channels() != right.channels() {
            return Err(Error::SizeMismatch(format!(
                "stereo pair differs: {} vs {} channels",
                left.channels(),
                right.channels()
            )));
        }
        if self.min_disparity > self.max_disparity {
            return Err(Error::InvalidInput(format!(
                "disparity range is empty: dMin {} > dMax {}",
                self.min_disparity, self.max_disparity
            )));
        }
        self.params.validate()?;

        debug!(
            disparities = self.max_disparity - self.min_disparity + 1,
            radius = self.params.window_radius,
            "aggregating adaptive-weights costs"
        );

        let tables = WeightTables::new(
            left.channels(),
            self.params.window_radius,
            self.params.gamma_color,
            self.params.gamma_position,
        );
        let grad_left = grad_x(&left.gray())?;
        let grad_right = grad_x(&right.gray())?;
        let cost = CostVolume::build(
            left,
            right,
            &grad_left,
            &grad_right,
            self.min_disparity,
            self.max_disparity,
            &self.params,
        );

        let maps = match self.combination {
            WeightCombination::Left => self.aggregate::<LeftWeight>(left, right, &cost, &tables),
            WeightCombination::Max => self.aggregate::<MaxWeight>(left, right, &cost, &tables),
            WeightCombination::Min => self.aggregate::<MinWeight>(left, right, &cost, &tables),
            WeightCombination::Mult => self.aggregate::<MultWeight>(left, right, &cost, &tables),
            WeightCombination::Plus => self.aggregate::<PlusWeight>(left, right, &cost, &tables),
        };
        Ok(maps)
    }

    /// Row-parallel WTA sweep, monomorphized over the weight combination.
    ///
    /// Rows are independent: each worker owns one y-row of all four output
    /// planes, and every backward-map write of row y targets `(x + d, y)`.
    fn aggregate<C: CombineWeights>(
        &self,
        left: &FloatImage,
        right: &FloatImage,
        cost: &CostVolume,
        tables: &WeightTables,
    ) -> (DisparityMap, DisparityMap) {
        let w = left.width() as usize;
        let h = left.height() as usize;
        let r = tables.radius();
        let dim = tables.window_dim();
        let nd = (self.max_disparity - self.min_disparity + 1) as usize;
        let ring_len = if C::USES_TARGET { nd } else { 1 };
        let sentinel = (self.min_disparity - 1) as f32;

        let mut disp1 = vec![sentinel; w * h];
        let mut disp2 = vec![sentinel; w * h];
        let mut energy1 = vec![f32::INFINITY; w * h];
        let mut energy2 = vec![f32::INFINITY; w * h];

        disp1
            .par_chunks_mut(w)
            .zip(energy1.par_chunks_mut(w))
            .zip(disp2.par_chunks_mut(w).zip(energy2.par_chunks_mut(w)))
            .enumerate()
            .for_each(|(y, ((disp1_row, energy1_row), (disp2_row, energy2_row)))| {
                let y = y as i32;
                let width = w as i32;
                let height = h as i32;

                // Per-row scratch: the reference window plus a ring of target
                // windows indexed modulo nd, so each target center is built
                // exactly once per row.
                let mut reference = vec![0.0f32; dim * dim];
                let mut ring: Vec<Vec<f32>> =
                    (0..ring_len).map(|_| vec![0.0f32; dim * dim]).collect();

                if C::USES_TARGET {
                    // Target supports for all candidate centers left of column
                    // dispMax; centers outside the image stay zeroed and are
                    // never read as candidates.
                    for d in self.min_disparity..self.max_disparity {
                        let slot = (d - self.min_disparity) as usize % nd;
                        fill_support(right, d, y, tables, &mut ring[slot]);
                    }
                }

                for x in 0..width {
                    fill_support(left, x, y, tables, &mut reference);
                    if C::USES_TARGET {
                        let slot = (x + self.max_disparity - self.min_disparity) as usize % nd;
                        fill_support(right, x + self.max_disparity, y, tables, &mut ring[slot]);
                    }

                    for d in self.min_disparity..=self.max_disparity {
                        let tx = x + d;
                        if tx < 0 || tx >= width {
                            continue;
                        }
                        let target = if C::USES_TARGET {
                            &ring[(tx - self.min_disparity) as usize % nd]
                        } else {
                            &ring[0]
                        };
                        let layer = cost.layer(d);

                        let mut num = 0.0f32;
                        let mut den = 0.0f32;
                        for dy in -r..=r {
                            let yy = y + dy;
                            if yy < 0 || yy >= height {
                                continue;
                            }
                            let layer_row = yy as usize * w;
                            let window_row = ((dy + r) as usize) * dim;
                            for dx in -r..=r {
                                let xx = x + dx;
                                if xx < 0 || xx >= width || tx + dx < 0 || tx + dx >= width {
                                    continue;
                                }
                                let index = window_row + (dx + r) as usize;
                                let weight = C::combine(reference[index], target[index]);
                                num += weight * layer[layer_row + xx as usize];
                                den += weight;
                            }
                        }
                        if den == 0.0 {
                            continue;
                        }

                        // Winner takes all, ties keep the earlier disparity.
                        let energy = num / den;
                        if energy < energy1_row[x as usize] {
                            energy1_row[x as usize] = energy;
                            disp1_row[x as usize] = d as f32;
                        }
                        if energy < energy2_row[tx as usize] {
                            energy2_row[tx as usize] = energy;
                            disp2_row[tx as usize] = -d as f32;
                        }
                    }
                }
            });

        let forward = DisparityMap {
            data: disp1,
            width: left.width(),
            height: left.height(),
            min_disparity: self.min_disparity,
            max_disparity: self.max_disparity,
        };
        let backward = DisparityMap {
            data: disp2,
            width: left.width(),
            height: left.height(),
            min_disparity: self.min_disparity,
            max_disparity: self.max_disparity,
        };
        (forward, backward)
    }
}
