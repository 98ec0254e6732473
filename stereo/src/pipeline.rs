//! Full matching pipeline: match, filter occlusions, densify.

use sv_core::{DisparityMap, FloatImage, Result};
use tracing::info;

use crate::aggregate::AdaptiveWeightsMatcher;
use crate::fill::fill_occluded_rows;
use crate::median::{densify_occlusions, median_color};
use crate::occlusion::detect_occlusions;
use crate::params::{CameraMotion, MatchParams, OcclusionParams, WeightCombination};

/// The three disparity maps produced over the reference grid.
pub struct PipelineOutput {
    /// Winner-take-all result of the aggregator.
    pub raw: DisparityMap,
    /// Raw map with inconsistent pixels set to the occlusion sentinel.
    pub occluded: DisparityMap,
    /// Final map with occluded pixels refilled.
    pub densified: DisparityMap,
}

/// Run the whole pipeline on a rectified pair.
///
/// The densifier is guided by the reference image smoothed with a radius-1
/// per-channel median.
#[allow(clippy::too_many_arguments)]
pub fn run_pipeline(
    left: &FloatImage,
    right: &FloatImage,
    min_disparity: i32,
    max_disparity: i32,
    match_params: &MatchParams,
    combination: WeightCombination,
    occlusion_params: &OcclusionParams,
    motion: CameraMotion,
) -> Result<PipelineOutput> {
    occlusion_params.validate()?;

    let matcher = AdaptiveWeightsMatcher::new()
        .with_disparity_range(min_disparity, max_disparity)
        .with_params(*match_params)
        .with_combination(combination);
    let (mut forward, backward) = matcher.compute(left, right)?;
    let raw = forward.clone();

    info!("detecting occlusions");
    detect_occlusions(&mut forward, &backward, occlusion_params.tol_disp)?;
    let occluded = forward.clone();

    info!("filling occlusions");
    let mut dense = forward.clone();
    fill_occluded_rows(&mut dense, motion);

    info!("smoothing the disparity map");
    let guidance = median_color(left, 1)?;
    densify_occlusions(&dense, &guidance, &mut forward, occlusion_params)?;

    Ok(PipelineOutput {
        raw,
        occluded,
        densified: forward,
    })
}
