//! Left/right consistency occlusion detection.

use sv_core::{DisparityMap, Error, Result};

/// Mark pixels whose forward and backward disparities disagree.
///
/// A pixel survives only if its disparity lands inside the image, the target
/// cell holds a backward match, and the two disparities differ by at most
/// `tol_disp`. Everything else becomes the occlusion sentinel. The backward
/// map stores negated disparities, as produced by the aggregator.
pub fn detect_occlusions(
    forward: &mut DisparityMap,
    backward: &DisparityMap,
    tol_disp: f32,
) -> Result<()> {
    if forward.width != backward.width || forward.height != backward.height {
        return Err(Error::SizeMismatch(format!(
            "disparity maps differ: {}x{} vs {}x{}",
            forward.width, forward.height, backward.width, backward.height
        )));
    }

    let sentinel = forward.occlusion_sentinel();
    let width = forward.width as i32;

    for y in 0..forward.height {
        for x in 0..forward.width {
            let d = forward.get(x, y);
            if d == sentinel {
                continue;
            }

            let tx = x as i32 + d.round() as i32;
            let consistent = tx >= 0 && tx < width && {
                let back = backward.get(tx as u32, y);
                back != backward.occlusion_sentinel() && (d + back).abs() <= tol_disp
            };
            if !consistent {
                forward.set(x, y, sentinel);
            }
        }
    }
    Ok(())
}
