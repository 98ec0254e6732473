//! Bilateral support windows.

use sv_core::FloatImage;

use crate::kernels::WeightTables;

/// Fill the (2r+1)^2 support window centered at `(cx, cy)`.
///
/// Each in-image entry gets the tabulated color weight of its rounded L1
/// distance to the center pixel times the tabulated spatial weight of its
/// offset. Entries outside the image stay 0, which drops them from both the
/// numerator and the normalization term during aggregation. A center outside
/// the image leaves the whole window zeroed; such windows are never read as
/// candidates.
pub fn fill_support(image: &FloatImage, cx: i32, cy: i32, tables: &WeightTables, window: &mut [f32]) {
    window.fill(0.0);

    let w = image.width() as i32;
    let h = image.height() as i32;
    if cx < 0 || cx >= w || cy < 0 || cy >= h {
        return;
    }

    let r = tables.radius();
    let dim = tables.window_dim();
    let channels = image.channels();
    let mut center = [0.0f32; 3];
    for c in 0..channels {
        center[c as usize] = image.get(cx as u32, cy as u32, c);
    }

    for dy in -r..=r {
        let yy = cy + dy;
        if yy < 0 || yy >= h {
            continue;
        }
        let window_row = ((dy + r) as usize) * dim;
        for dx in -r..=r {
            let xx = cx + dx;
            if xx < 0 || xx >= w {
                continue;
            }
            let mut l1 = 0.0f32;
            for c in 0..channels {
                l1 += (image.get(xx as u32, yy as u32, c) - center[c as usize]).abs();
            }
            let index = window_row + (dx + r) as usize;
            window[index] = tables.color_weight(l1 as usize) * tables.spatial_weight(index);
        }
    }
}
