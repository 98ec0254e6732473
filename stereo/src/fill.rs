//! Row-wise monotone fill of occluded pixels.

use sv_core::DisparityMap;

use crate::params::CameraMotion;

/// Extend valid disparities horizontally across occluded runs.
///
/// Each row is scanned once; a run of invalid pixels takes the max
/// ([`CameraMotion::ToRight`]) or min ([`CameraMotion::ToLeft`]) of the valid
/// values bordering it. The running left value starts at `min_disparity`, so
/// a leading gap compares against `min_disparity`, a trailing gap takes the
/// last valid value, and a row with no valid pixel at all fills with
/// `min_disparity`.
pub fn fill_occluded_rows(map: &mut DisparityMap, motion: CameraMotion) {
    let v_min = map.min_disparity as f32;
    let width = map.width as usize;
    for row in map.data.chunks_mut(width) {
        fill_row(row, v_min, motion);
    }
}

fn fill_row(row: &mut [f32], v_min: f32, motion: CameraMotion) {
    let mut left_value = v_min;
    let mut gap_start = None;

    for x in 0..row.len() {
        if row[x] < v_min {
            if gap_start.is_none() {
                gap_start = Some(x);
            }
            continue;
        }
        if let Some(start) = gap_start.take() {
            let right_value = row[x];
            let fill = match motion {
                CameraMotion::ToRight => left_value.max(right_value),
                CameraMotion::ToLeft => left_value.min(right_value),
            };
            for pixel in &mut row[start..x] {
                *pixel = fill;
            }
        }
        left_value = row[x];
    }

    if let Some(start) = gap_start {
        for pixel in &mut row[start..] {
            *pixel = left_value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_from(row: &[f32], min_disparity: i32, max_disparity: i32) -> DisparityMap {
        DisparityMap {
            data: row.to_vec(),
            width: row.len() as u32,
            height: 1,
            min_disparity,
            max_disparity,
        }
    }

    #[test]
    fn interior_gap_takes_max_or_min_of_its_edges() {
        let occ = -6.0;
        let row = [-2.0, occ, occ, -5.0];

        let mut max_map = map_from(&row, -5, 0);
        fill_occluded_rows(&mut max_map, CameraMotion::ToRight);
        assert_eq!(max_map.data, vec![-2.0, -2.0, -2.0, -5.0]);

        let mut min_map = map_from(&row, -5, 0);
        fill_occluded_rows(&mut min_map, CameraMotion::ToLeft);
        assert_eq!(min_map.data, vec![-2.0, -5.0, -5.0, -5.0]);
    }

    #[test]
    fn leading_gap_compares_against_the_range_floor() {
        let occ = -6.0;
        let row = [occ, occ, -5.0, -3.0];

        let mut max_map = map_from(&row, -5, 0);
        fill_occluded_rows(&mut max_map, CameraMotion::ToRight);
        assert_eq!(max_map.data, vec![-5.0, -5.0, -5.0, -3.0]);

        let mut min_map = map_from(&row, -5, 0);
        fill_occluded_rows(&mut min_map, CameraMotion::ToLeft);
        assert_eq!(min_map.data, vec![-5.0, -5.0, -5.0, -3.0]);
    }

    #[test]
    fn trailing_gap_extends_the_last_valid_value() {
        let occ = -6.0;
        let row = [-3.0, -1.0, occ, occ];

        let mut map = map_from(&row, -5, 0);
        fill_occluded_rows(&mut map, CameraMotion::ToRight);
        assert_eq!(map.data, vec![-3.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn empty_row_fills_with_the_range_floor() {
        let occ = -6.0;
        let mut map = map_from(&[occ, occ, occ], -5, 0);
        fill_occluded_rows(&mut map, CameraMotion::ToRight);
        assert_eq!(map.data, vec![-5.0, -5.0, -5.0]);
    }

    #[test]
    fn rows_are_filled_independently() {
        let occ = -6.0;
        let mut map = DisparityMap {
            data: vec![-2.0, occ, occ, -4.0, occ, -1.0],
            width: 3,
            height: 2,
            min_disparity: -5,
            max_disparity: 0,
        };
        fill_occluded_rows(&mut map, CameraMotion::ToRight);
        assert_eq!(map.data, vec![-2.0, -2.0, -2.0, -4.0, -1.0, -1.0]);
    }
}
