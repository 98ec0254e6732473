use sv_stereo::*;

/// Horizontal ramp, constant along y, equal channels. Unique column colors
/// make the matching unambiguous.
fn ramp(width: u32, height: u32, shift: i32) -> FloatImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _y in 0..height {
        for x in 0..width {
            let sx = (x as i32 + shift).clamp(0, width as i32 - 1);
            let v = (sx * 16) as f32;
            data.extend_from_slice(&[v, v, v]);
        }
    }
    FloatImage::from_raw(data, width, height, 3).unwrap()
}

fn checkerboard(width: u32, height: u32) -> FloatImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if (x + y) % 2 == 0 { 220.0 } else { 30.0 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    FloatImage::from_raw(data, width, height, 3).unwrap()
}

#[test]
fn full_pipeline_recovers_a_constant_shift() {
    // The target is the reference shifted left by 5: every pixel x >= 5
    // matches at disparity -5, columns x < 5 see content that left the
    // frame.
    let left = ramp(16, 16, 0);
    let right = ramp(16, 16, 5);
    let match_params = MatchParams {
        window_radius: 1,
        ..Default::default()
    };
    let occlusion_params = OcclusionParams::default();

    let output = run_pipeline(
        &left,
        &right,
        -5,
        0,
        &match_params,
        WeightCombination::Mult,
        &occlusion_params,
        CameraMotion::ToRight,
    )
    .unwrap();

    // Matched region.
    for y in 0..16 {
        for x in 5..16 {
            assert_eq!(output.raw.get(x, y), -5.0);
            assert_eq!(output.occluded.get(x, y), -5.0);
        }
    }
    // The left border fails the consistency check, then fills from its
    // right edge.
    for y in 0..16 {
        for x in 0..5 {
            assert!(output.occluded.is_occluded(x, y));
        }
    }
    for y in 0..16 {
        for x in 0..16 {
            assert_eq!(output.densified.get(x, y), -5.0);
        }
    }
}

#[test]
fn identical_checkerboard_matches_at_zero_disparity() {
    let im = checkerboard(8, 4);
    let params = MatchParams {
        window_radius: 2,
        ..Default::default()
    };
    let matcher = AdaptiveWeightsMatcher::new()
        .with_disparity_range(0, 0)
        .with_params(params);
    let (forward, backward) = matcher.compute(&im, &im).unwrap();

    for y in 0..4 {
        for x in 0..8 {
            assert_eq!(forward.get(x, y), 0.0);
            assert_eq!(backward.get(x, y), 0.0);
        }
    }
}

#[test]
fn wta_output_stays_in_range_or_sentinel() {
    let left = checkerboard(12, 6);
    let right = ramp(12, 6, 2);
    let params = MatchParams {
        window_radius: 1,
        ..Default::default()
    };
    let matcher = AdaptiveWeightsMatcher::new()
        .with_disparity_range(-3, 2)
        .with_params(params);
    let (forward, _) = matcher.compute(&left, &right).unwrap();

    let sentinel = forward.occlusion_sentinel();
    for &d in &forward.data {
        assert!(d == sentinel || (forward.in_range(d) && d == d.round()));
    }
}

#[test]
fn consistency_filter_guarantees_agreement() {
    let left = ramp(12, 8, 0);
    let right = ramp(12, 8, 3);
    let params = MatchParams {
        window_radius: 1,
        ..Default::default()
    };
    let matcher = AdaptiveWeightsMatcher::new()
        .with_disparity_range(-4, 0)
        .with_params(params);
    let (mut forward, backward) = matcher.compute(&left, &right).unwrap();

    let tolerance = 0.0;
    detect_occlusions(&mut forward, &backward, tolerance).unwrap();

    for y in 0..8 {
        for x in 0..12u32 {
            let d = forward.get(x, y);
            if d == forward.occlusion_sentinel() {
                continue;
            }
            let tx = x as i32 + d as i32;
            assert!(tx >= 0 && tx < 12);
            assert!((d + backward.get(tx as u32, y)).abs() <= tolerance);
        }
    }
}

#[test]
fn infinite_tolerance_keeps_the_aggregated_map() {
    let left = ramp(10, 5, 0);
    let right = ramp(10, 5, 2);
    let params = MatchParams {
        window_radius: 1,
        ..Default::default()
    };
    let matcher = AdaptiveWeightsMatcher::new()
        .with_disparity_range(-3, 0)
        .with_params(params);
    let (mut forward, backward) = matcher.compute(&left, &right).unwrap();
    let before = forward.data.clone();

    // Every selected disparity lands inside the image and wrote a backward
    // candidate, so with an infinite tolerance nothing is marked.
    detect_occlusions(&mut forward, &backward, f32::INFINITY).unwrap();
    assert_eq!(forward.data, before);
}
