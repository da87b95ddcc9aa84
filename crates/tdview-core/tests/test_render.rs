use ndarray::{array, s, Array2};

use tdview_core::error::TdviewError;
use tdview_core::index::FrameIndex;
use tdview_core::planes::split_planes;
use tdview_core::range::{compute_range, GlobalRange};
use tdview_core::render::{compose, normalize, RenderState};

#[test]
fn test_two_plane_frame_end_to_end() {
    let buffer = [10u16, 20, 30, 40, 1, 2, 3, 4];
    let range = compute_range([&buffer[..]]).unwrap();
    assert_eq!(range, GlobalRange { min: 1, max: 40 });

    let (a, b) = split_planes(&buffer, 2, 2).unwrap();
    let a8 = normalize(&a, range);
    let b8 = normalize(&b, range);
    assert_eq!(a8, array![[59, 124], [190, 255]]);
    assert_eq!(b8, array![[0, 7], [13, 20]]);

    let rgb = compose(&a8, &b8).unwrap();
    assert_eq!(rgb.dim(), (2, 2, 3));
    assert_eq!(rgb.slice(s![.., .., 0]), b8);
    assert_eq!(rgb.slice(s![.., .., 1]), a8);
    assert!(rgb.slice(s![.., .., 2]).iter().all(|&v| v == 0));
}

#[test]
fn test_range_endpoints_map_to_black_and_full() {
    let range = GlobalRange::new(100, 4000);
    let plane = array![[100u16, 4000], [2050, 100]];
    let out = normalize(&plane, range);
    assert_eq!(out[[0, 0]], 0);
    assert_eq!(out[[0, 1]], 255);
    assert_eq!(out[[1, 0]], 128);
}

#[test]
fn test_degenerate_range_renders_black() {
    let plane = Array2::<u16>::from_elem((3, 4), 512);
    let out = normalize(&plane, GlobalRange::new(512, 512));
    assert_eq!(out.dim(), (3, 4));
    assert!(out.iter().all(|&v| v == 0));
}

#[test]
fn test_values_outside_range_are_clamped() {
    let plane = array![[0u16, 65535]];
    let out = normalize(&plane, GlobalRange::new(10, 20));
    assert_eq!(out, array![[0, 255]]);
}

#[test]
fn test_compose_rejects_mismatched_planes() {
    let a = Array2::<u8>::zeros((2, 3));
    let b = Array2::<u8>::zeros((3, 2));
    match compose(&a, &b) {
        Err(TdviewError::ShapeMismatch { a, b }) => {
            assert_eq!(a, (2, 3));
            assert_eq!(b, (3, 2));
        }
        other => panic!("expected ShapeMismatch, got {other:?}"),
    }
}

#[test]
fn test_render_state_compose() {
    let samples = [10u16, 20, 30, 40, 50, 60, 1, 2, 3, 4, 5, 6];
    let range = GlobalRange::new(1, 60);
    let state = RenderState::from_samples(FrameIndex(7), &samples, 3, 2, range).unwrap();
    assert_eq!(state.frame, FrameIndex(7));
    assert_eq!(state.size(), (3, 2));

    let rgb = state.compose().unwrap();
    assert_eq!(rgb.dim(), (2, 3, 3));
    // Largest plane-A sample is the range max: full green, red from plane B.
    assert_eq!(rgb[[1, 2, 1]], 255);
    assert_eq!(rgb[[0, 0, 0]], 0);
    assert_eq!(rgb[[1, 2, 2]], 0);
}
