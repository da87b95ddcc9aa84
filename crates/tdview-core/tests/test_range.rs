use tdview_core::error::TdviewError;
use tdview_core::range::{compute_range, compute_range_with, GlobalRange};

#[test]
fn test_range_spans_all_frames_and_both_planes() {
    let frames = vec![vec![10u16, 20, 30, 40, 1, 2, 3, 4], vec![15, 25, 35, 45, 5, 6, 7, 8]];
    assert_eq!(compute_range(&frames).unwrap(), GlobalRange { min: 1, max: 45 });
}

#[test]
fn test_constant_data_gives_degenerate_range() {
    let frames = vec![vec![777u16; 16]; 5];
    let range = compute_range(&frames).unwrap();
    assert_eq!(range, GlobalRange { min: 777, max: 777 });
    assert!(range.is_degenerate());
}

#[test]
fn test_padding_beyond_planes_counts() {
    // 2x1 planes use 4 samples; the trailing 9000 is padding.
    let frames = vec![vec![100u16, 200, 300, 400, 9000]];
    assert_eq!(compute_range(&frames).unwrap().max, 9000);
}

#[test]
fn test_parallel_matches_serial() {
    let frames: Vec<Vec<u16>> = (0..64)
        .map(|i| (0..50).map(|j| ((i * 131 + j * 17) % 4000 + 3) as u16).collect())
        .collect();
    let serial = compute_range(&frames).unwrap();
    let parallel = compute_range_with(frames.len(), |i| Ok(frames[i].clone())).unwrap();
    assert_eq!(serial, parallel);

    let few = compute_range_with(2, |i| Ok(frames[i].clone())).unwrap();
    assert_eq!(few, compute_range(&frames[..2]).unwrap());
}

#[test]
fn test_load_errors_propagate() {
    let result = compute_range_with(8, |i| {
        if i == 5 {
            Err(TdviewError::ChannelNotFound {
                group: "Data".into(),
                channel: "frame 5".into(),
            })
        } else {
            Ok(vec![1, 2, 3])
        }
    });
    assert!(matches!(result, Err(TdviewError::ChannelNotFound { .. })));
}

#[test]
fn test_no_frames_is_empty_sequence() {
    assert!(matches!(
        compute_range_with(0, |_| Ok(vec![])),
        Err(TdviewError::EmptySequence)
    ));
}
