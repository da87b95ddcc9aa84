use tdview_core::error::TdviewError;
use tdview_core::index::{FrameIndex, FrameLocator};

#[test]
fn test_locate_example() {
    let locator = FrameLocator::new(50, 100);
    assert_eq!(locator.locate(2, 3).unwrap(), FrameIndex(103));
    assert_eq!(locator.locate(0, 0).unwrap(), FrameIndex(0));
    assert_eq!(locator.locate(99, 49).unwrap(), FrameIndex(4999));
}

#[test]
fn test_locate_is_injective_and_lexicographic() {
    let locator = FrameLocator::new(7, 5);
    let mut previous: Option<FrameIndex> = None;
    let mut seen = std::collections::HashSet::new();

    for t in 0..locator.time_steps {
        for z in 0..locator.z_stride {
            let index = locator.locate(t, z).unwrap();
            assert!(seen.insert(index), "duplicate index {index}");
            if let Some(prev) = previous {
                assert!(index > prev);
            }
            previous = Some(index);
        }
    }
    assert_eq!(seen.len(), locator.frame_count());
}

#[test]
fn test_out_of_range_does_not_wrap() {
    let locator = FrameLocator::new(50, 10);

    // z = 50 would alias (t + 1, 0) if it were allowed to wrap.
    match locator.locate(1, 50) {
        Err(TdviewError::IndexOutOfRange { time, z, time_steps, z_stride }) => {
            assert_eq!((time, z, time_steps, z_stride), (1, 50, 10, 50));
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
    assert!(locator.locate(10, 0).is_err());
}

#[test]
fn test_overflow_is_out_of_range() {
    let locator = FrameLocator::new(usize::MAX, usize::MAX);
    assert!(matches!(
        locator.locate(2, 0),
        Err(TdviewError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_time_steps_from_frame_count() {
    assert_eq!(FrameLocator::for_frame_count(50, 5000).time_steps, 100);
    // A partial last time step still gets a slider position.
    assert_eq!(FrameLocator::for_frame_count(50, 5001).time_steps, 101);
    assert_eq!(FrameLocator::for_frame_count(50, 0).time_steps, 0);
    assert_eq!(FrameLocator::for_frame_count(0, 10).time_steps, 0);
}

#[test]
fn test_unlocate_inverts_locate() {
    let locator = FrameLocator::new(50, 4);
    for (t, z) in [(0, 0), (1, 49), (3, 17)] {
        let index = locator.locate(t, z).unwrap();
        assert_eq!(locator.unlocate(index), Some((t, z)));
    }
    assert_eq!(locator.unlocate(FrameIndex(200)), None);
}
