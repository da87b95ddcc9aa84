mod common;

use approx::assert_relative_eq;

use tdview_core::config::ViewerConfig;
use tdview_core::error::TdviewError;
use tdview_core::index::FrameIndex;
use tdview_core::pipeline::Session;
use tdview_core::range::compute_range;
use tdview_core::synth::synthetic_frame;

#[test]
fn test_session_open_reads_metadata_and_range() {
    let (_dir, xml, layout) = common::synthetic_dataset(3, 5);
    let config = ViewerConfig { z_stride: 5, ..ViewerConfig::default() };
    let session = Session::open(&xml, &config).unwrap();

    assert_eq!(session.params.name, "stack");
    assert_eq!((session.params.pixels_x, session.params.pixels_y), (6, 4));
    assert_eq!(session.dataset.frame_count(), 15);
    assert_eq!(session.locator.time_steps, 3);

    let frames: Vec<Vec<u16>> = (0..3)
        .flat_map(|t| (0..5).map(move |z| (t, z)))
        .map(|(t, z)| synthetic_frame(&layout, t, z))
        .collect();
    assert_eq!(session.range, compute_range(&frames).unwrap());
}

#[test]
fn test_render_labels_and_metadata() {
    let (_dir, xml, layout) = common::synthetic_dataset(2, 4);
    let config = ViewerConfig { z_stride: 4, ..ViewerConfig::default() };
    let session = Session::open(&xml, &config).unwrap();

    let frame = session.render(1, 2).unwrap();
    assert_eq!(frame.index, FrameIndex(6));
    assert_eq!(frame.size(), [6, 4]);
    assert_relative_eq!(
        frame.timestamp_s.unwrap(),
        6.0 * layout.frame_interval_ns as f64 / 1e9,
        epsilon = 1e-9
    );
    assert_relative_eq!(frame.piezo_um.unwrap(), 2.0 * layout.z_step_um);
    assert!(frame
        .image
        .indexed_iter()
        .filter(|((_, _, c), _)| *c == 2)
        .all(|(_, &v)| v == 0));
}

#[test]
fn test_render_state_matches_samples() {
    let (_dir, xml, layout) = common::synthetic_dataset(2, 3);
    let config = ViewerConfig { z_stride: 3, ..ViewerConfig::default() };
    let session = Session::open(&xml, &config).unwrap();

    let state = session.render_state(1, 0).unwrap();
    let expected = synthetic_frame(&layout, 1, 0);
    let flat: Vec<u16> = state.plane_a.iter().chain(state.plane_b.iter()).copied().collect();
    assert_eq!(flat, expected);
}

#[test]
fn test_out_of_range_position() {
    let (_dir, xml, _layout) = common::synthetic_dataset(2, 3);
    let config = ViewerConfig { z_stride: 3, ..ViewerConfig::default() };
    let session = Session::open(&xml, &config).unwrap();

    assert!(matches!(
        session.render(2, 0),
        Err(TdviewError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        session.render(0, 3),
        Err(TdviewError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_partial_last_time_step_reports_missing_channel() {
    // 2 x 3 frames viewed with a stride of 4: slider has 2 time steps but
    // frames 6 and 7 do not exist.
    let (_dir, xml, _layout) = common::synthetic_dataset(2, 3);
    let config = ViewerConfig { z_stride: 4, ..ViewerConfig::default() };
    let session = Session::open(&xml, &config).unwrap();
    assert_eq!(session.locator.time_steps, 2);

    assert!(session.render(1, 1).is_ok());
    match session.render(1, 2) {
        Err(TdviewError::ChannelNotFound { channel, .. }) => assert_eq!(channel, "frame 6"),
        other => panic!("expected ChannelNotFound, got {:?}", other.map(|f| f.index)),
    }
}

#[test]
fn test_pinned_time_steps() {
    let (_dir, xml, _layout) = common::synthetic_dataset(3, 2);
    let config = ViewerConfig {
        z_stride: 2,
        time_steps: Some(1),
        ..ViewerConfig::default()
    };
    let session = Session::open(&xml, &config).unwrap();
    assert_eq!(session.locator.time_steps, 1);
    assert!(session.render(1, 0).is_err());
}

#[test]
fn test_missing_tdms_file() {
    let (dir, xml, _layout) = common::synthetic_dataset(1, 1);
    std::fs::remove_file(dir.path().join("stack.tdms")).unwrap();
    assert!(matches!(
        Session::open(&xml, &ViewerConfig::default()),
        Err(TdviewError::Io(_))
    ));
}

#[test]
fn test_missing_piezo_channel() {
    let (_dir, xml, _layout) = common::synthetic_dataset(1, 2);
    let config = ViewerConfig {
        piezo_channel: "stage (um)".into(),
        ..ViewerConfig::default()
    };
    assert!(matches!(
        Session::open(&xml, &config),
        Err(TdviewError::ChannelNotFound { .. })
    ));
}
