use tdview_core::config::ViewerConfig;
use tdview_core::consts::{DEFAULT_Z_STRIDE, TIMESTAMP_CHANNEL};
use tdview_core::error::TdviewError;

#[test]
fn test_defaults_match_acquisition_layout() {
    let config = ViewerConfig::default();
    assert_eq!(config.z_stride, DEFAULT_Z_STRIDE);
    assert_eq!(config.data_group, "Data");
    assert_eq!(config.frame_prefix, "frame");
    assert_eq!(config.timestamp_channel, TIMESTAMP_CHANNEL);
    assert_eq!(config.time_steps, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = ViewerConfig::from_toml("z_stride = 20\ntime_steps = 3\n").unwrap();
    assert_eq!(config.z_stride, 20);
    assert_eq!(config.time_steps, Some(3));
    assert_eq!(config.piezo_channel, ViewerConfig::default().piezo_channel);
}

#[test]
fn test_toml_roundtrip() {
    let config = ViewerConfig {
        frame_prefix: "img".into(),
        zoom_step: 1.25,
        time_steps: Some(8),
        ..ViewerConfig::default()
    };
    let text = config.to_toml().unwrap();
    assert_eq!(ViewerConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn test_invalid_values_are_rejected() {
    for text in ["z_stride = 0", "time_steps = 0", "zoom_step = 1.0", "zoom_step = 0.5"] {
        assert!(
            matches!(ViewerConfig::from_toml(text), Err(TdviewError::Config(_))),
            "accepted {text:?}"
        );
    }
}

#[test]
fn test_malformed_toml_is_config_error() {
    assert!(matches!(
        ViewerConfig::from_toml("z_stride = \"many\""),
        Err(TdviewError::Config(_))
    ));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tdview.toml");
    std::fs::write(&path, "data_group = \"Acquisition\"\n").unwrap();
    assert_eq!(ViewerConfig::load(&path).unwrap().data_group, "Acquisition");
}
