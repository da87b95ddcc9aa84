use std::path::{Path, PathBuf};

use tdview_core::error::TdviewError;
use tdview_core::io::experiment::{parse_experiment, read_experiment, ExperimentParams};

const LABVIEW_EXPORT: &str = r#"<?xml version='1.0' standalone='yes' ?>
<LVData xmlns="http://www.ni.com/LVData">
<Version>21.0.1f1</Version>
<Cluster>
<Name>Experiment Settings</Name>
<NumElts>3</NumElts>
<Cluster>
<Name>General</Name>
<NumElts>2</NumElts>
<String>
<Name>Experiment Name</Name>
<Val>zstack_2024_03_01</Val>
</String>
<DBL>
<Name>Exposure (ms)</Name>
<Val>5.00000</Val>
</DBL>
</Cluster>
<Cluster>
<Name>Pixel Count</Name>
<NumElts>2</NumElts>
<U32>
<Name>Pixels in X</Name>
<Val>512</Val>
</U32>
<U32>
<Name>Pixels in Y</Name>
<Val>256</Val>
</U32>
</Cluster>
<U32>
<Name>Pixels in X</Name>
<Val>1</Val>
</U32>
</Cluster>
</LVData>
"#;

#[test]
fn test_parse_labview_export() {
    let params = parse_experiment(LABVIEW_EXPORT).unwrap();
    assert_eq!(
        params,
        ExperimentParams {
            name: "zstack_2024_03_01".into(),
            pixels_x: 512,
            pixels_y: 256,
        }
    );
}

#[test]
fn test_generated_document_parses_back() {
    let params = ExperimentParams {
        name: "cells & beads".into(),
        pixels_x: 64,
        pixels_y: 48,
    };
    assert_eq!(parse_experiment(&params.to_lvdata_xml()).unwrap(), params);
}

#[test]
fn test_missing_pixel_field_names_the_field() {
    let xml = LABVIEW_EXPORT.replace("Pixels in Y", "Pixels in Z");
    match parse_experiment(&xml) {
        Err(TdviewError::MetadataParse { field, .. }) => assert_eq!(field, "Pixels in Y"),
        other => panic!("expected MetadataParse, got {other:?}"),
    }
}

#[test]
fn test_non_numeric_pixel_count() {
    let xml = LABVIEW_EXPORT.replace("<Val>512</Val>", "<Val>wide</Val>");
    match parse_experiment(&xml) {
        Err(TdviewError::MetadataParse { field, reason }) => {
            assert_eq!(field, "Pixels in X");
            assert!(reason.contains("wide"));
        }
        other => panic!("expected MetadataParse, got {other:?}"),
    }
}

#[test]
fn test_experiment_name_must_be_nested_in_clusters() {
    let xml = r#"<LVData xmlns="http://www.ni.com/LVData">
<String><Name>Experiment Name</Name><Val>top level</Val></String>
</LVData>"#;
    match parse_experiment(xml) {
        Err(TdviewError::MetadataParse { field, .. }) => assert_eq!(field, "Experiment Name"),
        other => panic!("expected MetadataParse, got {other:?}"),
    }
}

#[test]
fn test_wrong_namespace_is_not_matched() {
    let xml = LABVIEW_EXPORT.replace("http://www.ni.com/LVData", "urn:other");
    assert!(matches!(
        parse_experiment(&xml),
        Err(TdviewError::MetadataParse { .. })
    ));
}

#[test]
fn test_malformed_xml() {
    assert!(matches!(
        parse_experiment("<LVData><Cluster></LVData>"),
        Err(TdviewError::Xml(_))
    ));
}

#[test]
fn test_tdms_path_sits_next_to_xml() {
    let params = ExperimentParams {
        name: "run7".into(),
        pixels_x: 1,
        pixels_y: 1,
    };
    assert_eq!(
        params.tdms_path(Path::new("/data/2024/settings.xml"), "tdms"),
        PathBuf::from("/data/2024/run7.tdms")
    );
    assert_eq!(
        params.tdms_path(Path::new("settings.xml"), "tdms"),
        PathBuf::from("run7.tdms")
    );
}

#[test]
fn test_read_experiment_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.xml");
    std::fs::write(&path, LABVIEW_EXPORT).unwrap();
    assert_eq!(read_experiment(&path).unwrap().pixels_y, 256);
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_experiment(&dir.path().join("absent.xml")),
        Err(TdviewError::Io(_))
    ));
}
