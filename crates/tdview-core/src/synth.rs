use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::consts::frame_channel_name;
use crate::error::Result;
use crate::io::experiment::ExperimentParams;
use crate::io::tdms::{ChannelData, PropertyValue};
use crate::io::tdms_writer::{SegmentObject, TdmsWriter};

/// Acquisition start of synthetic recordings (ns since the Unix epoch).
const SYNTHETIC_START_NS: u64 = 1_700_000_000_000_000_000;

/// Shape of a generated recording.
#[derive(Clone, Debug)]
pub struct SyntheticLayout {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub time_steps: usize,
    pub z_stride: usize,
    /// Time between consecutive frames.
    pub frame_interval_ns: u64,
    /// Piezo travel between consecutive slices.
    pub z_step_um: f64,
}

impl Default for SyntheticLayout {
    fn default() -> Self {
        Self {
            name: "Synthetic".into(),
            width: 64,
            height: 48,
            time_steps: 4,
            z_stride: 10,
            frame_interval_ns: 20_000_000,
            z_step_um: 0.5,
        }
    }
}

/// Samples of one synthetic frame: a diagonal ramp in plane A and a radial
/// spot in plane B, both drifting with time and depth.
pub fn synthetic_frame(layout: &SyntheticLayout, time: usize, z: usize) -> Vec<u16> {
    let (w, h) = (layout.width, layout.height);
    let mut samples = Vec::with_capacity(2 * w * h);

    for row in 0..h {
        for col in 0..w {
            let ramp = (row + col) * 4095 / (w + h).max(1);
            samples.push((ramp + time * 97 + z * 13) as u16 % 4096);
        }
    }

    let cx = (w as f64 / 2.0) + time as f64;
    let cy = h as f64 / 2.0;
    let sigma = 2.0 + z as f64 * 0.25;
    for row in 0..h {
        for col in 0..w {
            let d2 = (col as f64 - cx).powi(2) + (row as f64 - cy).powi(2);
            samples.push((3000.0 * (-d2 / (2.0 * sigma * sigma)).exp()) as u16 + 100);
        }
    }
    samples
}

/// Write `<dir>/<name>.xml` and the matching TDMS file, one segment per time
/// step. Returns the XML path.
pub fn write_synthetic_dataset(dir: &Path, layout: &SyntheticLayout) -> Result<PathBuf> {
    let config = ViewerConfig::default();
    let params = ExperimentParams {
        name: layout.name.clone(),
        pixels_x: layout.width,
        pixels_y: layout.height,
    };

    std::fs::create_dir_all(dir)?;
    let xml_path = dir.join(format!("{}.xml", layout.name));
    std::fs::write(&xml_path, params.to_lvdata_xml())?;

    let tdms_path = params.tdms_path(&xml_path, &config.tdms_extension);
    let mut writer = TdmsWriter::create(&tdms_path)?;
    let file_props = vec![("name".to_string(), PropertyValue::String(layout.name.clone()))];
    let group_props = vec![
        ("Pixels in X".to_string(), PropertyValue::UInt(layout.width as u64)),
        ("Pixels in Y".to_string(), PropertyValue::UInt(layout.height as u64)),
    ];

    for t in 0..layout.time_steps {
        let first = t * layout.z_stride;
        let timestamps: ChannelData = (first..first + layout.z_stride)
            .map(|i| SYNTHETIC_START_NS + i as u64 * layout.frame_interval_ns)
            .collect::<Vec<u64>>()
            .into();
        let piezo: ChannelData = (0..layout.z_stride)
            .map(|z| z as f64 * layout.z_step_um)
            .collect::<Vec<f64>>()
            .into();
        let frames: Vec<(String, ChannelData)> = (0..layout.z_stride)
            .map(|z| {
                let name = frame_channel_name(&config.frame_prefix, first + z);
                (name, synthetic_frame(layout, t, z).into())
            })
            .collect();

        let mut objects = vec![
            SegmentObject::root(&file_props),
            SegmentObject::group(&config.data_group, &group_props),
            SegmentObject::channel(&config.data_group, &config.timestamp_channel, &timestamps),
            SegmentObject::channel(&config.data_group, &config.piezo_channel, &piezo),
        ];
        objects.extend(
            frames
                .iter()
                .map(|(name, data)| SegmentObject::channel(&config.data_group, name, data)),
        );
        writer.write_segment(&objects)?;
    }
    writer.finalize()?;

    tracing::info!(
        xml = %xml_path.display(),
        tdms = %tdms_path.display(),
        frames = layout.time_steps * layout.z_stride,
        "Wrote synthetic dataset"
    );
    Ok(xml_path)
}
