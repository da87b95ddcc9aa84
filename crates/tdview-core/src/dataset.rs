use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::consts::{frame_channel_name, NANOS_PER_SECOND};
use crate::error::Result;
use crate::index::{FrameIndex, FrameLocator};
use crate::io::tdms::{ChannelData, DataType, TdmsFile};
use crate::range::{compute_range_with, GlobalRange};

/// A recorded image series: one TDMS data group holding frame, timestamp and
/// piezo channels. Read-only once opened.
pub struct Dataset {
    path: PathBuf,
    file: TdmsFile,
    group: String,
    frame_prefix: String,
    frame_count: usize,
    timestamps_s: Vec<f64>,
    piezo_um: Vec<f64>,
}

impl Dataset {
    pub fn open(path: &Path, config: &ViewerConfig) -> Result<Self> {
        let file = TdmsFile::open(path)?;
        let group = file.group(&config.data_group)?;

        let frame_count = group
            .channels()
            .iter()
            .filter(|c| c.name.starts_with(&config.frame_prefix))
            .count();

        let timestamps = file.read_channel(file.channel(&config.data_group, &config.timestamp_channel)?)?;
        let timestamps_s = relative_seconds(&timestamps)?;
        let piezo = file.read_channel(file.channel(&config.data_group, &config.piezo_channel)?)?;
        let piezo_um = piezo.to_f64()?;

        tracing::info!(
            path = %path.display(),
            frames = frame_count,
            timestamps = timestamps_s.len(),
            "Opened dataset"
        );

        Ok(Self {
            path: path.to_path_buf(),
            group: config.data_group.clone(),
            frame_prefix: config.frame_prefix.clone(),
            file,
            frame_count,
            timestamps_s,
            piezo_um,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &TdmsFile {
        &self.file
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Locator for this dataset; `time_steps` wins over the derived count.
    pub fn locator(&self, z_stride: usize, time_steps: Option<usize>) -> FrameLocator {
        match time_steps {
            Some(t) => FrameLocator::new(z_stride, t),
            None => FrameLocator::for_frame_count(z_stride, self.frame_count),
        }
    }

    /// Raw samples of a frame channel as `u16`.
    pub fn frame_samples(&self, index: FrameIndex) -> Result<Vec<u16>> {
        let name = frame_channel_name(&self.frame_prefix, index.0);
        let channel = self.file.channel(&self.group, &name)?;
        tracing::debug!(channel = %name, "Loading frame");
        self.file.read_channel(channel)?.to_u16()
    }

    /// Seconds since the first timestamp of the recording.
    pub fn timestamp(&self, index: FrameIndex) -> Option<f64> {
        self.timestamps_s.get(index.0).copied()
    }

    /// Piezo stage position in micrometres.
    pub fn piezo_position(&self, index: FrameIndex) -> Option<f64> {
        self.piezo_um.get(index.0).copied()
    }

    /// Min and max over all frame channels, scanned in parallel.
    pub fn global_range(&self) -> Result<GlobalRange> {
        let range = compute_range_with(self.frame_count, |i| self.frame_samples(FrameIndex(i)))?;
        tracing::info!(min = range.min, max = range.max, "Global pixel range");
        if range.is_degenerate() {
            tracing::warn!(value = range.min, "All frames share one value; images render black");
        }
        Ok(range)
    }
}

/// Timestamps relative to the earliest one, in seconds. Integer channels are
/// nanoseconds; subtraction happens before the float conversion.
fn relative_seconds(data: &ChannelData) -> Result<Vec<f64>> {
    match data.data_type() {
        DataType::F32 | DataType::F64 => {
            let values = data.to_f64()?;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            Ok(values.iter().map(|v| (v - min) / NANOS_PER_SECOND).collect())
        }
        DataType::Timestamp => {
            let values = data.to_f64()?;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            Ok(values.iter().map(|v| v - min).collect())
        }
        _ => {
            let values = data.to_i64()?;
            let min = values.iter().copied().min().unwrap_or(0);
            Ok(values
                .iter()
                .map(|&v| v.wrapping_sub(min) as f64 / NANOS_PER_SECOND)
                .collect())
        }
    }
}
