use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DATA_GROUP, DEFAULT_ZOOM_STEP, DEFAULT_Z_STRIDE, FRAME_CHANNEL_PREFIX, PIEZO_CHANNEL,
    TDMS_EXTENSION, TIMESTAMP_CHANNEL,
};
use crate::error::{Result, TdviewError};

/// Dataset layout and viewer behaviour. Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub data_group: String,
    pub frame_prefix: String,
    pub timestamp_channel: String,
    pub piezo_channel: String,
    /// Depth slices per time step.
    pub z_stride: usize,
    /// Pin the number of time steps instead of deriving it from the frame count.
    pub time_steps: Option<usize>,
    pub zoom_step: f32,
    pub tdms_extension: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_group: DATA_GROUP.into(),
            frame_prefix: FRAME_CHANNEL_PREFIX.into(),
            timestamp_channel: TIMESTAMP_CHANNEL.into(),
            piezo_channel: PIEZO_CHANNEL.into(),
            z_stride: DEFAULT_Z_STRIDE,
            time_steps: None,
            zoom_step: DEFAULT_ZOOM_STEP,
            tdms_extension: TDMS_EXTENSION.into(),
        }
    }
}

impl ViewerConfig {
    /// Load a TOML config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| TdviewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TdviewError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.z_stride == 0 {
            return Err(TdviewError::Config("z_stride must be at least 1".into()));
        }
        if self.time_steps == Some(0) {
            return Err(TdviewError::Config("time_steps must be at least 1".into()));
        }
        if self.zoom_step.is_nan() || self.zoom_step <= 1.0 {
            return Err(TdviewError::Config(format!(
                "zoom_step must be greater than 1.0, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }
}
