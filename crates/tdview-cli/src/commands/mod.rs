pub mod config;
pub mod export;
pub mod generate;
pub mod info;
pub mod params;
pub mod range;

use std::path::Path;

use anyhow::{Context, Result};
use tdview_core::config::ViewerConfig;

/// Config from `--config`, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}
