use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::index::{FrameIndex, FrameLocator};
use crate::io::experiment::{read_experiment, ExperimentParams};
use crate::range::GlobalRange;
use crate::render::{DisplayImage, RenderState};

/// A frame ready for display, with the values shown next to it.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    pub index: FrameIndex,
    pub time: usize,
    pub z: usize,
    pub timestamp_s: Option<f64>,
    pub piezo_um: Option<f64>,
    pub image: DisplayImage,
}

impl RenderedFrame {
    /// `[width, height]` of the image.
    pub fn size(&self) -> [usize; 2] {
        let (h, w, _) = self.image.dim();
        [w, h]
    }
}

/// An opened recording: metadata, data, frame locator and the range every
/// frame is normalized against.
pub struct Session {
    pub xml_path: PathBuf,
    pub params: ExperimentParams,
    pub dataset: Dataset,
    pub locator: FrameLocator,
    pub range: GlobalRange,
}

impl Session {
    /// Read the XML metadata, open the TDMS file beside it and scan the
    /// global range.
    pub fn open(xml_path: &Path, config: &ViewerConfig) -> Result<Self> {
        config.validate()?;
        let params = read_experiment(xml_path)?;
        let tdms_path = params.tdms_path(xml_path, &config.tdms_extension);
        let dataset = Dataset::open(&tdms_path, config)?;
        let locator = dataset.locator(config.z_stride, config.time_steps);
        let range = dataset.global_range()?;

        tracing::info!(
            experiment = %params.name,
            width = params.pixels_x,
            height = params.pixels_y,
            time_steps = locator.time_steps,
            z_stride = locator.z_stride,
            "Session ready"
        );

        Ok(Self {
            xml_path: xml_path.to_path_buf(),
            params,
            dataset,
            locator,
            range,
        })
    }

    /// Locate, load and split one frame.
    pub fn render_state(&self, time: usize, z: usize) -> Result<RenderState> {
        let index = self.locator.locate(time, z)?;
        let samples = self.dataset.frame_samples(index)?;
        RenderState::from_samples(
            index,
            &samples,
            self.params.pixels_x,
            self.params.pixels_y,
            self.range,
        )
    }

    /// Full render of the frame at (time, z).
    pub fn render(&self, time: usize, z: usize) -> Result<RenderedFrame> {
        let state = self.render_state(time, z)?;
        let image = state.compose()?;
        Ok(RenderedFrame {
            index: state.frame,
            time,
            z,
            timestamp_s: self.dataset.timestamp(state.frame),
            piezo_um: self.dataset.piezo_position(state.frame),
            image,
        })
    }
}
