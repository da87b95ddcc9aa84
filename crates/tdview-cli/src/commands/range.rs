use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tdview_core::dataset::Dataset;
use tdview_core::index::FrameIndex;
use tdview_core::io::experiment::read_experiment;
use tdview_core::range::compute_range_with;

use super::load_config;
use crate::summary;

#[derive(Args)]
pub struct RangeArgs {
    /// Experiment XML metadata file
    pub xml: PathBuf,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &RangeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let params = read_experiment(&args.xml)
        .with_context(|| format!("Failed to read experiment metadata {}", args.xml.display()))?;
    let tdms = params.tdms_path(&args.xml, &config.tdms_extension);
    let dataset = Dataset::open(&tdms, &config)
        .with_context(|| format!("Failed to open dataset {}", tdms.display()))?;

    let pb = ProgressBar::new(dataset.frame_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Scanning");

    let range = compute_range_with(dataset.frame_count(), |i| {
        let samples = dataset.frame_samples(FrameIndex(i));
        pb.inc(1);
        samples
    })?;
    pb.finish_with_message("Done");

    let locator = dataset.locator(config.z_stride, config.time_steps);
    summary::print_session_summary(&params, &tdms, &locator, &range);

    Ok(())
}
