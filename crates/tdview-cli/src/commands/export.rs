use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tdview_core::io::image_io::save_display_image;
use tdview_core::pipeline::Session;

use super::load_config;
use crate::summary;

#[derive(Args)]
pub struct ExportArgs {
    /// Experiment XML metadata file
    pub xml: PathBuf,

    /// Time step
    #[arg(short, long, default_value = "0")]
    pub time: usize,

    /// Depth slice within the time step
    #[arg(short, long, default_value = "0")]
    pub z: usize,

    /// Nearest-neighbour scale factor (at least 1.0)
    #[arg(long, default_value = "1.0")]
    pub zoom: f32,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path (.png, .tif or .tiff)
    #[arg(short, long, default_value = "frame.png")]
    pub output: PathBuf,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    anyhow::ensure!(args.zoom >= 1.0, "--zoom must be at least 1.0, got {}", args.zoom);

    let config = load_config(args.config.as_deref())?;
    let session = Session::open(&args.xml, &config)
        .with_context(|| format!("Failed to open session for {}", args.xml.display()))?;
    summary::print_session_summary(
        &session.params,
        session.dataset.path(),
        &session.locator,
        &session.range,
    );

    let frame = session
        .render(args.time, args.z)
        .with_context(|| format!("Failed to render time {} z {}", args.time, args.z))?;
    summary::print_frame_labels(&frame);

    save_display_image(&frame.image, args.zoom, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("\nOutput saved to {}", args.output.display());

    Ok(())
}
