use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tdview_core::synth::{write_synthetic_dataset, SyntheticLayout};

#[derive(Args)]
pub struct GenerateArgs {
    /// Output directory
    pub dir: PathBuf,

    /// Experiment name (also the TDMS file stem)
    #[arg(long, default_value = "Synthetic")]
    pub name: String,

    /// Frame width in pixels
    #[arg(long, default_value = "64")]
    pub width: usize,

    /// Frame height in pixels
    #[arg(long, default_value = "48")]
    pub height: usize,

    /// Number of time steps
    #[arg(long, default_value = "4")]
    pub time_steps: usize,

    /// Depth slices per time step
    #[arg(long, default_value = "10")]
    pub z_stride: usize,
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    anyhow::ensure!(
        args.width > 0 && args.height > 0,
        "frame size must be non-zero, got {}x{}",
        args.width,
        args.height
    );

    let layout = SyntheticLayout {
        name: args.name.clone(),
        width: args.width,
        height: args.height,
        time_steps: args.time_steps,
        z_stride: args.z_stride,
        ..SyntheticLayout::default()
    };
    let xml = write_synthetic_dataset(&args.dir, &layout)
        .with_context(|| format!("Failed to write dataset to {}", args.dir.display()))?;

    println!(
        "Wrote {} frames ({}x{}) to {}",
        layout.time_steps * layout.z_stride,
        layout.width,
        layout.height,
        xml.display()
    );
    if layout.z_stride != tdview_core::consts::DEFAULT_Z_STRIDE {
        println!("View with a config that sets z_stride = {}", layout.z_stride);
    }

    Ok(())
}
