use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tdview_core::io::experiment::read_experiment;

use super::load_config;

#[derive(Args)]
pub struct ParamsArgs {
    /// Experiment XML metadata file
    pub xml: PathBuf,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &ParamsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let params = read_experiment(&args.xml)
        .with_context(|| format!("Failed to read experiment metadata {}", args.xml.display()))?;
    let tdms = params.tdms_path(&args.xml, &config.tdms_extension);

    println!("Experiment:  {}", params.name);
    println!("Dimensions:  {}x{}", params.pixels_x, params.pixels_y);
    println!("Samples:     {} per frame", 2 * params.pixels_x * params.pixels_y);
    println!(
        "TDMS file:   {}{}",
        tdms.display(),
        if tdms.exists() { "" } else { " (missing)" }
    );

    Ok(())
}
