use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tdview_core::consts::DATA_GROUP;
use tdview_core::io::tdms::TdmsFile;

use crate::summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Input TDMS file
    pub file: PathBuf,

    /// Group holding the channel to resolve
    #[arg(long, default_value = DATA_GROUP)]
    pub group: String,

    /// Channel to resolve
    #[arg(long, default_value = "frame 0")]
    pub channel: String,

    /// Also print file, group and channel properties
    #[arg(long)]
    pub properties: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let file = TdmsFile::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Segments:    {}", file.segment_count());
    println!("Groups:      {}", file.groups().len());
    for group in file.groups() {
        println!("  {:<24} {} channel(s)", group.name, group.channels().len());
    }

    let channel = file.channel(&args.group, &args.channel)?;
    println!(
        "Channel:     {} / {} ({:?})",
        channel.group, channel.name, channel.data_type
    );
    println!("Length:      {}", channel.len());

    if args.properties {
        summary::print_properties("File", &file.properties);
        let group = file.group(&args.group)?;
        summary::print_properties(&format!("Group {}", group.name), &group.properties);
        summary::print_properties(&format!("Channel {}", channel.name), &channel.properties);
    }

    Ok(())
}
