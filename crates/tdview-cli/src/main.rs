mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tdview", about = "Two-channel TDMS image stack inspection tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show TDMS groups and resolve one channel
    Info(commands::info::InfoArgs),
    /// Show experiment parameters from the XML metadata
    Params(commands::params::ParamsArgs),
    /// Compute the global pixel range over all frames
    Range(commands::range::RangeArgs),
    /// Render one frame to an image file
    Export(commands::export::ExportArgs),
    /// Write a synthetic XML + TDMS dataset
    Generate(commands::generate::GenerateArgs),
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Range(args) => commands::range::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
