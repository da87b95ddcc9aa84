mod app;
mod convert;
mod messages;
mod panels;
mod states;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tdview_core::config::ViewerConfig;
use tdview_core::pipeline::Session;

/// Environment variable naming a TOML viewer config.
const CONFIG_ENV: &str = "TDVIEW_CONFIG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            ViewerConfig::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => ViewerConfig::default(),
    };

    let Some(xml) = std::env::args_os().nth(1).map(PathBuf::from).or_else(pick_experiment) else {
        tracing::info!("No experiment selected");
        return Ok(());
    };
    let session = Session::open(&xml, &config)
        .with_context(|| format!("Failed to open experiment {}", xml.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 800.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title(format!("tdview - {}", session.params.name)),
        ..Default::default()
    };

    eframe::run_native(
        "tdview",
        options,
        Box::new(move |cc| Ok(Box::new(app::TdviewApp::new(&cc.egui_ctx, session, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Blocking file picker for an experiment XML file.
pub(crate) fn pick_experiment() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Experiment XML", &["xml"])
        .add_filter("All files", &["*"])
        .pick_file()
}
