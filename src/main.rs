mod app;
mod config;
mod context;
mod itsm;
mod layout;
mod util;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{ContextGraphApp, DataSource};
use crate::context::Focus;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON dataset with incidents, problems, risks and the CMDB (default: built-in sample)
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON viewer config with layout parameters and graph policy
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial focal entity, `<kind>:<id>` or `cmdb`
    #[arg(long)]
    focus: Option<Focus>,

    /// Write the built-in sample dataset to this file and exit
    #[arg(long, value_name = "FILE")]
    export_sample: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("itsm_context_graph=info")),
        )
        .with_target(false)
        .init();

    if let Some(path) = &args.export_sample {
        let store = itsm::ItsmStore::from_dataset(itsm::sample_dataset())?;
        itsm::write_dataset(path, &store.to_dataset())?;
        tracing::info!(path = %path.display(), "wrote sample dataset");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::ViewerConfig::default(),
    };
    let source = args.data.map_or(DataSource::Sample, DataSource::File);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ITSM context graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ContextGraphApp::new(
                cc,
                source,
                config,
                args.focus,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer window failed: {error}"))
}
