//! Eurovision Dash - final-round voting dashboard
//!
//! Shows favourite voting pairs, per-country yearly totals and the raw
//! final-round votes from the published Eurovision dataset.

mod charts;
mod cli;
mod dump;
mod gui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use eframe::egui;
use eurovision_dash::config::Config;
use gui::DashboardApp;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    info!("Eurovision Dash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    args.merge_into(&mut config);
    debug!("Config: {:?}", config);

    if let Some(view) = args.dump {
        let mut stdout = std::io::stdout().lock();
        return dump::run_dump(&config, view, args.country.as_deref(), &mut stdout);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 750.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Eurovision Dash"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Eurovision Dash",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the dashboard: {e}"))
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}
