mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::SlipViewApp;
use clap::Parser;
use data::pipeline::Analysis;
use eframe::egui;
use state::AppState;

/// Slip-angle and frame processing time statistics.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the measurement table (frame, angle, t_absolute)
    #[arg(long)]
    csv: PathBuf,

    /// Print the report and exit without opening the plot window
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let analysis = Analysis::from_file(&args.csv)
        .with_context(|| format!("analysing {}", args.csv.display()))?;

    println!("{}", analysis.report());

    if args.headless {
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let state = AppState::with_analysis(analysis);
    eframe::run_native(
        "SlipView – Frame Statistics",
        options,
        Box::new(|_cc| Ok(Box::new(SlipViewApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("plot window failed: {e}"))
}
