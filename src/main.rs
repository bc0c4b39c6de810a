use anyhow::Context;
use clap::Parser;
use eframe::egui;

use sheet_report::app::SheetReportApp;
use sheet_report::cli::Args;
use sheet_report::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = AppConfig::load(args.config.as_deref()).context("loading config")?;
    let config = args.apply(config);
    log::info!(
        "Cache directory {}, spreadsheet {}",
        config.data_dir.display(),
        config.workbook.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Loader and Report Generator",
        options,
        Box::new(|_cc| Ok(Box::new(SheetReportApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}
