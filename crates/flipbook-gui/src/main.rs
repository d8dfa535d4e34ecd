#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use eframe::egui;
use flipbook_core::ViewerOptions;

mod app;
mod handlers;
mod logger;
mod session;
mod viewer;
mod views;
mod worker;

fn main() -> anyhow::Result<()> {
    let logger = logger::AppLogger::new(1000, log::LevelFilter::Debug);
    logger.init().context("Failed to install logger")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    // Optional JSON options file as the only argument
    let options = match std::env::args().nth(1) {
        Some(path) => runtime
            .block_on(ViewerOptions::load(&path))
            .with_context(|| format!("Failed to load options from {}", path))?,
        None => ViewerOptions::default(),
    };
    options.validate()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("Flipbook Viewer"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    let app_logger = logger.clone();
    let result = eframe::run_native(
        "Flipbook Viewer",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(app::FlipbookApp::new(
                cc, handle, options, app_logger,
            )))
        }),
    );

    logger.shutdown();
    result.map_err(|e| anyhow::anyhow!("{}", e))
}
