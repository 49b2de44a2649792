#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eframe::NativeOptions;
use tokio::runtime::Runtime;

use stock_dashboard::config::APP_STATE_PATH;
use stock_dashboard::ui::config::UI_TEXT;
use stock_dashboard::{Cli, HttpStockApi, StockApi, run_app};

fn main() -> anyhow::Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Runtime for every request promise. Entered for the lifetime of the UI
    // so `Promise::spawn_async` finds it.
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let _guard = rt.enter();

    // D. REST client
    let client_config = args.client_config();
    let api: Arc<dyn StockApi> = Arc::new(
        HttpStockApi::new(&client_config).context("Failed to build the REST client")?,
    );
    log::info!("Using gateway at {}", client_config.normalized_base_url());

    // E. Run Native App
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(APP_STATE_PATH)),
        ..Default::default()
    };

    let reset_settings = args.reset_settings;
    eframe::run_native(
        UI_TEXT.app_title,
        options,
        Box::new(move |cc| Ok(run_app(cc, api, reset_settings))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited with an error: {}", e))
}
