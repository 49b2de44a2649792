#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod ui;
pub mod utils;

use std::sync::Arc;

// Re-export commonly used types
pub use config::ApiClientConfig;
pub use data::{ApiError, HttpStockApi, StockApi};
pub use domain::{PriceBar, Route, SettingsStore};
pub use ui::DashboardApp;
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Gateway base URL including the `/api/v1` prefix
    #[arg(long, default_value_t = config::API.client.base_url.to_string())]
    pub api_base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = config::API.client.timeout_ms)]
    pub timeout_ms: u64,

    /// Start with default settings instead of the persisted ones
    #[arg(long, default_value_t = false)]
    pub reset_settings: bool,
}

impl Cli {
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api_base_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    api: Arc<dyn StockApi>,
    reset_settings: bool,
) -> Box<dyn eframe::App> {
    Box::new(DashboardApp::new(cc, api, reset_settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_config() {
        let cli = Cli::parse_from(["stock-dashboard"]);
        assert_eq!(cli.api_base_url, config::API.client.base_url);
        assert_eq!(cli.timeout_ms, config::API.client.timeout_ms);
        assert!(!cli.reset_settings);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "stock-dashboard",
            "--api-base-url",
            "http://gateway:9000/api/v1/",
            "--timeout-ms",
            "2500",
            "--reset-settings",
        ]);
        let config = cli.client_config();
        assert_eq!(config.normalized_base_url(), "http://gateway:9000/api/v1");
        assert_eq!(config.timeout_ms, 2500);
        assert!(cli.reset_settings);
    }
}
