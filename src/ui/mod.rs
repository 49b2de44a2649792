// User interface components
pub mod app;
mod app_async;
pub mod config;
pub mod page;
pub mod plot_layers;
pub mod styles;
pub mod ui_compare;
pub mod ui_home;
pub mod ui_plot_view;
pub mod ui_settings;
pub mod ui_shell;
pub mod ui_simulator;
pub mod ui_stock_detail;
pub mod ui_text;
pub mod utils;

// Re-export main app
pub use app::DashboardApp;
pub use config::UI_CONFIG;
