//! Configuration module for the dashboard application.

pub mod api;
pub mod chart;

mod debug; // Private: files use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;

// Re-export commonly used items
pub use api::{API, ApiClientConfig};
pub use chart::CHART_CONFIG;
pub use persistence::APP_STATE_PATH;
