//! File persistence configuration

// App state persistence
/// Path for saving/loading application UI state (theme, chart toggles, strategy defaults)
pub const APP_STATE_PATH: &str = ".states.json";

/// How many batch trigger outcomes are kept for the "System Events" feed
pub const BATCH_LOG_CAPACITY: usize = 20;
