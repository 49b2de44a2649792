// Domain types and value objects
pub mod backtest_form;
pub mod price_bar;
pub mod route;
pub mod settings;
pub mod stock_code;
pub mod timeframe;

// Re-export commonly used types
pub use backtest_form::{
    BacktestForm, FormError, GridSearchForm, join_result_ids, parse_result_ids,
    validate_batch_date, validate_batch_range, validate_year_range,
};
pub use price_bar::{BarType, PriceBar};
pub use route::{NavItem, Route, nav_items};
pub use settings::{
    ChartConfig, ChartConfigPatch, MaLine, SettingsStore, StrategyDefaults, Theme, ThemePreference,
};
pub use stock_code::{corp_code_for, stock_code_for};
pub use timeframe::{Lookback, Timeframe};
