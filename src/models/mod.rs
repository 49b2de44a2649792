// Wire models for the backend REST API
// Field names follow the backend's camelCase JSON; numeric fields are optional on the wire

pub mod backtest;
pub mod corp;
pub mod finance;
pub mod price;
pub mod system;

// Re-export key types for convenience
pub use backtest::{
    BacktestRequest, BacktestResponse, BacktestResult, CompareMarkers, CompareStrategiesResponse,
    GridSearchRequest, PortfolioHolding, PortfolioSnapshot, RebalancingPeriod, SimulationStatus,
    SlippageType, StrategyType, UniverseFilter, rank_by_sharpe,
};
pub use corp::{CorpDetail, CorpSearchHit, StockMarket};
pub use finance::{FinanceSummary, ReportCode};
pub use price::{StockPriceRecord, records_to_bars};
pub use system::{DashboardSummary, ServiceInfo, StrategySummary};
