// Pure chart computations over price bars and portfolio snapshots
pub mod aggregation;
pub mod equity;
pub mod moving_average;
pub mod price_change;

// Re-export commonly used types
pub use aggregation::aggregate_bars;
pub use equity::{equity_curve, latest_snapshot, normalize_curve};
pub use moving_average::{MaPoint, calculate_ma};
pub use price_change::{PriceChange, price_change};
