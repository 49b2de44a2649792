// REST access to the backend gateway
pub mod api;
pub mod batch_log;
pub mod endpoints;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use api::{HttpStockApi, StockApi};
pub use batch_log::{BatchEvent, BatchJob, BatchLog};
pub use error::ApiError;
pub use query::{ApiResult, PollSchedule, Query, QueryState};
