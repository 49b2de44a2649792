use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::config::persistence::BATCH_LOG_CAPACITY;
use crate::data::api::StockApi;
use crate::data::query::ApiResult;
use crate::models::{ReportCode, StockMarket};

/// A backend batch job the Settings page can trigger. Parameters are
/// already validated when a job is built.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchJob {
    CorpInfo { date: String },
    SectorUpdate,
    Price { market: StockMarket, date: String },
    Indicators { date: String },
    PriceRecovery { start_date: String, end_date: String },
    FinanceRecovery { start_year: i32, end_year: i32 },
    Finance { date: String, report_code: Option<ReportCode> },
}

impl BatchJob {
    /// Which trigger button this job belongs to, independent of its parameters
    pub fn slot(&self) -> String {
        match self {
            BatchJob::CorpInfo { .. } => "corp_info".to_string(),
            BatchJob::SectorUpdate => "sector_update".to_string(),
            BatchJob::Price { market, .. } => format!("price/{}", market),
            BatchJob::Indicators { .. } => "indicators".to_string(),
            BatchJob::PriceRecovery { .. } => "price_recovery".to_string(),
            BatchJob::FinanceRecovery { .. } => "finance_recovery".to_string(),
            BatchJob::Finance { report_code, .. } => match report_code {
                Some(code) => format!("finance/{}", code),
                None => "finance".to_string(),
            },
        }
    }

    /// Shown in the events feed
    pub fn label(&self) -> String {
        match self {
            BatchJob::CorpInfo { date } => format!("Corp Info Sync ({})", date),
            BatchJob::SectorUpdate => "Sector Update".to_string(),
            BatchJob::Price { market, date } => format!("Price Batch {} ({})", market, date),
            BatchJob::Indicators { date } => format!("Indicator Batch ({})", date),
            BatchJob::PriceRecovery {
                start_date,
                end_date,
            } => format!("Price Recovery {} ~ {}", start_date, end_date),
            BatchJob::FinanceRecovery {
                start_year,
                end_year,
            } => format!("Finance Recovery {} ~ {}", start_year, end_year),
            BatchJob::Finance { date, report_code } => match report_code {
                Some(code) => format!("Finance Sync {} ({})", code, date),
                None => format!("Finance Sync ({})", date),
            },
        }
    }

    pub async fn run(self, api: Arc<dyn StockApi>) -> ApiResult<String> {
        match self {
            BatchJob::CorpInfo { date } => api.run_corp_info_batch(&date).await,
            BatchJob::SectorUpdate => api.run_sector_update_batch().await,
            BatchJob::Price { market, date } => api.run_price_batch(market, &date).await,
            BatchJob::Indicators { date } => api.run_indicator_batch(&date).await,
            BatchJob::PriceRecovery {
                start_date,
                end_date,
            } => api.run_price_recovery(&start_date, &end_date).await,
            BatchJob::FinanceRecovery {
                start_year,
                end_year,
            } => api.run_finance_recovery(start_year, end_year).await,
            BatchJob::Finance { date, report_code } => {
                api.run_finance_batch(&date, report_code).await
            }
        }
    }
}

/// A batch trigger issued from Settings and what the backend answered
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEvent {
    pub label: String,
    pub at: DateTime<Local>,
    pub outcome: Result<String, String>,
}

/// Session-only feed of batch outcomes, newest first, shown on Home
#[derive(Debug, Clone, Default)]
pub struct BatchLog {
    events: VecDeque<BatchEvent>,
}

impl BatchLog {
    pub fn record(&mut self, label: impl Into<String>, outcome: Result<String, String>) {
        let event = BatchEvent {
            label: label.into(),
            at: Local::now(),
            outcome,
        };
        match &event.outcome {
            Ok(msg) => log::info!("Batch '{}' accepted: {}", event.label, msg.trim()),
            Err(e) => log::warn!("Batch '{}' failed: {}", event.label, e),
        }
        self.events.push_front(event);
        self.events.truncate(BATCH_LOG_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_capped() {
        let mut log = BatchLog::default();
        for i in 0..(BATCH_LOG_CAPACITY + 5) {
            log.record(format!("batch {}", i), Ok("started".into()));
        }
        assert_eq!(log.iter().count(), BATCH_LOG_CAPACITY);
        let newest = log.iter().next().unwrap();
        assert_eq!(newest.label, format!("batch {}", BATCH_LOG_CAPACITY + 4));
    }

    #[test]
    fn test_job_labels_distinguish_report_codes() {
        let q1 = BatchJob::Finance {
            date: "20240331".into(),
            report_code: Some(ReportCode::Q1),
        };
        let annual = BatchJob::Finance {
            date: "20240331".into(),
            report_code: Some(ReportCode::Annual),
        };
        assert_ne!(q1.label(), annual.label());
        assert_eq!(q1.label(), "Finance Sync Q1 (20240331)");
    }

    #[test]
    fn test_slot_ignores_dates() {
        let a = BatchJob::PriceRecovery {
            start_date: "20240101".into(),
            end_date: "20240131".into(),
        };
        let b = BatchJob::PriceRecovery {
            start_date: "20230101".into(),
            end_date: "20231231".into(),
        };
        assert_eq!(a.slot(), b.slot());
        let kospi = BatchJob::Price {
            market: StockMarket::Kospi,
            date: "20241014".into(),
        };
        assert_eq!(kospi.slot(), "price/KOSPI");
    }

    #[test]
    fn test_failure_recorded() {
        let mut log = BatchLog::default();
        log.record("Price Batch", Err("Not found".into()));
        assert!(log.iter().next().unwrap().outcome.is_err());
    }
}
