use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::corp::StockMarket;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyType {
    #[strum(serialize = "Equal Weight")]
    EqualWeight,
    Momentum,
    #[strum(serialize = "Low Volatility")]
    LowVolatility,
    #[default]
    #[strum(serialize = "Value (PER/PBR)")]
    Value,
    #[strum(serialize = "Multi-Factor")]
    MultiFactor,
    #[strum(serialize = "Sector Rotation")]
    SectorRotation,
    #[strum(serialize = "Dual Momentum")]
    DualMomentum,
    #[strum(serialize = "Risk Parity")]
    RiskParity,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalancingPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlippageType {
    #[default]
    None,
    Fixed,
    #[strum(serialize = "Volume-Based")]
    VolumeBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Optional pre-filter applied to the stock universe before a strategy runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniverseFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<StockMarket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_market_cap: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_market_cap: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_trading_volume: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_sectors: Vec<String>,
}

impl UniverseFilter {
    pub fn is_empty(&self) -> bool {
        *self == UniverseFilter::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
    pub strategy_type: StrategyType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub rebalancing_period: RebalancingPeriod,
    pub trading_fee_rate: f64,
    pub tax_rate: f64,
    pub slippage_type: SlippageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_slippage_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_weight_per_stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe_filter: Option<UniverseFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResponse {
    pub simulation_id: i64,
    pub status: SimulationStatus,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BacktestResult {
    pub id: i64,
    pub simulation_id: i64,
    pub final_value: Option<f64>,
    pub total_return: Option<f64>,
    pub cagr: Option<f64>,
    pub mdd: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub volatility: Option<f64>,
    pub win_rate: Option<f64>,
    pub total_trades: Option<i64>,
    pub profitable_trades: Option<i64>,
    pub is_optimized: Option<bool>,
    pub slippage_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioHolding {
    pub stock_code: Option<String>,
    pub quantity: Option<i64>,
    pub average_price: Option<f64>,
    pub current_price: Option<f64>,
    pub market_value: Option<f64>,
}

/// `holdings` is written either as a map keyed by stock code or as a plain list
#[derive(Deserialize)]
#[serde(untagged)]
enum HoldingsPayload {
    Keyed(BTreeMap<String, PortfolioHolding>),
    Listed(Vec<PortfolioHolding>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSnapshot {
    pub id: i64,
    pub simulation_id: i64,
    pub snapshot_date: Option<NaiveDate>,
    pub total_value: Option<f64>,
    pub cash_balance: Option<f64>,
    pub holdings: Option<String>,
}

impl PortfolioSnapshot {
    /// Decodes the embedded holdings JSON. Malformed payloads yield no rows.
    pub fn parsed_holdings(&self) -> Vec<PortfolioHolding> {
        let Some(raw) = self.holdings.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Vec::new();
        };
        match serde_json::from_str::<HoldingsPayload>(raw) {
            Ok(HoldingsPayload::Keyed(map)) => map
                .into_iter()
                .map(|(code, mut holding)| {
                    holding.stock_code.get_or_insert(code);
                    holding
                })
                .collect(),
            Ok(HoldingsPayload::Listed(list)) => list,
            Err(e) => {
                log::warn!(
                    "Snapshot {} has unreadable holdings payload: {}",
                    self.id,
                    e
                );
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompareStrategiesResponse {
    pub results: Vec<BacktestResult>,
    pub best_cagr_simulation_id: Option<i64>,
    pub best_sharpe_simulation_id: Option<i64>,
    pub lowest_mdd_simulation_id: Option<i64>,
}

/// Which comparison badges a result row earned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareMarkers {
    pub best_cagr: bool,
    pub best_sharpe: bool,
    pub lowest_mdd: bool,
}

impl CompareStrategiesResponse {
    pub fn markers_for(&self, result: &BacktestResult) -> CompareMarkers {
        let id = Some(result.simulation_id);
        CompareMarkers {
            best_cagr: self.best_cagr_simulation_id == id,
            best_sharpe: self.best_sharpe_simulation_id == id,
            lowest_mdd: self.lowest_mdd_simulation_id == id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSearchRequest {
    pub base_request: BacktestRequest,
    pub min_top_n: u32,
    pub max_top_n: u32,
    pub step_top_n: u32,
    pub weight_step: f64,
}

/// Best-first ranking as shown on the compare page
pub fn rank_by_sharpe(mut results: Vec<BacktestResult>, limit: usize) -> Vec<BacktestResult> {
    results.sort_by(|a, b| {
        let a = a.sharpe_ratio.unwrap_or(f64::NEG_INFINITY);
        let b = b.sharpe_ratio.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BacktestRequest {
        BacktestRequest {
            strategy_type: StrategyType::MultiFactor,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            initial_capital: 10_000_000.0,
            rebalancing_period: RebalancingPeriod::Monthly,
            trading_fee_rate: 0.0015,
            tax_rate: 0.002,
            slippage_type: SlippageType::VolumeBased,
            fixed_slippage_rate: None,
            max_weight_per_stock: Some(0.2),
            universe_filter: None,
        }
    }

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["strategyType"], "MULTI_FACTOR");
        assert_eq!(json["startDate"], "2023-01-01");
        assert_eq!(json["slippageType"], "VOLUME_BASED");
        assert_eq!(json["rebalancingPeriod"], "MONTHLY");
        assert!(json.get("fixedSlippageRate").is_none());
        assert!(json.get("universeFilter").is_none());
    }

    #[test]
    fn test_response_status_decodes() {
        let response: BacktestResponse =
            serde_json::from_str(r#"{"simulationId":42,"status":"PENDING","message":"queued"}"#)
                .unwrap();
        assert_eq!(response.simulation_id, 42);
        assert_eq!(response.status, SimulationStatus::Pending);
    }

    #[test]
    fn test_keyed_holdings_take_code_from_key() {
        let snapshot = PortfolioSnapshot {
            holdings: Some(
                r#"{"005930":{"quantity":10,"averagePrice":70000,"currentPrice":72000,"marketValue":720000}}"#
                    .into(),
            ),
            ..Default::default()
        };
        let holdings = snapshot.parsed_holdings();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].stock_code.as_deref(), Some("005930"));
        assert_eq!(holdings[0].quantity, Some(10));
    }

    #[test]
    fn test_bad_holdings_yield_nothing() {
        let snapshot = PortfolioSnapshot {
            holdings: Some("not json".into()),
            ..Default::default()
        };
        assert!(snapshot.parsed_holdings().is_empty());
        assert!(PortfolioSnapshot::default().parsed_holdings().is_empty());
    }

    #[test]
    fn test_compare_markers() {
        let response = CompareStrategiesResponse {
            results: vec![],
            best_cagr_simulation_id: Some(7),
            best_sharpe_simulation_id: Some(8),
            lowest_mdd_simulation_id: Some(7),
        };
        let row = BacktestResult {
            simulation_id: 7,
            ..Default::default()
        };
        let markers = response.markers_for(&row);
        assert!(markers.best_cagr && markers.lowest_mdd && !markers.best_sharpe);
    }

    #[test]
    fn test_rank_by_sharpe_puts_missing_last() {
        let results = vec![
            BacktestResult {
                id: 1,
                sharpe_ratio: Some(0.5),
                ..Default::default()
            },
            BacktestResult {
                id: 2,
                sharpe_ratio: None,
                ..Default::default()
            },
            BacktestResult {
                id: 3,
                sharpe_ratio: Some(1.8),
                ..Default::default()
            },
        ];
        let ranked = rank_by_sharpe(results, 2);
        assert_eq!(ranked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1]);
    }
}
