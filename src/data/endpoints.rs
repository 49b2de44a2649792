//! Method, path and query string for every gateway operation.
//!
//! Kept separate from the HTTP client so the routing table can be checked
//! without a server.

use itertools::Itertools;

use crate::config::API;
use crate::domain::corp_code_for;
use crate::models::{ReportCode, StockMarket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// One request target relative to the configured base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoute {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl ApiRoute {
    fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Human readable form used by request logging
    pub fn describe(&self) -> String {
        if self.query.is_empty() {
            format!("{:?} {}", self.method, self.path)
        } else {
            let qs = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .join("&");
            format!("{:?} {}?{}", self.method, self.path, qs)
        }
    }
}

// --- corp service ---

pub fn search_corps(query: &str) -> ApiRoute {
    ApiRoute::get("/corp/internal/search").param("query", query)
}

pub fn corp_detail(stock_code: &str) -> ApiRoute {
    ApiRoute::get(format!("/corp/internal/corp-detail/{}", corp_code_for(stock_code)))
}

pub fn universe_count() -> ApiRoute {
    ApiRoute::get("/corp/universe/count")
}

pub fn corp_info_batch(date: &str) -> ApiRoute {
    ApiRoute::post("/corp/batch/corp-info").param("date", date)
}

pub fn sector_update_batch() -> ApiRoute {
    ApiRoute::post("/corp/batch/corp-detail/sector-update")
}

// --- price service ---

pub fn price_history(stock_code: &str, days: Option<u32>) -> ApiRoute {
    ApiRoute::get(format!("/stock/internal/prices/{}", stock_code.trim()))
        .param("days", days.unwrap_or(API.query.default_price_days))
}

pub fn price_batch(market: StockMarket, date: &str) -> ApiRoute {
    ApiRoute::post("/stock/batch/price")
        .param("market", market)
        .param("date", date)
}

pub fn indicator_batch(date: &str) -> ApiRoute {
    ApiRoute::post("/stock/batch/indicators").param("date", date)
}

pub fn price_recovery(start_date: &str, end_date: &str) -> ApiRoute {
    ApiRoute::post("/stock/batch/price/recovery")
        .param("startDate", start_date)
        .param("endDate", end_date)
}

// --- finance service ---

pub fn finance_summary(stock_code: &str) -> ApiRoute {
    ApiRoute::get(format!("/finance/internal/summary/{}", corp_code_for(stock_code)))
}

pub fn verification_rate() -> ApiRoute {
    ApiRoute::get("/finance/quarterly/stats/verification")
}

pub fn finance_batch(date: &str, report_code: Option<ReportCode>) -> ApiRoute {
    let route = ApiRoute::post("/finance/batch/corp-fin").param("date", date);
    match report_code {
        Some(code) => route.param("reportCode", code),
        None => route,
    }
}

pub fn finance_recovery(start_year: i32, end_year: i32) -> ApiRoute {
    ApiRoute::post("/finance/batch/corp-fin/recovery")
        .param("startYear", start_year)
        .param("endYear", end_year)
}

// --- strategy service ---

pub fn start_backtest() -> ApiRoute {
    ApiRoute::post("/strategy/backtest")
}

pub fn backtest_result(simulation_id: i64) -> ApiRoute {
    ApiRoute::get(format!("/strategy/backtest/{}/result", simulation_id))
}

pub fn snapshots(simulation_id: i64) -> ApiRoute {
    ApiRoute::get(format!("/strategy/backtest/{}/snapshots", simulation_id))
}

pub fn compare(result_ids: &[i64]) -> ApiRoute {
    ApiRoute::get("/strategy/backtest/compare").param("resultIds", result_ids.iter().join(","))
}

pub fn optimize() -> ApiRoute {
    ApiRoute::post("/strategy/backtest/optimize")
}

pub fn dashboard_summary() -> ApiRoute {
    ApiRoute::get("/strategy/backtest/summary")
}

// --- gateway ---

pub fn service_info() -> ApiRoute {
    ApiRoute::get("/system/info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corp_lookups_use_prefixed_code() {
        assert_eq!(corp_detail("005930").path, "/corp/internal/corp-detail/A005930");
        assert_eq!(finance_summary("A005930").path, "/finance/internal/summary/A005930");
    }

    #[test]
    fn test_price_history_uses_raw_code_and_default_days() {
        let route = price_history("005930", None);
        assert_eq!(route.method, Method::Get);
        assert_eq!(route.path, "/stock/internal/prices/005930");
        assert_eq!(route.query, vec![("days", "365".to_string())]);
        assert_eq!(price_history("005930", Some(730)).query[0].1, "730");
    }

    #[test]
    fn test_compare_joins_ids() {
        let route = compare(&[1, 2, 3]);
        assert_eq!(route.describe(), "Get /strategy/backtest/compare?resultIds=1,2,3");
    }

    #[test]
    fn test_finance_batch_report_code_optional() {
        assert_eq!(finance_batch("20240331", None).query.len(), 1);
        let route = finance_batch("20240331", Some(ReportCode::Semi));
        assert_eq!(route.method, Method::Post);
        assert_eq!(route.query[1], ("reportCode", "SEMI".to_string()));
    }

    #[test]
    fn test_batch_routes() {
        let route = price_batch(StockMarket::Kosdaq, "20240102");
        assert_eq!(route.path, "/stock/batch/price");
        assert_eq!(
            route.query,
            vec![("market", "KOSDAQ".to_string()), ("date", "20240102".to_string())]
        );
        let route = finance_recovery(2015, 2023);
        assert_eq!(
            route.describe(),
            "Post /finance/batch/corp-fin/recovery?startYear=2015&endYear=2023"
        );
        assert_eq!(
            price_recovery("20240101", "20240131").query[1],
            ("endDate", "20240131".to_string())
        );
        assert!(sector_update_batch().query.is_empty());
    }

    #[test]
    fn test_search_query_param() {
        let route = search_corps("Samsung");
        assert_eq!(route.path, "/corp/internal/search");
        assert_eq!(route.query, vec![("query", "Samsung".to_string())]);
    }
}
