use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{API, ApiClientConfig};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::endpoints::{self, ApiRoute};
use crate::data::error::ApiError;
use crate::models::{
    BacktestRequest, BacktestResponse, BacktestResult, CompareStrategiesResponse, CorpDetail,
    CorpSearchHit, DashboardSummary, FinanceSummary, GridSearchRequest, PortfolioSnapshot,
    ReportCode, ServiceInfo, StockMarket, StockPriceRecord,
};

/// Longest error body kept in `ApiError::Status`
const MAX_ERROR_BODY_CHARS: usize = 200;

/// The gateway operations the dashboard pages call.
/// Every call is a single attempt; callers decide whether to ask again.
#[async_trait]
pub trait StockApi: Send + Sync {
    async fn search_corps(&self, query: &str) -> Result<Vec<CorpSearchHit>, ApiError>;
    async fn corp_detail(&self, stock_code: &str) -> Result<CorpDetail, ApiError>;
    async fn universe_count(&self) -> Result<u64, ApiError>;

    async fn price_history(
        &self,
        stock_code: &str,
        days: Option<u32>,
    ) -> Result<Vec<StockPriceRecord>, ApiError>;

    async fn finance_summary(&self, stock_code: &str) -> Result<FinanceSummary, ApiError>;
    async fn verification_rate(&self) -> Result<f64, ApiError>;

    async fn start_backtest(&self, request: &BacktestRequest) -> Result<BacktestResponse, ApiError>;
    async fn backtest_result(&self, simulation_id: i64) -> Result<BacktestResult, ApiError>;
    async fn snapshots(&self, simulation_id: i64) -> Result<Vec<PortfolioSnapshot>, ApiError>;
    async fn compare(&self, result_ids: &[i64]) -> Result<CompareStrategiesResponse, ApiError>;
    async fn optimize(&self, request: &GridSearchRequest) -> Result<Vec<BacktestResult>, ApiError>;
    async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError>;

    // Batch triggers answer with a plain-text acknowledgement
    async fn run_corp_info_batch(&self, date: &str) -> Result<String, ApiError>;
    async fn run_sector_update_batch(&self) -> Result<String, ApiError>;
    async fn run_finance_batch(
        &self,
        date: &str,
        report_code: Option<ReportCode>,
    ) -> Result<String, ApiError>;
    async fn run_finance_recovery(&self, start_year: i32, end_year: i32)
    -> Result<String, ApiError>;
    async fn run_price_batch(&self, market: StockMarket, date: &str) -> Result<String, ApiError>;
    async fn run_indicator_batch(&self, date: &str) -> Result<String, ApiError>;
    async fn run_price_recovery(&self, start_date: &str, end_date: &str)
    -> Result<String, ApiError>;

    async fn service_info(&self) -> Result<ServiceInfo, ApiError>;
}

/// `StockApi` over the gateway's REST interface
#[derive(Clone)]
pub struct HttpStockApi {
    client: Client,
    base_url: String,
}

impl HttpStockApi {
    pub fn new(config: &ApiClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(API.client.user_agent)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, route: &ApiRoute) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, route.path);
        let builder = self.client.request(route.method.into(), url);
        if route.query.is_empty() {
            builder
        } else {
            builder.query(&route.query)
        }
    }

    /// Sends and maps non-success statuses onto `ApiError`.
    async fn execute(&self, route: &ApiRoute, builder: RequestBuilder) -> Result<Response, ApiError> {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_requests {
            log::info!("-> {}", route.describe());
        }

        let response = builder.send().await.inspect_err(|e| {
            log::warn!("{} failed: {}", route.describe(), e);
        })?;
        let status = response.status();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_requests {
            log::info!("<- {} {}", status.as_u16(), route.describe());
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            log::warn!("{} returned {}: {}", route.describe(), status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, route: ApiRoute) -> Result<T, ApiError> {
        let response = self.execute(&route, self.request(&route)).await?;
        decode_body(&response.text().await?)
    }

    async fn post_json<B, T>(&self, route: ApiRoute, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(&route, self.request(&route).json(body))
            .await?;
        decode_body(&response.text().await?)
    }

    async fn post_text(&self, route: ApiRoute) -> Result<String, ApiError> {
        let response = self.execute(&route, self.request(&route)).await?;
        let text = response.text().await?;
        log::info!("{} -> {}", route.describe(), text.trim());
        Ok(text)
    }
}

/// An empty 2xx body means the backend has nothing for this key yet.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(serde_json::from_str(text)?)
}

#[async_trait]
impl StockApi for HttpStockApi {
    async fn search_corps(&self, query: &str) -> Result<Vec<CorpSearchHit>, ApiError> {
        self.get_json(endpoints::search_corps(query)).await
    }

    async fn corp_detail(&self, stock_code: &str) -> Result<CorpDetail, ApiError> {
        self.get_json(endpoints::corp_detail(stock_code)).await
    }

    async fn universe_count(&self) -> Result<u64, ApiError> {
        self.get_json(endpoints::universe_count()).await
    }

    async fn price_history(
        &self,
        stock_code: &str,
        days: Option<u32>,
    ) -> Result<Vec<StockPriceRecord>, ApiError> {
        self.get_json(endpoints::price_history(stock_code, days))
            .await
    }

    async fn finance_summary(&self, stock_code: &str) -> Result<FinanceSummary, ApiError> {
        self.get_json(endpoints::finance_summary(stock_code)).await
    }

    async fn verification_rate(&self) -> Result<f64, ApiError> {
        self.get_json(endpoints::verification_rate()).await
    }

    async fn start_backtest(&self, request: &BacktestRequest) -> Result<BacktestResponse, ApiError> {
        log::info!(
            "Starting backtest: {:?} {} -> {}",
            request.strategy_type,
            request.start_date,
            request.end_date
        );
        self.post_json(endpoints::start_backtest(), request).await
    }

    async fn backtest_result(&self, simulation_id: i64) -> Result<BacktestResult, ApiError> {
        self.get_json(endpoints::backtest_result(simulation_id))
            .await
    }

    async fn snapshots(&self, simulation_id: i64) -> Result<Vec<PortfolioSnapshot>, ApiError> {
        self.get_json(endpoints::snapshots(simulation_id)).await
    }

    async fn compare(&self, result_ids: &[i64]) -> Result<CompareStrategiesResponse, ApiError> {
        self.get_json(endpoints::compare(result_ids)).await
    }

    async fn optimize(&self, request: &GridSearchRequest) -> Result<Vec<BacktestResult>, ApiError> {
        self.post_json(endpoints::optimize(), request).await
    }

    async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get_json(endpoints::dashboard_summary()).await
    }

    async fn run_corp_info_batch(&self, date: &str) -> Result<String, ApiError> {
        self.post_text(endpoints::corp_info_batch(date)).await
    }

    async fn run_sector_update_batch(&self) -> Result<String, ApiError> {
        self.post_text(endpoints::sector_update_batch()).await
    }

    async fn run_finance_batch(
        &self,
        date: &str,
        report_code: Option<ReportCode>,
    ) -> Result<String, ApiError> {
        self.post_text(endpoints::finance_batch(date, report_code))
            .await
    }

    async fn run_finance_recovery(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<String, ApiError> {
        self.post_text(endpoints::finance_recovery(start_year, end_year))
            .await
    }

    async fn run_price_batch(&self, market: StockMarket, date: &str) -> Result<String, ApiError> {
        self.post_text(endpoints::price_batch(market, date)).await
    }

    async fn run_indicator_batch(&self, date: &str) -> Result<String, ApiError> {
        self.post_text(endpoints::indicator_batch(date)).await
    }

    async fn run_price_recovery(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<String, ApiError> {
        self.post_text(endpoints::price_recovery(start_date, end_date))
            .await
    }

    async fn service_info(&self) -> Result<ServiceInfo, ApiError> {
        self.get_json(endpoints::service_info()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers a single request with the given status and body, returns the base url.
    async fn serve_once(status: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/api/v1", addr)
    }

    fn client_for(base_url: String) -> HttpStockApi {
        HttpStockApi::new(&ApiClientConfig {
            base_url,
            timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_404_maps_to_not_found() {
        let api = client_for(serve_once("404 Not Found", "missing".into()).await);
        assert_eq!(api.backtest_result(7).await, Err(ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_server_error_keeps_truncated_body() {
        let api = client_for(serve_once("500 Internal Server Error", "x".repeat(500)).await);
        match api.backtest_result(7).await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message.chars().count(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_success_body_maps_to_not_found() {
        let api = client_for(serve_once("200 OK", String::new()).await);
        assert_eq!(api.backtest_result(7).await, Err(ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_batch_trigger_returns_plain_text() {
        let api = client_for(serve_once("200 OK", "Batch started".into()).await);
        assert_eq!(
            api.run_indicator_batch("20240131").await,
            Ok("Batch started".to_string())
        );
    }

    #[test]
    fn test_empty_body_is_not_found() {
        let result: Result<BacktestResult, ApiError> = decode_body("  ");
        assert_eq!(result, Err(ApiError::NotFound));
    }

    #[test]
    fn test_scalar_bodies_decode() {
        let count: u64 = decode_body("2694").unwrap();
        assert_eq!(count, 2694);
        let rate: f64 = decode_body("93.7").unwrap();
        assert!((rate - 93.7).abs() < 0.01);
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let result: Result<Vec<CorpSearchHit>, ApiError> = decode_body("<html>");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_client_keeps_normalized_base_url() {
        let api = HttpStockApi::new(&ApiClientConfig {
            base_url: "http://localhost:9090/api/v1/".into(),
            timeout_ms: 500,
        })
        .unwrap();
        assert_eq!(api.base_url(), "http://localhost:9090/api/v1");
    }
}
