//! Backend REST API configuration constants and types.

/// Configuration for the REST client
/// (This is the runtime struct handed to the Http client; CLI flags override it)
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: API.client.base_url.to_string(),
            timeout_ms: API.client.timeout_ms,
        }
    }
}

impl ApiClientConfig {
    /// Base URL without a trailing slash, so paths can be appended verbatim.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    /// Gateway address including the `/api/v1` prefix
    pub base_url: &'static str,
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

/// Request scheduling knobs used by the pages
pub struct QueryDefaults {
    /// Backtest results are polled on this fixed interval until they appear
    pub result_poll_interval_ms: u64,
    /// Search queries fire only once the input has at least this many chars
    pub search_min_chars: usize,
    /// `days` parameter sent when a caller does not pick a lookback
    pub default_price_days: u32,
    /// Symbol opened by the "Charts" navigation item
    pub default_symbol: &'static str,
}

/// The Master Configuration Struct
pub struct ApiConfig {
    pub client: ClientDefaults,
    pub query: QueryDefaults,
}

pub const API: ApiConfig = ApiConfig {
    client: ClientDefaults {
        base_url: "http://localhost:8080/api/v1",
        timeout_ms: 10_000,
        user_agent: "stock-dashboard/0.1.0",
    },
    query: QueryDefaults {
        result_poll_interval_ms: 3_000,
        search_min_chars: 2,
        default_price_days: 365,
        default_symbol: "005930",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let config = ApiClientConfig {
            base_url: "http://gateway:8080/api/v1/".to_string(),
            timeout_ms: 1_000,
        };
        assert_eq!(config.normalized_base_url(), "http://gateway:8080/api/v1");
    }

    #[test]
    fn default_config_points_at_local_gateway() {
        let config = ApiClientConfig::default();
        assert!(config.base_url.ends_with("/api/v1"));
        assert_eq!(config.timeout_ms, API.client.timeout_ms);
    }
}
