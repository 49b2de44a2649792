use serde::{Deserialize, Serialize};

/// Gateway `/system/info` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceInfo {
    pub service_name: Option<String>,
    pub version: Option<String>,
    pub profiles: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategySummary {
    pub name: Option<String>,
    pub cagr: Option<f64>,
    pub mdd: Option<f64>,
}

/// Home page aggregate from `/strategy/backtest/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub avg_return_ytd: Option<f64>,
    pub total_universe_count: Option<u64>,
    pub data_verification_rate: Option<f64>,
    pub top_strategies: Vec<StrategySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_decodes_with_strategies() {
        let json = r#"{"avgReturnYtd":14.2,"totalUniverseCount":2694,
            "topStrategies":[{"name":"VALUE","cagr":12.5,"mdd":-8.1}]}"#;
        let summary: DashboardSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_universe_count, Some(2694));
        assert_eq!(summary.top_strategies.len(), 1);
        assert!(summary.data_verification_rate.is_none());
    }
}
