use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// DART report period used by the single-sync finance batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportCode {
    Q1,
    Semi,
    Q3,
    Annual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinanceSummary {
    pub market_cap: Option<f64>,
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub roe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub psr: Option<f64>,
    pub roa: Option<f64>,
    pub debt_ratio: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_code_wire_names() {
        assert_eq!(ReportCode::Semi.to_string(), "SEMI");
        assert_eq!(ReportCode::Annual.to_string(), "ANNUAL");
        let parsed: ReportCode = serde_json::from_str("\"Q3\"").unwrap();
        assert_eq!(parsed, ReportCode::Q3);
    }

    #[test]
    fn test_summary_nulls_decode() {
        let summary: FinanceSummary =
            serde_json::from_str(r#"{"marketCap":4.5e14,"per":null}"#).unwrap();
        assert_eq!(summary.market_cap, Some(4.5e14));
        assert!(summary.per.is_none());
    }
}
