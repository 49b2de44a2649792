use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Listing venue, as returned by the backend and accepted by the price batch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMarket {
    #[default]
    Kospi,
    Kosdaq,
    Konex,
}

/// One row of the header search dropdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorpSearchHit {
    pub corp_code: Option<String>,
    pub corp_name: Option<String>,
    pub stock_code: Option<String>,
    pub market: Option<String>,
    pub sector: Option<String>,
}

impl CorpSearchHit {
    /// Code used for navigation. Falls back to the corp code minus its `A` prefix.
    pub fn symbol(&self) -> Option<String> {
        self.stock_code
            .clone()
            .filter(|code| !code.is_empty())
            .or_else(|| {
                self.corp_code
                    .as_deref()
                    .map(|c| crate::domain::stock_code_for(c).to_string())
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorpDetail {
    pub corp_name: Option<String>,
    pub stock_code: Option<String>,
    pub market: Option<String>,
    pub sector: Option<String>,
    pub corp_type: Option<String>,
    pub description: Option<String>,
    pub avg_volume: Option<f64>,
    #[serde(rename = "high52w")]
    pub high_52w: Option<f64>,
    #[serde(rename = "low52w")]
    pub low_52w: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_with_missing_fields_decodes() {
        let json = r#"{"corpName":"Samsung Electronics","high52w":88800,"market":"KOSPI"}"#;
        let detail: CorpDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.corp_name.as_deref(), Some("Samsung Electronics"));
        assert_eq!(detail.high_52w, Some(88800.0));
        assert!(detail.low_52w.is_none());
        assert!(detail.description.is_none());
    }

    #[test]
    fn test_search_hit_symbol_fallback() {
        let hit = CorpSearchHit {
            corp_code: Some("A000660".into()),
            ..Default::default()
        };
        assert_eq!(hit.symbol().as_deref(), Some("000660"));
    }

    #[test]
    fn test_market_wire_names() {
        assert_eq!(serde_json::to_string(&StockMarket::Kosdaq).unwrap(), "\"KOSDAQ\"");
        assert_eq!(StockMarket::Konex.to_string(), "KONEX");
    }
}
