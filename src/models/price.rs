use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// Daily price row from `/stock/internal/prices/{code}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockPriceRecord {
    pub bas_dt: Option<NaiveDate>,
    pub start_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
    pub end_price: Option<f64>,
    pub volume: Option<f64>,
    pub market_total_amt: Option<f64>,
    pub daily_ratio: Option<f64>,
}

impl StockPriceRecord {
    /// Missing prices become 0.0. A row without a date cannot be placed on an axis.
    pub fn to_bar(&self) -> Option<PriceBar> {
        let time = self.bas_dt?;
        Some(PriceBar::new(
            time,
            self.start_price.unwrap_or(0.0),
            self.high_price.unwrap_or(0.0),
            self.low_price.unwrap_or(0.0),
            self.end_price.unwrap_or(0.0),
            self.volume.unwrap_or(0.0),
        ))
    }
}

/// Converts in the order the backend returned; rows without a date are skipped.
pub fn records_to_bars(records: &[StockPriceRecord]) -> Vec<PriceBar> {
    records.iter().filter_map(StockPriceRecord::to_bar).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_row_to_bar() {
        let json = r#"[
            {"basDt":"2024-01-02","startPrice":100,"highPrice":110,"lowPrice":95,"endPrice":105,"volume":1000},
            {"basDt":"2024-01-03","startPrice":105,"endPrice":102},
            {"startPrice":1}
        ]"#;
        let records: Vec<StockPriceRecord> = serde_json::from_str(json).unwrap();
        let bars = records_to_bars(&records);
        assert_eq!(bars.len(), 2);
        assert!((bars[0].close - 105.0).abs() < 0.01);
        assert!((bars[1].high - 0.0).abs() < 0.01);
        assert!((bars[1].volume - 0.0).abs() < 0.01);
        assert_eq!(bars[1].time, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }
}
