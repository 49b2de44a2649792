use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Define the BarType enum
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BarType {
    Bullish,
    Bearish,
}

/// One OHLCV record as drawn by the charts. Built from a `StockPriceRecord`
/// or produced by time-bucket aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub time: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    // A constructor for convenience
    pub fn new(time: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        PriceBar {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // A method to determine the type of bar
    pub fn get_type(&self) -> BarType {
        if self.close >= self.open {
            BarType::Bullish
        } else {
            BarType::Bearish
        }
    }

    // Returns the low and high of the bar body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            BarType::Bullish => (self.open, self.close),
            BarType::Bearish => (self.close, self.open),
        }
    }

    pub fn body_mid(&self) -> f64 {
        let (low, high) = self.body_range();
        (low + high) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_flat_bar_counts_as_bullish() {
        let bar = PriceBar::new(day(1), 100.0, 110.0, 90.0, 100.0, 1.0);
        assert_eq!(bar.get_type(), BarType::Bullish);
    }

    #[test]
    fn test_body_range_is_ordered_for_bearish_bar() {
        let bar = PriceBar::new(day(4), 120.0, 125.0, 95.0, 100.0, 1.0);
        assert_eq!(bar.get_type(), BarType::Bearish);
        assert_eq!(bar.body_range(), (100.0, 120.0));
        assert!((bar.body_mid() - 110.0).abs() < 0.01);
    }
}
