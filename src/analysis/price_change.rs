use crate::domain::PriceBar;

/// Latest close against the one before it, as shown under the price headline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub latest: f64,
    pub previous: f64,
    pub diff: f64,
    pub ratio_pct: f64,
    pub is_positive: bool,
}

pub fn price_change(bars: &[PriceBar]) -> PriceChange {
    let latest = bars.last().map_or(0.0, |b| b.close);
    let previous = if bars.len() > 1 {
        bars[bars.len() - 2].close
    } else {
        latest
    };
    let diff = latest - previous;
    let ratio_pct = if previous != 0.0 {
        diff / previous * 100.0
    } else {
        0.0
    };
    PriceChange {
        latest,
        previous,
        diff,
        ratio_pct,
        is_positive: diff >= 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(close: f64) -> PriceBar {
        PriceBar::new(NaiveDate::default(), close, close, close, close, 0.0)
    }

    #[test]
    fn test_rise_and_fall() {
        let up = price_change(&[bar(100.0), bar(110.0)]);
        assert!((up.diff - 10.0).abs() < 0.01);
        assert!((up.ratio_pct - 10.0).abs() < 0.01);
        assert!(up.is_positive);

        let down = price_change(&[bar(200.0), bar(150.0)]);
        assert!((down.ratio_pct + 25.0).abs() < 0.01);
        assert!(!down.is_positive);
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = price_change(&[]);
        assert_eq!(empty.latest, 0.0);
        assert_eq!(empty.ratio_pct, 0.0);
        assert!(empty.is_positive);

        let single = price_change(&[bar(42.0)]);
        assert_eq!(single.previous, 42.0);
        assert_eq!(single.diff, 0.0);

        let from_zero = price_change(&[bar(0.0), bar(5.0)]);
        assert_eq!(from_zero.ratio_pct, 0.0);
    }
}
