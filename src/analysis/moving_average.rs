use chrono::NaiveDate;

use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaPoint {
    pub time: NaiveDate,
    pub value: f64,
}

/// Simple moving average of closes over a trailing `window`.
/// Positional only: gaps in the dates are not accounted for.
pub fn calculate_ma(bars: &[PriceBar], window: usize) -> Vec<MaPoint> {
    if window == 0 || bars.len() < window {
        return Vec::new();
    }
    bars.windows(window)
        .map(|w| MaPoint {
            time: w[window - 1].time,
            value: w.iter().map(|b| b.close).sum::<f64>() / window as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let time = NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap();
                PriceBar::new(time, c, c, c, c, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_ma_values_and_times() {
        let input = bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let ma = calculate_ma(&input, 3);
        assert_eq!(ma.len(), 3);
        assert!((ma[0].value - 2.0).abs() < 1e-9);
        assert!((ma[1].value - 3.0).abs() < 1e-9);
        assert!((ma[2].value - 4.0).abs() < 1e-9);
        assert_eq!(ma[0].time, input[2].time);
        assert_eq!(ma[2].time, input[4].time);
    }

    #[test]
    fn test_window_equal_to_len() {
        let input = bars(&[10.0, 20.0]);
        let ma = calculate_ma(&input, 2);
        assert_eq!(ma.len(), 1);
        assert!((ma[0].value - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_input_and_zero_window() {
        let input = bars(&[1.0, 2.0]);
        assert!(calculate_ma(&input, 5).is_empty());
        assert!(calculate_ma(&input, 0).is_empty());
        assert!(calculate_ma(&[], 1).is_empty());
    }

    #[test]
    fn test_window_one_is_close_series() {
        let input = bars(&[7.0, 8.5, 6.0]);
        let ma = calculate_ma(&input, 1);
        let values: Vec<f64> = ma.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![7.0, 8.5, 6.0]);
    }
}
