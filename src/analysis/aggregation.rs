use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{PriceBar, Timeframe};
use crate::utils::time_utils::{month_start, week_start};

/// Bucket key for `time` at the given resolution.
pub fn bucket_key(time: NaiveDate, timeframe: Timeframe) -> NaiveDate {
    match timeframe {
        Timeframe::Daily => time,
        Timeframe::Weekly => week_start(time),
        Timeframe::Monthly => month_start(time),
    }
}

/// Rolls daily bars up into weekly or monthly bars.
///
/// Each bucket takes its open from the first bar seen (input order), its close
/// from the last, the extreme high/low and the summed volume. Buckets come
/// back ordered by their key. Daily returns the input untouched.
pub fn aggregate_bars(bars: &[PriceBar], timeframe: Timeframe) -> Vec<PriceBar> {
    if timeframe == Timeframe::Daily {
        return bars.to_vec();
    }

    let mut buckets: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
    for bar in bars {
        let key = bucket_key(bar.time, timeframe);
        buckets
            .entry(key)
            .and_modify(|agg| {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume += bar.volume;
            })
            .or_insert(PriceBar { time: key, ..*bar });
    }
    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, o: f64, h: f64, l: f64, c: f64, v: f64) -> PriceBar {
        PriceBar::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), o, h, l, c, v)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_is_identity() {
        let bars = vec![bar(2024, 1, 2, 1.0, 2.0, 0.5, 1.5, 10.0)];
        assert_eq!(aggregate_bars(&bars, Timeframe::Daily), bars);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_bars(&[], Timeframe::Weekly).is_empty());
        assert!(aggregate_bars(&[], Timeframe::Monthly).is_empty());
    }

    #[test]
    fn test_weekly_bucket_reduction() {
        // Mon 2024-01-01 .. Wed 2024-01-03, then Mon 2024-01-08
        let bars = vec![
            bar(2024, 1, 1, 100.0, 105.0, 98.0, 104.0, 10.0),
            bar(2024, 1, 2, 104.0, 112.0, 101.0, 110.0, 20.0),
            bar(2024, 1, 3, 110.0, 111.0, 95.0, 97.0, 30.0),
            bar(2024, 1, 8, 97.0, 99.0, 90.0, 91.0, 5.0),
        ];
        let weekly = aggregate_bars(&bars, Timeframe::Weekly);
        assert_eq!(weekly.len(), 2);

        let first = weekly[0];
        assert_eq!(first.time, ymd(2024, 1, 1));
        assert!((first.open - 100.0).abs() < 0.01);
        assert!((first.high - 112.0).abs() < 0.01);
        assert!((first.low - 95.0).abs() < 0.01);
        assert!((first.close - 97.0).abs() < 0.01);
        assert!((first.volume - 60.0).abs() < 0.01);

        assert_eq!(weekly[1].time, ymd(2024, 1, 8));
    }

    #[test]
    fn test_monthly_keys_and_ordering() {
        let bars = vec![
            bar(2024, 1, 30, 1.0, 2.0, 0.5, 1.5, 1.0),
            bar(2024, 1, 31, 1.5, 3.0, 1.0, 2.5, 1.0),
            bar(2024, 2, 1, 2.5, 2.6, 2.0, 2.1, 1.0),
            bar(2024, 3, 15, 2.1, 2.2, 1.9, 2.0, 1.0),
        ];
        let monthly = aggregate_bars(&bars, Timeframe::Monthly);
        let keys: Vec<_> = monthly.iter().map(|b| b.time).collect();
        assert_eq!(keys, vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)]);
        assert!((monthly[0].close - 2.5).abs() < 0.01);
    }

    #[test]
    fn test_out_of_order_input_still_sorted_by_bucket() {
        let bars = vec![
            bar(2024, 2, 5, 5.0, 6.0, 4.0, 5.5, 1.0),
            bar(2024, 1, 3, 1.0, 2.0, 0.5, 1.5, 1.0),
        ];
        let monthly = aggregate_bars(&bars, Timeframe::Monthly);
        assert_eq!(monthly[0].time, ymd(2024, 1, 1));
        assert_eq!(monthly[1].time, ymd(2024, 2, 1));
    }

    #[test]
    fn test_bucket_extremes_bounded_by_dailies() {
        let bars: Vec<PriceBar> = (1..=28)
            .map(|d| {
                let base = 100.0 + (d as f64 * 1.7).sin() * 10.0;
                bar(2024, 2, d, base, base + 3.0, base - 3.0, base + 1.0, 100.0)
            })
            .collect();
        let weekly = aggregate_bars(&bars, Timeframe::Weekly);
        assert!(weekly.len() <= bars.len());
        for agg in &weekly {
            let members: Vec<&PriceBar> = bars
                .iter()
                .filter(|b| week_start(b.time) == agg.time)
                .collect();
            let max_high = members.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let min_low = members.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            assert!((agg.high - max_high).abs() < 1e-9);
            assert!((agg.low - min_low).abs() < 1e-9);
        }
        assert!(weekly.windows(2).all(|w| w[0].time < w[1].time));
    }
}
