use chrono::NaiveDate;

use crate::models::PortfolioSnapshot;

/// Portfolio value over time, ordered by snapshot date.
/// Snapshots without a date are dropped; a missing value counts as 0.
pub fn equity_curve(snapshots: &[PortfolioSnapshot]) -> Vec<(NaiveDate, f64)> {
    let mut curve: Vec<(NaiveDate, f64)> = snapshots
        .iter()
        .filter_map(|s| Some((s.snapshot_date?, s.total_value.unwrap_or(0.0))))
        .collect();
    curve.sort_by_key(|(date, _)| *date);
    curve
}

/// Rebases a curve so it starts at 100. Empty or zero-start curves come back unchanged.
pub fn normalize_curve(values: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, f64)> {
    match values.first() {
        Some(&(_, first)) if first != 0.0 => values
            .iter()
            .map(|&(date, v)| (date, v / first * 100.0))
            .collect(),
        _ => values.to_vec(),
    }
}

/// Most recent snapshot by date, the one whose holdings the simulator lists
pub fn latest_snapshot(snapshots: &[PortfolioSnapshot]) -> Option<&PortfolioSnapshot> {
    snapshots
        .iter()
        .filter(|s| s.snapshot_date.is_some())
        .max_by_key(|s| s.snapshot_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: i64, day: u32, value: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            id,
            snapshot_date: NaiveDate::from_ymd_opt(2023, 1, day),
            total_value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_curve_sorted_by_date() {
        let curve = equity_curve(&[snap(1, 3, 300.0), snap(2, 1, 100.0), snap(3, 2, 200.0)]);
        let values: Vec<f64> = curve.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_undated_snapshot_dropped() {
        let mut undated = snap(9, 1, 1.0);
        undated.snapshot_date = None;
        assert_eq!(equity_curve(&[undated.clone(), snap(1, 1, 5.0)]).len(), 1);
        assert_eq!(latest_snapshot(&[undated, snap(1, 4, 5.0), snap(2, 2, 6.0)]).map(|s| s.id), Some(1));
    }

    #[test]
    fn test_normalize_rebases_to_100() {
        let curve = equity_curve(&[snap(1, 1, 10_000_000.0), snap(2, 2, 12_500_000.0)]);
        let normalized = normalize_curve(&curve);
        assert!((normalized[0].1 - 100.0).abs() < 1e-9);
        assert!((normalized[1].1 - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degenerate() {
        assert!(normalize_curve(&[]).is_empty());
        let zero_start = equity_curve(&[snap(1, 1, 0.0), snap(2, 2, 50.0)]);
        assert_eq!(normalize_curve(&zero_start), zero_start);
    }
}
