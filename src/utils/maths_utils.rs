use argminmax::ArgMinMax;

/// Panics on an empty slice; callers check first.
pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

/// `None` for an empty slice so plots can skip bound fitting.
pub fn get_min_max(vec: &[f64]) -> Option<(f64, f64)> {
    if vec.is_empty() {
        return None;
    }
    Some((get_min(vec), get_max(vec)))
}

/// Widens `(min, max)` by `pct` of the span on each side.
/// A flat range is widened by `pct` of its magnitude instead.
pub fn padded_range(min: f64, max: f64, pct: f64) -> (f64, f64) {
    let span = max - min;
    let pad = if span.abs() < f64::EPSILON {
        (max.abs() * pct).max(1.0)
    } else {
        span * pct
    };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max() {
        let v = [3.0, -1.5, 8.25, 0.0];
        assert_eq!(get_min_max(&v), Some((-1.5, 8.25)));
        assert_eq!(get_min_max(&[]), None);
    }

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range(100.0, 200.0, 0.05);
        assert!((lo - 95.0).abs() < 0.01);
        assert!((hi - 205.0).abs() < 0.01);

        let (lo, hi) = padded_range(50.0, 50.0, 0.1);
        assert!(lo < 50.0 && hi > 50.0);
    }
}
