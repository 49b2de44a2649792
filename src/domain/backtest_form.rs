//! Simulator and batch form state, plus the validation the backend would
//! otherwise reject with a 400.

use chrono::NaiveDate;
use itertools::Itertools;
use thiserror::Error;

use crate::domain::settings::StrategyDefaults;
use crate::models::{
    BacktestRequest, GridSearchRequest, RebalancingPeriod, SlippageType, StrategyType,
    UniverseFilter,
};

pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";
pub const BATCH_DATE_FORMAT: &str = "%Y%m%d";
pub const MIN_RECOVERY_YEAR: i32 = 2000;
pub const MAX_RECOVERY_YEAR: i32 = 2100;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Initial capital must be a positive amount")]
    InvalidCapital,
    #[error("{field} is not a valid date (expected {expected})")]
    InvalidDate {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{field} cannot be in the future")]
    FutureDate { field: &'static str },
    #[error("Start date must not be after end date")]
    StartAfterEnd,
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("'{0}' is not a result id")]
    InvalidResultId(String),
    #[error("Enter at least one result id")]
    NoResultIds,
    #[error("Year must be between 2000 and 2100")]
    InvalidYear,
    #[error("Grid search range is invalid")]
    InvalidGrid,
}

/// Accepts `10,000,000`, `10_000_000` or `10000000`.
pub fn parse_capital(text: &str) -> Result<f64, FormError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' ' | '₩'))
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.01 => Ok(v),
        _ => Err(FormError::InvalidCapital),
    }
}

fn parse_date(
    text: &str,
    format: &str,
    field: &'static str,
    expected: &'static str,
) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(text.trim(), format)
        .map_err(|_| FormError::InvalidDate { field, expected })
}

fn not_after(date: NaiveDate, today: NaiveDate, field: &'static str) -> Result<(), FormError> {
    if date > today {
        Err(FormError::FutureDate { field })
    } else {
        Ok(())
    }
}

fn in_range(value: f64, min: f64, max: f64, field: &'static str) -> Result<f64, FormError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FormError::OutOfRange { field, min, max })
    }
}

/// Comma separated ids as typed on the compare page: `"1, 2,3"` -> `[1, 2, 3]`.
pub fn parse_result_ids(text: &str) -> Result<Vec<i64>, FormError> {
    let ids = text
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<i64>()
                .map_err(|_| FormError::InvalidResultId(t.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        return Err(FormError::NoResultIds);
    }
    Ok(ids)
}

/// Query string form of a validated id list
pub fn join_result_ids(ids: &[i64]) -> String {
    ids.iter().join(",")
}

/// Validates a batch `date` parameter (`yyyyMMdd`) and returns it normalised.
pub fn validate_batch_date(text: &str) -> Result<String, FormError> {
    let date = parse_date(text, BATCH_DATE_FORMAT, "Batch date", "yyyyMMdd")?;
    Ok(date.format(BATCH_DATE_FORMAT).to_string())
}

/// Both ends of a price recovery range, `yyyyMMdd`, start not after end.
pub fn validate_batch_range(start: &str, end: &str) -> Result<(String, String), FormError> {
    let s = parse_date(start, BATCH_DATE_FORMAT, "Start date", "yyyyMMdd")?;
    let e = parse_date(end, BATCH_DATE_FORMAT, "End date", "yyyyMMdd")?;
    if s > e {
        return Err(FormError::StartAfterEnd);
    }
    Ok((
        s.format(BATCH_DATE_FORMAT).to_string(),
        e.format(BATCH_DATE_FORMAT).to_string(),
    ))
}

/// Finance recovery years, both inside the supported window.
pub fn validate_year_range(start: &str, end: &str) -> Result<(i32, i32), FormError> {
    let parse = |t: &str| -> Result<i32, FormError> {
        match t.trim().parse::<i32>() {
            Ok(y) if (MIN_RECOVERY_YEAR..=MAX_RECOVERY_YEAR).contains(&y) => Ok(y),
            _ => Err(FormError::InvalidYear),
        }
    };
    let (s, e) = (parse(start)?, parse(end)?);
    if s > e {
        return Err(FormError::StartAfterEnd);
    }
    Ok((s, e))
}

/// Editable simulator parameters. Text fields hold exactly what the user typed.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestForm {
    pub strategy_type: StrategyType,
    pub capital_text: String,
    pub start_text: String,
    pub end_text: String,
    pub rebalancing_period: RebalancingPeriod,
    pub slippage_type: SlippageType,
    pub fixed_slippage_rate: f64,
    pub trading_fee_rate: f64,
    pub tax_rate: f64,
    pub max_weight_per_stock: f64,
    pub universe_filter: UniverseFilter,
}

impl BacktestForm {
    pub fn new(defaults: &StrategyDefaults) -> Self {
        Self {
            strategy_type: StrategyType::default(),
            capital_text: "10,000,000".to_string(),
            start_text: "2023-01-01".to_string(),
            end_text: "2023-12-31".to_string(),
            rebalancing_period: RebalancingPeriod::default(),
            slippage_type: SlippageType::Fixed,
            fixed_slippage_rate: 0.002,
            trading_fee_rate: defaults.trading_fee_rate,
            tax_rate: defaults.tax_rate,
            max_weight_per_stock: defaults.max_weight_per_stock,
            universe_filter: UniverseFilter::default(),
        }
    }

    /// Re-seeds the rate fields after the defaults were edited in Settings.
    pub fn apply_defaults(&mut self, defaults: &StrategyDefaults) {
        self.trading_fee_rate = defaults.trading_fee_rate;
        self.tax_rate = defaults.tax_rate;
        self.max_weight_per_stock = defaults.max_weight_per_stock;
    }

    pub fn to_request(&self, today: NaiveDate) -> Result<BacktestRequest, FormError> {
        let initial_capital = parse_capital(&self.capital_text)?;
        let start_date = parse_date(&self.start_text, FORM_DATE_FORMAT, "Start date", "yyyy-MM-dd")?;
        let end_date = parse_date(&self.end_text, FORM_DATE_FORMAT, "End date", "yyyy-MM-dd")?;
        not_after(start_date, today, "Start date")?;
        not_after(end_date, today, "End date")?;
        if start_date > end_date {
            return Err(FormError::StartAfterEnd);
        }

        let trading_fee_rate = in_range(self.trading_fee_rate, 0.0, 1.0, "Trading fee rate")?;
        let tax_rate = in_range(self.tax_rate, 0.0, 1.0, "Tax rate")?;
        let max_weight = in_range(self.max_weight_per_stock, 0.01, 1.0, "Max weight per stock")?;

        let fixed_slippage_rate = match self.slippage_type {
            SlippageType::Fixed => Some(in_range(
                self.fixed_slippage_rate,
                0.0,
                f64::MAX,
                "Fixed slippage rate",
            )?),
            _ => None,
        };

        Ok(BacktestRequest {
            strategy_type: self.strategy_type,
            start_date,
            end_date,
            initial_capital,
            rebalancing_period: self.rebalancing_period,
            trading_fee_rate,
            tax_rate,
            slippage_type: self.slippage_type,
            fixed_slippage_rate,
            max_weight_per_stock: Some(max_weight),
            universe_filter: (!self.universe_filter.is_empty())
                .then(|| self.universe_filter.clone()),
        })
    }
}

/// Portfolio-size / weight sweep submitted to the optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchForm {
    pub min_top_n: u32,
    pub max_top_n: u32,
    pub step_top_n: u32,
    pub weight_step: f64,
}

impl Default for GridSearchForm {
    fn default() -> Self {
        Self {
            min_top_n: 10,
            max_top_n: 30,
            step_top_n: 5,
            weight_step: 0.05,
        }
    }
}

impl GridSearchForm {
    pub fn to_request(&self, base_request: BacktestRequest) -> Result<GridSearchRequest, FormError> {
        if self.min_top_n == 0 || self.step_top_n == 0 || self.min_top_n > self.max_top_n {
            return Err(FormError::InvalidGrid);
        }
        let weight_step = in_range(self.weight_step, 0.01, 1.0, "Weight step")?;
        Ok(GridSearchRequest {
            base_request,
            min_top_n: self.min_top_n,
            max_top_n: self.max_top_n,
            step_top_n: self.step_top_n,
            weight_step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn form() -> BacktestForm {
        BacktestForm::new(&StrategyDefaults::default())
    }

    #[test]
    fn test_capital_accepts_separators() {
        assert!((parse_capital("10,000,000").unwrap() - 10_000_000.0).abs() < 0.01);
        assert!((parse_capital(" 5_000 ").unwrap() - 5_000.0).abs() < 0.01);
        assert_eq!(parse_capital("0"), Err(FormError::InvalidCapital));
        assert_eq!(parse_capital("ten"), Err(FormError::InvalidCapital));
    }

    #[test]
    fn test_default_form_builds_request_with_seeded_rates() {
        let request = form().to_request(today()).unwrap();
        assert!((request.trading_fee_rate - 0.0015).abs() < 1e-9);
        assert!((request.tax_rate - 0.002).abs() < 1e-9);
        assert_eq!(request.max_weight_per_stock, Some(0.2));
        assert_eq!(request.fixed_slippage_rate, Some(0.002));
        assert!(request.universe_filter.is_none());
    }

    #[test]
    fn test_slippage_rate_only_sent_for_fixed() {
        let mut f = form();
        f.slippage_type = SlippageType::VolumeBased;
        assert_eq!(f.to_request(today()).unwrap().fixed_slippage_rate, None);
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let mut f = form();
        f.tax_rate = 1.5;
        assert!(matches!(
            f.to_request(today()),
            Err(FormError::OutOfRange { field: "Tax rate", .. })
        ));
        let mut f = form();
        f.max_weight_per_stock = 0.0;
        assert!(f.to_request(today()).is_err());
    }

    #[test]
    fn test_rejects_bad_date_ordering() {
        let mut f = form();
        f.start_text = "2024-01-01".into();
        f.end_text = "2023-01-01".into();
        assert_eq!(f.to_request(today()), Err(FormError::StartAfterEnd));

        let mut f = form();
        f.end_text = "2024-07-01".into();
        assert_eq!(
            f.to_request(today()),
            Err(FormError::FutureDate { field: "End date" })
        );

        let mut f = form();
        f.start_text = "01/01/2023".into();
        assert!(matches!(
            f.to_request(today()),
            Err(FormError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_result_ids() {
        assert_eq!(parse_result_ids("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_result_ids("4,,5,").unwrap(), vec![4, 5]);
        assert_eq!(
            parse_result_ids("1,x"),
            Err(FormError::InvalidResultId("x".into()))
        );
        assert_eq!(parse_result_ids("  "), Err(FormError::NoResultIds));
        assert_eq!(join_result_ids(&[1, 2, 3]), "1,2,3");
    }

    #[test]
    fn test_batch_parameters() {
        assert_eq!(validate_batch_date("20240131").unwrap(), "20240131");
        assert!(validate_batch_date("2024-01-31").is_err());
        assert!(validate_batch_date("20240231").is_err());
        assert!(validate_batch_range("20240105", "20240101").is_err());
        assert_eq!(validate_year_range("2015", "2023").unwrap(), (2015, 2023));
        assert_eq!(validate_year_range("1999", "2023"), Err(FormError::InvalidYear));
        assert_eq!(validate_year_range("2020", "2019"), Err(FormError::StartAfterEnd));
    }

    #[test]
    fn test_grid_search_bounds() {
        let base = form().to_request(today()).unwrap();
        assert!(GridSearchForm::default().to_request(base.clone()).is_ok());
        let bad = GridSearchForm {
            min_top_n: 30,
            max_top_n: 10,
            ..Default::default()
        };
        assert_eq!(bad.to_request(base), Err(FormError::InvalidGrid));
    }
}
