use chrono::{Datelike, Local, NaiveDate, TimeDelta};

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const SHORT_TIME_FORMAT: &str = "%y.%m.%d";
}

/// Today's date in the local timezone. Used as "now" for form validation.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - TimeDelta::days(offset)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

// Plots work in f64. Dates are placed on the x axis as days since the Unix epoch.
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

pub fn date_to_plot_x(date: NaiveDate) -> f64 {
    (date - epoch()).num_days() as f64
}

pub fn plot_x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    epoch().checked_add_signed(TimeDelta::try_days(x.round() as i64)?)
}

/// Axis label for a plot x value
pub fn format_plot_date(x: f64) -> String {
    plot_x_to_date(x)
        .map(|d| d.format(TimeUtils::SHORT_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(TimeUtils::STANDARD_TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-01-03 is a Wednesday
        assert_eq!(week_start(ymd(2024, 1, 3)), ymd(2024, 1, 1));
        assert_eq!(week_start(ymd(2024, 1, 1)), ymd(2024, 1, 1));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(ymd(2024, 1, 7)), ymd(2024, 1, 1));
        // Week spanning a year boundary
        assert_eq!(week_start(ymd(2025, 1, 2)), ymd(2024, 12, 30));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(ymd(2024, 2, 29)), ymd(2024, 2, 1));
    }

    #[test]
    fn test_plot_x_conversion() {
        let d = ymd(2023, 7, 15);
        assert_eq!(plot_x_to_date(date_to_plot_x(d)), Some(d));
        assert_eq!(date_to_plot_x(ymd(1970, 1, 2)), 1.0);
        assert_eq!(plot_x_to_date(f64::NAN), None);
        assert_eq!(format_plot_date(date_to_plot_x(d)), "23.07.15");
    }

    #[test]
    fn test_format_date_fallback() {
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date(Some(ymd(2024, 5, 9))), "2024-05-09");
    }
}
