use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Chart resolution. Weekly and monthly are derived client-side from daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display)]
pub enum Timeframe {
    #[default]
    #[strum(serialize = "1D")]
    Daily,
    #[strum(serialize = "1W")]
    Weekly,
    #[strum(serialize = "1M")]
    Monthly,
}

/// How much history the stock page requests from the price endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display)]
pub enum Lookback {
    #[strum(serialize = "30D")]
    Month,
    #[strum(serialize = "1Y")]
    Year,
    #[default]
    #[strum(serialize = "2Y")]
    TwoYears,
    #[strum(serialize = "5Y")]
    FiveYears,
}

impl Lookback {
    pub fn days(self) -> u32 {
        match self {
            Lookback::Month => 30,
            Lookback::Year => 365,
            Lookback::TwoYears => 730,
            Lookback::FiveYears => 1825,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_lookback_is_two_years() {
        assert_eq!(Lookback::default().days(), 730);
    }

    #[test]
    fn test_labels_match_toolbar_buttons() {
        let labels: Vec<String> = Timeframe::iter().map(|t| t.to_string()).collect();
        assert_eq!(labels, vec!["1D", "1W", "1M"]);
        let labels: Vec<String> = Lookback::iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["30D", "1Y", "2Y", "5Y"]);
    }
}
