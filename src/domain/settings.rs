use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// What the user picked in the Appearance section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display)]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
    System,
}

/// The theme actually applied to the UI after `System` has been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum MaLine {
    #[strum(serialize = "MA5")]
    Ma5,
    #[strum(serialize = "MA20")]
    Ma20,
    #[strum(serialize = "MA60")]
    Ma60,
    #[strum(serialize = "MA120")]
    Ma120,
}

impl MaLine {
    pub fn period(self) -> usize {
        match self {
            MaLine::Ma5 => 5,
            MaLine::Ma20 => 20,
            MaLine::Ma60 => 60,
            MaLine::Ma120 => 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub candle_mode: bool,
    pub show_ma5: bool,
    pub show_ma20: bool,
    pub show_ma60: bool,
    pub show_ma120: bool,
    pub show_volume: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            candle_mode: false,
            show_ma5: true,
            show_ma20: true,
            show_ma60: false,
            show_ma120: false,
            show_volume: true,
        }
    }
}

impl ChartConfig {
    pub fn shows(&self, line: MaLine) -> bool {
        match line {
            MaLine::Ma5 => self.show_ma5,
            MaLine::Ma20 => self.show_ma20,
            MaLine::Ma60 => self.show_ma60,
            MaLine::Ma120 => self.show_ma120,
        }
    }

    fn flag_mut(&mut self, line: MaLine) -> &mut bool {
        match line {
            MaLine::Ma5 => &mut self.show_ma5,
            MaLine::Ma20 => &mut self.show_ma20,
            MaLine::Ma60 => &mut self.show_ma60,
            MaLine::Ma120 => &mut self.show_ma120,
        }
    }
}

/// Partial update for `ChartConfig`. `None` leaves the current value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartConfigPatch {
    pub candle_mode: Option<bool>,
    pub show_ma5: Option<bool>,
    pub show_ma20: Option<bool>,
    pub show_ma60: Option<bool>,
    pub show_ma120: Option<bool>,
    pub show_volume: Option<bool>,
}

/// Numeric defaults that seed the simulator form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyDefaults {
    pub trading_fee_rate: f64,
    pub tax_rate: f64,
    pub max_weight_per_stock: f64,
}

impl Default for StrategyDefaults {
    fn default() -> Self {
        Self {
            trading_fee_rate: 0.0015,
            tax_rate: 0.002,
            max_weight_per_stock: 0.2,
        }
    }
}

/// Client-side settings persisted between sessions.
/// Missing fields in an older state file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsStore {
    pub theme: ThemePreference,
    pub chart: ChartConfig,
    pub defaults: StrategyDefaults,
}

impl SettingsStore {
    pub fn set_theme(&mut self, theme: ThemePreference) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Theme preference: {} -> {}", self.theme, theme);
        }
        self.theme = theme;
    }

    /// `System` follows the OS preference. An unknown OS preference counts as dark.
    pub fn resolve_theme(&self, system_is_dark: Option<bool>) -> Theme {
        match self.theme {
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::Light => Theme::Light,
            ThemePreference::System => {
                if system_is_dark.unwrap_or(true) {
                    Theme::Dark
                } else {
                    Theme::Light
                }
            }
        }
    }

    pub fn set_chart_config(&mut self, patch: ChartConfigPatch) {
        let chart = &mut self.chart;
        if let Some(v) = patch.candle_mode {
            chart.candle_mode = v;
        }
        if let Some(v) = patch.show_ma5 {
            chart.show_ma5 = v;
        }
        if let Some(v) = patch.show_ma20 {
            chart.show_ma20 = v;
        }
        if let Some(v) = patch.show_ma60 {
            chart.show_ma60 = v;
        }
        if let Some(v) = patch.show_ma120 {
            chart.show_ma120 = v;
        }
        if let Some(v) = patch.show_volume {
            chart.show_volume = v;
        }
    }

    pub fn toggle_ma(&mut self, line: MaLine) {
        let flag = self.chart.flag_mut(line);
        *flag = !*flag;
    }

    pub fn set_defaults(&mut self, defaults: StrategyDefaults) {
        self.defaults = defaults;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let store = SettingsStore::default();
        assert_eq!(store.theme, ThemePreference::Dark);
        assert!(!store.chart.candle_mode);
        assert!(store.chart.show_ma5 && store.chart.show_ma20 && store.chart.show_volume);
        assert!(!store.chart.show_ma60 && !store.chart.show_ma120);
        assert!((store.defaults.trading_fee_rate - 0.0015).abs() < 1e-9);
        assert!((store.defaults.tax_rate - 0.002).abs() < 1e-9);
        assert!((store.defaults.max_weight_per_stock - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut store = SettingsStore::default();
        store.set_chart_config(ChartConfigPatch {
            candle_mode: Some(true),
            show_ma5: Some(false),
            ..Default::default()
        });
        assert!(store.chart.candle_mode);
        assert!(!store.chart.show_ma5);
        assert!(store.chart.show_ma20);
        assert!(store.chart.show_volume);
    }

    #[test]
    fn test_toggle_ma_twice_restores() {
        let mut store = SettingsStore::default();
        store.toggle_ma(MaLine::Ma60);
        assert!(store.chart.shows(MaLine::Ma60));
        store.toggle_ma(MaLine::Ma60);
        assert!(!store.chart.shows(MaLine::Ma60));
    }

    #[test]
    fn test_system_theme_resolution() {
        let mut store = SettingsStore::default();
        store.set_theme(ThemePreference::System);
        assert_eq!(store.resolve_theme(Some(false)), Theme::Light);
        assert_eq!(store.resolve_theme(Some(true)), Theme::Dark);
        assert_eq!(store.resolve_theme(None), Theme::Dark);
        store.set_theme(ThemePreference::Light);
        assert_eq!(store.resolve_theme(Some(true)), Theme::Light);
    }

    #[test]
    fn test_partial_state_file_falls_back_to_defaults() {
        let json = r#"{"theme":"Light","chart":{"candle_mode":true}}"#;
        let store: SettingsStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.theme, ThemePreference::Light);
        assert!(store.chart.candle_mode);
        assert!(store.chart.show_ma20);
        assert_eq!(store.defaults, StrategyDefaults::default());
    }
}
