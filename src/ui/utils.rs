use std::fmt::Display;

use eframe::egui::{ComboBox, Context, Ui, Visuals};
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::domain::Theme;
use crate::ui::config::UI_CONFIG;
use crate::ui::styles::UiStyleExt;

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context, theme: Theme) {
    let colors = UI_CONFIG.colors(theme);
    let mut visuals = match theme {
        Theme::Dark => Visuals::dark(),
        Theme::Light => Visuals::light(),
    };

    visuals.window_fill = colors.background;
    visuals.panel_fill = colors.background;
    visuals.extreme_bg_color = colors.surface;
    visuals.selection.bg_fill = colors.accent;

    // Make the widgets stand out a bit more
    visuals.widgets.noninteractive.fg_stroke.color = colors.label;
    visuals.widgets.noninteractive.bg_stroke.color = colors.border;
    visuals.widgets.inactive.fg_stroke.color = colors.label;
    visuals.widgets.hovered.fg_stroke.color = colors.heading;
    visuals.widgets.active.fg_stroke.color = colors.heading;

    ctx.set_visuals(visuals);
}

/// Creates a section heading with standard spacing
pub fn section_heading(ui: &mut Ui, theme: Theme, text: impl Into<String>) {
    ui.add_space(10.0);
    ui.label_subheader(UI_CONFIG.colors(theme), text);
    ui.add_space(5.0);
}

/// Creates a separator with standard spacing
pub fn spaced_separator(ui: &mut Ui) {
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Drop-down over every variant of a strum enum
pub fn enum_combo<T>(ui: &mut Ui, id: &str, value: &mut T)
where
    T: IntoEnumIterator + Display + PartialEq + Copy,
{
    ComboBox::from_id_salt(id)
        .selected_text(value.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for variant in T::iter() {
                ui.selectable_value(value, variant, variant.to_string());
            }
        });
}

/// Groups the integer part in threes: 12450200 -> "12,450,200"
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };
    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(",");
    let sign = if value < 0.0 && value.abs() >= 0.5 * 10f64.powi(-(decimals as i32)) {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Won, no decimals: "₩12,450,200"
pub fn format_currency(value: f64) -> String {
    let body = group_thousands(value, 0);
    match body.strip_prefix('-') {
        Some(abs) => format!("-₩{}", abs),
        None => format!("₩{}", body),
    }
}

/// Signed percentage with two decimals: "+24.50%" / "-12.40%"
pub fn format_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// Drawdown arrives as a positive percentage and is always shown as a loss.
pub fn format_drawdown(mdd: Option<f64>) -> String {
    format_percent(-mdd.unwrap_or(0.0).abs())
}

/// Large counts with separators: "2,694"
pub fn format_count(value: f64) -> String {
    group_thousands(value, 0)
}

/// Market cap in trillions of won, "-" when absent or zero
pub fn format_trillions(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{:.2}T", v / 1e12),
        _ => "-".to_string(),
    }
}

/// Ratio with up to two decimals, "-" when absent or zero
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{:.2}", v),
        _ => "-".to_string(),
    }
}

/// Percentage figure from the backend (already in percent), "-" when absent or zero
pub fn format_plain_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{:.2}%", v),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawdown_renders_as_loss() {
        assert_eq!(format_drawdown(Some(12.4)), "-12.40%");
        assert_eq!(format_drawdown(Some(-8.0)), "-8.00%");
        assert_eq!(format_percent(12.4), "+12.40%");
    }

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(12_450_200.0), "₩12,450,200");
        assert_eq!(format_currency(999.0), "₩999");
        assert_eq!(format_currency(0.0), "₩0");
        assert_eq!(format_currency(-1_500.0), "-₩1,500");
    }

    #[test]
    fn test_group_thousands_with_decimals() {
        assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn test_percent_sign() {
        assert_eq!(format_percent(24.5), "+24.50%");
        assert_eq!(format_percent(-12.4), "-12.40%");
        assert_eq!(format_percent(0.0), "+0.00%");
    }

    #[test]
    fn test_dash_fallbacks() {
        assert_eq!(format_trillions(Some(4.5e14)), "450.00T");
        assert_eq!(format_trillions(None), "-");
        assert_eq!(format_ratio(Some(0.0)), "-");
        assert_eq!(format_ratio(Some(12.345)), "12.35");
        assert_eq!(format_plain_percent(Some(2.1)), "2.10%");
        assert_eq!(format_plain_percent(None), "-");
    }
}
