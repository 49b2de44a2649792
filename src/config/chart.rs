//! Chart visualization configuration

use eframe::egui::Color32;

use crate::domain::Theme;

/// Up/down colors that change with the active theme
pub struct ThemedColors {
    pub up: Color32,
    pub down: Color32,
}

/// One moving-average overlay
pub struct MaStyle {
    pub period: usize,
    pub color: Color32,
}

pub struct ChartStyle {
    pub dark: ThemedColors,
    pub light: ThemedColors,
    /// MA5, MA20, MA60, MA120 in that order
    pub ma_styles: [MaStyle; 4],
    /// Snapshot / equity curves on the simulator and compare pages
    pub portfolio_color: Color32,
    pub compare_palette: &'static [Color32],
    pub price_chart_height: f32,
    pub volume_chart_height: f32,
    pub equity_chart_height: f32,
    pub price_line_width: f32,
    pub ma_line_width: f32,
    /// Candle body width as a fraction of one bar slot
    pub candle_width: f64,
}

impl ChartStyle {
    pub fn themed(&self, theme: Theme) -> &ThemedColors {
        match theme {
            Theme::Dark => &self.dark,
            Theme::Light => &self.light,
        }
    }
}

pub static CHART_CONFIG: ChartStyle = ChartStyle {
    dark: ThemedColors {
        up: Color32::from_rgb(0x00, 0xC8, 0x05),
        down: Color32::from_rgb(0xFF, 0x50, 0x00),
    },
    light: ThemedColors {
        up: Color32::from_rgb(0x16, 0xA3, 0x4A),
        down: Color32::from_rgb(0xDC, 0x26, 0x26),
    },
    ma_styles: [
        MaStyle {
            period: 5,
            color: Color32::from_rgb(0x3B, 0x82, 0xF6), // Blue
        },
        MaStyle {
            period: 20,
            color: Color32::from_rgb(0xF5, 0x9E, 0x0B), // Amber
        },
        MaStyle {
            period: 60,
            color: Color32::from_rgb(0x8B, 0x5C, 0xF6), // Purple
        },
        MaStyle {
            period: 120,
            color: Color32::from_rgb(0xEC, 0x48, 0x99), // Pink
        },
    ],
    portfolio_color: Color32::from_rgb(0x00, 0xC8, 0x05),
    compare_palette: &[
        Color32::from_rgb(0x00, 0xC8, 0x05),
        Color32::from_rgb(0x3B, 0x82, 0xF6),
        Color32::from_rgb(0x8B, 0x5C, 0xF6),
        Color32::from_rgb(0xF5, 0x9E, 0x0B),
        Color32::from_rgb(0xEC, 0x48, 0x99),
    ],
    price_chart_height: 450.0,
    volume_chart_height: 90.0,
    equity_chart_height: 400.0,
    price_line_width: 3.0,
    ma_line_width: 2.0,
    candle_width: 0.7,
};
