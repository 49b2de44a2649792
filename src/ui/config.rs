use eframe::egui::Color32;

use crate::domain::Theme;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub background: Color32,
    pub surface: Color32,
    pub side_panel: Color32,
    pub border: Color32,
    pub label: Color32,
    pub subdued: Color32,
    pub heading: Color32,
    pub accent: Color32,
    pub positive: Color32,
    pub negative: Color32,
    pub warning: Color32,
    pub secondary_accent: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Clone, Copy)]
pub struct UiConfig {
    pub dark: UiColors,
    pub light: UiColors,
    pub sidebar_width: f32,
    pub page_max_width: f32,
    pub card_rounding: u8,
    pub search_results_max_height: f32,
}

impl UiConfig {
    pub fn colors(&self, theme: Theme) -> &UiColors {
        match theme {
            Theme::Dark => &self.dark,
            Theme::Light => &self.light,
        }
    }
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    dark: UiColors {
        background: Color32::from_rgb(0x00, 0x00, 0x00),
        surface: Color32::from_rgb(0x11, 0x11, 0x11),
        side_panel: Color32::from_rgb(0x0A, 0x0A, 0x0A),
        border: Color32::from_rgb(0x2C, 0x2C, 0x2E),
        label: Color32::from_rgb(0xE5, 0xE5, 0xE7),
        subdued: Color32::from_rgb(0x8E, 0x8E, 0x93),
        heading: Color32::WHITE,
        accent: Color32::from_rgb(0x00, 0xC8, 0x05),
        positive: Color32::from_rgb(0x00, 0xC8, 0x05),
        negative: Color32::from_rgb(0xFF, 0x50, 0x00),
        warning: Color32::from_rgb(0xF5, 0x9E, 0x0B),
        secondary_accent: Color32::from_rgb(0x3B, 0x82, 0xF6),
    },
    light: UiColors {
        background: Color32::from_rgb(0xFF, 0xFF, 0xFF),
        surface: Color32::from_rgb(0xF4, 0xF4, 0xF5),
        side_panel: Color32::from_rgb(0xFA, 0xFA, 0xFA),
        border: Color32::from_rgb(0xE4, 0xE4, 0xE7),
        label: Color32::from_rgb(0x27, 0x27, 0x2A),
        subdued: Color32::from_rgb(0x71, 0x71, 0x7A),
        heading: Color32::BLACK,
        accent: Color32::from_rgb(0x16, 0xA3, 0x4A),
        positive: Color32::from_rgb(0x16, 0xA3, 0x4A),
        negative: Color32::from_rgb(0xDC, 0x26, 0x26),
        warning: Color32::from_rgb(0xD9, 0x77, 0x06),
        secondary_accent: Color32::from_rgb(0x25, 0x63, 0xEB),
    },
    sidebar_width: 200.0,
    page_max_width: 1100.0,
    card_rounding: 12,
    search_results_max_height: 320.0,
};
