use eframe::egui::{Color32, Frame, Margin, RichText, Stroke, Ui};

use crate::ui::config::{UI_CONFIG, UiColors};

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
/// Colors come from the palette the current visuals were built from.
pub trait UiStyleExt {
    /// Renders small, gray text (good for captions like "CAGR").
    fn label_subdued(&mut self, colors: &UiColors, text: impl Into<String>);

    /// Renders a "Label: Value" pair with consistent spacing and styling.
    /// The label is subdued, the value is colored.
    fn metric(&mut self, colors: &UiColors, label: &str, value: &str, color: Color32);

    /// Renders a page header.
    fn label_header(&mut self, colors: &UiColors, text: impl Into<String>);

    /// Renders a section header inside a page.
    fn label_subheader(&mut self, colors: &UiColors, text: impl Into<String>);

    /// Renders an error message.
    fn label_error(&mut self, colors: &UiColors, text: impl Into<String>);

    /// Renders a warning/info message.
    fn label_warning(&mut self, colors: &UiColors, text: impl Into<String>);

    /// A big KPI value with a caption above it.
    fn kpi(&mut self, colors: &UiColors, caption: &str, value: &str, color: Color32);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, colors: &UiColors, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(colors.subdued));
    }

    fn metric(&mut self, colors: &UiColors, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            ui.label_subdued(colors, format!("{}:", label));
            ui.label(RichText::new(value).small().strong().color(color));
        });
    }

    fn label_header(&mut self, colors: &UiColors, text: impl Into<String>) {
        self.heading(RichText::new(text).size(28.0).strong().color(colors.heading));
    }

    fn label_subheader(&mut self, colors: &UiColors, text: impl Into<String>) {
        self.label(RichText::new(text).size(18.0).strong().color(colors.heading));
    }

    fn label_error(&mut self, colors: &UiColors, text: impl Into<String>) {
        self.label(RichText::new(text).color(colors.negative));
    }

    fn label_warning(&mut self, colors: &UiColors, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(colors.warning));
    }

    fn kpi(&mut self, colors: &UiColors, caption: &str, value: &str, color: Color32) {
        self.vertical(|ui| {
            ui.label(RichText::new(caption).color(colors.subdued));
            ui.label(RichText::new(value).size(26.0).strong().color(color));
        });
    }
}

/// Rounded surface used for stat cards and page sections
pub fn card_frame(colors: &UiColors) -> Frame {
    Frame::new()
        .fill(colors.surface)
        .stroke(Stroke::new(1.0, colors.border))
        .corner_radius(UI_CONFIG.card_rounding)
        .inner_margin(Margin::same(16))
}
