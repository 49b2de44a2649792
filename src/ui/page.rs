use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use eframe::egui::Ui;

use crate::data::{BatchLog, StockApi};
use crate::domain::{SettingsStore, Theme};
use crate::ui::config::{UI_CONFIG, UiColors};

/// Everything a page may read while it renders. Pages never mutate shared
/// state directly; they hand events back to the app instead.
pub struct PageContext<'a> {
    pub api: &'a Arc<dyn StockApi>,
    pub settings: &'a SettingsStore,
    pub theme: Theme,
    pub batch_log: &'a BatchLog,
    /// Slots of batch jobs still waiting for the backend's answer
    pub busy_batches: &'a [String],
    pub today: NaiveDate,
}

impl PageContext<'_> {
    pub fn colors(&self) -> &'static UiColors {
        UI_CONFIG.colors(self.theme)
    }

    pub fn is_batch_busy(&self, slot: &str) -> bool {
        self.busy_batches.iter().any(|b| b == slot)
    }
}

/// Trait for pages and panels that can be rendered
pub trait Page {
    type Event;
    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) -> Vec<Self::Event>;

    /// How soon the page needs another frame while requests are outstanding.
    fn repaint_after(&self) -> Option<Duration> {
        None
    }
}
