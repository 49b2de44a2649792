use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Button, Frame, Key, RichText, ScrollArea, TextEdit, Ui};

use crate::config::API;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::{Query, QueryState, StockApi};
use crate::domain::{Route, nav_items};
use crate::models::CorpSearchHit;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::page::{Page, PageContext};
use crate::ui::styles::UiStyleExt;

/// Sidebar: brand plus one entry per navigation item
pub fn render_nav(ui: &mut Ui, ctx: &PageContext, current: &Route) -> Option<Route> {
    let colors = ctx.colors();
    let mut target = None;

    ui.add_space(16.0);
    ui.label(
        RichText::new(UI_TEXT.brand)
            .size(22.0)
            .strong()
            .color(colors.accent),
    );
    ui.label_subdued(colors, UI_TEXT.brand_subtitle);
    ui.add_space(24.0);

    for item in nav_items() {
        let active = item.is_active(current);
        let text = RichText::new(item.label).size(15.0).strong();
        let text = if active {
            text.color(colors.accent)
        } else {
            text.color(colors.subdued)
        };
        let button = Button::selectable(active, text).min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add(button).clicked() && !active {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions {
                log::info!("Navigate: {} -> {}", current.path(), item.route.path());
            }
            target = Some(item.route.clone());
        }
        ui.add_space(2.0);
    }
    target
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Navigate(Route),
}

/// Header search box. Queries the corp index once the text is long enough.
#[derive(Default)]
pub struct SearchBox {
    text: String,
    open: bool,
    results: Query<Vec<CorpSearchHit>>,
}

impl SearchBox {
    fn trimmed(&self) -> &str {
        self.text.trim()
    }

    fn should_query(&self) -> bool {
        self.trimmed().chars().count() >= API.query.search_min_chars
    }

    fn ensure_query(&mut self, api: &Arc<dyn StockApi>) {
        if !self.should_query() {
            return;
        }
        let term = self.trimmed().to_string();
        let api = Arc::clone(api);
        self.results.request(format!("search/{}", term), move || async move {
            api.search_corps(&term).await
        });
    }

    fn select(&mut self, symbol: String) -> SearchEvent {
        self.text.clear();
        self.open = false;
        self.results.clear();
        SearchEvent::Navigate(Route::Stock(symbol))
    }

    fn render_results(&mut self, ui: &mut Ui, ctx: &PageContext) -> Option<SearchEvent> {
        let colors = ctx.colors();
        let mut picked = None;
        Frame::popup(ui.style()).show(ui, |ui| {
            ui.set_min_width(360.0);
            match self.results.state() {
                QueryState::Idle | QueryState::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label_subdued(colors, UI_TEXT.loading);
                    });
                }
                QueryState::Failed(_) => {
                    ui.label_error(colors, UI_TEXT.failed_to_load);
                }
                QueryState::Ready(hits) if hits.is_empty() => {
                    ui.label_subdued(colors, UI_TEXT.search_no_results);
                }
                QueryState::Ready(hits) => {
                    ScrollArea::vertical()
                        .id_salt("search_results")
                        .max_height(UI_CONFIG.search_results_max_height)
                        .show(ui, |ui| {
                            for hit in hits {
                                let Some(symbol) = hit.symbol() else {
                                    continue;
                                };
                                let name = hit.corp_name.as_deref().unwrap_or(&symbol);
                                let market = hit.market.as_deref().unwrap_or("-");
                                let row = ui.add(
                                    Button::new(
                                        RichText::new(format!("{}   {} · {}", name, symbol, market))
                                            .strong(),
                                    )
                                    .frame(false)
                                    .min_size(egui::vec2(ui.available_width(), 28.0)),
                                );
                                if row.clicked() {
                                    picked = Some(symbol.clone());
                                }
                            }
                        });
                }
            }
        });
        picked.map(|symbol| self.select(symbol))
    }
}

impl Page for SearchBox {
    type Event = SearchEvent;

    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) -> Vec<Self::Event> {
        let mut events = Vec::new();

        let response = ui.add(
            TextEdit::singleline(&mut self.text)
                .hint_text(UI_TEXT.search_hint)
                .desired_width(360.0),
        );
        if response.changed() || response.gained_focus() {
            self.open = true;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Escape)) {
            self.open = false;
        }

        self.ensure_query(ctx.api);

        // Enter jumps to the first hit
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            let first = self
                .results
                .data()
                .and_then(|hits| hits.iter().find_map(CorpSearchHit::symbol));
            if let Some(symbol) = first {
                events.push(self.select(symbol));
            }
        }

        if self.open && self.should_query() {
            if let Some(event) = self.render_results(ui, ctx) {
                events.push(event);
            }
        }
        events
    }

    fn repaint_after(&self) -> Option<Duration> {
        self.results.is_loading().then(|| Duration::from_millis(100))
    }
}
