use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{Color32, Grid, RichText, Ui};

use crate::data::{ApiError, Query, QueryState, StockApi};
use crate::domain::Route;
use crate::models::{DashboardSummary, ServiceInfo};
use crate::ui::config::{UI_TEXT, UiColors};
use crate::ui::page::{Page, PageContext};
use crate::ui::styles::{UiStyleExt, card_frame};
use crate::ui::utils::{format_count, format_drawdown, format_percent, section_heading};

#[derive(Debug, Clone, PartialEq)]
pub enum HomeEvent {
    Navigate(Route),
}

/// Overview: headline stats, best strategies and this session's batch events
#[derive(Default)]
pub struct HomePage {
    summary: Query<DashboardSummary>,
    universe: Query<u64>,
    verification: Query<f64>,
    gateway: Query<ServiceInfo>,
}

impl HomePage {
    fn ensure_queries(&mut self, api: &Arc<dyn StockApi>) {
        let a = Arc::clone(api);
        self.summary
            .request("summary", move || async move { a.dashboard_summary().await });
        let a = Arc::clone(api);
        self.universe
            .request("universe", move || async move { a.universe_count().await });
        let a = Arc::clone(api);
        self.verification.request("verification", move || async move {
            a.verification_rate().await
        });
        let a = Arc::clone(api);
        self.gateway
            .request("gateway", move || async move { a.service_info().await });
    }

    /// Summary figure first, the dedicated endpoint as fallback
    fn universe_text(&self) -> String {
        let from_summary = self
            .summary
            .data()
            .and_then(|s| s.total_universe_count)
            .filter(|c| *c > 0);
        match from_summary.or_else(|| self.universe.data().copied()) {
            Some(count) => format_count(count as f64),
            None => loading_or_dash(self.universe.is_loading()),
        }
    }

    fn verification_text(&self) -> String {
        let rate = self
            .summary
            .data()
            .and_then(|s| s.data_verification_rate)
            .or_else(|| self.verification.data().copied());
        match rate {
            Some(r) => format!("{:.1}%", r),
            None => loading_or_dash(self.verification.is_loading()),
        }
    }

    fn render_stat_cards(&self, ui: &mut Ui, colors: &UiColors) {
        let avg_return = self.summary.data().and_then(|s| s.avg_return_ytd);
        let (return_text, return_color) = match avg_return {
            Some(r) => (
                format_percent(r),
                if r >= 0.0 { colors.positive } else { colors.negative },
            ),
            None => (loading_or_dash(self.summary.is_loading()), colors.heading),
        };
        let strategy_count = self.summary.data().map_or(0, |s| s.top_strategies.len());

        let (status_text, status_sub, status_color) = match self.gateway.state() {
            QueryState::Ready(info) => (
                "Healthy".to_string(),
                format!(
                    "{} {}",
                    info.service_name.as_deref().unwrap_or("gateway"),
                    info.version.as_deref().unwrap_or("")
                ),
                colors.positive,
            ),
            QueryState::Failed(e) => ("Unreachable".to_string(), e.to_string(), colors.negative),
            _ => (UI_TEXT.loading.to_string(), String::new(), colors.subdued),
        };

        ui.columns(4, |cols| {
            stat_card(
                &mut cols[0],
                colors,
                UI_TEXT.stat_avg_return,
                &return_text,
                return_color,
                &format!("Across {} strategies", strategy_count),
            );
            stat_card(
                &mut cols[1],
                colors,
                UI_TEXT.stat_universe,
                &self.universe_text(),
                colors.heading,
                UI_TEXT.stat_universe_sub,
            );
            stat_card(
                &mut cols[2],
                colors,
                UI_TEXT.stat_verification,
                &self.verification_text(),
                colors.heading,
                UI_TEXT.stat_verification_sub,
            );
            stat_card(
                &mut cols[3],
                colors,
                UI_TEXT.stat_system,
                &status_text,
                status_color,
                &status_sub,
            );
        });
    }

    fn render_top_strategies(&self, ui: &mut Ui, ctx: &PageContext) -> Vec<HomeEvent> {
        let colors = ctx.colors();
        let mut events = Vec::new();
        section_heading(ui, ctx.theme, UI_TEXT.top_strategies_heading);
        match self.summary.state() {
            QueryState::Idle | QueryState::Loading => {
                ui.spinner();
            }
            QueryState::Failed(e) => ui.label_error(colors, failure_text(e)),
            QueryState::Ready(summary) if summary.top_strategies.is_empty() => {
                ui.label_subdued(colors, UI_TEXT.top_strategies_empty);
                if ui.button("Open Strategy Lab").clicked() {
                    events.push(HomeEvent::Navigate(Route::Simulator));
                }
            }
            QueryState::Ready(summary) => {
                Grid::new("top_strategies")
                    .num_columns(3)
                    .striped(true)
                    .spacing([24.0, 10.0])
                    .show(ui, |ui| {
                        ui.label_subdued(colors, "Strategy");
                        ui.label_subdued(colors, "CAGR");
                        ui.label_subdued(colors, "MDD");
                        ui.end_row();
                        for s in &summary.top_strategies {
                            ui.label(RichText::new(s.name.as_deref().unwrap_or("-")).strong());
                            ui.label(
                                RichText::new(format_percent(s.cagr.unwrap_or(0.0)))
                                    .strong()
                                    .color(colors.positive),
                            );
                            ui.label(
                                RichText::new(format_drawdown(s.mdd))
                                    .color(colors.negative),
                            );
                            ui.end_row();
                        }
                    });
            }
        }
        events
    }

    fn render_system_events(&self, ui: &mut Ui, ctx: &PageContext) {
        let colors = ctx.colors();
        section_heading(ui, ctx.theme, UI_TEXT.system_events_heading);
        if ctx.batch_log.is_empty() {
            ui.label_subdued(colors, UI_TEXT.system_events_empty);
            return;
        }
        for event in ctx.batch_log.iter() {
            let (dot, detail) = match &event.outcome {
                Ok(msg) => (colors.positive, msg.trim().to_string()),
                Err(e) => (colors.negative, e.clone()),
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(dot));
                ui.vertical(|ui| {
                    ui.label(RichText::new(&event.label).strong());
                    ui.label_subdued(
                        colors,
                        format!("{}  {}", event.at.format("%H:%M:%S"), detail),
                    );
                });
            });
            ui.add_space(6.0);
        }
    }
}

fn loading_or_dash(loading: bool) -> String {
    let text = if loading { "…" } else { "-" };
    text.to_string()
}

fn failure_text(e: &ApiError) -> &'static str {
    if e.is_not_found() {
        UI_TEXT.not_found
    } else {
        UI_TEXT.failed_to_load
    }
}

fn stat_card(ui: &mut Ui, colors: &UiColors, title: &str, value: &str, color: Color32, sub: &str) {
    card_frame(colors).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).color(colors.subdued));
        ui.label(RichText::new(value).size(28.0).strong().color(color));
        ui.label_subdued(colors, sub);
    });
}

impl Page for HomePage {
    type Event = HomeEvent;

    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) -> Vec<Self::Event> {
        self.ensure_queries(ctx.api);
        let colors = ctx.colors();

        ui.label_header(colors, UI_TEXT.home_heading);
        ui.label_subdued(colors, UI_TEXT.home_subheading);
        ui.add_space(16.0);

        self.render_stat_cards(ui, colors);
        ui.add_space(16.0);

        let mut events = Vec::new();
        ui.columns(2, |cols| {
            card_frame(colors).show(&mut cols[0], |ui| {
                ui.set_min_width(ui.available_width());
                events.extend(self.render_top_strategies(ui, ctx));
            });
            card_frame(colors).show(&mut cols[1], |ui| {
                ui.set_min_width(ui.available_width());
                self.render_system_events(ui, ctx);
            });
        });
        events
    }

    fn repaint_after(&self) -> Option<Duration> {
        let busy = self.summary.is_loading()
            || self.universe.is_loading()
            || self.verification.is_loading()
            || self.gateway.is_loading();
        busy.then(|| Duration::from_millis(100))
    }
}
