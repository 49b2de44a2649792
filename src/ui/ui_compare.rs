use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{Button, DragValue, Grid, RichText, TextEdit, Ui};

use crate::analysis::{equity_curve, normalize_curve};
use crate::config::CHART_CONFIG;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::{Query, QueryState, StockApi};
use crate::domain::{
    BacktestForm, GridSearchForm, Route, join_result_ids, parse_result_ids,
};
use crate::models::{
    BacktestRequest, BacktestResult, CompareMarkers, CompareStrategiesResponse, PortfolioSnapshot,
    rank_by_sharpe,
};
use crate::ui::config::{UI_TEXT, UiColors};
use crate::ui::page::{Page, PageContext};
use crate::ui::styles::{UiStyleExt, card_frame};
use crate::ui::ui_plot_view::{EquitySeries, show_equity_chart};
use crate::ui::utils::{
    format_drawdown, format_percent, format_ratio, section_heading, spaced_separator,
};

const TOP_RANKED: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum CompareEvent {
    Navigate(Route),
}

/// Side-by-side backtest results plus the grid search optimizer
#[derive(Default)]
pub struct ComparePage {
    ids_text: String,
    ids_error: Option<String>,
    /// Set when another page asked for a comparison; fired on the next frame
    pending_ids: Option<Vec<i64>>,
    compare: Query<CompareStrategiesResponse>,
    /// Snapshot series per simulation id of the compared results
    curves: BTreeMap<i64, Query<Vec<PortfolioSnapshot>>>,

    grid: GridSearchForm,
    grid_error: Option<String>,
    base_request: Option<BacktestRequest>,
    optimize_counter: u64,
    optimize: Query<Vec<BacktestResult>>,
}

impl ComparePage {
    /// Prefills the id box and compares on the next frame.
    pub fn preselect(&mut self, result_id: i64) {
        let mut ids = parse_result_ids(&self.ids_text).unwrap_or_default();
        if !ids.contains(&result_id) {
            ids.push(result_id);
        }
        self.ids_text = ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
        self.pending_ids = Some(ids);
    }

    /// The simulator's last submitted request becomes the optimizer's base.
    pub fn set_base_request(&mut self, request: BacktestRequest) {
        self.base_request = Some(request);
    }

    fn start_compare(&mut self, api: &Arc<dyn StockApi>, ids: Vec<i64>) {
        let joined = join_result_ids(&ids);
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Comparing results [{}]", joined);
        }
        let a = Arc::clone(api);
        if self
            .compare
            .request(format!("compare/{}", joined), move || async move {
                a.compare(&ids).await
            })
        {
            self.curves.clear();
        }
    }

    fn ensure_curves(&mut self, api: &Arc<dyn StockApi>) {
        let Some(response) = self.compare.data() else {
            return;
        };
        let ids: Vec<i64> = response.results.iter().map(|r| r.simulation_id).collect();
        for id in ids {
            let a = Arc::clone(api);
            self.curves
                .entry(id)
                .or_default()
                .request(format!("snapshots/{}", id), move || async move {
                    a.snapshots(id).await
                });
        }
    }

    fn start_optimize(&mut self, ctx: &PageContext) {
        let base = match &self.base_request {
            Some(b) => Ok(b.clone()),
            None => BacktestForm::new(&ctx.settings.defaults).to_request(ctx.today),
        };
        let request = match base.and_then(|b| self.grid.to_request(b)) {
            Ok(r) => r,
            Err(e) => {
                self.grid_error = Some(e.to_string());
                return;
            }
        };
        self.grid_error = None;
        self.optimize_counter += 1;
        let a = Arc::clone(ctx.api);
        self.optimize
            .request(format!("optimize/{}", self.optimize_counter), move || async move {
                a.optimize(&request).await
            });
    }

    fn render_compare_input(&mut self, ui: &mut Ui, ctx: &PageContext) {
        let colors = ctx.colors();
        ui.horizontal(|ui| {
            let response = ui.add(
                TextEdit::singleline(&mut self.ids_text)
                    .hint_text(UI_TEXT.compare_ids_hint)
                    .desired_width(320.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(eframe::egui::Key::Enter));
            let clicked = ui
                .add_enabled(!self.compare.is_loading(), Button::new(UI_TEXT.compare_button))
                .clicked();
            if submitted || clicked {
                match parse_result_ids(&self.ids_text) {
                    Ok(ids) => {
                        self.ids_error = None;
                        self.start_compare(ctx.api, ids);
                    }
                    Err(e) => self.ids_error = Some(e.to_string()),
                }
            }
        });
        if let Some(err) = &self.ids_error {
            ui.label_error(colors, err);
        }
    }

    fn render_comparison(&self, ui: &mut Ui, ctx: &PageContext) {
        let colors = ctx.colors();
        let response = match self.compare.state() {
            QueryState::Idle => return,
            QueryState::Loading => {
                ui.spinner();
                return;
            }
            QueryState::Failed(e) => {
                let text = if e.is_not_found() { UI_TEXT.not_found } else { UI_TEXT.failed_to_load };
                ui.label_error(colors, format!("{} {}", text, e));
                return;
            }
            QueryState::Ready(r) => r,
        };
        if response.results.is_empty() {
            ui.label_subdued(colors, UI_TEXT.not_found);
            return;
        }

        Grid::new("compare_table")
            .num_columns(8)
            .striped(true)
            .spacing([28.0, 8.0])
            .show(ui, |ui| {
                for header in ["Result", "Simulation", "Return", "CAGR", "MDD", "Sharpe", "Win Rate", ""] {
                    ui.label(RichText::new(header).strong().color(colors.subdued));
                }
                ui.end_row();
                for result in &response.results {
                    result_row(ui, ctx, result);
                    marker_badges(ui, colors, response.markers_for(result));
                    ui.end_row();
                }
            });

        section_heading(ui, ctx.theme, UI_TEXT.normalized_curves_heading);
        let normalized: Vec<(i64, Vec<_>)> = response
            .results
            .iter()
            .filter_map(|r| {
                let snapshots = self.curves.get(&r.simulation_id)?.data()?;
                Some((r.id, normalize_curve(&equity_curve(snapshots))))
            })
            .collect();
        if normalized.is_empty() {
            if self.curves.values().any(Query::is_loading) {
                ui.spinner();
            } else {
                ui.label_subdued(colors, UI_TEXT.not_found);
            }
            return;
        }
        let palette = CHART_CONFIG.compare_palette;
        let series: Vec<EquitySeries> = normalized
            .iter()
            .enumerate()
            .map(|(i, (id, points))| EquitySeries {
                name: format!("Result #{}", id),
                color: palette[i % palette.len()],
                points,
            })
            .collect();
        show_equity_chart(ui, "compare_curves", &series, 1);
    }

    fn render_optimizer(&mut self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<CompareEvent>) {
        let colors = ctx.colors();
        section_heading(ui, ctx.theme, UI_TEXT.optimize_heading);

        card_frame(colors).show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label_subdued(colors, "Top N from");
                ui.add(DragValue::new(&mut self.grid.min_top_n).range(1..=200));
                ui.label_subdued(colors, "to");
                ui.add(DragValue::new(&mut self.grid.max_top_n).range(1..=200));
                ui.label_subdued(colors, "step");
                ui.add(DragValue::new(&mut self.grid.step_top_n).range(1..=50));
                ui.label_subdued(colors, "Weight step");
                ui.add(
                    DragValue::new(&mut self.grid.weight_step)
                        .speed(0.01)
                        .range(0.01..=1.0)
                        .max_decimals(2),
                );
            });
            ui.horizontal(|ui| {
                let running = self.optimize.is_loading();
                if ui
                    .add_enabled(!running, Button::new(UI_TEXT.optimize_button))
                    .clicked()
                {
                    self.start_optimize(ctx);
                }
                if running {
                    ui.spinner();
                }
                let base_note = if self.base_request.is_some() {
                    "Base: last simulator run"
                } else {
                    "Base: default simulator parameters"
                };
                ui.label_subdued(colors, base_note);
                if self.base_request.is_none() && ui.link("Open Strategy Lab").clicked() {
                    events.push(CompareEvent::Navigate(Route::Simulator));
                }
            });
            if let Some(err) = &self.grid_error {
                ui.label_error(colors, err);
            }
        });
        ui.add_space(8.0);

        match self.optimize.state() {
            QueryState::Ready(results) => {
                let ranked = rank_by_sharpe(results.clone(), TOP_RANKED);
                Grid::new("optimize_ranking")
                    .num_columns(6)
                    .striped(true)
                    .spacing([28.0, 8.0])
                    .show(ui, |ui| {
                        for header in ["Rank", "Result", "CAGR", "MDD", "Sharpe", "Trades"] {
                            ui.label(RichText::new(header).strong().color(colors.subdued));
                        }
                        ui.end_row();
                        for (rank, r) in ranked.iter().enumerate() {
                            ui.label(RichText::new(format!("#{}", rank + 1)).strong());
                            ui.label(format!("#{}", r.id));
                            ui.label(
                                RichText::new(format_percent(r.cagr.unwrap_or(0.0)))
                                    .strong()
                                    .color(colors.positive),
                            );
                            ui.label(
                                RichText::new(format_drawdown(r.mdd))
                                    .color(colors.negative),
                            );
                            ui.label(format_ratio(r.sharpe_ratio));
                            ui.label(r.total_trades.map_or("-".to_string(), |t| t.to_string()));
                            ui.end_row();
                        }
                    });
            }
            QueryState::Failed(e) => ui.label_error(colors, format!("{} {}", UI_TEXT.failed_to_load, e)),
            _ => {}
        }
    }
}

fn result_row(ui: &mut Ui, ctx: &PageContext, result: &BacktestResult) {
    let colors = ctx.colors();
    let themed = CHART_CONFIG.themed(ctx.theme);
    let signed = |v: Option<f64>| {
        let v = v.unwrap_or(0.0);
        let color = if v >= 0.0 { themed.up } else { themed.down };
        RichText::new(format_percent(v)).color(color)
    };
    ui.label(RichText::new(format!("#{}", result.id)).strong());
    ui.label(RichText::new(result.simulation_id.to_string()).color(colors.subdued));
    ui.label(signed(result.total_return));
    ui.label(signed(result.cagr).strong());
    ui.label(RichText::new(format_drawdown(result.mdd)).color(themed.down));
    ui.label(format_ratio(result.sharpe_ratio));
    ui.label(format_ratio(result.win_rate));
}

fn marker_badges(ui: &mut Ui, colors: &UiColors, markers: CompareMarkers) {
    ui.horizontal(|ui| {
        for (earned, text) in [
            (markers.best_cagr, "Best CAGR"),
            (markers.best_sharpe, "Best Sharpe"),
            (markers.lowest_mdd, "Lowest MDD"),
        ] {
            if earned {
                ui.label(RichText::new(format!("★ {}", text)).small().strong().color(colors.accent));
            }
        }
    });
}

impl Page for ComparePage {
    type Event = CompareEvent;

    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) -> Vec<Self::Event> {
        let colors = ctx.colors();
        let mut events = Vec::new();

        if let Some(ids) = self.pending_ids.take() {
            self.start_compare(ctx.api, ids);
        }
        self.ensure_curves(ctx.api);

        ui.label_header(colors, UI_TEXT.compare_heading);
        ui.label_subdued(colors, UI_TEXT.compare_subheading);
        ui.add_space(12.0);

        self.render_compare_input(ui, ctx);
        ui.add_space(8.0);
        self.render_comparison(ui, ctx);
        spaced_separator(ui);
        self.render_optimizer(ui, ctx, &mut events);
        events
    }

    fn repaint_after(&self) -> Option<Duration> {
        let busy = self.compare.is_loading()
            || self.optimize.is_loading()
            || self.curves.values().any(Query::is_loading);
        busy.then(|| Duration::from_millis(100))
    }
}
