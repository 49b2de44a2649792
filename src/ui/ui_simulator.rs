use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{Button, ComboBox, DragValue, Grid, RichText, ScrollArea, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::analysis::{equity_curve, latest_snapshot};
use crate::config::{API, CHART_CONFIG};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::{PollSchedule, Query, QueryState, StockApi};
use crate::domain::{BacktestForm, StrategyDefaults};
use crate::models::{
    BacktestRequest, BacktestResponse, BacktestResult, PortfolioSnapshot, SimulationStatus,
    SlippageType, StockMarket,
};
use crate::ui::config::{UI_CONFIG, UI_TEXT, UiColors};
use crate::ui::page::{Page, PageContext};
use crate::ui::styles::{UiStyleExt, card_frame};
use crate::ui::ui_plot_view::{EquitySeries, show_equity_chart};
use crate::ui::utils::{
    enum_combo, format_currency, format_drawdown, format_percent, format_ratio, group_thousands,
    section_heading,
};
use crate::utils::app_time::{AppInstant, now};
use crate::utils::time_utils::format_date;

#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorEvent {
    /// A request passed validation and was sent
    Submitted(BacktestRequest),
    /// Open the compare page with this result preselected
    Compare(i64),
}

/// Where the current run stands
#[derive(Debug, Clone, PartialEq)]
enum RunPhase {
    Idle,
    Submitting,
    Polling(i64),
    Done(i64),
    Failed(String),
}

pub struct SimulatorPage {
    form: BacktestForm,
    defaults_seen: StrategyDefaults,
    exclude_sectors_text: String,
    form_error: Option<String>,
    run_counter: u64,
    submission: Query<BacktestResponse>,
    result: Query<BacktestResult>,
    snapshots: Query<Vec<PortfolioSnapshot>>,
    poll: PollSchedule,
}

impl Default for SimulatorPage {
    fn default() -> Self {
        let defaults = StrategyDefaults::default();
        Self {
            form: BacktestForm::new(&defaults),
            defaults_seen: defaults,
            exclude_sectors_text: String::new(),
            form_error: None,
            run_counter: 0,
            submission: Query::default(),
            result: Query::default(),
            snapshots: Query::default(),
            poll: PollSchedule::new(Duration::from_millis(API.query.result_poll_interval_ms)),
        }
    }
}

impl SimulatorPage {
    fn phase(&self) -> RunPhase {
        match self.submission.state() {
            QueryState::Idle => RunPhase::Idle,
            QueryState::Loading => RunPhase::Submitting,
            QueryState::Failed(e) => RunPhase::Failed(e.to_string()),
            QueryState::Ready(resp) if resp.status == SimulationStatus::Failed => RunPhase::Failed(
                resp.message
                    .clone()
                    .unwrap_or_else(|| format!("Simulation {} failed", resp.simulation_id)),
            ),
            QueryState::Ready(resp) => {
                if self.result.data().is_some() {
                    RunPhase::Done(resp.simulation_id)
                } else {
                    RunPhase::Polling(resp.simulation_id)
                }
            }
        }
    }

    fn is_running(&self) -> bool {
        matches!(self.phase(), RunPhase::Submitting | RunPhase::Polling(_))
    }

    fn submit(&mut self, ctx: &PageContext) -> Option<BacktestRequest> {
        let request = match self.form.to_request(ctx.today) {
            Ok(r) => r,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return None;
            }
        };
        self.form_error = None;
        self.start_run(ctx.api, request.clone());
        Some(request)
    }

    /// Drops the previous run and sends `request` as a new one.
    fn start_run(&mut self, api: &Arc<dyn StockApi>, request: BacktestRequest) {
        self.run_counter += 1;
        self.result.clear();
        self.snapshots.clear();
        self.poll.reset();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Submitting backtest #{}: {:?}", self.run_counter, request.strategy_type);
        }

        let api = Arc::clone(api);
        self.submission
            .request(format!("backtest/{}", self.run_counter), move || async move {
                api.start_backtest(&request).await
            });
    }

    /// Re-asks for the result every poll interval until it exists, then loads snapshots once.
    fn advance(&mut self, api: &Arc<dyn StockApi>, at: AppInstant) {
        let simulation_id = match self.phase() {
            RunPhase::Polling(id) => id,
            RunPhase::Done(id) => {
                let a = Arc::clone(api);
                self.snapshots.request(format!("snapshots/{}", id), move || async move {
                    a.snapshots(id).await
                });
                return;
            }
            _ => return,
        };
        if self.result.is_loading() || !self.poll.due(at, false) {
            return;
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_poll_ticks {
            log::info!("Polling result for simulation {}", simulation_id);
        }

        let a = Arc::clone(api);
        let fetch = move || async move { a.backtest_result(simulation_id).await };
        let key = format!("result/{}", simulation_id);
        if self.result.key() == Some(key.as_str()) {
            self.result.refetch(fetch);
        } else {
            self.result.request(key, fetch);
        }
        self.poll.mark_fired(at);
    }

    fn render_form(&mut self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<SimulatorEvent>) {
        let colors = ctx.colors();
        ui.label_subheader(colors, UI_TEXT.parameters_heading);
        ui.add_space(8.0);

        let form = &mut self.form;
        field(ui, colors, "Strategy Type", |ui| enum_combo(ui, "strategy_type", &mut form.strategy_type));
        field(ui, colors, "Initial Capital (₩)", |ui| {
            ui.add(TextEdit::singleline(&mut form.capital_text).desired_width(f32::INFINITY));
        });
        ui.columns(2, |cols| {
            field(&mut cols[0], colors, "Start Date", |ui| {
                ui.add(TextEdit::singleline(&mut form.start_text).hint_text("yyyy-MM-dd"));
            });
            field(&mut cols[1], colors, "End Date", |ui| {
                ui.add(TextEdit::singleline(&mut form.end_text).hint_text("yyyy-MM-dd"));
            });
        });
        field(ui, colors, "Rebalancing", |ui| {
            enum_combo(ui, "rebalancing_period", &mut form.rebalancing_period)
        });
        field(ui, colors, "Slippage Model", |ui| enum_combo(ui, "slippage_type", &mut form.slippage_type));
        if form.slippage_type == SlippageType::Fixed {
            field(ui, colors, "Fixed Slippage Rate", |ui| {
                ui.add(DragValue::new(&mut form.fixed_slippage_rate).speed(0.0005).range(0.0..=0.05).max_decimals(4));
            });
        }
        ui.columns(3, |cols| {
            field(&mut cols[0], colors, "Fee", |ui| {
                ui.add(DragValue::new(&mut form.trading_fee_rate).speed(0.0001).range(0.0..=1.0).max_decimals(4));
            });
            field(&mut cols[1], colors, "Tax", |ui| {
                ui.add(DragValue::new(&mut form.tax_rate).speed(0.0001).range(0.0..=1.0).max_decimals(4));
            });
            field(&mut cols[2], colors, "Max Weight", |ui| {
                ui.add(DragValue::new(&mut form.max_weight_per_stock).speed(0.01).range(0.01..=1.0).max_decimals(2));
            });
        });

        ui.collapsing("Universe Filter", |ui| {
            let market = &mut form.universe_filter.market;
            ComboBox::from_id_salt("universe_market")
                .selected_text(market.map_or("All Markets".to_string(), |m| m.to_string()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(market, None, "All Markets");
                    for m in StockMarket::iter() {
                        ui.selectable_value(market, Some(m), m.to_string());
                    }
                });
            ui.label_subdued(colors, "Exclude sectors (comma separated)");
            if ui.text_edit_singleline(&mut self.exclude_sectors_text).changed() {
                form.universe_filter.exclude_sectors = self
                    .exclude_sectors_text
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
        });

        ui.add_space(12.0);
        let running = self.is_running();
        let label = if running { UI_TEXT.running_backtest } else { UI_TEXT.run_backtest };
        let button = Button::new(RichText::new(label).strong().color(colors.background))
            .fill(colors.accent)
            .min_size([ui.available_width(), 40.0].into());
        if ui.add_enabled(!running, button).clicked()
            && let Some(request) = self.submit(ctx)
        {
            events.push(SimulatorEvent::Submitted(request));
        }
        if running {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label_subdued(colors, UI_TEXT.waiting_for_result);
            });
        }
        if let Some(err) = &self.form_error {
            ui.label_error(colors, err);
        }
    }

    fn render_results(&self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<SimulatorEvent>) {
        let colors = ctx.colors();
        let themed = CHART_CONFIG.themed(ctx.theme);

        match self.phase() {
            RunPhase::Failed(message) => {
                ui.label_error(colors, message);
                return;
            }
            RunPhase::Idle => {
                ui.label_subdued(colors, "Configure parameters and run a backtest.");
                return;
            }
            RunPhase::Submitting | RunPhase::Polling(_) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label_subdued(colors, UI_TEXT.waiting_for_result);
                });
                return;
            }
            RunPhase::Done(_) => {}
        }
        let Some(result) = self.result.data() else {
            return;
        };

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 32.0;
            ui.vertical(|ui| {
                ui.label(RichText::new(UI_TEXT.final_value).color(colors.subdued));
                ui.label(
                    RichText::new(format_currency(result.final_value.unwrap_or(0.0)))
                        .size(40.0)
                        .strong()
                        .color(colors.heading),
                );
            });
            let cagr = result.cagr.unwrap_or(0.0);
            ui.kpi(colors, "CAGR", &format_percent(cagr), if cagr >= 0.0 { themed.up } else { themed.down });
            ui.kpi(colors, "MDD", &format_drawdown(result.mdd), themed.down);
            ui.kpi(colors, "Sharpe", &format_ratio(result.sharpe_ratio), colors.heading);
            if ui.button("Compare →").clicked() {
                events.push(SimulatorEvent::Compare(result.id));
            }
        });
        ui.horizontal(|ui| {
            ui.metric(colors, "Volatility", &format_ratio(result.volatility), colors.label);
            ui.metric(colors, "Win Rate", &format_ratio(result.win_rate), colors.label);
            let trades = result.total_trades.map_or("-".to_string(), |t| t.to_string());
            ui.metric(colors, "Trades", &trades, colors.label);
        });

        section_heading(ui, ctx.theme, UI_TEXT.portfolio_value_heading);
        match self.snapshots.state() {
            QueryState::Ready(snapshots) => {
                let curve = equity_curve(snapshots);
                show_equity_chart(
                    ui,
                    "portfolio_value",
                    &[EquitySeries {
                        name: "Portfolio".to_string(),
                        color: CHART_CONFIG.portfolio_color,
                        points: &curve,
                    }],
                    0,
                );
                render_holdings(ui, ctx, snapshots);
            }
            QueryState::Failed(e) => ui.label_error(colors, format!("{} {}", UI_TEXT.failed_to_load, e)),
            _ => {
                ui.spinner();
            }
        }
    }
}

fn field(ui: &mut Ui, colors: &UiColors, label: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.label(RichText::new(label).small().color(colors.subdued));
    add_contents(ui);
    ui.add_space(6.0);
}

fn render_holdings(ui: &mut Ui, ctx: &PageContext, snapshots: &[PortfolioSnapshot]) {
    let colors = ctx.colors();
    let Some(latest) = latest_snapshot(snapshots) else {
        return;
    };
    section_heading(
        ui,
        ctx.theme,
        format!("{} ({})", UI_TEXT.holdings_heading, format_date(latest.snapshot_date)),
    );
    ui.metric(
        colors,
        "Cash",
        &format_currency(latest.cash_balance.unwrap_or(0.0)),
        colors.label,
    );
    let holdings = latest.parsed_holdings();
    if holdings.is_empty() {
        ui.label_subdued(colors, UI_TEXT.no_holdings);
        return;
    }
    ScrollArea::vertical()
        .id_salt("holdings_table")
        .max_height(300.0)
        .show(ui, |ui| {
            Grid::new("holdings_grid")
                .num_columns(5)
                .striped(true)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    for header in ["Code", "Qty", "Avg Price", "Price", "Value"] {
                        ui.label(RichText::new(header).strong().color(colors.subdued));
                    }
                    ui.end_row();
                    for h in &holdings {
                        ui.label(h.stock_code.as_deref().unwrap_or("-"));
                        ui.label(h.quantity.map_or("-".to_string(), |q| group_thousands(q as f64, 0)));
                        ui.label(format_currency(h.average_price.unwrap_or(0.0)));
                        ui.label(format_currency(h.current_price.unwrap_or(0.0)));
                        ui.label(format_currency(h.market_value.unwrap_or(0.0)));
                        ui.end_row();
                    }
                });
        });
}

impl Page for SimulatorPage {
    type Event = SimulatorEvent;

    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) -> Vec<Self::Event> {
        let colors = ctx.colors();
        let mut events = Vec::new();

        if self.defaults_seen != ctx.settings.defaults {
            self.defaults_seen = ctx.settings.defaults;
            self.form.apply_defaults(&self.defaults_seen);
        }
        self.advance(ctx.api, now());

        ui.label_header(colors, UI_TEXT.simulator_heading);
        ui.add_space(12.0);
        ui.horizontal_top(|ui| {
            ui.allocate_ui([UI_CONFIG.sidebar_width + 120.0, ui.available_height()].into(), |ui| {
                card_frame(colors).show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("simulator_form")
                        .show(ui, |ui| self.render_form(ui, ctx, &mut events));
                });
            });
            ui.add_space(16.0);
            ui.vertical(|ui| {
                ScrollArea::vertical()
                    .id_salt("simulator_results")
                    .show(ui, |ui| self.render_results(ui, ctx, &mut events));
            });
        });
        events
    }

    fn repaint_after(&self) -> Option<Duration> {
        match self.phase() {
            RunPhase::Submitting => Some(Duration::from_millis(100)),
            RunPhase::Polling(_) if self.result.is_loading() => Some(Duration::from_millis(100)),
            RunPhase::Polling(_) => Some(self.poll.time_until_due(now())),
            RunPhase::Done(_) if self.snapshots.is_loading() => Some(Duration::from_millis(100)),
            _ => None,
        }
    }
}
