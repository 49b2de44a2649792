use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{Button, Grid, RichText, Ui};
use strum::IntoEnumIterator;

use crate::analysis::price_change;
use crate::config::CHART_CONFIG;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::{Query, StockApi};
use crate::domain::{ChartConfigPatch, Lookback, MaLine, PriceBar, Timeframe};
use crate::models::{CorpDetail, FinanceSummary, records_to_bars};
use crate::ui::config::{UI_TEXT, UiColors};
use crate::ui::page::{Page, PageContext};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::{
    format_count, format_currency, format_percent, format_plain_percent, format_ratio,
    format_trillions, section_heading, spaced_separator,
};

#[derive(Debug, Clone, PartialEq)]
pub enum StockEvent {
    ChartConfig(ChartConfigPatch),
    ToggleMa(MaLine),
}

/// Quote, chart, statistics and profile for one symbol
#[derive(Default)]
pub struct StockPage {
    symbol: String,
    timeframe: Timeframe,
    lookback: Lookback,
    corp: Query<CorpDetail>,
    prices: Query<Vec<PriceBar>>,
    finance: Query<FinanceSummary>,
    /// Bumped by the refresh button so the chart cache sees new data
    price_generation: u64,
    plot_view: PlotView,
}

impl StockPage {
    pub fn show_symbol(&mut self, symbol: &str) {
        if self.symbol != symbol {
            self.symbol = symbol.to_string();
            self.plot_view.clear_cache();
        }
    }

    fn prices_key(&self) -> String {
        format!("prices/{}/{}", self.symbol, self.lookback.days())
    }

    fn ensure_queries(&mut self, api: &Arc<dyn StockApi>) {
        if self.symbol.is_empty() {
            return;
        }
        let symbol = self.symbol.clone();

        let (a, s) = (Arc::clone(api), symbol.clone());
        self.corp
            .request(format!("corp/{}", symbol), move || async move { a.corp_detail(&s).await });

        let (a, s) = (Arc::clone(api), symbol.clone());
        self.finance.request(format!("finance/{}", symbol), move || async move {
            a.finance_summary(&s).await
        });

        let key = self.prices_key();
        let (a, s, days) = (Arc::clone(api), symbol, self.lookback.days());
        self.prices.request(key, move || async move {
            a.price_history(&s, Some(days))
                .await
                .map(|records| records_to_bars(&records))
        });
    }

    fn refetch_all(&mut self, api: &Arc<dyn StockApi>) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Manual refetch for {}", self.symbol);
        }
        let symbol = self.symbol.clone();
        let (a, s) = (Arc::clone(api), symbol.clone());
        self.corp.refetch(move || async move { a.corp_detail(&s).await });
        let (a, s) = (Arc::clone(api), symbol.clone());
        self.finance
            .refetch(move || async move { a.finance_summary(&s).await });
        let (a, s, days) = (Arc::clone(api), symbol, self.lookback.days());
        self.prices.refetch(move || async move {
            a.price_history(&s, Some(days))
                .await
                .map(|records| records_to_bars(&records))
        });
        self.price_generation += 1;
    }

    fn render_hero(&self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<StockEvent>) -> bool {
        let colors = ctx.colors();
        let corp = self.corp.data();
        let mut refetch = false;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                let name = corp
                    .and_then(|c| c.corp_name.as_deref())
                    .unwrap_or(&self.symbol);
                ui.label_header(colors, name);
                let market = corp.and_then(|c| c.market.as_deref()).unwrap_or("-");
                ui.label(
                    RichText::new(format!("{} · {}", market, self.symbol))
                        .strong()
                        .color(colors.subdued),
                );
            });
            ui.with_layout(
                eframe::egui::Layout::right_to_left(eframe::egui::Align::TOP),
                |ui| {
                    if ui.button(UI_TEXT.refetch).clicked() {
                        refetch = true;
                    }
                    let candle_mode = ctx.settings.chart.candle_mode;
                    if ui
                        .add(Button::selectable(candle_mode, UI_TEXT.candle_toggle))
                        .clicked()
                    {
                        events.push(StockEvent::ChartConfig(ChartConfigPatch {
                            candle_mode: Some(!candle_mode),
                            ..Default::default()
                        }));
                    }
                },
            );
        });
        refetch
    }

    fn render_toolbar(&mut self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<StockEvent>) {
        let colors = ctx.colors();
        ui.horizontal_wrapped(|ui| {
            for tf in Timeframe::iter() {
                if ui
                    .add(Button::selectable(self.timeframe == tf, tf.to_string()))
                    .clicked()
                {
                    self.timeframe = tf;
                }
            }
            ui.separator();
            for lb in Lookback::iter() {
                if ui
                    .add(Button::selectable(self.lookback == lb, lb.to_string()))
                    .clicked()
                {
                    self.lookback = lb;
                }
            }
            ui.separator();
            for (line, style) in MaLine::iter().zip(CHART_CONFIG.ma_styles.iter()) {
                let on = ctx.settings.chart.shows(line);
                let text = RichText::new(line.to_string()).small().strong();
                let text = if on { text.color(style.color) } else { text.color(colors.subdued) };
                if ui.add(Button::selectable(on, text)).clicked() {
                    events.push(StockEvent::ToggleMa(line));
                }
            }
            ui.separator();
            let show_volume = ctx.settings.chart.show_volume;
            if ui
                .add(Button::selectable(show_volume, UI_TEXT.volume_toggle))
                .clicked()
            {
                events.push(StockEvent::ChartConfig(ChartConfigPatch {
                    show_volume: Some(!show_volume),
                    ..Default::default()
                }));
            }
        });
    }

    fn render_key_stats(&self, ui: &mut Ui, ctx: &PageContext) {
        let colors = ctx.colors();
        section_heading(ui, ctx.theme, UI_TEXT.key_statistics);

        let corp = self.corp.data();
        let finance = self.finance.data();
        let avg_volume = match corp.and_then(|c| c.avg_volume) {
            Some(v) if v != 0.0 => format_count(v),
            _ => "-".to_string(),
        };
        let stats = [
            ("Market Cap", format_trillions(finance.and_then(|f| f.market_cap))),
            ("Price-Earnings Ratio", format_ratio(finance.and_then(|f| f.per))),
            ("Dividend Yield", format_plain_percent(finance.and_then(|f| f.dividend_yield))),
            ("Average Volume", avg_volume),
            ("52 Week High", format_currency(corp.and_then(|c| c.high_52w).unwrap_or(0.0))),
            ("52 Week Low", format_currency(corp.and_then(|c| c.low_52w).unwrap_or(0.0))),
            ("ROE", format_plain_percent(finance.and_then(|f| f.roe))),
            ("PBR", format_ratio(finance.and_then(|f| f.pbr))),
        ];

        Grid::new("key_stats")
            .num_columns(4)
            .spacing([48.0, 16.0])
            .show(ui, |ui| {
                for (i, (label, value)) in stats.iter().enumerate() {
                    stat_cell(ui, colors, label, value);
                    if i % 4 == 3 {
                        ui.end_row();
                    }
                }
            });
    }

    fn render_about(&self, ui: &mut Ui, ctx: &PageContext) {
        let colors = ctx.colors();
        section_heading(ui, ctx.theme, UI_TEXT.about_heading);
        let corp = self.corp.data();
        let description = corp
            .and_then(|c| c.description.as_deref())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(UI_TEXT.no_description);
        ui.label(RichText::new(description).color(colors.label));
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            for tag in [
                corp.and_then(|c| c.sector.as_deref()),
                corp.and_then(|c| c.corp_type.as_deref()),
            ]
            .into_iter()
            .flatten()
            {
                ui.label(RichText::new(tag).small().strong().color(colors.subdued));
            }
        });
    }
}

fn stat_cell(ui: &mut Ui, colors: &UiColors, label: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).strong().color(colors.subdued));
        ui.label(RichText::new(value).size(18.0).strong().color(colors.heading));
    });
}

impl Page for StockPage {
    type Event = StockEvent;

    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) -> Vec<Self::Event> {
        let colors = ctx.colors();
        let mut events = Vec::new();
        self.ensure_queries(ctx.api);

        if self.corp.is_loading() || self.prices.is_loading() {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.spinner();
                ui.label(RichText::new(UI_TEXT.loading_market_data).strong().color(colors.subdued));
            });
            return events;
        }

        let source_key = format!("{}#{}", self.prices_key(), self.price_generation);
        let daily: &[PriceBar] = self.prices.data().map_or(&[], |v| v.as_slice());
        let bars = self.plot_view.prepare(&source_key, self.timeframe, daily);

        if bars.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.label(RichText::new(UI_TEXT.no_price_data).size(20.0).strong());
                ui.label_subdued(colors, format!("{} {}.", UI_TEXT.no_price_data_hint, self.symbol));
                ui.add_space(8.0);
                if ui.button(UI_TEXT.refetch).clicked() {
                    self.refetch_all(ctx.api);
                }
            });
            return events;
        }

        let change = price_change(bars);
        let main_color = if change.is_positive {
            CHART_CONFIG.themed(ctx.theme).up
        } else {
            CHART_CONFIG.themed(ctx.theme).down
        };

        if self.render_hero(ui, ctx, &mut events) {
            self.refetch_all(ctx.api);
        }
        ui.add_space(8.0);
        ui.label(
            RichText::new(format_currency(change.latest))
                .size(44.0)
                .strong()
                .color(colors.heading),
        );
        ui.horizontal(|ui| {
            let arrow = if change.is_positive { "▲" } else { "▼" };
            ui.label(
                RichText::new(format!(
                    "{} {} ({})",
                    arrow,
                    format_currency(change.diff.abs()),
                    format_percent(change.ratio_pct)
                ))
                .size(16.0)
                .strong()
                .color(main_color),
            );
            ui.label_subdued(colors, UI_TEXT.today);
        });
        ui.add_space(12.0);

        self.plot_view
            .show_price_chart(ui, &ctx.settings.chart, ctx.theme, self.timeframe, main_color);
        ui.add_space(8.0);
        self.render_toolbar(ui, ctx, &mut events);

        spaced_separator(ui);
        self.render_key_stats(ui, ctx);
        spaced_separator(ui);
        self.render_about(ui, ctx);
        events
    }

    fn repaint_after(&self) -> Option<Duration> {
        let busy = self.corp.is_loading() || self.prices.is_loading() || self.finance.is_loading();
        busy.then(|| Duration::from_millis(100))
    }
}
