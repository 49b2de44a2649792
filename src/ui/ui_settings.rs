use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{Button, DragValue, Grid, RichText, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::data::{BatchJob, Query, QueryState};
use crate::domain::{
    ChartConfigPatch, FormError, StrategyDefaults, ThemePreference, validate_batch_date,
    validate_batch_range, validate_year_range,
};
use crate::domain::backtest_form::BATCH_DATE_FORMAT;
use crate::models::{ReportCode, ServiceInfo, StockMarket};
use crate::ui::config::{UI_TEXT, UiColors};
use crate::ui::page::{Page, PageContext};
use crate::ui::styles::{UiStyleExt, card_frame};
use crate::ui::utils::{enum_combo, section_heading};

const RECENT_EVENTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    SetTheme(ThemePreference),
    ChartConfig(ChartConfigPatch),
    SetDefaults(StrategyDefaults),
    RunBatch(BatchJob),
}

/// Text inputs of the batch control centre. Dates are `yyyyMMdd`.
#[derive(Debug, Clone, PartialEq)]
struct BatchInputs {
    date: String,
    market: StockMarket,
    range_start: String,
    range_end: String,
    year_start: String,
    year_end: String,
}

impl BatchInputs {
    fn seeded(today: chrono::NaiveDate) -> Self {
        let date = today.format(BATCH_DATE_FORMAT).to_string();
        let year = today.format("%Y").to_string();
        Self {
            date: date.clone(),
            market: StockMarket::default(),
            range_start: date.clone(),
            range_end: date,
            year_start: year.clone(),
            year_end: year,
        }
    }

    fn corp_info(&self) -> Result<BatchJob, FormError> {
        Ok(BatchJob::CorpInfo {
            date: validate_batch_date(&self.date)?,
        })
    }

    fn price(&self) -> Result<BatchJob, FormError> {
        Ok(BatchJob::Price {
            market: self.market,
            date: validate_batch_date(&self.date)?,
        })
    }

    fn indicators(&self) -> Result<BatchJob, FormError> {
        Ok(BatchJob::Indicators {
            date: validate_batch_date(&self.date)?,
        })
    }

    fn price_recovery(&self) -> Result<BatchJob, FormError> {
        let (start_date, end_date) = validate_batch_range(&self.range_start, &self.range_end)?;
        Ok(BatchJob::PriceRecovery {
            start_date,
            end_date,
        })
    }

    fn finance_recovery(&self) -> Result<BatchJob, FormError> {
        let (start_year, end_year) = validate_year_range(&self.year_start, &self.year_end)?;
        Ok(BatchJob::FinanceRecovery {
            start_year,
            end_year,
        })
    }

    fn finance(&self, report_code: ReportCode) -> Result<BatchJob, FormError> {
        Ok(BatchJob::Finance {
            date: validate_batch_date(&self.date)?,
            report_code: Some(report_code),
        })
    }
}

/// Appearance, backend status, batch triggers and simulator defaults
#[derive(Default)]
pub struct SettingsPage {
    gateway: Query<ServiceInfo>,
    inputs: Option<BatchInputs>,
    batch_error: Option<String>,
}

impl SettingsPage {
    fn render_appearance(&self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<SettingsEvent>) {
        let colors = ctx.colors();
        ui.label_subheader(colors, UI_TEXT.appearance_heading);
        ui.add_space(8.0);
        ui.columns(3, |cols| {
            for (col, pref) in cols.iter_mut().zip(ThemePreference::iter()) {
                let selected = ctx.settings.theme == pref;
                let text = RichText::new(pref.to_string().to_uppercase()).strong();
                let button = Button::selectable(selected, text).min_size([col.available_width(), 48.0].into());
                if col.add(button).clicked() && !selected {
                    events.push(SettingsEvent::SetTheme(pref));
                }
            }
        });

        ui.add_space(12.0);
        let chart = &ctx.settings.chart;
        let mut candle_mode = chart.candle_mode;
        let mut show_volume = chart.show_volume;
        ui.horizontal(|ui| {
            if ui.checkbox(&mut candle_mode, "Candlestick chart").changed() {
                events.push(SettingsEvent::ChartConfig(ChartConfigPatch {
                    candle_mode: Some(candle_mode),
                    ..Default::default()
                }));
            }
            if ui.checkbox(&mut show_volume, "Volume panel").changed() {
                events.push(SettingsEvent::ChartConfig(ChartConfigPatch {
                    show_volume: Some(show_volume),
                    ..Default::default()
                }));
            }
        });
    }

    fn render_system_status(&self, ui: &mut Ui, colors: &UiColors) {
        ui.label_subheader(colors, UI_TEXT.system_status_heading);
        ui.add_space(8.0);
        let (dot, status, version) = match self.gateway.state() {
            QueryState::Ready(info) => (
                colors.positive,
                "UP",
                info.version.as_deref().map_or("-".to_string(), |v| format!("v{}", v)),
            ),
            QueryState::Failed(_) => (colors.negative, "DOWN", "-".to_string()),
            _ => (colors.subdued, "…", String::new()),
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new("●").color(dot));
            ui.label(RichText::new("Gateway").strong());
            ui.label(RichText::new(status).small().strong().color(dot));
            ui.label(RichText::new(version).small().monospace().color(colors.subdued));
        });
        if let Some(info) = self.gateway.data() {
            ui.metric(colors, "Service", info.service_name.as_deref().unwrap_or("-"), colors.label);
            ui.metric(colors, "Profiles", info.profiles.as_deref().unwrap_or("-"), colors.label);
        }
        if let Some(e) = self.gateway.error() {
            ui.label_warning(colors, e.to_string());
        }
    }

    fn render_batches(&mut self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<SettingsEvent>) {
        let colors = ctx.colors();
        let inputs = self.inputs.get_or_insert_with(|| BatchInputs::seeded(ctx.today));
        let mut requested: Option<Result<BatchJob, FormError>> = None;

        ui.label_subheader(colors, UI_TEXT.batch_heading);
        ui.add_space(8.0);

        group_label(ui, colors, "Batch date (yyyyMMdd)");
        ui.horizontal(|ui| {
            ui.add(TextEdit::singleline(&mut inputs.date).desired_width(100.0).font(eframe::egui::TextStyle::Monospace));
            enum_combo(ui, "batch_market", &mut inputs.market);
        });
        ui.add_space(4.0);
        Grid::new("daily_batches").num_columns(2).spacing([8.0, 8.0]).show(ui, |ui| {
            if batch_button(ui, ctx, "Corp Info Sync", "corp_info") {
                requested = Some(inputs.corp_info());
            }
            if batch_button(ui, ctx, "Sector Update", "sector_update") {
                requested = Some(Ok(BatchJob::SectorUpdate));
            }
            ui.end_row();
            let price_slot = format!("price/{}", inputs.market);
            if batch_button(ui, ctx, &format!("Price Batch ({})", inputs.market), &price_slot) {
                requested = Some(inputs.price());
            }
            if batch_button(ui, ctx, "Indicator Batch", "indicators") {
                requested = Some(inputs.indicators());
            }
            ui.end_row();
        });

        ui.separator();
        group_label(ui, colors, "Stock price recovery (range, yyyyMMdd)");
        ui.horizontal(|ui| {
            ui.add(TextEdit::singleline(&mut inputs.range_start).desired_width(100.0).hint_text("start"));
            ui.label("~");
            ui.add(TextEdit::singleline(&mut inputs.range_end).desired_width(100.0).hint_text("end"));
        });
        if batch_button(ui, ctx, "Run Full Price & Aggregate Recovery", "price_recovery") {
            requested = Some(inputs.price_recovery());
        }

        ui.separator();
        group_label(ui, colors, "Finance bulk recovery (year range)");
        ui.horizontal(|ui| {
            ui.add(TextEdit::singleline(&mut inputs.year_start).desired_width(60.0).hint_text("yyyy"));
            ui.label("~");
            ui.add(TextEdit::singleline(&mut inputs.year_end).desired_width(60.0).hint_text("yyyy"));
        });
        if batch_button(ui, ctx, "Run DART Finance Bulk Recovery", "finance_recovery") {
            requested = Some(inputs.finance_recovery());
        }

        ui.separator();
        group_label(ui, colors, &format!("Finance single sync (date: {})", inputs.date));
        ui.horizontal_wrapped(|ui| {
            for code in ReportCode::iter() {
                if batch_button(ui, ctx, &code.to_string(), &format!("finance/{}", code)) {
                    requested = Some(inputs.finance(code));
                }
            }
        });

        match requested {
            Some(Ok(job)) => {
                self.batch_error = None;
                events.push(SettingsEvent::RunBatch(job));
            }
            Some(Err(e)) => self.batch_error = Some(e.to_string()),
            None => {}
        }
        if let Some(err) = &self.batch_error {
            ui.label_error(colors, err);
        }

        section_heading(ui, ctx.theme, UI_TEXT.system_events_heading);
        if ctx.batch_log.is_empty() {
            ui.label_subdued(colors, UI_TEXT.system_events_empty);
        }
        for event in ctx.batch_log.iter().take(RECENT_EVENTS) {
            let (color, outcome) = match &event.outcome {
                Ok(msg) => (colors.positive, msg.as_str()),
                Err(e) => (colors.negative, e.as_str()),
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(color));
                ui.label(RichText::new(&event.label).small().strong());
                ui.label_subdued(colors, outcome.trim());
            });
        }
    }

    fn render_defaults(&self, ui: &mut Ui, ctx: &PageContext, events: &mut Vec<SettingsEvent>) {
        let colors = ctx.colors();
        ui.label_subheader(colors, UI_TEXT.strategy_defaults_heading);
        ui.add_space(8.0);
        let mut draft = ctx.settings.defaults;
        let mut changed = false;
        Grid::new("strategy_defaults").num_columns(2).spacing([24.0, 8.0]).show(ui, |ui| {
            ui.label_subdued(colors, "Trading Fee Rate");
            changed |= ui
                .add(DragValue::new(&mut draft.trading_fee_rate).speed(0.0001).range(0.0..=1.0).max_decimals(4))
                .changed();
            ui.end_row();
            ui.label_subdued(colors, "Tax Rate");
            changed |= ui
                .add(DragValue::new(&mut draft.tax_rate).speed(0.0001).range(0.0..=1.0).max_decimals(4))
                .changed();
            ui.end_row();
            ui.label_subdued(colors, "Max Weight per Stock");
            changed |= ui
                .add(DragValue::new(&mut draft.max_weight_per_stock).speed(0.01).range(0.01..=1.0).max_decimals(2))
                .changed();
            ui.end_row();
        });
        if changed {
            events.push(SettingsEvent::SetDefaults(draft));
        }
        if ui.small_button("Reset to defaults").clicked() {
            events.push(SettingsEvent::SetDefaults(StrategyDefaults::default()));
        }
    }
}

fn group_label(ui: &mut Ui, colors: &UiColors, text: &str) {
    ui.label(RichText::new(text.to_uppercase()).small().strong().color(colors.subdued));
}

/// A trigger button that turns into a spinner while its job is outstanding.
fn batch_button(ui: &mut Ui, ctx: &PageContext, label: &str, slot: &str) -> bool {
    let busy = ctx.is_batch_busy(slot);
    ui.horizontal(|ui| {
        let clicked = ui
            .add_enabled(!busy, Button::new(format!("▶ {}", label)).min_size([150.0, 28.0].into()))
            .clicked();
        if busy {
            ui.spinner();
        }
        clicked
    })
    .inner
}

impl Page for SettingsPage {
    type Event = SettingsEvent;

    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) -> Vec<Self::Event> {
        let colors = ctx.colors();
        let mut events = Vec::new();

        let api = Arc::clone(ctx.api);
        self.gateway
            .request("gateway", move || async move { api.service_info().await });

        ui.label_header(colors, UI_TEXT.settings_heading);
        ui.label_subdued(colors, UI_TEXT.settings_subheading);
        ui.add_space(12.0);

        ui.columns(2, |cols| {
            card_frame(colors).show(&mut cols[0], |ui| self.render_appearance(ui, ctx, &mut events));
            cols[0].add_space(16.0);
            card_frame(colors).show(&mut cols[0], |ui| self.render_batches(ui, ctx, &mut events));

            card_frame(colors).show(&mut cols[1], |ui| self.render_system_status(ui, colors));
            cols[1].add_space(16.0);
            card_frame(colors).show(&mut cols[1], |ui| self.render_defaults(ui, ctx, &mut events));
        });

        events
    }

    fn repaint_after(&self) -> Option<Duration> {
        self.gateway.is_loading().then(|| Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn inputs() -> BatchInputs {
        BatchInputs::seeded(NaiveDate::from_ymd_opt(2024, 10, 14).unwrap())
    }

    #[test]
    fn test_inputs_seeded_from_today() {
        let i = inputs();
        assert_eq!(i.date, "20241014");
        assert_eq!(i.range_start, "20241014");
        assert_eq!(i.year_end, "2024");
    }

    #[test]
    fn test_jobs_built_from_valid_inputs() {
        let i = inputs();
        assert_eq!(
            i.price().unwrap(),
            BatchJob::Price {
                market: StockMarket::Kospi,
                date: "20241014".into()
            }
        );
        assert_eq!(
            i.finance(ReportCode::Semi).unwrap(),
            BatchJob::Finance {
                date: "20241014".into(),
                report_code: Some(ReportCode::Semi)
            }
        );
        assert_eq!(
            i.finance_recovery().unwrap(),
            BatchJob::FinanceRecovery {
                start_year: 2024,
                end_year: 2024
            }
        );
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let mut i = inputs();
        i.date = "2024-10-14".into();
        assert!(matches!(i.corp_info(), Err(FormError::InvalidDate { .. })));
        i.year_start = "1999".into();
        assert_eq!(i.finance_recovery(), Err(FormError::InvalidYear));
        i.range_start = "20241101".into();
        assert_eq!(i.price_recovery(), Err(FormError::StartAfterEnd));
    }
}
