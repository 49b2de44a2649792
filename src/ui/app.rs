use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, CentralPanel, Frame, Margin, ScrollArea, SidePanel, TopBottomPanel};
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::{BatchJob, BatchLog, StockApi};
use crate::domain::{
    ChartConfigPatch, MaLine, Route, SettingsStore, StrategyDefaults, Theme, ThemePreference,
};
use crate::models::BacktestRequest;
use crate::ui::app_async::PendingBatch;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::page::{Page, PageContext};
use crate::ui::ui_compare::{CompareEvent, ComparePage};
use crate::ui::ui_home::{HomeEvent, HomePage};
use crate::ui::ui_settings::{SettingsEvent, SettingsPage};
use crate::ui::ui_shell::{SearchBox, SearchEvent, render_nav};
use crate::ui::ui_simulator::{SimulatorEvent, SimulatorPage};
use crate::ui::ui_stock_detail::{StockEvent, StockPage};
use crate::ui::utils::setup_custom_visuals;
use crate::utils::time_utils::today_local;

/// Every state change a page can ask the app for, applied after the frame is drawn
#[derive(Debug, Clone, PartialEq)]
pub(super) enum AppAction {
    Navigate(Route),
    SetTheme(ThemePreference),
    ChartConfig(ChartConfigPatch),
    ToggleMa(MaLine),
    SetDefaults(StrategyDefaults),
    RunBatch(BatchJob),
    CompareResult(i64),
    OptimizerBase(BacktestRequest),
}

impl From<SearchEvent> for AppAction {
    fn from(event: SearchEvent) -> Self {
        match event {
            SearchEvent::Navigate(route) => AppAction::Navigate(route),
        }
    }
}

impl From<HomeEvent> for AppAction {
    fn from(event: HomeEvent) -> Self {
        match event {
            HomeEvent::Navigate(route) => AppAction::Navigate(route),
        }
    }
}

impl From<StockEvent> for AppAction {
    fn from(event: StockEvent) -> Self {
        match event {
            StockEvent::ChartConfig(patch) => AppAction::ChartConfig(patch),
            StockEvent::ToggleMa(line) => AppAction::ToggleMa(line),
        }
    }
}

impl From<SimulatorEvent> for AppAction {
    fn from(event: SimulatorEvent) -> Self {
        match event {
            SimulatorEvent::Submitted(request) => AppAction::OptimizerBase(request),
            SimulatorEvent::Compare(id) => AppAction::CompareResult(id),
        }
    }
}

impl From<CompareEvent> for AppAction {
    fn from(event: CompareEvent) -> Self {
        match event {
            CompareEvent::Navigate(route) => AppAction::Navigate(route),
        }
    }
}

impl From<SettingsEvent> for AppAction {
    fn from(event: SettingsEvent) -> Self {
        match event {
            SettingsEvent::SetTheme(theme) => AppAction::SetTheme(theme),
            SettingsEvent::ChartConfig(patch) => AppAction::ChartConfig(patch),
            SettingsEvent::SetDefaults(defaults) => AppAction::SetDefaults(defaults),
            SettingsEvent::RunBatch(job) => AppAction::RunBatch(job),
        }
    }
}

/// Root of the dashboard. Settings and the current route persist between
/// sessions; pages, queries and pending batches live for one session only.
#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardApp {
    pub(super) settings: SettingsStore,
    pub(super) route: Route,

    #[serde(skip)]
    pub(super) api: Option<Arc<dyn StockApi>>,
    #[serde(skip)]
    pub(super) batch_log: BatchLog,
    #[serde(skip)]
    pub(super) pending_batches: Vec<PendingBatch>,
    #[serde(skip)]
    applied_theme: Option<Theme>,
    #[serde(skip)]
    title_route: Option<Route>,

    #[serde(skip)]
    search: SearchBox,
    #[serde(skip)]
    home: HomePage,
    #[serde(skip)]
    stock: StockPage,
    #[serde(skip)]
    simulator: SimulatorPage,
    #[serde(skip)]
    compare: ComparePage,
    #[serde(skip)]
    settings_page: SettingsPage,
}

impl DashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        api: Arc<dyn StockApi>,
        reset_settings: bool,
    ) -> Self {
        let mut app: DashboardApp = match cc.storage {
            Some(storage) if !reset_settings => {
                match eframe::get_value(storage, eframe::APP_KEY) {
                    Some(value) => {
                        #[cfg(debug_assertions)]
                        if DEBUG_FLAGS.print_state_serde {
                            log::info!("Successfully loaded persisted state");
                        }
                        value
                    }
                    None => {
                        #[cfg(debug_assertions)]
                        if DEBUG_FLAGS.print_state_serde {
                            log::info!("No persisted dashboard state found. Creating anew.");
                        }
                        DashboardApp::default()
                    }
                }
            }
            _ => {
                if reset_settings {
                    log::info!("Ignoring persisted settings (--reset-settings)");
                }
                DashboardApp::default()
            }
        };

        app.api = Some(api);
        app
    }

    fn apply(&mut self, action: AppAction) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Action: {:?}", action);
        }
        match action {
            AppAction::Navigate(route) => self.route = route,
            AppAction::SetTheme(theme) => self.settings.set_theme(theme),
            AppAction::ChartConfig(patch) => self.settings.set_chart_config(patch),
            AppAction::ToggleMa(line) => self.settings.toggle_ma(line),
            AppAction::SetDefaults(defaults) => self.settings.set_defaults(defaults),
            AppAction::RunBatch(job) => self.start_batch(job),
            AppAction::CompareResult(id) => {
                self.compare.preselect(id);
                self.route = Route::Compare;
            }
            AppAction::OptimizerBase(request) => self.compare.set_base_request(request),
        }
    }

    fn current_repaint_after(&self) -> Option<Duration> {
        let page = match &self.route {
            Route::Home => self.home.repaint_after(),
            Route::Stock(_) => self.stock.repaint_after(),
            Route::Simulator => self.simulator.repaint_after(),
            Route::Compare => self.compare.repaint_after(),
            Route::Settings => self.settings_page.repaint_after(),
        };
        let batches = self
            .has_pending_batches()
            .then(|| Duration::from_millis(100));
        [page, self.search.repaint_after(), batches]
            .into_iter()
            .flatten()
            .min()
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Drop outstanding promises before the runtime goes away
        self.pending_batches.clear();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let system_is_dark = ctx.system_theme().map(|t| t == egui::Theme::Dark);
        let theme = self.settings.resolve_theme(system_is_dark);
        if self.applied_theme != Some(theme) {
            setup_custom_visuals(ctx, theme);
            self.applied_theme = Some(theme);
        }
        if self.title_route.as_ref() != Some(&self.route) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                "{} · {}",
                self.route.title(),
                UI_TEXT.app_title
            )));
            self.title_route = Some(self.route.clone());
        }

        self.poll_batches();

        let Some(api) = self.api.as_ref().map(Arc::clone) else {
            return;
        };
        let busy = self.busy_slots();
        let colors = UI_CONFIG.colors(theme);
        let mut actions: Vec<AppAction> = Vec::new();

        {
            let page_ctx = PageContext {
                api: &api,
                settings: &self.settings,
                theme,
                batch_log: &self.batch_log,
                busy_batches: &busy,
                today: today_local(),
            };

            SidePanel::left("nav_panel")
                .exact_width(UI_CONFIG.sidebar_width)
                .resizable(false)
                .frame(Frame::new().fill(colors.side_panel).inner_margin(Margin::same(12)))
                .show(ctx, |ui| {
                    if let Some(route) = render_nav(ui, &page_ctx, &self.route) {
                        actions.push(AppAction::Navigate(route));
                    }
                });

            TopBottomPanel::top("header_panel")
                .frame(Frame::new().fill(colors.background).inner_margin(Margin::symmetric(24, 12)))
                .show(ctx, |ui| {
                    let events = self.search.render(ui, &page_ctx);
                    actions.extend(events.into_iter().map(AppAction::from));
                });

            CentralPanel::default()
                .frame(Frame::new().fill(colors.background).inner_margin(Margin::symmetric(32, 16)))
                .show(ctx, |ui| {
                    ScrollArea::vertical()
                        .id_salt("page_scroll")
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.set_max_width(UI_CONFIG.page_max_width);
                            match &self.route {
                                Route::Home => actions.extend(
                                    self.home.render(ui, &page_ctx).into_iter().map(AppAction::from),
                                ),
                                Route::Stock(symbol) => {
                                    self.stock.show_symbol(symbol);
                                    actions.extend(
                                        self.stock.render(ui, &page_ctx).into_iter().map(AppAction::from),
                                    );
                                }
                                Route::Simulator => actions.extend(
                                    self.simulator
                                        .render(ui, &page_ctx)
                                        .into_iter()
                                        .map(AppAction::from),
                                ),
                                Route::Compare => actions.extend(
                                    self.compare.render(ui, &page_ctx).into_iter().map(AppAction::from),
                                ),
                                Route::Settings => actions.extend(
                                    self.settings_page
                                        .render(ui, &page_ctx)
                                        .into_iter()
                                        .map(AppAction::from),
                                ),
                            }
                        });
                });
        }

        for action in actions {
            self.apply(action);
        }

        if let Some(after) = self.current_repaint_after() {
            ctx.request_repaint_after(after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip_keeps_settings_and_route() {
        let mut app = DashboardApp::default();
        app.settings.set_theme(ThemePreference::Light);
        app.settings.toggle_ma(MaLine::Ma120);
        app.route = Route::Stock("000660".to_string());

        let json = serde_json::to_string(&app).unwrap();
        let restored: DashboardApp = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.settings, app.settings);
        assert_eq!(restored.route, app.route);
        assert!(restored.api.is_none());
    }

    #[test]
    fn test_older_state_file_falls_back_to_defaults() {
        let restored: DashboardApp = serde_json::from_str(r#"{"route":"Simulator"}"#).unwrap();
        assert_eq!(restored.route, Route::Simulator);
        assert_eq!(restored.settings, SettingsStore::default());
    }

    #[test]
    fn test_actions_update_settings() {
        let mut app = DashboardApp::default();
        app.apply(AppAction::SetTheme(ThemePreference::System));
        app.apply(AppAction::ChartConfig(ChartConfigPatch {
            candle_mode: Some(true),
            ..Default::default()
        }));
        app.apply(AppAction::Navigate(Route::Settings));
        assert_eq!(app.settings.theme, ThemePreference::System);
        assert!(app.settings.chart.candle_mode);
        assert_eq!(app.route, Route::Settings);
    }

    #[test]
    fn test_compare_action_navigates() {
        let mut app = DashboardApp::default();
        app.apply(AppAction::CompareResult(42));
        assert_eq!(app.route, Route::Compare);
    }

    #[test]
    fn test_batch_without_client_is_ignored() {
        let mut app = DashboardApp::default();
        app.apply(AppAction::RunBatch(BatchJob::SectorUpdate));
        assert!(!app.has_pending_batches());
    }
}
