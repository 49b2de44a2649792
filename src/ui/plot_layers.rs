use eframe::egui::{Color32, Stroke};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, PlotPoints, PlotUi};

use crate::analysis::MaPoint;
use crate::config::chart::{CHART_CONFIG, ThemedColors};
use crate::domain::{BarType, ChartConfig, MaLine, PriceBar};
use crate::utils::time_utils::date_to_plot_x;

/// Context passed to every layer during rendering.
/// This prevents argument explosion.
pub struct LayerContext<'a> {
    pub bars: &'a [PriceBar],
    pub moving_averages: &'a [(MaLine, Vec<MaPoint>)],
    pub config: &'a ChartConfig,
    pub colors: &'a ThemedColors,
    /// Up or down color depending on the latest change
    pub main_color: Color32,
    /// Days covered by one bar (1, 7 or ~30)
    pub slot_days: f64,
    pub y_floor: f64,
}

impl LayerContext<'_> {
    fn bar_color(&self, bar: &PriceBar) -> Color32 {
        match bar.get_type() {
            BarType::Bullish => self.colors.up,
            BarType::Bearish => self.colors.down,
        }
    }
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. AREA LAYER (close prices as a filled line)
// ============================================================================
pub struct AreaLayer;

impl PlotLayer for AreaLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if ctx.config.candle_mode {
            return;
        }
        let points: Vec<[f64; 2]> = ctx
            .bars
            .iter()
            .map(|b| [date_to_plot_x(b.time), b.close])
            .collect();
        let line = Line::new("Close", PlotPoints::from(points))
            .color(ctx.main_color)
            .width(CHART_CONFIG.price_line_width)
            .fill(ctx.y_floor as f32);
        plot_ui.line(line);
    }
}

// ============================================================================
// 2. CANDLE LAYER (OHLC as box elements: whiskers = high/low, box = body)
// ============================================================================
pub struct CandleLayer;

impl PlotLayer for CandleLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.config.candle_mode {
            return;
        }
        let width = ctx.slot_days * CHART_CONFIG.candle_width;
        let elems: Vec<BoxElem> = ctx
            .bars
            .iter()
            .map(|bar| {
                let (body_low, body_high) = bar.body_range();
                let color = ctx.bar_color(bar);
                BoxElem::new(
                    date_to_plot_x(bar.time),
                    BoxSpread::new(bar.low, body_low, bar.body_mid(), body_high, bar.high),
                )
                .name(bar.time.to_string())
                .box_width(width)
                .whisker_width(0.0)
                .fill(color)
                .stroke(Stroke::new(1.0, color))
            })
            .collect();
        plot_ui.box_plot(BoxPlot::new("OHLC", elems));
    }
}

// ============================================================================
// 3. MOVING AVERAGE LAYER (only the lines switched on in settings)
// ============================================================================
pub struct MovingAverageLayer;

impl PlotLayer for MovingAverageLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for (line, points) in ctx.moving_averages {
            if !ctx.config.shows(*line) || points.is_empty() {
                continue;
            }
            let color = CHART_CONFIG
                .ma_styles
                .iter()
                .find(|s| s.period == line.period())
                .map_or(Color32::GRAY, |s| s.color);
            let series: Vec<[f64; 2]> = points
                .iter()
                .map(|p| [date_to_plot_x(p.time), p.value])
                .collect();
            plot_ui.line(
                Line::new(line.to_string(), PlotPoints::from(series))
                    .color(color)
                    .width(CHART_CONFIG.ma_line_width),
            );
        }
    }
}

// ============================================================================
// 4. VOLUME LAYER (drawn in its own plot below the price)
// ============================================================================
pub struct VolumeLayer;

impl PlotLayer for VolumeLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let width = ctx.slot_days * CHART_CONFIG.candle_width;
        let bars: Vec<Bar> = ctx
            .bars
            .iter()
            .map(|bar| {
                Bar::new(date_to_plot_x(bar.time), bar.volume)
                    .width(width)
                    .fill(ctx.bar_color(bar).gamma_multiply(0.6))
            })
            .collect();
        plot_ui.bar_chart(BarChart::new("Volume", bars));
    }
}
