use chrono::NaiveDate;
use eframe::egui::{self, Color32};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};
use strum::IntoEnumIterator;

use crate::analysis::{MaPoint, aggregate_bars, calculate_ma};
use crate::config::CHART_CONFIG;
use crate::domain::{ChartConfig, MaLine, PriceBar, Theme, Timeframe};
use crate::ui::plot_layers::{
    AreaLayer, CandleLayer, LayerContext, MovingAverageLayer, PlotLayer, VolumeLayer,
};
use crate::ui::utils::group_thousands;
use crate::utils::maths_utils::{get_min_max, padded_range};
use crate::utils::time_utils::{date_to_plot_x, format_plot_date};

/// Aggregated bars and every MA series for one (price data, timeframe) pair.
/// Rebuilt only when either input changes.
pub struct PlotCache {
    source_key: String,
    timeframe: Timeframe,
    pub bars: Vec<PriceBar>,
    pub moving_averages: Vec<(MaLine, Vec<MaPoint>)>,
}

impl PlotCache {
    fn build(source_key: &str, timeframe: Timeframe, daily: &[PriceBar]) -> Self {
        let bars = aggregate_bars(daily, timeframe);
        let moving_averages = MaLine::iter()
            .map(|line| (line, calculate_ma(&bars, line.period())))
            .collect();
        Self {
            source_key: source_key.to_string(),
            timeframe,
            bars,
            moving_averages,
        }
    }
}

#[derive(Default)]
pub struct PlotView {
    cache: Option<PlotCache>,
}

impl PlotView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    /// Returns the bars actually displayed (after aggregation).
    pub fn prepare(&mut self, source_key: &str, timeframe: Timeframe, daily: &[PriceBar]) -> &[PriceBar] {
        let stale = self
            .cache
            .as_ref()
            .is_none_or(|c| c.source_key != source_key || c.timeframe != timeframe);
        if stale {
            self.cache = Some(PlotCache::build(source_key, timeframe, daily));
        }
        self.cache.as_ref().map_or(&[], |c| c.bars.as_slice())
    }

    pub fn show_price_chart(
        &self,
        ui: &mut egui::Ui,
        config: &ChartConfig,
        theme: Theme,
        timeframe: Timeframe,
        main_color: Color32,
    ) {
        let Some(cache) = &self.cache else {
            return;
        };
        let colors = CHART_CONFIG.themed(theme);

        let lows: Vec<f64> = cache.bars.iter().map(|b| b.low.min(b.close)).collect();
        let highs: Vec<f64> = cache.bars.iter().map(|b| b.high.max(b.close)).collect();
        let (y_min, y_max) = match (get_min_max(&lows), get_min_max(&highs)) {
            (Some((lo, _)), Some((_, hi))) => padded_range(lo, hi, 0.05),
            _ => (0.0, 1.0),
        };

        let layer_ctx = LayerContext {
            bars: &cache.bars,
            moving_averages: &cache.moving_averages,
            config,
            colors,
            main_color,
            slot_days: slot_days(timeframe),
            y_floor: y_min,
        };

        Plot::new("price_chart")
            .height(CHART_CONFIG.price_chart_height)
            .legend(Legend::default().position(Corner::LeftTop))
            .link_axis("stock_chart_axis", [true, false])
            .link_cursor("stock_chart_cursor", [true, false])
            .x_axis_formatter(|mark, _range| format_plot_date(mark.value))
            .y_axis_formatter(|mark, _range| group_thousands(mark.value, 0))
            .label_formatter(|name, point| {
                let date = format_plot_date(point.x);
                let value = group_thousands(point.y, 0);
                if name.is_empty() {
                    format!("{}\n{}", date, value)
                } else {
                    format!("{}\n{}\n{}", name, date, value)
                }
            })
            .include_y(y_min)
            .include_y(y_max)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                // Back to front
                let layers: Vec<Box<dyn PlotLayer>> = vec![
                    Box::new(AreaLayer),
                    Box::new(CandleLayer),
                    Box::new(MovingAverageLayer),
                ];
                for layer in layers {
                    layer.render(plot_ui, &layer_ctx);
                }
            });

        if config.show_volume {
            ui.add_space(4.0);
            Plot::new("volume_chart")
                .height(CHART_CONFIG.volume_chart_height)
                .link_axis("stock_chart_axis", [true, false])
                .link_cursor("stock_chart_cursor", [true, false])
                .show_x(false)
                .x_axis_formatter(|mark, _range| format_plot_date(mark.value))
                .y_axis_formatter(|mark, _range| group_thousands(mark.value, 0))
                .include_y(0.0)
                .allow_scroll(false)
                .allow_zoom([true, false])
                .show(ui, |plot_ui| VolumeLayer.render(plot_ui, &layer_ctx));
        }
    }
}

/// One named value-over-time line on an equity chart
pub struct EquitySeries<'a> {
    pub name: String,
    pub color: Color32,
    pub points: &'a [(NaiveDate, f64)],
}

/// Portfolio value lines sharing one date axis. `decimals` controls the
/// y labels (0 for currency, 1 or 2 for normalized curves).
pub fn show_equity_chart(ui: &mut egui::Ui, id: &str, series: &[EquitySeries], decimals: usize) {
    Plot::new(id)
        .height(CHART_CONFIG.equity_chart_height)
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_formatter(|mark, _range| format_plot_date(mark.value))
        .y_axis_formatter(move |mark, _range| group_thousands(mark.value, decimals))
        .label_formatter(move |name, point| {
            format!(
                "{}\n{}\n{}",
                name,
                format_plot_date(point.x),
                group_thousands(point.y, decimals)
            )
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for s in series {
                let points: Vec<[f64; 2]> = s
                    .points
                    .iter()
                    .map(|(date, value)| [date_to_plot_x(*date), *value])
                    .collect();
                plot_ui.line(
                    Line::new(s.name.clone(), PlotPoints::from(points))
                        .color(s.color)
                        .width(CHART_CONFIG.price_line_width),
                );
            }
        });
}

fn slot_days(timeframe: Timeframe) -> f64 {
    match timeframe {
        Timeframe::Daily => 1.0,
        Timeframe::Weekly => 7.0,
        Timeframe::Monthly => 30.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(n: u32) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let time = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::TimeDelta::days(i as i64);
                PriceBar::new(time, 100.0, 101.0, 99.0, 100.0 + i as f64, 10.0)
            })
            .collect()
    }

    #[test]
    fn test_cache_rebuilt_only_on_input_change() {
        let mut view = PlotView::new();
        let bars = daily(30);
        assert_eq!(view.prepare("prices/005930/730", Timeframe::Daily, &bars).len(), 30);
        // Same key and timeframe keep the cached series even if handed other data
        assert_eq!(view.prepare("prices/005930/730", Timeframe::Daily, &[]).len(), 30);
        let weekly = view.prepare("prices/005930/730", Timeframe::Weekly, &bars).len();
        assert!(weekly < 30);
        view.clear_cache();
        assert!(view.prepare("prices/000660/730", Timeframe::Daily, &[]).is_empty());
    }

    #[test]
    fn test_all_ma_series_precomputed() {
        let mut view = PlotView::new();
        view.prepare("k", Timeframe::Daily, &daily(25));
        let cache = view.cache.as_ref().unwrap();
        let lens: Vec<usize> = cache.moving_averages.iter().map(|(_, s)| s.len()).collect();
        assert_eq!(lens, vec![21, 6, 0, 0]);
    }
}
