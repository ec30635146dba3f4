//! Pixel layout of one chart frame.
//!
//! [`Scene::build`] turns the surface state into plain shapes so the canvas
//! code only paints, and the layout can be checked without a browser.

use super::surface_model::{SeriesEntry, SurfaceModel, index_of};
use crate::domain::chart::{
    Color, HistogramPoint, LogicalRange, PriceScaleLayout, ScaleId, ScaleMargins, SeriesData,
    TimeAxisLayout, candle_color,
};
use crate::domain::market_data::TradeDate;
use crate::time_utils::{DateLabelStyle, format_date_label, format_price};

pub const PRICE_AXIS_WIDTH: f64 = 64.0;
pub const TIME_AXIS_HEIGHT: f64 = 24.0;
pub const NO_DATA_MESSAGE: &str = "No data";

/// Minimum horizontal distance between two date labels
const MIN_LABEL_SPACING: f64 = 90.0;
const PRICE_TICKS: usize = 5;

/// Precomputed geometry of one candle
#[derive(Debug, Clone, PartialEq)]
pub struct CandleShape {
    pub x: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub body_width: f64,
    pub color: Color,
}

impl CandleShape {
    /// Open and close within a pixel: drawn as a horizontal line
    pub fn is_doji(&self) -> bool {
        self.body_height < 1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub color: Color,
    pub width: f64,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Everything drawn for one frame, in CSS pixels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub pane_width: f64,
    pub pane_height: f64,
    pub grid_x: Vec<f64>,
    pub grid_y: Vec<f64>,
    pub candles: Vec<CandleShape>,
    pub volume: Vec<BarShape>,
    pub lines: Vec<Polyline>,
    pub price_labels: Vec<Label>,
    pub time_labels: Vec<Label>,
    /// Last close marker on the price axis
    pub last_price: Option<(f64, Label, Color)>,
    pub message: Option<&'static str>,
}

impl Scene {
    pub fn build(model: &SurfaceModel) -> Self {
        let width = model.width as f64;
        let height = model.height as f64;
        let pane_width = (width - PRICE_AXIS_WIDTH).max(0.0);
        let pane_height = (height - TIME_AXIS_HEIGHT).max(0.0);
        let mut scene = Scene { width, height, pane_width, pane_height, ..Default::default() };

        let Some(range) = model.effective_range() else {
            scene.message = Some(NO_DATA_MESSAGE);
            return scene;
        };
        if pane_width <= 0.0 || pane_height <= 0.0 {
            return scene;
        }

        let axis_times = model.axis_times();
        let axis = TimeAxisLayout::new(pane_width, range);
        let Some((min, max)) = price_extent(model, &axis_times, range) else {
            scene.message = Some(NO_DATA_MESSAGE);
            return scene;
        };
        let margins = model.margins(ScaleId::Right).unwrap_or(ScaleMargins::PRICE_ONLY);
        let price = PriceScaleLayout::new(margins, pane_height, min, max);

        for entry in model.series() {
            match &entry.data {
                SeriesData::Candles(points) => {
                    for (index, point) in points.iter().enumerate() {
                        if !range.contains(index) {
                            continue;
                        }
                        let open_y = price.value_to_y(point.open);
                        let close_y = price.value_to_y(point.close);
                        scene.candles.push(CandleShape {
                            x: axis.index_to_x(index),
                            high_y: price.value_to_y(point.high),
                            low_y: price.value_to_y(point.low),
                            body_top: open_y.min(close_y),
                            body_height: (open_y - close_y).abs(),
                            body_width: axis.body_width(),
                            color: candle_color(point.direction()),
                        });
                    }
                    if let Some(last) = points.last() {
                        let y = price.value_to_y(last.close);
                        let label = Label { x: pane_width + 4.0, y, text: format_price(last.close) };
                        scene.last_price = Some((y, label, candle_color(last.direction())));
                    }
                }
                SeriesData::Histogram(points) => {
                    scene.volume = volume_bars(model, entry, points, &axis_times, &axis, pane_height);
                }
                SeriesData::Line(points) => {
                    let coords: Vec<(f64, f64)> = points
                        .iter()
                        .filter_map(|p| {
                            let index = index_of(&axis_times, &p.time)?;
                            range.contains(index).then(|| (axis.index_to_x(index), price.value_to_y(p.value)))
                        })
                        .collect();
                    if coords.len() > 1 {
                        scene.lines.push(Polyline {
                            color: entry.spec.color,
                            width: entry.spec.line_width,
                            points: coords,
                        });
                    }
                }
            }
        }

        for step in 0..PRICE_TICKS {
            let y = price.band_top + price.band_height() * step as f64 / (PRICE_TICKS - 1) as f64;
            scene.grid_y.push(y);
            scene.price_labels.push(Label {
                x: pane_width + 4.0,
                y,
                text: format_price(price.y_to_value(y)),
            });
        }

        if let (Some(first), Some(last)) = (axis_times.get(range.from), axis_times.get(range.to)) {
            let style = DateLabelStyle::for_span(first, last, None);
            let every = ((MIN_LABEL_SPACING / axis.bar_spacing()).ceil() as usize).max(1);
            let mut index = range.from;
            while index <= range.to {
                let x = axis.index_to_x(index);
                scene.grid_x.push(x);
                scene.time_labels.push(Label {
                    x,
                    y: pane_height + TIME_AXIS_HEIGHT / 2.0,
                    text: format_date_label(axis_times[index], style),
                });
                index += every;
            }
        }

        scene
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty() && self.volume.is_empty() && self.lines.is_empty()
    }
}

/// Min/max of everything on the right scale inside `range`
fn price_extent(
    model: &SurfaceModel,
    axis_times: &[&TradeDate],
    range: LogicalRange,
) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for entry in model.series().iter().filter(|e| e.spec.scale == ScaleId::Right) {
        match &entry.data {
            SeriesData::Candles(points) => {
                for point in (range.from..=range.to).filter_map(|i| points.get(i)) {
                    min = min.min(point.low);
                    max = max.max(point.high);
                }
            }
            SeriesData::Line(points) => {
                for point in points {
                    if index_of(axis_times, &point.time).is_some_and(|i| range.contains(i)) {
                        min = min.min(point.value);
                        max = max.max(point.value);
                    }
                }
            }
            SeriesData::Histogram(_) => {}
        }
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

fn volume_bars(
    model: &SurfaceModel,
    entry: &SeriesEntry,
    points: &[HistogramPoint],
    axis_times: &[&TradeDate],
    axis: &TimeAxisLayout,
    pane_height: f64,
) -> Vec<BarShape> {
    let visible: Vec<(usize, &HistogramPoint)> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let index = index_of(axis_times, &p.time).unwrap_or(i);
            axis.range.contains(index).then_some((index, p))
        })
        .collect();
    let peak = visible.iter().map(|(_, p)| p.value).fold(0.0_f64, f64::max);
    let margins = model.margins(entry.spec.scale).unwrap_or(ScaleMargins::VOLUME);
    let scale = PriceScaleLayout::new(margins, pane_height, 0.0, peak);
    visible
        .into_iter()
        .map(|(index, p)| {
            let top = if peak > 0.0 { scale.value_to_y(p.value) } else { scale.band_bottom };
            BarShape {
                x: axis.index_to_x(index) - axis.body_width() / 2.0,
                y: top,
                width: axis.body_width(),
                height: scale.band_bottom - top,
                color: p.color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{CandlePoint, LinePoint, SeriesSpec, volume_color};
    use crate::domain::market_data::Direction;

    fn model_with(n: usize, show_volume: bool) -> SurfaceModel {
        let mut model = SurfaceModel::new();
        model.set_size(664, 424);
        model.configure_scale(
            ScaleId::Right,
            if show_volume { ScaleMargins::PRICE_WITH_VOLUME } else { ScaleMargins::PRICE_ONLY },
        );
        let candles = model.add_series(SeriesSpec::candles());
        let dates: Vec<TradeDate> =
            (0..n).map(|i| TradeDate::new(format!("2024-03-{:02}", i + 1))).collect();
        model.set_series_data(
            candles,
            SeriesData::Candles(
                dates
                    .iter()
                    .enumerate()
                    .map(|(i, d)| CandlePoint {
                        time: d.clone(),
                        open: 10.0 + i as f64,
                        high: 12.0 + i as f64,
                        low: 9.0 + i as f64,
                        close: 11.0 + i as f64,
                    })
                    .collect(),
            ),
        );
        if show_volume {
            model.configure_scale(ScaleId::Volume, ScaleMargins::VOLUME);
            let volume = model.add_series(SeriesSpec::volume());
            model.set_series_data(
                volume,
                SeriesData::Histogram(
                    dates
                        .iter()
                        .map(|d| HistogramPoint {
                            time: d.clone(),
                            value: 100.0,
                            color: volume_color(Direction::Up),
                        })
                        .collect(),
                ),
            );
        }
        model.fit_content();
        model
    }

    #[test]
    fn empty_model_shows_message() {
        let mut model = SurfaceModel::new();
        model.set_size(300, 200);
        model.add_series(SeriesSpec::candles());
        let scene = Scene::build(&model);
        assert_eq!(scene.message, Some(NO_DATA_MESSAGE));
        assert!(scene.is_empty());
    }

    #[test]
    fn candles_stay_inside_price_band() {
        let model = model_with(10, true);
        let scene = Scene::build(&model);
        assert_eq!(scene.candles.len(), 10);
        // 400px pane, price band 0.05..0.7
        for candle in &scene.candles {
            assert!(candle.high_y >= 20.0 - 1e-9 && candle.low_y <= 280.0 + 1e-9);
            assert!(candle.x > 0.0 && candle.x < scene.pane_width);
        }
        assert_eq!(scene.volume.len(), 10);
        assert!(scene.volume.iter().all(|bar| (bar.y - 300.0).abs() < 1e-9));
    }

    #[test]
    fn only_visible_range_is_drawn() {
        let mut model = model_with(10, false);
        model.set_visible_range(LogicalRange::new(6, 9));
        let scene = Scene::build(&model);
        assert_eq!(scene.candles.len(), 4);
        assert!(scene.volume.is_empty());
        assert_eq!(scene.time_labels[0].text, "03/07");
    }

    #[test]
    fn short_line_is_aligned_by_date() {
        let mut model = model_with(5, false);
        let line = model.add_series(SeriesSpec::moving_average(3));
        model.set_series_data(
            line,
            SeriesData::Line(
                (3..=5)
                    .map(|d| LinePoint { time: TradeDate::new(format!("2024-03-{d:02}")), value: 11.0 })
                    .collect(),
            ),
        );
        let scene = Scene::build(&model);
        assert_eq!(scene.lines.len(), 1);
        assert_eq!(scene.lines[0].points.len(), 3);
        assert!((scene.lines[0].points[0].0 - scene.candles[2].x).abs() < 1e-9);
    }
}
