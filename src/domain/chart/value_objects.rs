use super::entities::{CandlePoint, LinePoint};
use crate::domain::market_data::{Direction, TradeDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Bars shown on first load when the data set is longer than this
pub const DEFAULT_VISIBLE_BARS: usize = 60;
/// Moving averages drawn by the dashboard
pub const DEFAULT_MA_WINDOWS: [usize; 2] = [30, 120];
pub const DEFAULT_CHART_HEIGHT: u32 = 600;

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn to_hex(&self) -> u32 {
        let r = (self.r * 255.0).round() as u32;
        let g = (self.g * 255.0).round() as u32;
        let b = (self.b * 255.0).round() as u32;
        (r << 16) | (g << 8) | b
    }

    pub const fn with_alpha(&self, alpha: f32) -> Self {
        Self { r: self.r, g: self.g, b: self.b, a: alpha }
    }

    /// CSS color string: `#rrggbb` when opaque, `rgba(..)` otherwise
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:06x}", self.to_hex())
        } else {
            let hex = self.to_hex();
            format!(
                "rgba({}, {}, {}, {})",
                (hex >> 16) & 0xFF,
                (hex >> 8) & 0xFF,
                hex & 0xFF,
                self.a
            )
        }
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Fixed chart palette
pub mod palette {
    use super::Color;

    pub const CANDLE_UP: Color = Color::from_hex(0xef5350);
    pub const CANDLE_DOWN: Color = Color::from_hex(0x26a69a);
    pub const VOLUME_UP: Color = CANDLE_UP.with_alpha(0.3);
    pub const VOLUME_DOWN: Color = CANDLE_DOWN.with_alpha(0.3);
    pub const TEXT: Color = Color::from_hex(0x7c8798);
    pub const GRID: Color = Color::from_hex(0xf5f5f5);
    pub const BORDER: Color = Color::from_hex(0xeeeeee);

    /// Fallback line colors for windows without a dedicated one
    pub const LINE_FALLBACK: [Color; 4] = [
        Color::from_hex(0xE67E22),
        Color::from_hex(0x9B59B6),
        Color::from_hex(0x34495E),
        Color::from_hex(0xC0392B),
    ];
}

/// Stable color for a moving-average window
pub fn ma_color(window: usize) -> Color {
    match window {
        5 => Color::from_hex(0xF5A623),
        10 => Color::from_hex(0x7B61FF),
        20 => Color::from_hex(0x2D9CDB),
        30 => Color::from_hex(0xFF6B6B),
        60 => Color::from_hex(0x27AE60),
        120 => Color::from_hex(0x4ECDC4),
        w => palette::LINE_FALLBACK[w % palette::LINE_FALLBACK.len()],
    }
}

pub fn candle_color(direction: Direction) -> Color {
    match direction {
        Direction::Up => palette::CANDLE_UP,
        Direction::Down => palette::CANDLE_DOWN,
    }
}

pub fn volume_color(direction: Direction) -> Color {
    match direction {
        Direction::Up => palette::VOLUME_UP,
        Direction::Down => palette::VOLUME_DOWN,
    }
}

/// Fractions of the pane height kept free above and below a scale's band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

impl ScaleMargins {
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Price scale when the volume band is shown below it
    pub const PRICE_WITH_VOLUME: ScaleMargins = ScaleMargins::new(0.05, 0.3);
    pub const PRICE_ONLY: ScaleMargins = ScaleMargins::new(0.05, 0.05);
    pub const VOLUME: ScaleMargins = ScaleMargins::new(0.75, 0.02);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ScaleId {
    #[display(fmt = "right")]
    Right,
    #[display(fmt = "volume")]
    Volume,
}

/// What a series represents; decides how the surface draws it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SeriesRole {
    #[display(fmt = "candles")]
    Candles,
    #[display(fmt = "volume")]
    Volume,
    #[display(fmt = "MA{}", _0)]
    MovingAverage(usize),
}

/// Creation parameters for one series on the surface
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub role: SeriesRole,
    pub scale: ScaleId,
    pub color: Color,
    pub line_width: f64,
}

impl SeriesSpec {
    pub fn candles() -> Self {
        Self {
            role: SeriesRole::Candles,
            scale: ScaleId::Right,
            color: palette::CANDLE_UP,
            line_width: 1.0,
        }
    }

    pub fn volume() -> Self {
        Self {
            role: SeriesRole::Volume,
            scale: ScaleId::Volume,
            color: palette::VOLUME_UP,
            line_width: 0.0,
        }
    }

    pub fn moving_average(window: usize) -> Self {
        Self {
            role: SeriesRole::MovingAverage(window),
            scale: ScaleId::Right,
            color: ma_color(window),
            line_width: 2.0,
        }
    }
}

/// Handle to a series created on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPoint {
    pub time: TradeDate,
    pub value: f64,
    pub color: Color,
}

/// Full data set for a series; the surface always replaces, never appends
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Candles(Vec<CandlePoint>),
    Histogram(Vec<HistogramPoint>),
    Line(Vec<LinePoint>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Candles(points) => points.len(),
            SeriesData::Histogram(points) => points.len(),
            SeriesData::Line(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inclusive range of bar indices visible on the time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalRange {
    pub from: usize,
    pub to: usize,
}

impl LogicalRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from: from.min(to), to: from.max(to) }
    }

    /// Everything, or `None` for an empty series
    pub fn fit(count: usize) -> Option<Self> {
        (count > 0).then(|| Self::new(0, count - 1))
    }

    /// The most recent `bars` indices (all of them when the series is shorter)
    pub fn last(count: usize, bars: usize) -> Option<Self> {
        if count == 0 || bars == 0 {
            return None;
        }
        Some(Self::new(count.saturating_sub(bars), count - 1))
    }

    pub fn len(&self) -> usize {
        self.to - self.from + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.from..=self.to).contains(&index)
    }

    /// Shift by `delta` bars keeping the width, clamped to `[0, count)`.
    pub fn pan(&self, delta: isize, count: usize) -> Self {
        if count == 0 {
            return *self;
        }
        let width = self.len().min(count);
        let max_from = count - width;
        let from = (self.from as isize + delta).clamp(0, max_from as isize) as usize;
        Self::new(from, from + width - 1)
    }

    /// Scale the width by `1 / factor` around `anchor` (0 = left edge, 1 = right edge).
    pub fn zoom(&self, factor: f64, anchor: f64, count: usize, min_bars: usize) -> Self {
        if count == 0 || !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let anchor = anchor.clamp(0.0, 1.0);
        let current = self.len() as f64;
        let width = ((current / factor).round() as usize).clamp(min_bars.max(1).min(count), count);
        let pivot = self.from as f64 + (current - 1.0) * anchor;
        let from = (pivot - (width as f64 - 1.0) * anchor).round().max(0.0) as usize;
        let from = from.min(count - width);
        Self::new(from, from + width - 1)
    }
}

/// Display options for one chart view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub height: u32,
    pub show_volume: bool,
    pub ma_windows: Vec<usize>,
    pub visible_bars: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            height: DEFAULT_CHART_HEIGHT,
            show_volume: true,
            ma_windows: DEFAULT_MA_WINDOWS.to_vec(),
            visible_bars: DEFAULT_VISIBLE_BARS,
        }
    }
}

impl ChartOptions {
    pub fn price_margins(&self) -> ScaleMargins {
        if self.show_volume { ScaleMargins::PRICE_WITH_VOLUME } else { ScaleMargins::PRICE_ONLY }
    }

    /// Requested windows, deduplicated, in ascending order
    pub fn windows(&self) -> Vec<usize> {
        let mut windows = self.ma_windows.clone();
        windows.sort_unstable();
        windows.dedup();
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_strings() {
        assert_eq!(palette::CANDLE_UP.to_css(), "#ef5350");
        assert_eq!(palette::VOLUME_DOWN.to_css(), "rgba(38, 166, 154, 0.3)");
    }

    #[test]
    fn ma_colors_are_stable() {
        assert_eq!(ma_color(30), ma_color(30));
        assert_eq!(ma_color(30).to_css(), "#ff6b6b");
        assert_eq!(ma_color(120).to_css(), "#4ecdc4");
        assert_eq!(ma_color(7), ma_color(7));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: ChartOptions = serde_json::from_str(r#"{"showVolume":false,"maWindows":[5,5,10]}"#).unwrap();
        assert_eq!(opts.height, DEFAULT_CHART_HEIGHT);
        assert!(!opts.show_volume);
        assert_eq!(opts.windows(), vec![5, 10]);
        assert_eq!(opts.price_margins(), ScaleMargins::PRICE_ONLY);
    }
}
