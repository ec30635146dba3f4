use crate::domain::market_data::{Direction, TradeDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Candle body + wicks at one time point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlePoint {
    pub time: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandlePoint {
    pub fn direction(&self) -> Direction {
        if self.close >= self.open { Direction::Up } else { Direction::Down }
    }
}

/// Volume histogram bar, colored by the bar's direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub time: TradeDate,
    pub value: f64,
    pub direction: Direction,
}

/// One point of a line series (moving averages)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub time: TradeDate,
    pub value: f64,
}

/// Everything the chart needs, derived from one bar sequence.
///
/// `moving_averages[w]` holds `max(0, n - w + 1)` points; each point is
/// stamped with the date of the last bar in its window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedSeries {
    pub candles: Vec<CandlePoint>,
    pub volume_bars: Vec<VolumePoint>,
    pub moving_averages: BTreeMap<usize, Vec<LinePoint>>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Points for `window`, empty when it was not requested
    pub fn moving_average(&self, window: usize) -> &[LinePoint] {
        self.moving_averages.get(&window).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn windows(&self) -> impl Iterator<Item = usize> + '_ {
        self.moving_averages.keys().copied()
    }
}
