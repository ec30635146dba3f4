use super::PriceBar;
use crate::domain::chart::{CandlePoint, DerivedSeries, LinePoint, VolumePoint};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use std::collections::BTreeMap;

/// Decimal places used for every displayed price and average
pub const PRICE_DECIMALS: i32 = 2;

/// Round half away from zero at `decimals` places.
///
/// The value is shifted through its decimal text form, so `1.005` rounds to
/// `1.01` instead of falling victim to its binary representation.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals);
    let shifted = format!("{value}e{decimals}").parse::<f64>().unwrap_or(value * scale);
    let rounded = shifted.round();
    format!("{rounded}e{}", -decimals).parse::<f64>().unwrap_or(rounded / scale)
}

pub fn round_price(value: f64) -> f64 {
    round_to(value, PRICE_DECIMALS)
}

/// Domain service turning raw bars into the series a chart draws.
///
/// Pure: the output depends only on the arguments. Bars are expected in
/// ascending date order; the transformer neither sorts nor checks them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesTransformer;

impl SeriesTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Candles, volume bars and one moving average per requested window
    pub fn transform(&self, bars: &[PriceBar], windows: &[usize]) -> DerivedSeries {
        let candles = self.candles(bars);
        let volume_bars = self.volume_bars(bars);

        let mut moving_averages = BTreeMap::new();
        for &window in windows {
            moving_averages
                .entry(window)
                .or_insert_with(|| self.moving_average(bars, window));
        }

        log_debug!(
            LogComponent::Domain("SeriesTransformer"),
            "derived {} candles, windows {:?}",
            candles.len(),
            moving_averages.keys().collect::<Vec<_>>()
        );

        DerivedSeries { candles, volume_bars, moving_averages }
    }

    pub fn candles(&self, bars: &[PriceBar]) -> Vec<CandlePoint> {
        bars.iter()
            .map(|bar| CandlePoint {
                time: bar.date.clone(),
                open: round_price(bar.open.value()),
                high: round_price(bar.high.value()),
                low: round_price(bar.low.value()),
                close: round_price(bar.close.value()),
            })
            .collect()
    }

    /// Volume is passed through unrounded
    pub fn volume_bars(&self, bars: &[PriceBar]) -> Vec<VolumePoint> {
        bars.iter()
            .map(|bar| VolumePoint {
                time: bar.date.clone(),
                value: bar.volume.value(),
                direction: bar.direction(),
            })
            .collect()
    }

    /// Trailing simple moving average of closes.
    ///
    /// Point `k` averages bars `k..=k + window - 1` and carries the date of
    /// bar `k + window - 1`. Yields nothing when `window` is zero or longer
    /// than the input.
    pub fn moving_average(&self, bars: &[PriceBar], window: usize) -> Vec<LinePoint> {
        if window == 0 || bars.len() < window {
            return Vec::new();
        }

        (window - 1..bars.len())
            .map(|i| {
                let sum: f64 = bars[i + 1 - window..=i].iter().map(|bar| bar.close.value()).sum();
                LinePoint {
                    time: bars[i].date.clone(),
                    value: round_price(sum / window as f64),
                }
            })
            .collect()
    }
}
