use super::value_objects::{LogicalRange, ScaleId, ScaleMargins, SeriesData, SeriesId, SeriesSpec};
use crate::domain::errors::RenderingResult;

/// Port for the stateful drawing surface a chart binding owns.
///
/// Implementations keep whatever native resources they need (canvas, context,
/// listeners) until [`ChartSurface::release`] is called.
pub trait ChartSurface {
    /// Size the drawing area in CSS pixels
    fn apply_size(&mut self, width: u32, height: u32);

    /// Change the width only; height and visible range stay as they are
    fn set_width(&mut self, width: u32);

    fn size(&self) -> (u32, u32);

    fn configure_scale(&mut self, scale: ScaleId, margins: ScaleMargins);

    fn scale_margins(&self, scale: ScaleId) -> Option<ScaleMargins>;

    fn add_series(&mut self, spec: SeriesSpec) -> SeriesId;

    /// Replace the whole data set of `series`
    fn set_series_data(&mut self, series: SeriesId, data: SeriesData);

    /// Drop every series (used when display options change)
    fn clear_series(&mut self);

    /// Show every bar currently registered
    fn fit_content(&mut self);

    fn set_visible_range(&mut self, range: LogicalRange);

    fn visible_range(&self) -> Option<LogicalRange>;

    /// Number of bars on the time axis
    fn bar_count(&self) -> usize;

    fn render(&mut self) -> RenderingResult<()>;

    /// Free native resources. Called at most once by the binding.
    fn release(&mut self);
}

/// A registered container-resize listener
pub trait ResizeSubscription {
    fn cancel(self: Box<Self>);
}

/// Maps values of one scale onto its vertical band of the pane.
///
/// The band is `[top * height, (1 - bottom) * height]`; `value_to_y` maps
/// `max` to the band top and `min` to the band bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScaleLayout {
    pub band_top: f64,
    pub band_bottom: f64,
    pub min: f64,
    pub max: f64,
}

impl PriceScaleLayout {
    pub fn new(margins: ScaleMargins, pane_height: f64, min: f64, max: f64) -> Self {
        let band_top = pane_height * margins.top;
        let band_bottom = pane_height * (1.0 - margins.bottom);
        Self { band_top, band_bottom: band_bottom.max(band_top), min, max }
    }

    pub fn band_height(&self) -> f64 {
        self.band_bottom - self.band_top
    }

    pub fn value_to_y(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return self.band_top + self.band_height() / 2.0;
        }
        let normalized = (value - self.min) / range;
        self.band_bottom - normalized * self.band_height()
    }

    pub fn y_to_value(&self, y: f64) -> f64 {
        if self.band_height() == 0.0 {
            return self.min;
        }
        let normalized = (self.band_bottom - y) / self.band_height();
        self.min + (self.max - self.min) * normalized
    }
}

/// Horizontal spacing of bars inside the visible range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxisLayout {
    pub width: f64,
    pub range: LogicalRange,
}

impl TimeAxisLayout {
    pub fn new(width: f64, range: LogicalRange) -> Self {
        Self { width, range }
    }

    pub fn bar_spacing(&self) -> f64 {
        self.width / self.range.len() as f64
    }

    /// Center x of bar `index`; bars outside the range land off-pane
    pub fn index_to_x(&self, index: usize) -> f64 {
        let offset = index as f64 - self.range.from as f64;
        (offset + 0.5) * self.bar_spacing()
    }

    /// Candle body width: 80% of the spacing, at least one pixel
    pub fn body_width(&self) -> f64 {
        (self.bar_spacing() * 0.8).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_band_respects_margins() {
        let layout = PriceScaleLayout::new(ScaleMargins::PRICE_WITH_VOLUME, 700.0, 10.0, 20.0);
        assert!((layout.value_to_y(20.0) - 35.0).abs() < 1e-9);
        assert!((layout.value_to_y(10.0) - 490.0).abs() < 1e-9);
        assert!((layout.y_to_value(layout.value_to_y(14.5)) - 14.5).abs() < 1e-9);
    }

    #[test]
    fn volume_band_sits_at_bottom() {
        let layout = PriceScaleLayout::new(ScaleMargins::VOLUME, 400.0, 0.0, 1_000.0);
        assert!((layout.band_top - 300.0).abs() < 1e-9);
        assert!((layout.band_bottom - 392.0).abs() < 1e-9);
    }

    #[test]
    fn flat_scale_centers_values() {
        let layout = PriceScaleLayout::new(ScaleMargins::PRICE_ONLY, 100.0, 5.0, 5.0);
        assert!((layout.value_to_y(5.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn bars_are_centered_in_their_slot() {
        let axis = TimeAxisLayout::new(600.0, LogicalRange::new(40, 99));
        assert!((axis.bar_spacing() - 10.0).abs() < 1e-9);
        assert!((axis.index_to_x(40) - 5.0).abs() < 1e-9);
        assert!((axis.index_to_x(99) - 595.0).abs() < 1e-9);
        assert!(axis.index_to_x(10) < 0.0);
    }
}
