//! Ownership of one chart surface per mounted view.
//!
//! [`ChartBinding::configure`] hands back an owned handle; every later
//! operation goes through it and [`ChartBinding::dispose`] is the one place
//! native resources are released. [`ChartSlot`] wraps the handle for UI code
//! that receives events before the container exists or after teardown.

use crate::domain::chart::{
    ChartOptions, ChartSurface, DerivedSeries, HistogramPoint, LogicalRange, ResizeSubscription,
    ScaleId, ScaleMargins, SeriesData, SeriesId, SeriesSpec, volume_color,
};
use crate::domain::errors::RenderingResult;
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_info, log_warn};
use derive_more::Display;
use std::collections::BTreeMap;

/// Smallest number of bars a zoom can narrow the view to
pub const MIN_VISIBLE_BARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BindingState {
    Uninitialized,
    Mounted,
    Disposed,
}

/// Series created on the surface for the current options
#[derive(Debug, Clone, PartialEq)]
struct SeriesHandles {
    candles: SeriesId,
    volume: Option<SeriesId>,
    averages: BTreeMap<usize, SeriesId>,
}

impl SeriesHandles {
    fn create<S: ChartSurface>(surface: &mut S, options: &ChartOptions) -> Self {
        let candles = surface.add_series(SeriesSpec::candles());
        let volume = options.show_volume.then(|| surface.add_series(SeriesSpec::volume()));
        let averages = options
            .windows()
            .into_iter()
            .map(|window| (window, surface.add_series(SeriesSpec::moving_average(window))))
            .collect();
        Self { candles, volume, averages }
    }
}

fn layout_scales<S: ChartSurface>(surface: &mut S, options: &ChartOptions) {
    surface.configure_scale(ScaleId::Right, options.price_margins());
    if options.show_volume {
        surface.configure_scale(ScaleId::Volume, ScaleMargins::VOLUME);
    }
}

/// Owned handle to a mounted chart surface
pub struct ChartBinding<S: ChartSurface> {
    surface: Option<S>,
    options: ChartOptions,
    handles: SeriesHandles,
    resize_subscription: Option<Box<dyn ResizeSubscription>>,
}

impl<S: ChartSurface> ChartBinding<S> {
    /// Size `surface` to the container, lay out the scales and create the series.
    pub fn configure(mut surface: S, container_width: u32, options: ChartOptions) -> Self {
        surface.apply_size(container_width, options.height);
        layout_scales(&mut surface, &options);
        let handles = SeriesHandles::create(&mut surface, &options);

        log_info!(
            LogComponent::Application("ChartBinding"),
            "configured {}x{} surface (volume: {}, windows: {:?})",
            container_width,
            options.height,
            options.show_volume,
            options.windows()
        );

        Self { surface: Some(surface), options, handles, resize_subscription: None }
    }

    /// Keep `subscription` alive until dispose. A disposed binding cancels it right away.
    pub fn attach_resize_subscription(&mut self, subscription: Box<dyn ResizeSubscription>) {
        if self.surface.is_none() {
            subscription.cancel();
            return;
        }
        if let Some(previous) = self.resize_subscription.replace(subscription) {
            previous.cancel();
        }
    }

    pub fn state(&self) -> BindingState {
        if self.surface.is_some() { BindingState::Mounted } else { BindingState::Disposed }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Replace every series' data and reset the visible range.
    ///
    /// The view shows all bars, or only the last `visible_bars` when there
    /// are more; the full series stays registered for scrolling.
    pub fn set_data(&mut self, derived: &DerivedSeries) -> RenderingResult<()> {
        let Some(surface) = self.surface.as_mut() else {
            log_warn!(LogComponent::Application("ChartBinding"), "set_data after dispose ignored");
            return Ok(());
        };

        surface.set_series_data(self.handles.candles, SeriesData::Candles(derived.candles.clone()));

        if let Some(volume) = self.handles.volume {
            let bars = derived
                .volume_bars
                .iter()
                .map(|bar| HistogramPoint {
                    time: bar.time.clone(),
                    value: bar.value,
                    color: volume_color(bar.direction),
                })
                .collect();
            surface.set_series_data(volume, SeriesData::Histogram(bars));
        }

        for (&window, &series) in &self.handles.averages {
            let points = derived.moving_average(window).to_vec();
            surface.set_series_data(series, SeriesData::Line(points));
        }

        surface.fit_content();
        if derived.len() > self.options.visible_bars {
            if let Some(range) = LogicalRange::last(derived.len(), self.options.visible_bars) {
                surface.set_visible_range(range);
            }
        }

        log_debug!(
            LogComponent::Application("ChartBinding"),
            "pushed {} bars, visible {:?}",
            derived.len(),
            surface.visible_range()
        );

        surface.render()
    }

    /// Follow a container width change. Height and visible range are untouched.
    pub fn resize(&mut self, width: u32) -> RenderingResult<()> {
        let Some(surface) = self.surface.as_mut() else {
            log_debug!(LogComponent::Application("ChartBinding"), "resize after dispose ignored");
            return Ok(());
        };
        if surface.size().0 == width {
            return Ok(());
        }
        surface.set_width(width);
        surface.render()
    }

    /// Rebuild scales and series for new display options.
    ///
    /// Series come back empty; the caller pushes data again with [`Self::set_data`].
    pub fn update_options(&mut self, options: ChartOptions) {
        let Some(surface) = self.surface.as_mut() else {
            log_warn!(LogComponent::Application("ChartBinding"), "update_options after dispose ignored");
            return;
        };
        let (width, height) = surface.size();
        if height != options.height {
            surface.apply_size(width, options.height);
        }
        surface.clear_series();
        layout_scales(surface, &options);
        self.handles = SeriesHandles::create(surface, &options);
        self.options = options;
    }

    /// Move the view by `bars` (positive = towards newer bars)
    pub fn scroll(&mut self, bars: isize) -> RenderingResult<()> {
        self.adjust_range(|range, count| range.pan(bars, count))
    }

    /// Zoom in (`factor > 1`) or out around `anchor` (0 = left, 1 = right edge)
    pub fn zoom(&mut self, factor: f64, anchor: f64) -> RenderingResult<()> {
        self.adjust_range(|range, count| range.zoom(factor, anchor, count, MIN_VISIBLE_BARS))
    }

    fn adjust_range(
        &mut self,
        change: impl FnOnce(LogicalRange, usize) -> LogicalRange,
    ) -> RenderingResult<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let Some(range) = surface.visible_range() else {
            return Ok(());
        };
        let next = change(range, surface.bar_count());
        if next == range {
            return Ok(());
        }
        surface.set_visible_range(next);
        surface.render()
    }

    /// Release the surface and cancel the resize subscription. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.resize_subscription.take() {
            subscription.cancel();
        }
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            log_info!(LogComponent::Application("ChartBinding"), "chart surface disposed");
        }
    }
}

impl<S: ChartSurface> Drop for ChartBinding<S> {
    fn drop(&mut self) {
        if self.surface.is_some() {
            log_warn!(
                LogComponent::Application("ChartBinding"),
                "binding dropped while mounted; releasing surface"
            );
            self.dispose();
        }
    }
}

/// Chart handle as seen from the UI: empty until the container shows up,
/// terminal once disposed.
pub enum ChartSlot<S: ChartSurface> {
    Uninitialized,
    Mounted(ChartBinding<S>),
    Disposed,
}

impl<S: ChartSurface> Default for ChartSlot<S> {
    fn default() -> Self {
        ChartSlot::Uninitialized
    }
}

impl<S: ChartSurface> ChartSlot<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BindingState {
        match self {
            ChartSlot::Uninitialized => BindingState::Uninitialized,
            ChartSlot::Mounted(binding) => binding.state(),
            ChartSlot::Disposed => BindingState::Disposed,
        }
    }

    /// Configure a binding on `surface`. Returns `false` (and releases
    /// `surface`) when the slot is already mounted or disposed.
    pub fn mount(&mut self, mut surface: S, container_width: u32, options: ChartOptions) -> bool {
        match self {
            ChartSlot::Uninitialized => {
                *self = ChartSlot::Mounted(ChartBinding::configure(surface, container_width, options));
                true
            }
            ChartSlot::Mounted(_) | ChartSlot::Disposed => {
                log_warn!(
                    LogComponent::Application("ChartSlot"),
                    "mount ignored in state {}",
                    self.state()
                );
                surface.release();
                false
            }
        }
    }

    pub fn binding(&self) -> Option<&ChartBinding<S>> {
        match self {
            ChartSlot::Mounted(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn binding_mut(&mut self) -> Option<&mut ChartBinding<S>> {
        match self {
            ChartSlot::Mounted(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn set_data(&mut self, derived: &DerivedSeries) -> RenderingResult<()> {
        match self.binding_mut() {
            Some(binding) => binding.set_data(derived),
            None => {
                log_debug!(LogComponent::Application("ChartSlot"), "set_data before mount ignored");
                Ok(())
            }
        }
    }

    pub fn resize(&mut self, width: u32) -> RenderingResult<()> {
        self.binding_mut().map_or(Ok(()), |binding| binding.resize(width))
    }

    pub fn update_options(&mut self, options: ChartOptions) {
        if let Some(binding) = self.binding_mut() {
            binding.update_options(options);
        }
    }

    pub fn scroll(&mut self, bars: isize) -> RenderingResult<()> {
        self.binding_mut().map_or(Ok(()), |binding| binding.scroll(bars))
    }

    pub fn zoom(&mut self, factor: f64, anchor: f64) -> RenderingResult<()> {
        self.binding_mut().map_or(Ok(()), |binding| binding.zoom(factor, anchor))
    }

    /// Tear down and move to the terminal state
    pub fn dispose(&mut self) {
        if let ChartSlot::Mounted(binding) = self {
            binding.dispose();
        }
        *self = ChartSlot::Disposed;
    }
}
