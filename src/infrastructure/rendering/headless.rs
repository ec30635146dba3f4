use super::scene::Scene;
use super::surface_model::SurfaceModel;
use crate::domain::chart::{
    ChartSurface, LogicalRange, ScaleId, ScaleMargins, SeriesData, SeriesId, SeriesSpec,
};
use crate::domain::errors::RenderingResult;
use crate::domain::logging::LogComponent;
use crate::log_warn;
use std::cell::RefCell;
use std::rc::Rc;

/// Counters that outlive the surface, so callers can check release after
/// the owning binding dropped it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    pub renders: usize,
    pub releases: usize,
}

/// In-memory surface. Lays out every frame like the canvas does but keeps
/// the result instead of painting it; used natively and in tests.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    model: SurfaceModel,
    stats: Rc<RefCell<SurfaceStats>>,
    last_scene: Option<Scene>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        let mut surface = Self::default();
        surface.model.set_size(width, height);
        surface
    }

    pub fn stats_handle(&self) -> Rc<RefCell<SurfaceStats>> {
        Rc::clone(&self.stats)
    }

    pub fn model(&self) -> &SurfaceModel {
        &self.model
    }

    pub fn render_count(&self) -> usize {
        self.stats.borrow().renders
    }

    pub fn last_scene(&self) -> Option<&Scene> {
        self.last_scene.as_ref()
    }
}

impl ChartSurface for HeadlessSurface {
    fn apply_size(&mut self, width: u32, height: u32) {
        self.model.set_size(width, height);
    }

    fn set_width(&mut self, width: u32) {
        self.model.width = width;
    }

    fn size(&self) -> (u32, u32) {
        (self.model.width, self.model.height)
    }

    fn configure_scale(&mut self, scale: ScaleId, margins: ScaleMargins) {
        self.model.configure_scale(scale, margins);
    }

    fn scale_margins(&self, scale: ScaleId) -> Option<ScaleMargins> {
        self.model.margins(scale)
    }

    fn add_series(&mut self, spec: SeriesSpec) -> SeriesId {
        self.model.add_series(spec)
    }

    fn set_series_data(&mut self, series: SeriesId, data: SeriesData) {
        if !self.model.set_series_data(series, data) {
            log_warn!(LogComponent::Infrastructure("HeadlessSurface"), "unknown series {:?}", series);
        }
    }

    fn clear_series(&mut self) {
        self.model.clear_series();
    }

    fn fit_content(&mut self) {
        self.model.fit_content();
    }

    fn set_visible_range(&mut self, range: LogicalRange) {
        self.model.set_visible_range(range);
    }

    fn visible_range(&self) -> Option<LogicalRange> {
        self.model.visible_range()
    }

    fn bar_count(&self) -> usize {
        self.model.bar_count()
    }

    fn render(&mut self) -> RenderingResult<()> {
        self.last_scene = Some(Scene::build(&self.model));
        self.stats.borrow_mut().renders += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.stats.borrow_mut().releases += 1;
        self.last_scene = None;
    }
}
