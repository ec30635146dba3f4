use crate::domain::chart::{
    LogicalRange, ScaleId, ScaleMargins, SeriesData, SeriesId, SeriesRole, SeriesSpec,
};
use crate::domain::market_data::TradeDate;
use std::collections::HashMap;

/// One series registered on a surface
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry {
    pub id: SeriesId,
    pub spec: SeriesSpec,
    pub data: SeriesData,
}

/// Browser-independent state shared by every surface implementation:
/// size, scale layout, series data and the visible logical range.
#[derive(Debug, Clone, Default)]
pub struct SurfaceModel {
    pub width: u32,
    pub height: u32,
    margins: HashMap<ScaleId, ScaleMargins>,
    series: Vec<SeriesEntry>,
    next_id: usize,
    visible: Option<LogicalRange>,
}

impl SurfaceModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn configure_scale(&mut self, scale: ScaleId, margins: ScaleMargins) {
        self.margins.insert(scale, margins);
    }

    pub fn margins(&self, scale: ScaleId) -> Option<ScaleMargins> {
        self.margins.get(&scale).copied()
    }

    pub fn add_series(&mut self, spec: SeriesSpec) -> SeriesId {
        let id = SeriesId(self.next_id);
        self.next_id += 1;
        let data = match spec.role {
            SeriesRole::Candles => SeriesData::Candles(Vec::new()),
            SeriesRole::Volume => SeriesData::Histogram(Vec::new()),
            SeriesRole::MovingAverage(_) => SeriesData::Line(Vec::new()),
        };
        self.series.push(SeriesEntry { id, spec, data });
        id
    }

    /// Returns `false` when `id` is unknown (e.g. cleared by an options change)
    pub fn set_series_data(&mut self, id: SeriesId, data: SeriesData) -> bool {
        match self.series.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.data = data;
                true
            }
            None => false,
        }
    }

    pub fn clear_series(&mut self) {
        self.series.clear();
        self.margins.remove(&ScaleId::Volume);
    }

    pub fn series(&self) -> &[SeriesEntry] {
        &self.series
    }

    pub fn series_by_role(&self, role: SeriesRole) -> Option<&SeriesEntry> {
        self.series.iter().find(|entry| entry.spec.role == role)
    }

    /// Dates on the time axis: the candle series when present
    pub fn axis_times(&self) -> Vec<&TradeDate> {
        if let Some(SeriesEntry { data: SeriesData::Candles(points), .. }) =
            self.series_by_role(SeriesRole::Candles)
        {
            return points.iter().map(|p| &p.time).collect();
        }
        Vec::new()
    }

    pub fn bar_count(&self) -> usize {
        match self.series_by_role(SeriesRole::Candles) {
            Some(entry) => entry.data.len(),
            None => self.series.iter().map(|entry| entry.data.len()).max().unwrap_or(0),
        }
    }

    pub fn fit_content(&mut self) {
        self.visible = LogicalRange::fit(self.bar_count());
    }

    pub fn set_visible_range(&mut self, range: LogicalRange) {
        let count = self.bar_count();
        self.visible = if count == 0 {
            Some(range)
        } else {
            let to = range.to.min(count - 1);
            Some(LogicalRange::new(range.from.min(to), to))
        };
    }

    pub fn visible_range(&self) -> Option<LogicalRange> {
        self.visible
    }

    /// Visible range clamped to the current data, `None` when nothing to show
    pub fn effective_range(&self) -> Option<LogicalRange> {
        let count = self.bar_count();
        if count == 0 {
            return None;
        }
        let range = self.visible.unwrap_or(LogicalRange::new(0, count - 1));
        let to = range.to.min(count - 1);
        Some(LogicalRange::new(range.from.min(to), to))
    }
}

/// Bar index of `time` on an ascending axis
pub fn index_of(axis: &[&TradeDate], time: &TradeDate) -> Option<usize> {
    axis.binary_search_by(|probe| (*probe).cmp(time)).ok()
}
