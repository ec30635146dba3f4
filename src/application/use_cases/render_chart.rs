use crate::application::chart_binding::ChartSlot;
use crate::domain::{
    chart::{ChartSurface, DerivedSeries},
    errors::RenderingResult,
    market_data::{PriceBar, SeriesTransformer},
};
use std::rc::Rc;

/// Use Case: bars in, pixels out.
///
/// Recomputes the derived series only when handed a different bar sequence
/// (compared by `Rc` identity), then replaces the chart's data.
#[derive(Default)]
pub struct RenderChartUseCase {
    transformer: SeriesTransformer,
    cached: Option<(Rc<Vec<PriceBar>>, Vec<usize>, Rc<DerivedSeries>)>,
}

impl RenderChartUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived series for `bars`, reusing the previous result for the same input
    pub fn derive(&mut self, bars: &Rc<Vec<PriceBar>>, windows: &[usize]) -> Rc<DerivedSeries> {
        if let Some((cached_bars, cached_windows, derived)) = &self.cached {
            if Rc::ptr_eq(cached_bars, bars) && cached_windows.as_slice() == windows {
                return Rc::clone(derived);
            }
        }
        let derived = Rc::new(self.transformer.transform(bars, windows));
        self.cached = Some((Rc::clone(bars), windows.to_vec(), Rc::clone(&derived)));
        derived
    }

    pub fn execute<S: ChartSurface>(
        &mut self,
        slot: &mut ChartSlot<S>,
        bars: &Rc<Vec<PriceBar>>,
    ) -> RenderingResult<()> {
        let windows = match slot.binding() {
            Some(binding) => binding.options().windows(),
            None => return slot.set_data(&DerivedSeries::default()),
        };
        let derived = self.derive(bars, &windows);
        slot.set_data(&derived)
    }
}
