use js_sys::Promise;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::{ChartSlot, LoadCandlesticksUseCase, RenderChartUseCase};
use crate::config::config;
use crate::domain::{
    chart::ChartOptions,
    errors::AppError,
    logging::LogComponent,
    market_data::{PriceBar, Symbol, TimeFrame, repositories::CandlestickQuery},
};
use crate::infrastructure::{CanvasSurface, StockDataService, http::decode_payload};
use crate::{log_info, log_warn};

/// Chart handle for plain JavaScript hosts.
///
/// ```js
/// const chart = new KlineChartApi("chart", JSON.stringify({ height: 500 }));
/// chart.setBars(JSON.stringify(bars));
/// chart.resize(container.clientWidth);
/// chart.dispose();
/// ```
#[wasm_bindgen]
pub struct KlineChartApi {
    slot: Rc<RefCell<ChartSlot<CanvasSurface>>>,
    renderer: Rc<RefCell<RenderChartUseCase>>,
}

#[wasm_bindgen]
impl KlineChartApi {
    /// Mount a chart in the element with id `container_id`.
    /// `options_json` overrides the configured chart options.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: String, options_json: Option<String>) -> Result<KlineChartApi, JsValue> {
        let options = match options_json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => serde_json::from_str::<ChartOptions>(json)
                .map_err(|e| AppError::Configuration(e.to_string()))?,
            _ => config().chart.clone(),
        };

        let container = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&container_id))
            .ok_or_else(|| AppError::Rendering(format!("container #{container_id} not found")))?;
        let surface = CanvasSurface::attach(&container)?;

        let mut slot = ChartSlot::new();
        slot.mount(surface, container.client_width().max(0) as u32, options);
        log_info!(LogComponent::Presentation("KlineChartApi"), "chart mounted in #{}", container_id);

        let api = Self {
            slot: Rc::new(RefCell::new(slot)),
            renderer: Rc::new(RefCell::new(RenderChartUseCase::new())),
        };
        api.render(Rc::new(Vec::new()))?;
        Ok(api)
    }

    /// Replace the chart data with a JSON array of bars (or a `{code, message, data}` envelope)
    #[wasm_bindgen(js_name = setBars)]
    pub fn set_bars(&self, json: &str) -> Result<(), JsValue> {
        let bars: Vec<PriceBar> = decode_payload(json)?;
        self.render(Rc::new(bars))
    }

    pub fn resize(&self, width: u32) -> Result<(), JsValue> {
        self.slot.borrow_mut().resize(width)?;
        Ok(())
    }

    /// Current lifecycle state: `Uninitialized`, `Mounted` or `Disposed`
    pub fn state(&self) -> String {
        self.slot.borrow().state().to_string()
    }

    pub fn dispose(&self) {
        self.slot.borrow_mut().dispose();
    }

    /// Fetch bars for `symbol` from the data service and show them.
    /// Resolves to the number of bars loaded.
    #[wasm_bindgen(js_name = loadSymbol)]
    pub fn load_symbol(&self, symbol: String, time_frame: String) -> Promise {
        let slot = Rc::clone(&self.slot);
        let renderer = Rc::clone(&self.renderer);

        future_to_promise(load_into(slot, renderer, symbol, time_frame))
    }
}

impl KlineChartApi {
    fn render(&self, bars: Rc<Vec<PriceBar>>) -> Result<(), JsValue> {
        let mut slot = self.slot.borrow_mut();
        self.renderer.borrow_mut().execute(&mut *slot, &bars)?;
        Ok(())
    }
}

async fn load_into(
    slot: Rc<RefCell<ChartSlot<CanvasSurface>>>,
    renderer: Rc<RefCell<RenderChartUseCase>>,
    symbol: String,
    time_frame: String,
) -> Result<JsValue, JsValue> {
    let symbol = Symbol::new(symbol).map_err(AppError::Configuration)?;
    let time_frame = TimeFrame::from_str(&time_frame)
        .map_err(|_| AppError::Configuration(format!("unknown time frame {time_frame:?}")))?;

    let loader = LoadCandlesticksUseCase::new(StockDataService::default());
    let bars = Rc::new(loader.bars(&CandlestickQuery::new(symbol, time_frame)).await);

    let Ok(mut slot) = slot.try_borrow_mut() else {
        log_warn!(LogComponent::Presentation("KlineChartApi"), "chart busy, load dropped");
        return Ok(JsValue::from(0));
    };
    renderer.borrow_mut().execute(&mut *slot, &bars)?;
    Ok(JsValue::from(bars.len() as u32))
}
