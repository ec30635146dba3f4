use leptos::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use strum::IntoEnumIterator;

use crate::{
    application::{BindingState, ChartSlot, LoadCandlesticksUseCase},
    domain::{
        chart::{ChartOptions, DEFAULT_CHART_HEIGHT, DEFAULT_MA_WINDOWS, DEFAULT_VISIBLE_BARS, DerivedSeries, ma_color},
        logging::LogComponent,
        market_data::{PriceBar, SeriesTransformer, Symbol, TimeFrame, repositories::CandlestickQuery},
    },
    event_utils::{EventListenerHandle, EventOptions, event_listener_with_options, window_event_listener_with_options},
    infrastructure::{CanvasSurface, StockDataService},
    log_debug, log_error, log_info,
};
use crate::domain::chart::ResizeSubscription;

/// Index shown on the dashboard
pub const DEFAULT_SYMBOL: &str = "SH000001";
/// Height of the dashboard chart
pub const DASHBOARD_CHART_HEIGHT: u32 = 700;

const WHEEL_ZOOM_STEP: f64 = 1.1;
/// Horizontal wheel pixels per scrolled bar
const WHEEL_PIXELS_PER_BAR: f64 = 20.0;

type SharedSlot = Rc<RefCell<ChartSlot<CanvasSurface>>>;

/// A-share dashboard: time-frame switcher and the index chart
#[component]
pub fn App() -> impl IntoView {
    let (time_frame, set_time_frame) = create_signal(TimeFrame::Daily);
    let (bars, set_bars) = create_signal(Rc::new(Vec::<PriceBar>::new()));

    create_effect(move |_| {
        let frame = time_frame.get();
        spawn_local(async move {
            let loader = LoadCandlesticksUseCase::new(StockDataService::default());
            let query = CandlestickQuery::new(Symbol::from(DEFAULT_SYMBOL), frame);
            let loaded = loader.bars(&query).await;
            // A newer request owns the chart now
            if time_frame.get_untracked() == frame {
                set_bars.set(Rc::new(loaded));
            }
        });
    });

    view! {
        <style>
            {r#"
            .kline-app {
                font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
                min-height: 100vh;
                padding: 24px 16px;
                color: #111827;
            }

            .kline-app h1 {
                font-size: 30px;
                font-weight: 600;
                margin: 0 0 24px;
                letter-spacing: -0.01em;
            }

            .kline-card {
                width: 50%;
                background: #ffffff;
                border: 1px solid #f3f4f6;
                border-radius: 12px;
                box-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);
                padding: 24px;
            }

            .frame-buttons {
                display: flex;
                gap: 8px;
                margin-bottom: 16px;
            }

            .frame-btn {
                padding: 8px 16px;
                border: none;
                border-radius: 8px;
                font-size: 14px;
                font-weight: 500;
                cursor: pointer;
                background: #f9fafb;
                color: #374151;
            }

            .frame-btn:hover {
                background: #f3f4f6;
            }

            .frame-btn.active {
                background: #2563eb;
                color: #ffffff;
            }

            .kline-chart {
                position: relative;
            }

            .kline-chart-header {
                position: absolute;
                top: 8px;
                left: 8px;
                z-index: 10;
                display: flex;
                align-items: center;
                gap: 16px;
                font-size: 14px;
                pointer-events: none;
            }

            .kline-chart-title {
                color: #7c8798;
                font-weight: 500;
            }

            .kline-legend {
                display: flex;
                gap: 12px;
                font-size: 12px;
                color: #4b5563;
            }

            .kline-legend-item {
                display: flex;
                align-items: center;
                gap: 4px;
            }

            .kline-legend-swatch {
                display: inline-block;
                width: 12px;
                height: 2px;
            }
            "#}
        </style>
        <div class="kline-app">
            <h1>"A股"</h1>
            <div class="kline-card">
                <div class="frame-buttons">
                    {TimeFrame::iter()
                        .map(|frame| {
                            view! {
                                <button
                                    class="frame-btn"
                                    class:active=move || time_frame.get() == frame
                                    on:click=move |_| set_time_frame.set(frame)
                                >
                                    {frame.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <CandlestickChart
                    bars=bars
                    symbol=DEFAULT_SYMBOL
                    time_frame=time_frame
                    height=DASHBOARD_CHART_HEIGHT
                />
            </div>
        </div>
    }
}

/// Candlestick chart with volume and moving averages.
///
/// The chart is created once the container is in the DOM, gets its data
/// replaced whenever `bars` changes and is disposed with the component.
#[component]
pub fn CandlestickChart(
    #[prop(into)] bars: Signal<Rc<Vec<PriceBar>>>,
    #[prop(into)] symbol: String,
    #[prop(into)] time_frame: MaybeSignal<TimeFrame>,
    #[prop(default = DEFAULT_CHART_HEIGHT)] height: u32,
    #[prop(default = true)] show_volume: bool,
    #[prop(default = DEFAULT_MA_WINDOWS.to_vec())] ma_windows: Vec<usize>,
) -> impl IntoView {
    let options = ChartOptions { height, show_volume, ma_windows, visible_bars: DEFAULT_VISIBLE_BARS };
    let windows = options.windows();
    let container_ref = create_node_ref::<html::Div>();
    let slot: SharedSlot = Rc::new(RefCell::new(ChartSlot::new()));

    let derived = {
        let windows = windows.clone();
        let transformer = SeriesTransformer::new();
        create_memo(move |_| Rc::new(transformer.transform(&bars.get(), &windows)))
    };

    create_effect({
        let slot = Rc::clone(&slot);
        move |_| {
            let derived: Rc<DerivedSeries> = derived.get();
            let Some(container) = container_ref.get() else {
                return;
            };
            let element: web_sys::Element = (*container).clone().into();
            let state = slot.borrow().state();
            match state {
                BindingState::Disposed => return,
                BindingState::Uninitialized if !mount_chart(&slot, &element, options.clone()) => return,
                _ => {}
            }
            if let Err(e) = slot.borrow_mut().set_data(&derived) {
                log_error!(LogComponent::Presentation("CandlestickChart"), "render failed: {}", e);
            }
        }
    });

    on_cleanup({
        let slot = Rc::clone(&slot);
        move || {
            slot.borrow_mut().dispose();
            log_debug!(LogComponent::Presentation("CandlestickChart"), "chart cleaned up");
        }
    });

    let legend = windows
        .into_iter()
        .map(|window| {
            let swatch = format!("background: {}", ma_color(window).to_css());
            view! {
                <span class="kline-legend-item">
                    <span class="kline-legend-swatch" style=swatch></span>
                    <span>{format!("MA{window}")}</span>
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="kline-chart">
            <div class="kline-chart-header">
                <span class="kline-chart-title">
                    {move || format!("{} - {}", symbol, time_frame.get().label())}
                </span>
                <div class="kline-legend">{legend}</div>
            </div>
            <div node_ref=container_ref style="width: 100%"></div>
        </div>
    }
}

/// Attach a canvas to `container`, mount it in `slot` and hook up window
/// resize plus wheel navigation. Returns `false` when nothing was mounted.
fn mount_chart(slot: &SharedSlot, container: &web_sys::Element, options: ChartOptions) -> bool {
    let surface = match CanvasSurface::attach(container) {
        Ok(surface) => surface,
        Err(e) => {
            log_error!(LogComponent::Presentation("CandlestickChart"), "cannot create chart: {}", e);
            return false;
        }
    };
    let width = container.client_width().max(0) as u32;
    if !slot.borrow_mut().mount(surface, width, options) {
        return false;
    }

    let mut listeners = Vec::new();
    let resize_slot = Rc::downgrade(slot);
    let resize_target = container.clone();
    if let Some(handle) = window_event_listener_with_options(ev::resize, &EventOptions::default(), move |_| {
        with_slot(&resize_slot, |slot| slot.resize(resize_target.client_width().max(0) as u32));
    }) {
        listeners.push(handle);
    }

    let wheel_slot = Rc::downgrade(slot);
    let wheel_target = container.clone();
    listeners.push(event_listener_with_options(container, ev::wheel, &EventOptions::active(), move |event| {
        event.prevent_default();
        let (dx, dy) = (event.delta_x(), event.delta_y());
        if dx.abs() > dy.abs() {
            let bars = (dx / WHEEL_PIXELS_PER_BAR).round() as isize;
            let bars = if bars == 0 { dx.signum() as isize } else { bars };
            with_slot(&wheel_slot, |slot| slot.scroll(bars));
        } else if dy != 0.0 {
            let factor = if dy < 0.0 { WHEEL_ZOOM_STEP } else { 1.0 / WHEEL_ZOOM_STEP };
            let width = wheel_target.client_width().max(1) as f64;
            let anchor = event.offset_x() as f64 / width;
            with_slot(&wheel_slot, |slot| slot.zoom(factor, anchor));
        }
    }));

    if let Some(binding) = slot.borrow_mut().binding_mut() {
        binding.attach_resize_subscription(Box::new(ContainerListeners(listeners)));
    }
    log_info!(LogComponent::Presentation("CandlestickChart"), "chart mounted at {}px", width);
    true
}

/// Run `action` on the slot if the component is still alive
fn with_slot(
    slot: &Weak<RefCell<ChartSlot<CanvasSurface>>>,
    action: impl FnOnce(&mut ChartSlot<CanvasSurface>) -> crate::domain::errors::RenderingResult<()>,
) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut slot) = slot.try_borrow_mut() else {
        return;
    };
    if let Err(e) = action(&mut *slot) {
        log_error!(LogComponent::Presentation("CandlestickChart"), "chart update failed: {}", e);
    }
}

/// Window and container listeners removed together on dispose
struct ContainerListeners(Vec<EventListenerHandle>);

impl ResizeSubscription for ContainerListeners {
    fn cancel(self: Box<Self>) {
        for handle in self.0 {
            handle.remove();
        }
    }
}
