use super::scene::{CandleShape, Scene};
use super::surface_model::SurfaceModel;
use crate::domain::{
    chart::{ChartSurface, LogicalRange, ScaleId, ScaleMargins, SeriesData, SeriesId, SeriesSpec, palette},
    errors::{AppError, RenderingResult},
    logging::{LogComponent, get_logger},
};
use crate::{log_debug, log_warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

const FONT: &str = "12px -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

/// Canvas 2D chart surface - Infrastructure implementation.
///
/// Owns a `<canvas>` appended to the container element; [`ChartSurface::release`]
/// removes it again.
pub struct CanvasSurface {
    model: SurfaceModel,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    pixel_ratio: f64,
}

impl CanvasSurface {
    /// Create a canvas inside `container`
    pub fn attach(container: &Element) -> RenderingResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| AppError::Rendering("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| AppError::Rendering("no document".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(AppError::rendering_js)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AppError::Rendering("element is not a canvas".to_string()))?;
        canvas.set_class_name("kline-chart-canvas");
        container.append_child(&canvas).map_err(AppError::rendering_js)?;

        let context = canvas
            .get_context("2d")
            .map_err(AppError::rendering_js)?
            .ok_or_else(|| AppError::Rendering("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::Rendering("unexpected context type".to_string()))?;

        let pixel_ratio = window.device_pixel_ratio().max(1.0);
        get_logger().info(
            LogComponent::Infrastructure("CanvasSurface"),
            &format!("canvas attached (pixel ratio {pixel_ratio})"),
        );
        Ok(Self { model: SurfaceModel::new(), canvas, context, pixel_ratio })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn resize_backing_store(&self) {
        let (width, height) = (self.model.width, self.model.height);
        self.canvas.set_width((width as f64 * self.pixel_ratio).round() as u32);
        self.canvas.set_height((height as f64 * self.pixel_ratio).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        let _ = style.set_property("display", "block");
    }

    fn paint(&self, scene: &Scene) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_transform(self.pixel_ratio, 0.0, 0.0, self.pixel_ratio, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, scene.width, scene.height);
        ctx.set_fill_style_str("#ffffff");
        ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

        if let Some(message) = scene.message {
            return self.render_no_data_message(scene, message);
        }

        self.render_grid(scene);
        for bar in &scene.volume {
            ctx.set_fill_style_str(&bar.color.to_css());
            ctx.fill_rect(bar.x, bar.y, bar.width, bar.height);
        }
        for candle in &scene.candles {
            self.render_single_candle(candle);
        }
        for line in &scene.lines {
            ctx.set_stroke_style_str(&line.color.to_css());
            ctx.set_line_width(line.width);
            ctx.begin_path();
            for (i, &(x, y)) in line.points.iter().enumerate() {
                if i == 0 { ctx.move_to(x, y) } else { ctx.line_to(x, y) }
            }
            ctx.stroke();
        }
        self.render_axes(scene)
    }

    fn render_grid(&self, scene: &Scene) {
        let ctx = &self.context;
        ctx.set_stroke_style_str(&palette::GRID.to_css());
        ctx.set_line_width(1.0);
        ctx.begin_path();
        for &y in &scene.grid_y {
            ctx.move_to(0.0, y.round() + 0.5);
            ctx.line_to(scene.pane_width, y.round() + 0.5);
        }
        for &x in &scene.grid_x {
            ctx.move_to(x.round() + 0.5, 0.0);
            ctx.line_to(x.round() + 0.5, scene.pane_height);
        }
        ctx.stroke();

        ctx.set_stroke_style_str(&palette::BORDER.to_css());
        ctx.begin_path();
        ctx.move_to(scene.pane_width + 0.5, 0.0);
        ctx.line_to(scene.pane_width + 0.5, scene.pane_height);
        ctx.move_to(0.0, scene.pane_height + 0.5);
        ctx.line_to(scene.width, scene.pane_height + 0.5);
        ctx.stroke();
    }

    fn render_single_candle(&self, candle: &CandleShape) {
        let ctx = &self.context;
        let color = candle.color.to_css();
        ctx.set_stroke_style_str(&color);
        ctx.set_fill_style_str(&color);
        ctx.set_line_width(1.0);

        // Wick
        ctx.begin_path();
        ctx.move_to(candle.x, candle.high_y);
        ctx.line_to(candle.x, candle.low_y);
        ctx.stroke();

        let left = candle.x - candle.body_width / 2.0;
        if candle.is_doji() {
            ctx.begin_path();
            ctx.move_to(left, candle.body_top);
            ctx.line_to(left + candle.body_width, candle.body_top);
            ctx.stroke();
        } else {
            ctx.fill_rect(left, candle.body_top, candle.body_width, candle.body_height);
        }
    }

    fn render_axes(&self, scene: &Scene) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_font(FONT);
        ctx.set_fill_style_str(&palette::TEXT.to_css());
        ctx.set_text_baseline("middle");

        ctx.set_text_align("left");
        for label in &scene.price_labels {
            ctx.fill_text(&label.text, label.x, label.y)?;
        }
        ctx.set_text_align("center");
        for label in &scene.time_labels {
            ctx.fill_text(&label.text, label.x, label.y)?;
        }

        if let Some((y, label, color)) = &scene.last_price {
            ctx.set_fill_style_str(&color.to_css());
            ctx.fill_rect(scene.pane_width, y - 9.0, scene.width - scene.pane_width, 18.0);
            ctx.set_fill_style_str("#ffffff");
            ctx.set_text_align("left");
            ctx.fill_text(&label.text, label.x, label.y)?;
        }
        Ok(())
    }

    fn render_no_data_message(&self, scene: &Scene, message: &str) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_font(FONT);
        ctx.set_fill_style_str(&palette::TEXT.to_css());
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(message, scene.width / 2.0, scene.height / 2.0)?;
        log_debug!(LogComponent::Infrastructure("CanvasSurface"), "nothing to draw");
        Ok(())
    }
}

impl ChartSurface for CanvasSurface {
    fn apply_size(&mut self, width: u32, height: u32) {
        self.model.set_size(width, height);
        self.resize_backing_store();
    }

    fn set_width(&mut self, width: u32) {
        self.model.width = width;
        self.resize_backing_store();
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
            log_warn!(LogComponent::Infrastructure("CanvasSurface"), "unknown series {:?}", series);
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
        let start = js_sys::Date::now();
        let scene = Scene::build(&self.model);
        self.paint(&scene).map_err(AppError::rendering_js)?;
        log_debug!(
            LogComponent::Infrastructure("CanvasSurface"),
            "frame: {} candles, {} lines in {:.1}ms",
            scene.candles.len(),
            scene.lines.len(),
            js_sys::Date::now() - start
        );
        Ok(())
    }

    fn release(&mut self) {
        self.canvas.remove();
        self.model = SurfaceModel::new();
    }
}
