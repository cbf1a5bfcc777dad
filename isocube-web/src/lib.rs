/// Isocube Web - draws scenes on a browser canvas through WASM
///
/// The host page owns the animation loop: it calls `update(dt)` and then
/// `render()` from `requestAnimationFrame`.

use isocube_core::config::parse_scene;
use isocube_core::{LineCap, LineJoin, Scene, Surface, SurfaceScope};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement};

fn to_js(err: isocube_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Forwards `log` records to the browser console
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

fn format_record(record: &log::Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(record));
        match record.level() {
            log::Level::Error => console::error_1(&line),
            log::Level::Warn => console::warn_1(&line),
            log::Level::Info => console::info_1(&line),
            log::Level::Debug | log::Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route engine logs to the console at `level`; later calls only change the level
pub fn init_logging(level: log::LevelFilter) {
    if log::set_logger(&LOGGER).is_err() {
        log::debug!("console logger already installed");
    }
    log::set_max_level(level);
}

/// Runs when the module is instantiated
#[wasm_bindgen(start)]
pub fn start() {
    init_logging(log::LevelFilter::Warn);
}

/// Drawing surface backed by a 2D canvas context
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context }
    }
}

impl Surface for CanvasSurface {
    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.context.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.context.line_to(x as f64, y as f64);
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        if let Err(e) = self.context.translate(x as f64, y as f64) {
            log::warn!("translate failed: {:?}", e);
        }
    }

    fn rotate(&mut self, angle: f32) {
        if let Err(e) = self.context.rotate(angle as f64) {
            log::warn!("rotate failed: {:?}", e);
        }
    }

    #[allow(deprecated)]
    fn set_stroke_style(&mut self, color: &str) {
        self.context.set_stroke_style(&JsValue::from_str(color));
    }

    #[allow(deprecated)]
    fn set_fill_style(&mut self, color: &str) {
        self.context.set_fill_style(&JsValue::from_str(color));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.context.set_line_cap(cap.as_str());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.context.set_line_join(join.as_str());
    }

    fn set_line_width(&mut self, width: f32) {
        self.context.set_line_width(width as f64);
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    scene: Scene,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to the canvas with id `canvas_id` and build the scene described
    /// by `scene`, e.g. `"hex-field grid=3x5"`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, scene: &str) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("'{}' is not a canvas", canvas_id)))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("failed to cast 2d context"))?;

        let scene = Scene::new(parse_scene(scene).map_err(to_js)?).map_err(to_js)?;
        Ok(WebRenderer {
            scene,
            canvas,
            surface: CanvasSurface::new(context),
        })
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f32) -> Result<(), JsValue> {
        self.scene.update(dt).map_err(to_js)
    }

    /// Clear the canvas and draw the current frame centred on it
    pub fn render(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.surface.context.clear_rect(0.0, 0.0, w, h);

        let mut scope = SurfaceScope::new(&mut self.surface);
        scope.translate((w / 2.0) as f32, (h / 2.0) as f32);
        self.scene.render(&mut *scope);
    }

    /// Loop progress in `[0, 1)`
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f32 {
        self.scene.state().anim_amt()
    }
}
