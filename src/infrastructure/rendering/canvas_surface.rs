use js_sys::Math;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Path2d};

use crate::domain::benchmark::{DrawingSurface, PreparedPath};
use crate::domain::errors::{BenchError, BenchResult};
use crate::domain::logging::{LogComponent, get_logger};

const EVEN_FILL: &str = "#fff";
const ODD_FILL: &str = "#ccc";
const TEXT_EVEN_FILL: &str = "#999";
const TEXT_MAX_WIDTH: f64 = 300.0;

/// Resolve the 2D context of a canvas.
pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> BenchResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| BenchError::SurfaceUnavailable(format!("get_context failed: {e:?}")))?
        .ok_or_else(|| BenchError::SurfaceUnavailable("no canvas context".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| BenchError::SurfaceUnavailable("Failed to cast to 2D context".to_string()))
}

/// Anchor points of a closed star-shaped path inside a `size_px` square.
///
/// Even anchors sit on the outer radius, odd ones on half of it.
pub fn path_anchor_points(anchors: usize, size_px: f64) -> Vec<(f64, f64)> {
    let half = size_px / 2.0;
    (0..anchors)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / anchors as f64;
            let radius = if i % 2 == 0 { half } else { half / 2.0 };
            (half + radius * angle.cos(), half + radius * angle.sin())
        })
        .collect()
}

/// Path2D built once, translated to each random position when filled.
pub struct CanvasPath {
    path: Path2d,
    anchors: usize,
}

impl PreparedPath for CanvasPath {
    fn anchor_count(&self) -> usize {
        self.anchors
    }
}

/// Canvas 2D drawing surface. Nothing is cleared between draws.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Create a `width`x`height` canvas shown at half its pixel size and
    /// append it to the document body.
    pub fn create(document: &Document, width: u32, height: u32) -> BenchResult<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| BenchError::BrowserApi(format!("create canvas: {e:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BenchError::BrowserApi("Failed to get canvas element".to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", width / 2));
        let _ = style.set_property("height", &format!("{}px", height / 2));

        let body = document
            .body()
            .ok_or_else(|| BenchError::BrowserApi("Document has no body".to_string()))?;
        body.append_child(&canvas)
            .map_err(|e| BenchError::BrowserApi(format!("append canvas: {e:?}")))?;

        Self::from_canvas(canvas)
    }

    pub fn from_canvas(canvas: HtmlCanvasElement) -> BenchResult<Self> {
        let context = context_2d(&canvas)?;
        context.set_stroke_style_str("#aaa");
        get_logger().debug(
            LogComponent::Infrastructure("CanvasSurface"),
            &format!("surface ready: {}x{}", canvas.width(), canvas.height()),
        );
        Ok(Self { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn random_position(&self) -> (f64, f64) {
        (
            Math::random() * self.canvas.width() as f64,
            Math::random() * self.canvas.height() as f64,
        )
    }

    fn alternate_fill(&self, i: u32, even: &str) {
        self.context.set_fill_style_str(if i % 2 == 0 { even } else { ODD_FILL });
    }
}

impl DrawingSurface for CanvasSurface {
    type Image = HtmlImageElement;
    type Path = CanvasPath;

    fn dimensions(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn fill_rects(&self, size_px: f64, count: u32) {
        for i in 0..count {
            let (x, y) = self.random_position();
            self.context.begin_path();
            self.alternate_fill(i, EVEN_FILL);
            self.context.rect(x, y, size_px, size_px);
            self.context.fill();
        }
    }

    fn fill_circles(&self, diameter_px: f64, count: u32) {
        for i in 0..count {
            let (x, y) = self.random_position();
            self.context.begin_path();
            self.alternate_fill(i, EVEN_FILL);
            let _ = self.context.arc(x, y, diameter_px / 2.0, 0.0, PI * 2.0);
            self.context.fill();
        }
    }

    fn prepare_path(&self, anchors: usize, size_px: f64) -> BenchResult<CanvasPath> {
        let path = Path2d::new().map_err(|e| BenchError::SurfaceUnavailable(format!("Path2D: {e:?}")))?;
        let points = path_anchor_points(anchors, size_px);
        if let Some(((x0, y0), rest)) = points.split_first().map(|(first, rest)| (*first, rest)) {
            path.move_to(x0, y0);
            for &(x, y) in rest {
                path.line_to(x, y);
            }
            path.close_path();
        }
        Ok(CanvasPath { path, anchors })
    }

    fn fill_path(&self, path: &CanvasPath, count: u32) {
        for i in 0..count {
            let (x, y) = self.random_position();
            self.alternate_fill(i, EVEN_FILL);
            let _ = self.context.set_transform(1.0, 0.0, 0.0, 1.0, x, y);
            self.context.fill_with_path_2d(&path.path);
        }
        let _ = self.context.reset_transform();
    }

    fn draw_text(&self, font_px: u32, text: &str, count: u32) {
        let font = format!("{font_px}px sans-serif");
        for i in 0..count {
            let (x, y) = self.random_position();
            self.context.begin_path();
            self.context.set_font(&font);
            self.alternate_fill(i, TEXT_EVEN_FILL);
            let _ = self.context.fill_text_with_max_width(text, x, y, TEXT_MAX_WIDTH);
            self.context.fill();
        }
    }

    fn draw_images(&self, image: &HtmlImageElement, draw_px: f64, count: u32) {
        let (sw, sh) = (image.width() as f64, image.height() as f64);
        for _ in 0..count {
            let (x, y) = self.random_position();
            let _ = self
                .context
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    image, 0.0, 0.0, sw, sh, x, y, draw_px, draw_px,
                );
        }
    }
}
