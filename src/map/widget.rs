use super::tiles::{TileLayer, TileSource};
use super::viewport::MapViewport;
use crate::geometry::LineString;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Exclusive handle on one map canvas: the 2d context plus the tile layer
/// behind it.
///
/// This is the resource whose lifecycle the views must respect: acquired
/// once when a map container mounts, released on every unmount path (the
/// owner pairs [`MapWidget::new`] with `on_cleanup` → [`MapWidget::release`]).
/// A widget that is dropped without `release` leaves tile callbacks attached
/// to in-flight images.
pub struct MapWidget {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    tiles: TileLayer,
}

impl MapWidget {
    /// Acquires the canvas.
    ///
    /// # Errors
    /// Returns an error when the element has no usable 2d context.
    pub fn new(
        canvas: HtmlCanvasElement,
        source: TileSource,
        on_tiles_loaded: Rc<dyn Fn()>,
    ) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| "canvas 2d context unavailable".to_string())?;

        Ok(Self {
            canvas,
            ctx,
            tiles: TileLayer::new(source, on_tiles_loaded),
        })
    }

    /// Matches the canvas bitmap to the container's current layout size and
    /// returns it. Zero until the container has been laid out.
    #[allow(clippy::cast_sign_loss)]
    pub fn sync_size(&self) -> (f64, f64) {
        let width = self.canvas.client_width().max(0);
        let height = self.canvas.client_height().max(0);

        if width > 0 && height > 0 {
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
        }

        (f64::from(width), f64::from(height))
    }

    #[must_use]
    pub fn container_size(&self) -> (f64, f64) {
        (
            f64::from(self.canvas.client_width().max(0)),
            f64::from(self.canvas.client_height().max(0)),
        )
    }

    /// Clears the canvas and draws the basemap for `viewport`.
    pub fn draw_basemap(&mut self, viewport: MapViewport, container: (f64, f64)) {
        self.ctx.set_fill_style_str("#ddd");
        self.ctx.fill_rect(0.0, 0.0, container.0, container.1);
        self.tiles.draw(&self.ctx, viewport, container);
    }

    /// Strokes one route's line strings in screen space.
    pub fn draw_polyline(
        &self,
        viewport: MapViewport,
        container: (f64, f64),
        lines: &[LineString],
        color: &str,
        weight: f64,
        opacity: f64,
    ) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(weight);
        self.ctx.set_global_alpha(opacity);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");

        for line in lines {
            if line.len() < 2 {
                continue;
            }
            self.ctx.begin_path();
            let (x, y) = viewport.latlng_to_screen(container, line[0]);
            self.ctx.move_to(x, y);
            for point in &line[1..] {
                let (x, y) = viewport.latlng_to_screen(container, *point);
                self.ctx.line_to(x, y);
            }
            self.ctx.stroke();
        }

        self.ctx.set_global_alpha(1.0);
    }

    /// Releases the canvas: detaches every pending tile callback. Consumes
    /// the widget so nothing draws through it afterwards.
    pub fn release(mut self) {
        self.tiles.release();
    }
}
