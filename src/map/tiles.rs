use super::viewport::{MapViewport, TILE_SIZE};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// A raster basemap: URL template plus the subdomains to rotate through.
#[derive(Debug, Clone, Copy)]
pub struct TileSource {
    pub url_template: &'static str,
    pub subdomains: &'static [&'static str],
}

impl TileSource {
    #[must_use]
    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        let subdomain = self.subdomains[(x + y) as usize % self.subdomains.len()];
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// OpenStreetMap street style, used by the gallery mini maps.
pub const OSM_TILES: TileSource = TileSource {
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    subdomains: &["a", "b", "c"],
};

/// Carto light style, used by the full-screen map.
pub const CARTO_LIGHT_TILES: TileSource = TileSource {
    url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
    subdomains: &["a", "b", "c", "d"],
};

struct Tile {
    image: HtmlImageElement,
    // Kept alive for as long as the tile may still fire its load event.
    _onload: Closure<dyn FnMut()>,
}

/// Cache of basemap tiles drawn onto the canvas.
///
/// Tiles load asynchronously through `HtmlImageElement`s; when one arrives,
/// the layer invokes `on_load` so the owner can schedule a redraw. The cache
/// survives re-filtering — only [`TileLayer::release`] detaches the pending
/// callbacks, and that must happen before the layer is dropped.
pub struct TileLayer {
    source: TileSource,
    tiles: HashMap<(u8, u32, u32), Tile>,
    on_load: Rc<dyn Fn()>,
}

impl TileLayer {
    #[must_use]
    pub fn new(source: TileSource, on_load: Rc<dyn Fn()>) -> Self {
        Self {
            source,
            tiles: HashMap::new(),
            on_load,
        }
    }

    /// Draws every visible tile that has arrived and requests the ones that
    /// have not.
    pub fn draw(
        &mut self,
        ctx: &CanvasRenderingContext2d,
        viewport: MapViewport,
        container: (f64, f64),
    ) {
        let zoom = viewport.zoom;
        let tile_count = 1_u32 << zoom;
        let (cx, cy) = MapViewport::project(viewport.center, zoom);
        let left = cx - container.0 / 2.0;
        let top = cy - container.1 / 2.0;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let first_x = (left / TILE_SIZE).floor().max(0.0) as u32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let first_y = (top / TILE_SIZE).floor().max(0.0) as u32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let last_x = (((left + container.0) / TILE_SIZE).floor().max(0.0) as u32)
            .min(tile_count.saturating_sub(1));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let last_y = (((top + container.1) / TILE_SIZE).floor().max(0.0) as u32)
            .min(tile_count.saturating_sub(1));

        for x in first_x..=last_x {
            for y in first_y..=last_y {
                let screen_x = f64::from(x) * TILE_SIZE - left;
                let screen_y = f64::from(y) * TILE_SIZE - top;
                self.draw_tile(ctx, zoom, x, y, screen_x, screen_y);
            }
        }
    }

    fn draw_tile(
        &mut self,
        ctx: &CanvasRenderingContext2d,
        zoom: u8,
        x: u32,
        y: u32,
        screen_x: f64,
        screen_y: f64,
    ) {
        let key = (zoom, x, y);
        if !self.tiles.contains_key(&key) {
            crate::log!("Requesting tile {}/{}/{}", zoom, x, y);
            if let Some(tile) = request_tile(&self.source, zoom, x, y, &self.on_load) {
                self.tiles.insert(key, tile);
            }
        }

        if let Some(tile) = self.tiles.get(&key) {
            if tile.image.complete() && tile.image.natural_width() > 0 {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &tile.image,
                    screen_x,
                    screen_y,
                    TILE_SIZE,
                    TILE_SIZE,
                );
            }
        }
    }

    /// Detaches every pending load callback. Must run before the layer is
    /// dropped; an image that finishes loading after its closure is gone
    /// would otherwise call into freed state.
    pub fn release(&mut self) {
        for tile in self.tiles.values() {
            tile.image.set_onload(None);
            // Abort any in-flight request.
            tile.image.set_src("");
        }
        self.tiles.clear();
    }
}

fn request_tile(
    source: &TileSource,
    zoom: u8,
    x: u32,
    y: u32,
    on_load: &Rc<dyn Fn()>,
) -> Option<Tile> {
    let Ok(image) = HtmlImageElement::new() else {
        return None;
    };

    let callback = Rc::clone(on_load);
    let onload = Closure::wrap(Box::new(move || callback()) as Box<dyn FnMut()>);
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_src(&source.tile_url(zoom, x, y));

    Some(Tile {
        image,
        _onload: onload,
    })
}
