use crate::geometry::{Bounds, LatLng};

pub const TILE_SIZE: f64 = 256.0;
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 19;

// Web Mercator pole cutoff; keeps the projection finite.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Center/zoom view state of one map canvas.
///
/// Pure value type: every operation returns a new viewport, so the view state
/// can live in a signal while the widget owning the canvas stays plain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl MapViewport {
    #[must_use]
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Side length of the world in pixels at `zoom`.
    #[must_use]
    pub fn world_size(zoom: u8) -> f64 {
        TILE_SIZE * f64::from(1_u32 << zoom)
    }

    /// Geographic coordinates to global Web Mercator pixels at `zoom`.
    #[must_use]
    pub fn project((lat, lng): LatLng, zoom: u8) -> (f64, f64) {
        let world = Self::world_size(zoom);
        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let lat_rad = lat.to_radians();

        let x = (lng + 180.0) / 360.0 * world;
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
            * world;
        (x, y)
    }

    /// Inverse of [`Self::project`].
    #[must_use]
    pub fn unproject((x, y): (f64, f64), zoom: u8) -> LatLng {
        let world = Self::world_size(zoom);

        let lng = x / world * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * y / world);
        let lat = n.sinh().atan().to_degrees();
        (lat, lng)
    }

    /// Screen position (relative to the canvas) of a geographic point, for a
    /// canvas of `container` size.
    #[must_use]
    pub fn latlng_to_screen(&self, container: (f64, f64), point: LatLng) -> (f64, f64) {
        let (cx, cy) = Self::project(self.center, self.zoom);
        let (px, py) = Self::project(point, self.zoom);
        (
            px - cx + container.0 / 2.0,
            py - cy + container.1 / 2.0,
        )
    }

    /// Geographic point under a screen position.
    #[must_use]
    pub fn screen_to_latlng(&self, container: (f64, f64), screen: (f64, f64)) -> LatLng {
        let (cx, cy) = Self::project(self.center, self.zoom);
        Self::unproject(
            (
                cx + screen.0 - container.0 / 2.0,
                cy + screen.1 - container.1 / 2.0,
            ),
            self.zoom,
        )
    }

    /// Viewport translated by a screen-space drag delta.
    #[must_use]
    pub fn panned_by(&self, dx: f64, dy: f64) -> Self {
        let (cx, cy) = Self::project(self.center, self.zoom);
        Self {
            center: Self::unproject((cx - dx, cy - dy), self.zoom),
            zoom: self.zoom,
        }
    }

    /// Viewport zoomed by `delta` steps, keeping the geographic point under
    /// `screen` fixed in place (zoom-around-cursor).
    #[must_use]
    pub fn zoomed_around(&self, delta: i8, screen: (f64, f64), container: (f64, f64)) -> Self {
        let target = i16::from(self.zoom) + i16::from(delta);
        let new_zoom = target.clamp(i16::from(MIN_ZOOM), i16::from(MAX_ZOOM));
        let Ok(new_zoom) = u8::try_from(new_zoom) else {
            return *self;
        };
        if new_zoom == self.zoom {
            return *self;
        }

        let focus = self.screen_to_latlng(container, screen);
        let (fx, fy) = Self::project(focus, new_zoom);
        let center_world = (
            fx - (screen.0 - container.0 / 2.0),
            fy - (screen.1 - container.1 / 2.0),
        );

        Self {
            center: Self::unproject(center_world, new_zoom),
            zoom: new_zoom,
        }
    }

    /// Greatest integer zoom at which `bounds` fits a `container`-sized
    /// canvas with `padding` pixels on every side, centered on the bounds.
    #[must_use]
    pub fn fitted_to(bounds: Bounds, container: (f64, f64), padding: f64) -> Self {
        let usable = (
            (container.0 - 2.0 * padding).max(TILE_SIZE / 4.0),
            (container.1 - 2.0 * padding).max(TILE_SIZE / 4.0),
        );

        let mut zoom = MIN_ZOOM;
        for candidate in (MIN_ZOOM..=MAX_ZOOM).rev() {
            let (min_x, max_y) = Self::project((bounds.min_lat, bounds.min_lng), candidate);
            let (max_x, min_y) = Self::project((bounds.max_lat, bounds.max_lng), candidate);
            if max_x - min_x <= usable.0 && max_y - min_y <= usable.1 {
                zoom = candidate;
                break;
            }
        }

        Self::new(bounds.center(), zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_unproject_round_trip() {
        for zoom in [0, 5, 10, 16] {
            for point in [(51.5074, -0.1278), (0.0, 0.0), (-33.86, 151.21)] {
                let world = MapViewport::project(point, zoom);
                let (lat, lng) = MapViewport::unproject(world, zoom);
                assert!((lat - point.0).abs() < 1e-6, "lat at zoom {zoom}");
                assert!((lng - point.1).abs() < 1e-6, "lng at zoom {zoom}");
            }
        }
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let viewport = MapViewport::new((51.5, -0.12), 12);
        let screen = viewport.latlng_to_screen((800.0, 600.0), viewport.center);
        assert!((screen.0 - 400.0).abs() < 1e-9);
        assert!((screen.1 - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_round_trip() {
        let viewport = MapViewport::new((51.5, -0.12), 11);
        let container = (1024.0, 768.0);
        let point = viewport.screen_to_latlng(container, (137.0, 642.0));
        let screen = viewport.latlng_to_screen(container, point);
        assert!((screen.0 - 137.0).abs() < 1e-6);
        assert!((screen.1 - 642.0).abs() < 1e-6);
    }

    #[test]
    fn test_panned_by_moves_center_opposite_to_drag() {
        let viewport = MapViewport::new((51.5, -0.12), 12);
        // Dragging the map east (content follows the pointer) moves the
        // center west.
        let panned = viewport.panned_by(100.0, 0.0);
        assert!(panned.center.1 < viewport.center.1);
        assert_eq!(panned.zoom, viewport.zoom);
    }

    #[test]
    fn test_zoomed_around_keeps_focus_fixed() {
        let viewport = MapViewport::new((51.5, -0.12), 10);
        let container = (800.0, 600.0);
        let screen = (600.0, 150.0);
        let focus = viewport.screen_to_latlng(container, screen);

        let zoomed = viewport.zoomed_around(1, screen, container);
        assert_eq!(zoomed.zoom, 11);
        let after = zoomed.latlng_to_screen(container, focus);
        assert!((after.0 - screen.0).abs() < 1e-6);
        assert!((after.1 - screen.1).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let viewport = MapViewport::new((51.5, -0.12), MAX_ZOOM);
        assert_eq!(
            viewport
                .zoomed_around(1, (0.0, 0.0), (800.0, 600.0))
                .zoom,
            MAX_ZOOM
        );
        let viewport = MapViewport::new((51.5, -0.12), MIN_ZOOM);
        assert_eq!(
            viewport
                .zoomed_around(-1, (0.0, 0.0), (800.0, 600.0))
                .zoom,
            MIN_ZOOM
        );
    }

    #[test]
    fn test_fitted_to_contains_bounds() {
        let bounds = Bounds {
            min_lat: 51.45,
            min_lng: -0.2,
            max_lat: 51.56,
            max_lng: -0.05,
        };
        let container = (800.0, 600.0);
        let viewport = MapViewport::fitted_to(bounds, container, 50.0);

        assert!(viewport.zoom <= MAX_ZOOM);
        for corner in [
            (bounds.min_lat, bounds.min_lng),
            (bounds.max_lat, bounds.max_lng),
        ] {
            let (x, y) = viewport.latlng_to_screen(container, corner);
            assert!(x >= 0.0 && x <= container.0, "x = {x}");
            assert!(y >= 0.0 && y <= container.1, "y = {y}");
        }
    }

    #[test]
    fn test_fitted_to_degenerate_bounds_clamps_zoom() {
        let bounds = Bounds::from_point((51.5, -0.12));
        let viewport = MapViewport::fitted_to(bounds, (400.0, 300.0), 0.0);
        assert_eq!(viewport.zoom, MAX_ZOOM);
        assert_eq!(viewport.center, (51.5, -0.12));
    }
}
