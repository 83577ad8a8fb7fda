use crate::map::{MapViewport, MapWidget};
use crate::models::BusRoute;

const ROUTE_WEIGHT: f64 = 3.0;
const RIDDEN_WEIGHT: f64 = 4.0;
const ROUTE_OPACITY: f64 = 0.7;
const RIDDEN_OPACITY: f64 = 0.8;
const HIGHLIGHT_WEIGHT: f64 = 5.0;
const RIDDEN_HIGHLIGHT_WEIGHT: f64 = 6.0;
const HIGHLIGHT_OPACITY: f64 = 1.0;

/// `(weight, opacity)` for a route line. Ridden routes draw slightly heavier
/// at rest and when highlighted.
#[must_use]
pub fn line_style(ridden: bool, highlighted: bool) -> (f64, f64) {
    match (ridden, highlighted) {
        (false, false) => (ROUTE_WEIGHT, ROUTE_OPACITY),
        (true, false) => (RIDDEN_WEIGHT, RIDDEN_OPACITY),
        (false, true) => (HIGHLIGHT_WEIGHT, HIGHLIGHT_OPACITY),
        (true, true) => (RIDDEN_HIGHLIGHT_WEIGHT, HIGHLIGHT_OPACITY),
    }
}

/// Redraws the whole map: basemap, then every visible route, with the
/// highlighted route stroked last so it sits on top of the draw order.
pub fn draw_map(
    widget: &mut MapWidget,
    viewport: MapViewport,
    container: (f64, f64),
    routes: &[(&BusRoute, &'static str)],
    highlighted: Option<usize>,
) {
    widget.draw_basemap(viewport, container);

    for (index, (route, color)) in routes.iter().enumerate() {
        if Some(index) == highlighted {
            continue;
        }
        let (weight, opacity) = line_style(route.ridden, false);
        widget.draw_polyline(viewport, container, &route.geometry, color, weight, opacity);
    }

    if let Some(index) = highlighted {
        if let Some((route, color)) = routes.get(index) {
            let (weight, opacity) = line_style(route.ridden, true);
            widget.draw_polyline(viewport, container, &route.geometry, color, weight, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_style_tiers() {
        assert_eq!(line_style(false, false), (3.0, 0.7));
        assert_eq!(line_style(true, false), (4.0, 0.8));
        assert_eq!(line_style(false, true), (5.0, 1.0));
        assert_eq!(line_style(true, true), (6.0, 1.0));
    }
}
