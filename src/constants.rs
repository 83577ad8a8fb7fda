/// Base path the app is served under; mirrored by the static server.
pub const BASE_PATH: &str = "/bus-atlas";

/// Fallback view for maps with no usable geometry (central London).
pub const DEFAULT_CENTER: (f64, f64) = (51.5074, -0.1278);

/// Zoom used with `DEFAULT_CENTER` on a card's mini map.
pub const DEFAULT_CARD_ZOOM: u8 = 13;

/// Initial zoom of the full-screen map before any fit-to-bounds.
pub const DEFAULT_MAP_ZOOM: u8 = 10;

/// Screen-space padding applied when fitting the full-screen map to the
/// visible routes.
pub const FIT_BOUNDS_PADDING_PX: f64 = 50.0;

/// Per-route label/line colors, indexed by render order and cycled.
pub const ROUTE_COLORS: &[&str] = &[
    "#FF0000", "#00FF00", "#0000FF", "#FFA500", "#800080", "#00FFFF",
    "#FF00FF", "#008000", "#000080", "#800000", "#808000", "#008080",
];

/// Color cycled by render order.
#[must_use]
pub fn route_color(index: usize) -> &'static str {
    ROUTE_COLORS[index % ROUTE_COLORS.len()]
}
