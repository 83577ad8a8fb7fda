pub mod tiles;
pub mod viewport;
pub mod widget;

pub use tiles::{TileLayer, TileSource, CARTO_LIGHT_TILES, OSM_TILES};
pub use viewport::{MapViewport, MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
pub use widget::MapWidget;
