mod filter;
mod route;

pub use filter::FilterMode;
pub use route::{BusRoute, GeomSource, RouteRecord};
