pub mod assets;
pub mod components;
pub mod constants;
pub mod data;
pub mod geometry;
pub mod logging;
pub mod map;
pub mod models;

pub use components::app::App;
