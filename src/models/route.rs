use crate::geometry::{self, LineString};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One raw entry of the embedded route dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub dataset_id: String,
    pub bus_number: String,
    pub service_code: String,
    pub operator_name: String,
    #[serde(default)]
    pub line_name: String,
    #[serde(default)]
    pub geom: Option<GeomSource>,
}

/// Route geometry as shipped in the dataset: either a WKT-like
/// MULTILINESTRING text value or a GeoJSON-style feature collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GeomSource {
    Wkt(String),
    Features(Value),
}

impl GeomSource {
    /// Ordered `(lat, lng)` segments; malformed geometry yields an empty
    /// list, never an error.
    #[must_use]
    pub fn parse(&self) -> Vec<LineString> {
        match self {
            Self::Wkt(text) => geometry::parse_multilinestring(text),
            Self::Features(value) => geometry::lines_from_geojson(value),
        }
    }
}

/// A catalogue entry: the raw record plus everything derived once at load
/// time. Immutable after the catalogue is built.
#[derive(Debug, Clone)]
pub struct BusRoute {
    pub dataset_id: String,
    pub bus_number: String,
    pub service_code: String,
    pub operator_name: String,
    pub line_name: String,
    /// Parsed geometry, `(lat, lng)` per vertex. Empty when the record had
    /// none or it failed to parse.
    pub geometry: Vec<LineString>,
    /// Resolved image paths, display order. Empty when no photo exists.
    pub images: Vec<String>,
    pub has_photo: bool,
    pub ridden: bool,
    pub ride_count: Option<u32>,
}

// Dataset ids appear both as JSON numbers and as strings across dataset
// revisions; normalize to a string key.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
