use crate::assets::{resolve_images, ImageManifest};
use crate::models::{BusRoute, GeomSource, RouteRecord};
use serde::Deserialize;
use std::collections::HashMap;

/// Load-time selection knobs.
#[derive(Debug, Clone, Copy)]
pub struct CatalogueConfig {
    /// How many routes without a photo survive into the catalogue. The
    /// photo-less tail of the dataset is huge and mostly noise; the cap
    /// varies across deployments, so it is a parameter rather than a
    /// constant.
    pub max_without_photo: usize,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            max_without_photo: 20,
        }
    }
}

/// One entry of the rides dataset: either a bare service code or a code with
/// a ride count.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RideEntry {
    Code(String),
    Counted { service_code: String, count: u32 },
}

/// Builds the immutable route catalogue from the embedded build artifacts.
///
/// Called once by the app shell at startup; the result is passed down by
/// ownership from there.
#[must_use]
pub fn load_catalogue() -> Vec<BusRoute> {
    let records = parse_routes(include_str!("../assets/routes.json"));
    let rides = parse_rides(include_str!("../assets/rides.json"));
    let manifest = parse_image_manifest(include_str!("../assets/image_manifest.json"));

    build_catalogue(records, &rides, &manifest, CatalogueConfig::default())
}

fn parse_routes(content: &str) -> Vec<RouteRecord> {
    match serde_json::from_str(content) {
        Ok(records) => records,
        Err(err) => {
            leptos::logging::warn!("Failed to parse route dataset: {err}");
            Vec::new()
        }
    }
}

fn parse_rides(content: &str) -> HashMap<String, Option<u32>> {
    let entries: Vec<RideEntry> = match serde_json::from_str(content) {
        Ok(entries) => entries,
        Err(err) => {
            leptos::logging::warn!("Failed to parse rides dataset: {err}");
            Vec::new()
        }
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            RideEntry::Code(code) => (code, None),
            RideEntry::Counted {
                service_code,
                count,
            } => (service_code, Some(count)),
        })
        .collect()
}

fn parse_image_manifest(content: &str) -> ImageManifest {
    match serde_json::from_str(content) {
        Ok(manifest) => manifest,
        Err(err) => {
            leptos::logging::warn!("Failed to parse image manifest: {err}");
            ImageManifest::default()
        }
    }
}

/// Derives flags for every record, applies the no-photo cap, and orders the
/// result: photo routes first, then within the whole list ridden routes
/// before non-ridden ones, preserving relative order inside each group.
#[must_use]
pub fn build_catalogue(
    records: Vec<RouteRecord>,
    rides: &HashMap<String, Option<u32>>,
    manifest: &ImageManifest,
    config: CatalogueConfig,
) -> Vec<BusRoute> {
    let (with_photo, without_photo): (Vec<_>, Vec<_>) = records
        .into_iter()
        .map(|record| enrich(record, rides, manifest))
        .partition(|route| route.has_photo);

    let mut catalogue = with_photo;
    catalogue.extend(without_photo.into_iter().take(config.max_without_photo));

    // Stable partition: equal keys keep their relative order.
    catalogue.sort_by_key(|route| !route.ridden);
    catalogue
}

fn enrich(
    record: RouteRecord,
    rides: &HashMap<String, Option<u32>>,
    manifest: &ImageManifest,
) -> BusRoute {
    let images = resolve_images(manifest, &record.dataset_id, &record.service_code);
    let geometry = record
        .geom
        .as_ref()
        .map(GeomSource::parse)
        .unwrap_or_default();
    let (ridden, ride_count) = match rides.get(&record.service_code) {
        Some(count) => (true, *count),
        None => (false, None),
    };

    BusRoute {
        has_photo: !images.is_empty(),
        images,
        geometry,
        ridden,
        ride_count,
        dataset_id: record.dataset_id,
        bus_number: record.bus_number,
        service_code: record.service_code,
        operator_name: record.operator_name,
        line_name: record.line_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageManifest;

    fn record(dataset_id: &str, service_code: &str) -> RouteRecord {
        serde_json::from_value(serde_json::json!({
            "dataset_id": dataset_id,
            "bus_number": service_code.split(':').last().unwrap_or_default(),
            "service_code": service_code,
            "operator_name": "Test Operator",
            "line_name": "Test Line",
            "geom": "MULTILINESTRING ((-0.1 51.5, -0.2 51.6))"
        }))
        .expect("test record")
    }

    fn manifest_for(codes: &[&str]) -> ImageManifest {
        ImageManifest::new(
            codes
                .iter()
                .map(|code| format!("images/1/{}.jpg", code.replace(':', "_"))),
        )
    }

    #[test]
    fn test_no_photo_cap_applied_after_photo_partition() {
        let records: Vec<RouteRecord> = (0..8).map(|i| record("1", &format!("S:{i}"))).collect();
        // Routes S:0, S:1, S:2 have photos; five do not, cap keeps two.
        let manifest = manifest_for(&["S:0", "S:1", "S:2"]);
        let config = CatalogueConfig {
            max_without_photo: 2,
        };

        let catalogue = build_catalogue(records, &HashMap::new(), &manifest, config);

        assert_eq!(catalogue.len(), 5);
        let codes: Vec<&str> = catalogue.iter().map(|r| r.service_code.as_str()).collect();
        assert_eq!(codes, vec!["S:0", "S:1", "S:2", "S:3", "S:4"]);
        assert!(catalogue[..3].iter().all(|r| r.has_photo));
        assert!(catalogue[3..].iter().all(|r| !r.has_photo));
    }

    #[test]
    fn test_ridden_routes_partition_first_stably() {
        let records: Vec<RouteRecord> = ["S:a", "S:b", "S:c", "S:d"]
            .iter()
            .map(|code| record("1", code))
            .collect();
        let manifest = manifest_for(&["S:a", "S:b", "S:c", "S:d"]);
        let mut rides = HashMap::new();
        rides.insert("S:b".to_string(), None);
        rides.insert("S:d".to_string(), Some(3));

        let catalogue = build_catalogue(records, &rides, &manifest, CatalogueConfig::default());

        let codes: Vec<&str> = catalogue.iter().map(|r| r.service_code.as_str()).collect();
        // Ridden keep dataset order (b before d), as do the rest (a before c).
        assert_eq!(codes, vec!["S:b", "S:d", "S:a", "S:c"]);
        assert_eq!(catalogue[1].ride_count, Some(3));
        assert_eq!(catalogue[0].ride_count, None);
        assert!(catalogue[0].ridden && catalogue[1].ridden);
        assert!(!catalogue[2].ridden && !catalogue[3].ridden);
    }

    #[test]
    fn test_ridden_ordering_spans_photo_partitions() {
        // A ridden route without a photo sorts ahead of an unridden route
        // with one, but photo routes keep their lead within the same
        // ridden group.
        let records: Vec<RouteRecord> = ["S:photo", "S:plain"]
            .iter()
            .map(|code| record("1", code))
            .collect();
        let manifest = manifest_for(&["S:photo"]);
        let mut rides = HashMap::new();
        rides.insert("S:plain".to_string(), None);

        let catalogue = build_catalogue(records, &rides, &manifest, CatalogueConfig::default());

        let codes: Vec<&str> = catalogue.iter().map(|r| r.service_code.as_str()).collect();
        assert_eq!(codes, vec!["S:plain", "S:photo"]);
    }

    #[test]
    fn test_rides_dataset_both_shapes() {
        let rides = parse_rides(r#"["PB0001:12", {"service_code": "PB0002:9", "count": 4}]"#);

        assert_eq!(rides.get("PB0001:12"), Some(&None));
        assert_eq!(rides.get("PB0002:9"), Some(&Some(4)));
        assert_eq!(rides.get("PB0003:1"), None);
    }

    #[test]
    fn test_malformed_artifacts_degrade_to_empty() {
        assert!(parse_routes("not json").is_empty());
        assert!(parse_rides("{\"oops\": 1}").is_empty());
        assert!(parse_image_manifest("[1, 2, 3]").is_empty());
    }

    #[test]
    fn test_enrich_parses_geometry_once() {
        let catalogue = build_catalogue(
            vec![record("1", "S:1")],
            &HashMap::new(),
            &manifest_for(&["S:1"]),
            CatalogueConfig::default(),
        );

        assert_eq!(
            catalogue[0].geometry,
            vec![vec![(51.5, -0.1), (51.6, -0.2)]]
        );
        assert_eq!(catalogue[0].images, vec!["images/1/S_1.jpg"]);
    }

    #[test]
    fn test_embedded_artifacts_load() {
        let catalogue = load_catalogue();
        assert!(!catalogue.is_empty());
        // The shipped dataset has at least one ridden route with a photo.
        assert!(catalogue.iter().any(|r| r.ridden));
        assert!(catalogue.iter().any(|r| r.has_photo));
        assert!(catalogue.iter().all(|r| !r.geometry.is_empty()));
    }
}
