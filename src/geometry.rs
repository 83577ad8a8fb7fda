use serde_json::Value;

/// A `(latitude, longitude)` pair in degrees.
pub type LatLng = (f64, f64);

/// One ordered run of coordinates; a route is a list of these.
pub type LineString = Vec<LatLng>;

const WKT_PREFIX: &str = "MULTILINESTRING ((";
const WKT_SUFFIX: &str = "))";

// The upstream route export emits exactly two spaces between segment groups.
// This must stay a literal match: differently-spaced input is not a valid
// export of that pipeline and degrades to fewer segments by the drop policy.
const WKT_SEGMENT_SEPARATOR: &str = "),  (";

/// Parses a WKT-like `MULTILINESTRING ((lng lat, ...), (lng lat, ...))` text
/// value into per-segment coordinate lists.
///
/// The input carries `lng lat` pairs; the output is `(lat, lng)`. A pair that
/// does not parse to two finite numbers is dropped from its segment, and any
/// input that is not shaped like a MULTILINESTRING yields an empty list —
/// malformed geometry degrades to nothing rather than failing the caller.
#[must_use]
pub fn parse_multilinestring(text: &str) -> Vec<LineString> {
    let Some(body) = text
        .trim()
        .strip_prefix(WKT_PREFIX)
        .and_then(|rest| rest.strip_suffix(WKT_SUFFIX))
    else {
        return Vec::new();
    };

    body.split(WKT_SEGMENT_SEPARATOR)
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> LineString {
    segment.split(',').filter_map(parse_pair).collect()
}

fn parse_pair(pair: &str) -> Option<LatLng> {
    let mut tokens = pair.split_whitespace();
    let lng: f64 = tokens.next()?.parse().ok()?;
    let lat: f64 = tokens.next()?.parse().ok()?;
    (lng.is_finite() && lat.is_finite()).then_some((lat, lng))
}

/// Extracts line geometry from a GeoJSON-style feature collection value.
///
/// Walks every feature and collects `LineString` / `MultiLineString`
/// coordinates, swapping them into `(lat, lng)` order. Anything malformed is
/// skipped; a value without a features array yields an empty list.
#[must_use]
pub fn lines_from_geojson(geom: &Value) -> Vec<LineString> {
    let Some(features) = geom["features"].as_array() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for feature in features {
        collect_geometry_lines(&feature["geometry"], &mut lines);
    }
    lines
}

fn collect_geometry_lines(geometry: &Value, out: &mut Vec<LineString>) {
    match geometry["type"].as_str() {
        Some("LineString") => {
            if let Some(coords) = geometry["coordinates"].as_array() {
                push_line(coords, out);
            }
        }
        Some("MultiLineString") => {
            if let Some(parts) = geometry["coordinates"].as_array() {
                for part in parts {
                    if let Some(coords) = part.as_array() {
                        push_line(coords, out);
                    }
                }
            }
        }
        _ => {}
    }
}

fn push_line(coords: &[Value], out: &mut Vec<LineString>) {
    let line: LineString = coords
        .iter()
        .filter_map(|pair| {
            let lng = pair.get(0)?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            (lng.is_finite() && lat.is_finite()).then_some((lat, lng))
        })
        .collect();

    if !line.is_empty() {
        out.push(line);
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Bounds {
    #[must_use]
    pub fn from_point((lat, lng): LatLng) -> Self {
        Self {
            min_lat: lat,
            min_lng: lng,
            max_lat: lat,
            max_lng: lng,
        }
    }

    pub fn extend(&mut self, (lat, lng): LatLng) {
        self.min_lat = self.min_lat.min(lat);
        self.min_lng = self.min_lng.min(lng);
        self.max_lat = self.max_lat.max(lat);
        self.max_lng = self.max_lng.max(lng);
    }

    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.extend((other.min_lat, other.min_lng));
        self.extend((other.max_lat, other.max_lng));
        self
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    #[must_use]
    pub fn contains(&self, (lat, lng): LatLng) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// Bounding box of a route's geometry, or `None` when there is no coordinate.
#[must_use]
pub fn geometry_bounds(lines: &[LineString]) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for point in lines.iter().flatten() {
        match bounds.as_mut() {
            Some(b) => b.extend(*point),
            None => bounds = Some(Bounds::from_point(*point)),
        }
    }
    bounds
}

/// Middle vertex of the first segment, used to seed a route's label position.
#[must_use]
pub fn line_midpoint(lines: &[LineString]) -> Option<LatLng> {
    let first = lines.iter().find(|line| !line.is_empty())?;
    Some(first[first.len() / 2])
}

/// Closest point to `point` that lies on the polyline itself.
///
/// Projects the query point onto every segment of every line string and keeps
/// the globally nearest projection — a point on a segment, not merely the
/// nearest vertex. Returns `None` only for geometry without any coordinate.
#[must_use]
pub fn nearest_point_on_polyline(point: LatLng, lines: &[LineString]) -> Option<LatLng> {
    let mut best: Option<(f64, LatLng)> = None;

    for line in lines {
        if line.len() == 1 {
            consider(point, line[0], &mut best);
        }
        for window in line.windows(2) {
            let candidate = project_onto_segment(point, window[0], window[1]);
            consider(point, candidate, &mut best);
        }
    }

    best.map(|(_, closest)| closest)
}

fn consider(point: LatLng, candidate: LatLng, best: &mut Option<(f64, LatLng)>) {
    let dist = squared_distance(point, candidate);
    if best.map_or(true, |(d, _)| dist < d) {
        *best = Some((dist, candidate));
    }
}

fn squared_distance(a: LatLng, b: LatLng) -> f64 {
    let d_lat = a.0 - b.0;
    let d_lng = a.1 - b.1;
    d_lat * d_lat + d_lng * d_lng
}

fn project_onto_segment(point: LatLng, seg_start: LatLng, seg_end: LatLng) -> LatLng {
    let d_lat = seg_end.0 - seg_start.0;
    let d_lng = seg_end.1 - seg_start.1;
    let len_sq = d_lat * d_lat + d_lng * d_lng;

    if len_sq == 0.0 {
        return seg_start;
    }

    let t = ((point.0 - seg_start.0) * d_lat + (point.1 - seg_start.1) * d_lng) / len_sq;
    let t = t.clamp(0.0, 1.0);

    (seg_start.0 + t * d_lat, seg_start.1 + t * d_lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_segments_swaps_coordinates() {
        let text = "MULTILINESTRING ((-0.1 51.5, -0.2 51.6),  (-0.3 51.7))";
        let lines = parse_multilinestring(text);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![(51.5, -0.1), (51.6, -0.2)]);
        assert_eq!(lines[1], vec![(51.7, -0.3)]);
    }

    #[test]
    fn test_parse_segment_count_matches_input() {
        let text = "MULTILINESTRING ((0 1, 2 3),  (4 5),  (6 7, 8 9))";
        assert_eq!(parse_multilinestring(text).len(), 3);
    }

    #[test]
    fn test_parse_empty_and_garbage_input() {
        assert!(parse_multilinestring("").is_empty());
        assert!(parse_multilinestring("   ").is_empty());
        assert!(parse_multilinestring("not geometry at all").is_empty());
        assert!(parse_multilinestring("LINESTRING (0 1, 2 3)").is_empty());
    }

    #[test]
    fn test_parse_drops_bad_pairs_not_whole_segment() {
        let text = "MULTILINESTRING ((-0.1 51.5, junk here, -0.2 51.6, nan inf))";
        let lines = parse_multilinestring(text);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], vec![(51.5, -0.1), (51.6, -0.2)]);
    }

    #[test]
    fn test_parse_single_space_separator_is_not_a_segment_break() {
        // One space between groups is not the upstream export format; the
        // stray tokens drop out instead of forming a second segment.
        let text = "MULTILINESTRING ((0 1, 2 3), (4 5))";
        let lines = parse_multilinestring(text);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_lines_from_geojson_feature_collection() {
        let geom = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-0.1, 51.5], [-0.2, 51.6]]
                }
            }, {
                "type": "Feature",
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [[[-0.3, 51.7]], [[-0.4, 51.8]]]
                }
            }]
        });

        let lines = lines_from_geojson(&geom);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![(51.5, -0.1), (51.6, -0.2)]);
        assert_eq!(lines[1], vec![(51.7, -0.3)]);
        assert_eq!(lines[2], vec![(51.8, -0.4)]);
    }

    #[test]
    fn test_lines_from_geojson_malformed() {
        assert!(lines_from_geojson(&serde_json::json!(null)).is_empty());
        assert!(lines_from_geojson(&serde_json::json!({"type": "FeatureCollection"})).is_empty());
        assert!(lines_from_geojson(&serde_json::json!({
            "features": [{"geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}]
        }))
        .is_empty());
    }

    #[test]
    fn test_geometry_bounds() {
        let lines = vec![vec![(51.5, -0.1), (51.7, -0.3)], vec![(51.4, 0.2)]];
        let bounds = geometry_bounds(&lines).expect("bounds");

        assert_eq!(bounds.min_lat, 51.4);
        assert_eq!(bounds.max_lat, 51.7);
        assert_eq!(bounds.min_lng, -0.3);
        assert_eq!(bounds.max_lng, 0.2);
        assert!(geometry_bounds(&[]).is_none());
        assert!(geometry_bounds(&[vec![]]).is_none());
    }

    #[test]
    fn test_line_midpoint_uses_first_nonempty_segment() {
        let lines = vec![vec![], vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]];
        assert_eq!(line_midpoint(&lines), Some((2.0, 2.0)));
        assert_eq!(line_midpoint(&[]), None);
    }

    #[test]
    fn test_nearest_point_projects_onto_segment_interior() {
        // Query sits above the middle of a horizontal segment; the nearest
        // point is the perpendicular foot, not either vertex.
        let lines = vec![vec![(0.0, 0.0), (0.0, 10.0)]];
        let nearest = nearest_point_on_polyline((5.0, 5.0), &lines).expect("nearest");

        assert!((nearest.0 - 0.0).abs() < 1e-12);
        assert!((nearest.1 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_point_clamps_to_segment_ends() {
        let lines = vec![vec![(0.0, 0.0), (0.0, 10.0)]];
        let nearest = nearest_point_on_polyline((3.0, -4.0), &lines).expect("nearest");
        assert_eq!(nearest, (0.0, 0.0));
    }

    #[test]
    fn test_nearest_point_picks_minimum_across_segments() {
        let lines = vec![
            vec![(0.0, 0.0), (0.0, 10.0)],
            vec![(2.0, 0.0), (2.0, 10.0)],
        ];
        let nearest = nearest_point_on_polyline((1.9, 5.0), &lines).expect("nearest");
        assert_eq!(nearest, (2.0, 5.0));

        // The result always lies on one of the input segments.
        assert!(lines
            .iter()
            .any(|line| line.windows(2).any(|w| on_segment(nearest, w[0], w[1]))));
    }

    #[test]
    fn test_nearest_point_empty_geometry() {
        assert!(nearest_point_on_polyline((0.0, 0.0), &[]).is_none());
        assert!(nearest_point_on_polyline((0.0, 0.0), &[vec![]]).is_none());
    }

    fn on_segment(point: LatLng, a: LatLng, b: LatLng) -> bool {
        let cross = (b.0 - a.0) * (point.1 - a.1) - (b.1 - a.1) * (point.0 - a.0);
        cross.abs() < 1e-9
            && point.0 >= a.0.min(b.0)
            && point.0 <= a.0.max(b.0)
            && point.1 >= a.1.min(b.1)
            && point.1 <= a.1.max(b.1)
    }
}
