use crate::geometry::{LatLng, LineString};

/// How close (screen px) the pointer must be to a line to count as hovering.
pub const ROUTE_HOVER_THRESHOLD: f64 = 8.0;

/// First route whose projected polyline passes within `threshold` pixels of
/// `(x, y)`. `project` maps geographic coordinates to screen space for the
/// current viewport; keeping it a parameter keeps this module pure.
pub fn find_route_at_position<F>(
    geometries: &[&[LineString]],
    project: F,
    x: f64,
    y: f64,
    threshold: f64,
) -> Option<usize>
where
    F: Fn(LatLng) -> (f64, f64),
{
    for (index, lines) in geometries.iter().enumerate() {
        for line in lines.iter() {
            let mut screen = line.iter().map(|point| project(*point));
            let Some(mut previous) = screen.next() else {
                continue;
            };
            for current in screen {
                if distance_to_segment((x, y), previous, current) <= threshold {
                    return Some(index);
                }
                previous = current;
            }
        }
    }

    None
}

fn distance_to_segment(point: (f64, f64), seg_start: (f64, f64), seg_end: (f64, f64)) -> f64 {
    let dx = seg_end.0 - seg_start.0;
    let dy = seg_end.1 - seg_start.1;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        // Degenerate segment
        let dx = point.0 - seg_start.0;
        let dy = point.1 - seg_start.1;
        return (dx * dx + dy * dy).sqrt();
    }

    let t = ((point.0 - seg_start.0) * dx + (point.1 - seg_start.1) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest_x = seg_start.0 + t * dx;
    let closest_y = seg_start.1 + t * dy;

    let dist_x = point.0 - closest_x;
    let dist_y = point.1 - closest_y;
    (dist_x * dist_x + dist_y * dist_y).sqrt()
}
