use bus_atlas::data::load_catalogue;
use bus_atlas::geometry::{nearest_point_on_polyline, LineString};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn dense_route(points: usize) -> Vec<LineString> {
    let line: LineString = (0..points)
        .map(|i| {
            let t = i as f64 / points as f64;
            (51.4 + 0.2 * t, -0.3 + 0.4 * t + (t * 40.0).sin() * 0.01)
        })
        .collect();
    vec![line]
}

fn benchmark_nearest_point(c: &mut Criterion) {
    // Synthetic worst case: one route far denser than anything the dataset
    // ships.
    let dense = dense_route(2_000);
    c.bench_function("nearest_point_dense_route", |b| {
        b.iter(|| nearest_point_on_polyline(black_box((51.52, -0.11)), black_box(&dense)));
    });

    // Real data: the drag handler queries every vertex of the active route
    // once per pointer move.
    let catalogue = load_catalogue();
    c.bench_function("nearest_point_catalogue_sweep", |b| {
        b.iter(|| {
            for route in &catalogue {
                nearest_point_on_polyline(black_box((51.51, -0.12)), black_box(&route.geometry));
            }
        });
    });
}

criterion_group!(benches, benchmark_nearest_point);
criterion_main!(benches);
