use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_nearby::distance::haversine_km;
use geo_nearby::kdtree::{KDTree, KDTreeIndex};
use geo_nearby::{LatLon, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_points(n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            Point::new(
                i.to_string(),
                rng.gen_range(-90.0..90.0),
                rng.gen_range(-180.0..180.0),
            )
        })
        .collect()
}

fn linear_scan(points: &[Point], target: &LatLon, r: f64, k: usize) -> Vec<(usize, f64)> {
    let mut result: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, haversine_km(target, &p.coord())))
        .filter(|(_, d)| *d <= r)
        .collect();
    result.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    result.truncate(k);
    result
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for n in [1_000, 10_000, 100_000] {
        let points = generate_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| KDTree::try_new(points.to_vec()).unwrap())
        });
    }
    group.finish();

    let points = generate_points(100_000);
    let tree = KDTree::try_new(points.clone()).unwrap();
    let target = LatLon::new(40.7, -74.0);

    let mut group = c.benchmark_group("radius search");
    for r in [10.0, 100.0, 1000.0] {
        group.bench_with_input(BenchmarkId::new("kdtree", r), &r, |b, &r| {
            b.iter(|| tree.neighbors(&target, r, 10).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("linear scan", r), &r, |b, &r| {
            b.iter(|| linear_scan(&points, &target, r, 10))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
