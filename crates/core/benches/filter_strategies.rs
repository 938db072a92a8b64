use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geocover::compute::filter::RecordIndex;
use geocover::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::hint::black_box;

fn random_table(n: usize) -> GeoTable {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = (0..n)
        .map(|id| {
            vec![
                json!(id),
                json!(21.02 + rng.random_range(-0.05..0.05)),
                json!(105.85 + rng.random_range(-0.05..0.05)),
            ]
        })
        .collect();
    GeoTable::with_rows(
        vec!["id".into(), "latitude".into(), "longitude".into()],
        rows,
    )
    .unwrap()
}

fn strategies() -> Vec<Box<dyn SpatialFilter>> {
    [
        FilterStrategy::Geodesic,
        FilterStrategy::Haversine,
        FilterStrategy::Indexed,
    ]
    .into_iter()
    .map(|s| FilterConfig::default().with_strategy(s).build().unwrap())
    .collect()
}

fn bench_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("within_radius");
    let center = Point::from_lat_lon(21.02, 105.85);

    for size in [1_000, 10_000, 100_000] {
        let table = random_table(size);
        group.throughput(Throughput::Elements(size as u64));

        for filter in strategies() {
            group.bench_with_input(BenchmarkId::new(filter.name(), size), &table, |b, table| {
                b.iter(|| {
                    filter
                        .within_radius(black_box(table), &center, 2000.0)
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

fn bench_polygon(c: &mut Criterion) {
    let mut group = c.benchmark_group("within_polygon");
    let area = circle(&Point::from_lat_lon(21.02, 105.85), 2000.0, 32).unwrap();

    for size in [1_000, 10_000, 100_000] {
        let table = random_table(size);
        group.throughput(Throughput::Elements(size as u64));

        for filter in strategies() {
            group.bench_with_input(BenchmarkId::new(filter.name(), size), &table, |b, table| {
                b.iter(|| filter.within_polygon(black_box(table), &area).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_reused_index(c: &mut Criterion) {
    let table = random_table(100_000);
    let index = RecordIndex::build(&table, &ColumnNames::default()).unwrap();
    let center = Point::from_lat_lon(21.02, 105.85);

    c.bench_function("record_index_radius_100k", |b| {
        b.iter(|| index.within_radius(black_box(&center), 2000.0).unwrap())
    });
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    let square = Polygon::from_coords(&[(105.8, 21.0), (105.9, 21.0), (105.9, 21.1), (105.8, 21.1)]);

    for spacing in [1000.0, 250.0, 100.0] {
        for parallel in [false, true] {
            let sampler = GridSampler::new(SamplerConfig::default().with_parallel(parallel));
            let id = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(id, spacing), &spacing, |b, &s| {
                b.iter(|| sampler.sample(black_box(&square), s).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_radius,
    bench_polygon,
    bench_reused_index,
    bench_sampling
);
criterion_main!(benches);
