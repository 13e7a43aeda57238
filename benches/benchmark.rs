// Retrieval benchmarks: exact index query and the full query path
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use distrag::{text, Engine, EngineConfig, FlatIndex, HashingEmbedder, Record, RecordStore, Vector};
use rand::prelude::*;
use std::sync::Arc;

fn generate_random_vector(rng: &mut StdRng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data).normalized()
}

fn generate_record(rng: &mut StdRng, i: usize) -> Record {
    Record {
        district: format!("District{}", i % 40),
        latitude: rng.random_range(8.0..14.0),
        longitude: rng.random_range(76.0..81.0),
        year: 2020 + (i % 4) as i32 * 10,
        scenario: ["baseline", "rcp45", "rcp85"][i % 3].to_string(),
        population_estimate: rng.random_range(10_000..5_000_000),
        avg_annual_rainfall_mm: rng.random_range(300.0..2500.0),
        groundwater_level_m: rng.random_range(0.5..40.0),
    }
}

fn benchmark_index_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_query");
    let mut rng = StdRng::seed_from_u64(1);

    for size in [100, 1000, 5000].iter() {
        let vectors = (0..*size).map(|_| generate_random_vector(&mut rng, 384)).collect();
        let index = FlatIndex::build(vectors).unwrap();
        let query = generate_random_vector(&mut rng, 384);

        group.bench_with_input(BenchmarkId::new("flat_l2_k3", size), size, |b, _| {
            b.iter(|| black_box(index.query(black_box(&query), 3).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_handle_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_query");
    let mut rng = StdRng::seed_from_u64(2);

    for size in [100, 1000].iter() {
        let records = (0..*size).map(|i| generate_record(&mut rng, i)).collect();
        let store = RecordStore::from_records(records).unwrap();
        let engine = Engine::build(store, Arc::new(HashingEmbedder::default()), EngineConfig::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("hashing", size), size, |b, _| {
            b.iter(|| black_box(engine.handle_query("District7 rainfall in 2040")));
        });
    }

    group.finish();
}

fn benchmark_projection(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let record = generate_record(&mut rng, 0);
    let projected = text::project(&record);

    c.bench_function("project", |b| b.iter(|| black_box(text::project(black_box(&record)))));
    c.bench_function("parse", |b| b.iter(|| black_box(text::parse(black_box(&projected)).unwrap())));
}

criterion_group!(benches, benchmark_index_query, benchmark_handle_query, benchmark_projection);
criterion_main!(benches);
