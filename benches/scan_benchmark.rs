use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsondb::core::collection::Collection;
use jsondb::core::types::IdGenerator;
use jsondb::parallel::LanePool;
use rand::Rng;

/// Helper to build a collection of random flat documents
fn create_collection(size: usize) -> Collection {
    let mut rng = rand::thread_rng();
    let ids = IdGenerator::new();
    let mut collection = Collection::new("bench");
    let words = ["the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog"];

    for i in 0..size {
        let json = format!(
            r#"{{"title":"Document {}","word":"{}","score":{},"meta":{{"category":"category_{}","flag":{}}}}}"#,
            i,
            words[rng.gen_range(0..words.len())],
            rng.gen_range(0..100),
            i % 10,
            rng.gen_bool(0.5),
        );
        collection.add_document(&json, &ids).unwrap();
    }
    collection
}

/// Sequential vs parallel pattern scan
fn bench_pattern_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_scan");
    let sequential = LanePool::sequential();
    let parallel = LanePool::new(num_cpus::get()).unwrap();

    for size in [1_000, 10_000, 50_000].iter() {
        let collection = create_collection(*size);
        let pattern = r#""meta"."category"="category_3" & "meta"."flag"=true"#;

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| black_box(collection.get_documents(pattern, &sequential).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
            b.iter(|| black_box(collection.get_documents(pattern, &parallel).unwrap()));
        });
    }
    group.finish();
}

/// Bulk removal keeps the complement; each iteration starts from a fresh copy
fn bench_pattern_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_remove");
    let parallel = LanePool::new(num_cpus::get()).unwrap();
    let collection = create_collection(10_000);

    group.bench_function("parallel_10000", |b| {
        b.iter_batched(
            || collection.clone(),
            |mut c| black_box(c.remove_documents(r#""word"="fox""#, &parallel).unwrap()),
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_pattern_scan, bench_pattern_remove);
criterion_main!(benches);
