// Retrieval benchmarks for ragkit-core
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ragkit_core::{
    search, similarity, DocumentChunk, FilterCondition, KnowledgeBase, KnowledgeBaseConfig,
    MetadataFilter, Vector,
};
use rand::prelude::*;
use std::sync::Arc;

// text-embedding-3-small
const DIM: usize = 1536;

const CATEGORIES: [&str; 5] = ["HR", "IT", "Product", "Support", "Marketing"];

fn generate_random_vector(rng: &mut StdRng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn generate_chunks(count: usize, dim: usize) -> Vec<DocumentChunk> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            DocumentChunk::with_id(i as u64, format!("document number {}", i))
                .with_meta("category", CATEGORIES[i % CATEGORIES.len()])
                .with_embedding(generate_random_vector(&mut rng, dim))
        })
        .collect()
}

fn benchmark_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    let mut rng = StdRng::seed_from_u64(7);

    for dim in [384, DIM, 3072].iter() {
        let a = generate_random_vector(&mut rng, *dim);
        let b = generate_random_vector(&mut rng, *dim);
        group.bench_with_input(BenchmarkId::new("cosine", dim), dim, |bench, _| {
            bench.iter(|| black_box(similarity(black_box(&a), black_box(&b)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let mut rng = StdRng::seed_from_u64(11);
    let query = generate_random_vector(&mut rng, DIM);

    for size in [100, 1000, 10000].iter() {
        let chunks = generate_chunks(*size, DIM);
        group.bench_with_input(BenchmarkId::new("top3", size), size, |b, _| {
            b.iter(|| {
                let results = search(black_box(&query), black_box(&chunks), 3).unwrap();
                black_box(results);
            });
        });
    }

    group.finish();
}

fn benchmark_filtered_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_search");
    let mut rng = StdRng::seed_from_u64(13);

    let kb = KnowledgeBase::new(KnowledgeBaseConfig::new("bench").with_dimension(DIM));
    kb.insert_many(generate_chunks(10000, DIM)).unwrap();
    let query = generate_random_vector(&mut rng, DIM);
    let hr = MetadataFilter::new(FilterCondition::equals("category", "HR"));

    group.bench_function("category_top3", |b| {
        b.iter(|| {
            let results = kb.search_filtered(black_box(&query), 3, &hr).unwrap();
            black_box(results);
        });
    });

    group.finish();
}

fn benchmark_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");
    let mut rng = StdRng::seed_from_u64(17);

    let kb = Arc::new(KnowledgeBase::new(KnowledgeBaseConfig::new("bench")));
    kb.insert_many(generate_chunks(1000, DIM)).unwrap();
    let query = generate_random_vector(&mut rng, DIM);

    group.bench_function("knowledge_base_x10", |b| {
        b.iter(|| {
            use std::thread;
            let handles: Vec<_> = (0..10)
                .map(|_| {
                    let kb = kb.clone();
                    let q = query.clone();
                    thread::spawn(move || kb.search(&q, 3).unwrap())
                })
                .collect();

            for handle in handles {
                black_box(handle.join().unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_similarity,
    benchmark_search,
    benchmark_filtered_search,
    benchmark_concurrent_reads
);
criterion_main!(benches);
