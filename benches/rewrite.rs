use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use merkle_views::{BasicType, Blake3Hasher, Sha256Hasher, VectorType};
use std::sync::Arc;

fn bench_vector_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_set");
    for (name, vtype) in [
        ("plain_4096", VectorType::new(Arc::new(BasicType::Uint64), 4096).unwrap()),
        ("packed_4096", VectorType::packed(Arc::new(BasicType::Uint64), 4096).unwrap()),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || vtype.default_view(None).unwrap(),
                |mut view| {
                    for i in (0..4096).step_by(64) {
                        view.set_basic(i, black_box(i as u64)).unwrap();
                    }
                    view
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_root(c: &mut Criterion) {
    let vtype = VectorType::new(Arc::new(BasicType::Uint64), 4096).unwrap();
    let mut view = vtype.default_view(None).unwrap();
    for i in (0..4096).step_by(7) {
        view.set_basic(i, i as u64).unwrap();
    }

    c.bench_function("root_blake3_4096", |b| {
        b.iter(|| black_box(view.hash_tree_root(&Blake3Hasher)))
    });
    c.bench_function("root_sha256_4096", |b| {
        b.iter(|| black_box(view.hash_tree_root(&Sha256Hasher)))
    });
}

criterion_group!(benches, bench_vector_set, bench_root);
criterion_main!(benches);
