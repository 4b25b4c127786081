use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kv::{InMemoryBackend, KvCluster};
use minhash::{MinHashConfig, MinHashFeature};
use tokenize::WhitespaceTokenizer;

fn record_throughput(c: &mut Criterion) {
    let cluster = Arc::new(KvCluster::single(InMemoryBackend::new()));
    let feature = MinHashFeature::new(
        "bench",
        MinHashConfig::default().with_rows(0xFFFF).with_permutations(16).with_bands(8),
        WhitespaceTokenizer,
        cluster,
    )
    .unwrap();

    let text: String = (0..500).map(|i| format!("token-{i} ")).collect();

    c.bench_function("record_500_tokens", |b| {
        b.iter(|| {
            feature
                .record("bench-scope", black_box("bench-key"), black_box(&text))
                .unwrap();
        })
    });
}

criterion_group!(benches, record_throughput);
criterion_main!(benches);
