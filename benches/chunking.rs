use criterion::{Criterion, criterion_group, criterion_main};
use litreview::paper::chunking::{ChunkingConfig, chunk_text};
use std::hint::black_box;

const PARAGRAPH: &str = "Self-attention relates every position of a sequence to every other \
position. The Transformer stacks these layers with feed-forward blocks. Training is \
parallel across positions, which shortens wall-clock time considerably. Results on \
translation benchmarks improved over recurrent baselines.";

pub fn criterion_benchmark(c: &mut Criterion) {
    let content = vec![PARAGRAPH; 200].join("\n\n");
    let config = ChunkingConfig::default();
    c.bench_function("chunking", |b| {
        b.iter(|| chunk_text(black_box(&content), black_box(&config)));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
