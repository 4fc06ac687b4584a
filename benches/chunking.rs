use criterion::{Criterion, criterion_group, criterion_main};
use pdf_chat::embeddings::{ChunkingConfig, chunk_text};
use std::fmt::Write;
use std::hint::black_box;

fn sample_document() -> String {
    let mut text = String::new();
    for section in 0..200 {
        writeln!(text, "Section {}", section).expect("writing to a String succeeds");
        for sentence in 0..12 {
            write!(
                text,
                "Sentence {} of section {} describes the quarterly results in some detail. ",
                sentence, section
            )
            .expect("writing to a String succeeds");
        }
        text.push('\n');
    }
    text
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let document = sample_document();
    let config = ChunkingConfig::default();
    c.bench_function("chunking", |b| {
        b.iter(|| chunk_text(black_box(&document), black_box(&config)))
    });

    let unbroken = "lorem ipsum ".repeat(20_000);
    c.bench_function("chunking_without_newlines", |b| {
        b.iter(|| chunk_text(black_box(&unbroken), black_box(&config)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
