use criterion::{black_box, criterion_group, criterion_main, Criterion};

use readalong_core::alignment::{detect_hesitations, levenshtein, word_accuracy};
use readalong_core::model::WordToken;

const PASSAGE: &str = "once upon a time there was a little red hen who lived on a farm \
with a lazy dog a sleepy cat and a noisy duck";

fn misread(passage: &str) -> String {
    passage
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| if i % 4 == 0 { &w[..w.len().saturating_sub(1).max(1)] } else { w })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_levenshtein(c: &mut Criterion) {
    let mut group = c.benchmark_group("levenshtein");

    group.bench_function("short", |b| {
        b.iter(|| levenshtein(black_box("butter"), black_box("buter")))
    });

    group.bench_function("long", |b| {
        b.iter(|| {
            levenshtein(
                black_box("antidisestablishmentarianism"),
                black_box("antidisestablishmentarism"),
            )
        })
    });

    group.finish();
}

fn bench_word_accuracy(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_accuracy");
    let actual = misread(PASSAGE);

    group.bench_function("exact", |b| {
        b.iter(|| word_accuracy(black_box(PASSAGE), black_box(PASSAGE)))
    });

    group.bench_function("misread", |b| {
        b.iter(|| word_accuracy(black_box(PASSAGE), black_box(&actual)))
    });

    group.finish();
}

fn bench_hesitations(c: &mut Criterion) {
    let tokens: Vec<WordToken> = (0..500u64)
        .map(|i| {
            let start = i * 400 + if i % 7 == 0 { 600 } else { 0 };
            WordToken::timed(format!("w{i}"), start, start + 300)
        })
        .collect();

    c.bench_function("detect_hesitations/500", |b| {
        b.iter(|| detect_hesitations(black_box(&tokens)))
    });
}

criterion_group!(benches, bench_levenshtein, bench_word_accuracy, bench_hesitations);
criterion_main!(benches);
