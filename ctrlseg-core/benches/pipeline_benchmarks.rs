//! Benchmarks for the core pipeline stages
//!
//! Run with: cargo bench --bench pipeline_benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ctrlseg_core::{LineStore, Profile};
use std::hint::black_box;

/// Synthetic requirement document with `controls` controls
fn generate_document(controls: usize) -> Vec<String> {
    let mut lines = vec!["Payment Card Industry Data Security Standard v4.0".to_string()];
    for i in 0..controls {
        let (a, b, c) = (i / 100 + 1, i / 10 % 10 + 1, i % 10 + 1);
        lines.push(format!("{a}.{b}.{c} Security controls for area {i} are defined and maintained."));
        lines.push(format!("{a}.{b}.{c}.a Examine documented procedures for area {i}."));
        lines.push("Purpose".to_string());
        lines.push("Clearly defined controls reduce the chance of misconfiguration.".to_string());
        if i % 7 == 0 {
            lines.push(format!("Page {}", i / 7 + 1));
        }
    }
    lines
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let profile = Profile::from_code("pci-dss").unwrap();

    for controls in [50, 250, 1000] {
        let lines = generate_document(controls);
        group.throughput(Throughput::Elements(lines.len() as u64));

        group.bench_with_input(BenchmarkId::new("detect_and_assemble", controls), &lines, |b, lines| {
            b.iter(|| {
                let store = LineStore::from_texts(black_box(lines));
                let detector = profile.detector();
                let spans = detector.resolve(&store, detector.detect(&store));
                profile.assembler().assemble(&store, &spans)
            });
        });

        group.bench_with_input(BenchmarkId::new("full", controls), &lines, |b, lines| {
            let splitter = profile.splitter();
            b.iter(|| {
                let store = LineStore::from_texts(black_box(lines));
                let detector = profile.detector();
                let spans = detector.resolve(&store, detector.detect(&store));
                let assembly = profile.assembler().assemble(&store, &spans);
                assembly
                    .records()
                    .map(|r| {
                        let scored = profile.scorer().apply(profile.classifier().classify(r.clone()));
                        splitter.split(&scored).len()
                    })
                    .sum::<usize>()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
