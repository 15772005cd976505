//! Tokenizer benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serial_term::parser::EscapeParser;

fn bench_parse_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    // Plain ASCII text
    let plain_text = "Hello, World! ".repeat(1000);
    group.throughput(Throughput::Bytes(plain_text.len() as u64));

    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut parser = EscapeParser::new();
            let results = parser.parse(black_box(plain_text.as_bytes()));
            black_box(results)
        })
    });

    group.finish();
}

fn bench_parse_csi_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    // CSI sequences (cursor movement, SGR, erase)
    let csi_heavy = "\x1b[1;31mRed\x1b[0m \x1b[5;10H\x1b[2J".repeat(100);
    group.throughput(Throughput::Bytes(csi_heavy.len() as u64));

    group.bench_function("csi_sequences", |b| {
        b.iter(|| {
            let mut parser = EscapeParser::new();
            let results = parser.parse(black_box(csi_heavy.as_bytes()));
            black_box(results)
        })
    });

    group.finish();
}

fn bench_advance_bytewise(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    // Serial devices deliver a few bytes at a time
    let mixed = "temp=\x1b[33m41.5\x1b[0m\r\n\x1b[6n".repeat(500);
    group.throughput(Throughput::Bytes(mixed.len() as u64));

    group.bench_function("advance_bytewise", |b| {
        b.iter(|| {
            let mut parser = EscapeParser::new();
            let mut commands = 0usize;
            for &byte in black_box(mixed.as_bytes()) {
                if parser.advance(byte).is_command() {
                    commands += 1;
                }
            }
            black_box(commands)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_plain_text,
    bench_parse_csi_sequences,
    bench_advance_bytewise
);

criterion_main!(benches);
