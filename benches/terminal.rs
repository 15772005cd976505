//! Terminal benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serial_term::{NewLineMode, Terminal};

fn quiet_terminal() -> Terminal {
    let mut term = Terminal::new();
    term.bell_mut().set_enabled(false);
    term.set_newline_mode(NewLineMode::AddCrToLf);
    term
}

fn bench_terminal_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    let log: String = (0..1000)
        .map(|i| format!("[{i:05}] sensor reading ok\n"))
        .collect();
    group.throughput(Throughput::Bytes(log.len() as u64));

    group.bench_function("log_lines", |b| {
        b.iter(|| {
            let mut term = quiet_terminal();
            term.input(black_box(log.as_bytes()));
            black_box(term)
        })
    });

    group.finish();
}

fn bench_terminal_utf8(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    let text = "Grüße, 世界! \n".repeat(500);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("utf8_text", |b| {
        b.iter(|| {
            let mut term = quiet_terminal();
            term.input(black_box(text.as_bytes()));
            black_box(term)
        })
    });

    group.finish();
}

fn bench_terminal_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    // Full-screen status page redrawn in place
    let mut frame = String::from("\x1b[H\x1b[2J");
    for row in 1..=24 {
        frame.push_str(&format!("\x1b[1;{row}H\x1b[32mrow {row:02}\x1b[0m: \x1b[Kvalue"));
    }
    let input = frame.repeat(50);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("redraw", |b| {
        b.iter(|| {
            let mut term = quiet_terminal();
            term.input(black_box(input.as_bytes()));
            black_box(term)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_terminal_text,
    bench_terminal_utf8,
    bench_terminal_redraw
);

criterion_main!(benches);
