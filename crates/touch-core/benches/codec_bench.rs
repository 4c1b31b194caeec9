//! Criterion benchmarks for the touch-core JSON codec.
//!
//! The listener decodes every payload on its own thread, so decode latency
//! bounds how quickly back-to-back drag records can be accepted.
//!
//! Run with:
//! ```bash
//! cargo bench --package touch-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use touch_core::{decode_command, encode_command, InputCommand, Point};

// ── Command fixtures ──────────────────────────────────────────────────────────

fn fixtures() -> Vec<(&'static str, InputCommand)> {
    vec![
        ("click", InputCommand::Click { at: Point::new(100, 200) }),
        (
            "scroll",
            InputCommand::Scroll {
                at: Point::new(50, 50),
                delta_y: 2.0,
            },
        ),
        (
            "drag",
            InputCommand::DragMove {
                start: Point::new(0, 0),
                to: Point::new(10, 10),
            },
        ),
        ("dragend", InputCommand::DragEnd),
    ]
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, cmd) in fixtures() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &cmd, |b, cmd| {
            b.iter(|| encode_command(black_box(cmd)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (name, cmd) in fixtures() {
        let bytes = encode_command(&cmd).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| decode_command(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode_malformed(c: &mut Criterion) {
    let garbage = vec![b'{'; 2048];
    c.bench_function("decode_malformed_2k", |b| {
        b.iter(|| decode_command(black_box(&garbage)).is_err())
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_malformed);
criterion_main!(benches);
