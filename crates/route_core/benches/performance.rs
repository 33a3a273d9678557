//! Performance benchmarks for route_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use route_core::coordinate::Coordinate;
use route_core::normalize::strip_instruction_markup;
use route_core::polyline::{decode_polyline, encode_polyline};
use route_core::provider::route_from_json;
use route_core::test_helpers::directions_json;
use route_core::NormalizerConfig;

/// A wiggly path of `n` points around Berlin.
fn synthetic_path(n: usize) -> Vec<Coordinate> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Coordinate::new(52.5 + t * 1e-4, 13.4 + (t * 0.3).sin() * 1e-3)
        })
        .collect()
}

fn bench_polyline_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("polyline_decode");
    for points in [10, 100, 1_000] {
        let encoded = encode_polyline(&synthetic_path(points));
        group.bench_with_input(BenchmarkId::from_parameter(points), &encoded, |b, encoded| {
            b.iter(|| black_box(decode_polyline(encoded)));
        });
    }
    group.finish();
}

fn bench_route_normalization(c: &mut Criterion) {
    let path = synthetic_path(200);
    let legs: Vec<&[Coordinate]> = path.chunks(50).collect();
    let payload = directions_json(&legs);
    let config = NormalizerConfig::default();

    c.bench_function("route_from_json_4_legs", |b| {
        b.iter(|| black_box(route_from_json(&payload, &config)));
    });
}

fn bench_instruction_markup(c: &mut Criterion) {
    let html = "Turn <b>right</b> onto <b>Unter den Linden</b>&nbsp;toward \
                <b>Alexanderplatz</b><div style=\"font-size:0.9em\">Pass by the \
                Brandenburg Gate (on the left)</div>";
    c.bench_function("strip_instruction_markup", |b| {
        b.iter(|| black_box(strip_instruction_markup(html)));
    });
}

criterion_group!(
    benches,
    bench_polyline_decode,
    bench_route_normalization,
    bench_instruction_markup
);
criterion_main!(benches);
