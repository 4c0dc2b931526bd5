//! Criterion benchmarks for rust_log_facade

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_log_facade::prelude::*;
use std::io;
use tempfile::TempDir;

fn sink_logger(encoding: Encoding) -> Logger {
    Logger::builder()
        .encoder(
            EncoderConfig::new()
                .with_encoding(encoding)
                .with_level_encoding(LevelEncoding::Lowercase),
        )
        .console_writer(io::sink())
        .build()
        .expect("Failed to build logger")
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("console", |b| {
        b.iter(|| black_box(Logger::builder().console_writer(io::sink()).build().unwrap()));
    });

    let root = sink_logger(Encoding::Console);
    group.bench_function("with_two_fields", |b| {
        b.iter(|| {
            black_box(root.with(&[Field::string("request_id", "r-1"), Field::int("attempt", 1)]))
        });
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_console_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("console_logging");
    group.throughput(Throughput::Elements(1));

    for (label, encoding) in [("console", Encoding::Console), ("json", Encoding::Json)] {
        let logger = sink_logger(encoding);

        group.bench_with_input(BenchmarkId::new("no_fields", label), &logger, |b, logger| {
            b.iter(|| logger.info(black_box("request handled"), &[]));
        });

        group.bench_with_input(BenchmarkId::new("four_fields", label), &logger, |b, logger| {
            b.iter(|| {
                logger.info(
                    black_box("request handled"),
                    &[
                        Field::string("path", "/api/orders"),
                        Field::int("status", 200),
                        Field::float64("latency_ms", 12.5),
                        Field::int64("bytes", 5120),
                    ],
                )
            });
        });
    }

    let context = sink_logger(Encoding::Console).with(&[
        Field::string("service", "billing"),
        Field::string("region", "eu-west-1"),
    ]);
    group.bench_function("context_fields", |b| {
        b.iter(|| context.warn(black_box("retrying"), &[Field::int("attempt", 2)]));
    });

    group.finish();
}

fn bench_file_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_logging");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .persist_to_file(true)
        .log_dir(temp_dir.path().join("logs"))
        .console_writer(io::sink())
        .build()
        .expect("Failed to build logger");

    group.bench_function("file_and_console", |b| {
        b.iter(|| logger.info(black_box("persisted"), &[Field::int("n", 1)]));
    });

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder()
        .min_level(LogLevel::Error)
        .console_writer(io::sink())
        .build()
        .unwrap();

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("dropped"), &[]));
    });

    group.finish();
}

// ============================================================================
// Field Construction Benchmarks
// ============================================================================

fn bench_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("fields");
    group.throughput(Throughput::Elements(1));

    group.bench_function("string", |b| {
        b.iter(|| black_box(Field::string("key", "value")));
    });

    group.bench_function("any_vec", |b| {
        let items = vec![1u32, 2, 3, 4, 5];
        b.iter(|| black_box(Field::any("items", &items)));
    });

    group.bench_function("stack", |b| {
        b.iter(|| black_box(Field::stack("stack")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_console_logging,
    bench_file_logging,
    bench_level_filtering,
    bench_fields,
);

criterion_main!(benches);
