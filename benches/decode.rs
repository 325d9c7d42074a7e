//! Benchmarks for the bit reader and for whole-drawing decoding.
//!
//! The drawing benchmarks run only when `DWGCORE_BENCH_FILE` names an
//! R2000 drawing.
//!
//! Run with: cargo bench --bench decode

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dwgcore::io::dwg::reader::DwgBitReader;
use dwgcore::{decode_all_geometries_par, decode_geometry, decode_sections, DwgReaderConfiguration};

// =============================================================================
// Helpers
// =============================================================================

/// `count` bit shorts stored as one-byte values (prefix 01).
fn packed_bit_shorts(count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * 10 / 8 + 1);
    let mut acc = 0u32;
    let mut bits = 0u32;
    for i in 0..count {
        let value = (i % 200 + 1) as u32;
        acc = (acc << 10) | (0b01 << 8) | value;
        bits += 10;
        while bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    if bits > 0 {
        out.push((acc << (8 - bits)) as u8);
    }
    out
}

/// `count` modular chars of two bytes each.
fn packed_modular_chars(count: usize) -> Vec<u8> {
    (0..count).flat_map(|i| [0x80 | (i % 128) as u8, 0x01]).collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_bit_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_reader");

    for count in [1_000usize, 100_000] {
        let data = packed_bit_shorts(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("bit_short", count), &data, |b, data| {
            b.iter(|| {
                let mut reader = DwgBitReader::new(data.clone());
                let mut sum = 0i64;
                for _ in 0..count {
                    sum += reader.read_bit_short().unwrap_or(0) as i64;
                }
                black_box(sum)
            })
        });

        let data = packed_modular_chars(count);
        group.bench_with_input(BenchmarkId::new("modular_char", count), &data, |b, data| {
            b.iter(|| {
                let mut reader = DwgBitReader::new(data.clone());
                let mut sum = 0u64;
                for _ in 0..count {
                    sum += reader.read_modular_char().unwrap_or(0);
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_drawing(c: &mut Criterion) {
    let Ok(path) = std::env::var("DWGCORE_BENCH_FILE") else {
        return;
    };
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("cannot read {path}: {e}");
            return;
        }
    };
    let config = DwgReaderConfiguration {
        failsafe: true,
        ..Default::default()
    };
    let Ok(sections) = decode_sections(&mut Cursor::new(&bytes), &config) else {
        eprintln!("{path} is not a readable R2000 drawing");
        return;
    };

    let mut group = c.benchmark_group("drawing");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("decode_sections", |b| {
        b.iter(|| black_box(decode_sections(&mut Cursor::new(&bytes), &config).is_ok()))
    });

    group.bench_function("decode_geometries_sequential", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(&bytes);
            (0..sections.geometry_count())
                .filter(|&i| decode_geometry(&mut cursor, &sections, i).is_ok())
                .count()
        })
    });

    group.bench_function("decode_geometries_parallel", |b| {
        b.iter(|| {
            decode_all_geometries_par(&bytes, &sections)
                .iter()
                .filter(|r| r.is_ok())
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_bit_reader, bench_drawing);
criterion_main!(benches);
