//! Column writer benchmarks for pixelcol
//!
//! Measures filling vectors from text and pushing full batches through each
//! writer variant into an in-memory sink.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pixelcol::{
    BinaryColumnVector, ColumnKind, ColumnVector, ColumnWriter, DateColumnVector,
    DecimalColumnVector, EncodingLevel, TimestampColumnVector, WriterOptions,
};
use std::hint::black_box as hint_black_box;

const BATCH_ROWS: usize = 4096;

fn date_batch() -> ColumnVector {
    let mut vector = DateColumnVector::new(BATCH_ROWS);
    for i in 0..BATCH_ROWS as i32 {
        if i % 64 == 0 {
            vector.add_null();
        } else {
            vector.add(19_000 + i / 32);
        }
    }
    ColumnVector::from(vector)
}

fn timestamp_batch() -> ColumnVector {
    let mut vector = TimestampColumnVector::new(BATCH_ROWS, 6).unwrap();
    for i in 0..BATCH_ROWS as i64 {
        vector.add(1_700_000_000_000_000 + i * 250_000);
    }
    ColumnVector::from(vector)
}

fn decimal_batch() -> ColumnVector {
    let mut vector = DecimalColumnVector::new(BATCH_ROWS, 12, 2).unwrap();
    for i in 0..BATCH_ROWS as i64 {
        vector.add_i64(i * 37).unwrap();
    }
    ColumnVector::from(vector)
}

fn string_batch() -> ColumnVector {
    let mut vector = BinaryColumnVector::new(BATCH_ROWS);
    for i in 0..BATCH_ROWS {
        vector.add_str(&format!("customer#{:09}", i)).unwrap();
    }
    ColumnVector::from(vector)
}

fn bench_vector_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_fill");
    group.throughput(Throughput::Elements(BATCH_ROWS as u64));

    let dates: Vec<String> = (0..BATCH_ROWS)
        .map(|i| format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1))
        .collect();
    group.bench_function("date_text", |b| {
        b.iter(|| {
            let mut vector = DateColumnVector::new(BATCH_ROWS);
            for text in black_box(&dates) {
                vector.add_str(text).unwrap();
            }
            hint_black_box(vector.write_index())
        });
    });

    let decimals: Vec<String> = (0..BATCH_ROWS).map(|i| format!("{}.{:03}", i, i % 1000)).collect();
    group.bench_function("decimal_text_rescale", |b| {
        b.iter(|| {
            let mut vector = DecimalColumnVector::new(BATCH_ROWS, 12, 2).unwrap();
            for text in black_box(&decimals) {
                vector.add_str(text).unwrap();
            }
            hint_black_box(vector.write_index())
        });
    });

    group.bench_function("binary_arena", |b| {
        b.iter(|| hint_black_box(string_batch().write_index()));
    });

    group.finish();
}

fn bench_write_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_batch");
    group.throughput(Throughput::Elements(BATCH_ROWS as u64));

    let cases = [
        ("date_rle", ColumnKind::Date, EncodingLevel::EL2, date_batch()),
        ("date_flat", ColumnKind::Date, EncodingLevel::EL0, date_batch()),
        ("timestamp_rle", ColumnKind::Timestamp, EncodingLevel::EL2, timestamp_batch()),
        (
            "decimal",
            ColumnKind::Decimal {
                precision: 12,
                scale: 2,
            },
            EncodingLevel::EL2,
            decimal_batch(),
        ),
        ("string", ColumnKind::String, EncodingLevel::EL2, string_batch()),
    ];

    for (name, kind, level, batch) in &cases {
        let options = WriterOptions::new()
            .with_pixel_stride(1024)
            .with_encoding_level(*level);
        group.bench_with_input(BenchmarkId::new("write_flush", name), batch, |b, batch| {
            let mut sink = Vec::with_capacity(BATCH_ROWS * 16);
            b.iter(|| {
                sink.clear();
                let mut writer = ColumnWriter::new(*kind, &options).unwrap();
                writer.write(black_box(batch), BATCH_ROWS, &mut sink).unwrap();
                writer.flush(&mut sink).unwrap();
                writer.close();
                hint_black_box(sink.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vector_fill, bench_write_batch);
criterion_main!(benches);
