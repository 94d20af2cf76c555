//! Fuzz testing for the pixel-chunking writers.
//!
//! Builds date and string batches from arbitrary rows, writes them with an
//! arbitrary stride and encoding level, and checks that the chunk index
//! accounts for every row and every run-length pixel decodes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use pixelcol::encoding::decode_runlength;
use pixelcol::{
    BinaryColumnVector, ColumnEncoding, ColumnKind, ColumnVector, ColumnWriter, DateColumnVector,
    EncodingLevel, WriterOptions,
};

#[derive(Debug, Arbitrary)]
struct WriterInput {
    stride: u8,
    level: u8,
    padding: bool,
    batches: Vec<Vec<Option<i32>>>,
    strings: Vec<Option<Vec<u8>>>,
}

fuzz_target!(|input: WriterInput| {
    let Ok(level) = EncodingLevel::from_ordinal(input.level % 3) else {
        return;
    };
    let options = WriterOptions::new()
        .with_pixel_stride(input.stride as usize % 64 + 1)
        .with_encoding_level(level)
        .with_nulls_padding(input.padding);

    let Ok(mut dates) = ColumnWriter::new(ColumnKind::Date, &options) else {
        return;
    };
    let mut sink = Vec::new();
    let mut total = 0;
    for batch in input.batches.iter().take(16) {
        let mut vector = DateColumnVector::new(batch.len());
        for value in batch {
            match value {
                Some(days) => vector.add(*days),
                None => vector.add_null(),
            }
        }
        dates
            .write(&ColumnVector::from(vector), batch.len(), &mut sink)
            .unwrap();
        total += batch.len();
    }
    dates.flush(&mut sink).unwrap();

    let pixels = dates.chunk_index().pixel_statistics();
    assert_eq!(pixels.iter().map(|p| p.rows).sum::<usize>(), total);
    if dates.column_chunk_encoding() == ColumnEncoding::RunLength {
        for pixel in pixels {
            let payload = &sink[pixel.position..pixel.position + pixel.length];
            let values = decode_runlength(payload, true).unwrap();
            assert_eq!(values.len() as u64, pixel.stats.value_count());
        }
    }
    dates.close();

    let mut vector = BinaryColumnVector::new(0);
    for value in input.strings.iter().take(256) {
        match value {
            Some(bytes) => vector.add(bytes).unwrap(),
            None => vector.add_null(),
        }
    }
    let rows = vector.write_index();
    let Ok(mut strings) = ColumnWriter::new(ColumnKind::String, &options) else {
        return;
    };
    let mut sink = Vec::new();
    strings
        .write(&ColumnVector::from(vector), rows, &mut sink)
        .unwrap();
    strings.flush(&mut sink).unwrap();
    assert_eq!(strings.chunk_stats().value_count() + strings.chunk_stats().null_count(), rows as u64);
});
