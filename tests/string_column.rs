//! # String Column Tests
//!
//! Writes string columns to a file through `StreamSink` and reads the chunk
//! back to check the layout appended by `flush`:
//!
//! ```text
//! [value bytes][null stream][start_0 .. start_n][table_pos]
//! ```

use std::fs::File;
use std::io::{BufWriter, Read};
use std::sync::Arc;

use pixelcol::encoding::{bit_wise_expand, fixed::read_i32};
use pixelcol::{
    BinaryColumnVector, ByteOrder, ColumnEncoding, ColumnKind, ColumnVector, ColumnWriter,
    OutputSink, StreamSink, WriterOptions,
};
use tempfile::tempdir;

fn strings(values: &[Option<&str>]) -> ColumnVector {
    let mut vector = BinaryColumnVector::new(values.len());
    for value in values {
        match value {
            Some(s) => vector.add_str(s).unwrap(),
            None => vector.add_null(),
        }
    }
    ColumnVector::from(vector)
}

fn read_table(bytes: &[u8], order: ByteOrder) -> Vec<i32> {
    bytes
        .chunks_exact(4)
        .map(|c| read_i32(c.try_into().unwrap(), order))
        .collect()
}

/// Splits a flushed chunk into its starts table (closing entry included)
/// using the trailing back-pointer.
fn starts_table(chunk: &[u8], order: ByteOrder) -> (usize, Vec<i32>) {
    let tail: [u8; 4] = chunk[chunk.len() - 4..].try_into().unwrap();
    let table_pos = read_i32(tail, order) as usize;
    (table_pos, read_table(&chunk[table_pos..chunk.len() - 4], order))
}

#[test]
fn flushed_chunk_round_trips_through_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("strings.col");
    let options = WriterOptions::new()
        .with_pixel_stride(2)
        .with_byte_order(ByteOrder::BigEndian);
    let mut writer = ColumnWriter::new(ColumnKind::String, &options).unwrap();
    assert_eq!(writer.column_chunk_encoding(), ColumnEncoding::None);

    let values = [Some("alpha"), None, Some(""), Some("omega"), Some("pi")];
    {
        let mut sink = StreamSink::new(BufWriter::new(File::create(&path).unwrap()));
        writer.write(&strings(&values), values.len(), &mut sink).unwrap();
        writer.flush(&mut sink).unwrap();
        sink.flush().unwrap();
    }

    let mut chunk = Vec::new();
    File::open(&path).unwrap().read_to_end(&mut chunk).unwrap();

    assert_eq!(&chunk[..12], b"alphaomegapi");
    let (table_pos, starts) = starts_table(&chunk, ByteOrder::BigEndian);
    assert_eq!(starts, vec![0, 5, 5, 5, 10, 12]);

    let null_offset = writer.chunk_index().is_null_offset().unwrap();
    assert_eq!(null_offset, 12);
    assert_eq!(table_pos, 13);
    let nulls = bit_wise_expand(&chunk[null_offset..table_pos], 2, ByteOrder::BigEndian);
    assert_eq!(nulls, vec![false, true]);

    let rows: Vec<_> = starts
        .windows(2)
        .map(|w| &chunk[w[0] as usize..w[1] as usize])
        .collect();
    assert_eq!(rows[0], b"alpha");
    assert!(rows[1].is_empty());
    assert!(rows[2].is_empty());
    assert_eq!(rows[3], b"omega");
    assert_eq!(rows[4], b"pi");
}

#[test]
fn back_pointer_is_sink_relative() {
    let options = WriterOptions::new().with_pixel_stride(8);
    let mut writer = ColumnWriter::new(ColumnKind::String, &options).unwrap();

    let mut sink = StreamSink::with_position(Vec::new(), 100);
    writer
        .write(&strings(&[Some("ab"), Some("c")]), 2, &mut sink)
        .unwrap();
    writer.flush(&mut sink).unwrap();
    assert_eq!(sink.write_pos(), 100 + 3 + 4 * 3 + 4);

    let bytes = sink.into_inner();
    let tail: [u8; 4] = bytes[bytes.len() - 4..].try_into().unwrap();
    assert_eq!(read_i32(tail, ByteOrder::LittleEndian), 103);
    assert_eq!(
        read_table(&bytes[3..bytes.len() - 4], ByteOrder::LittleEndian),
        vec![0, 2, 3]
    );
}

#[test]
fn offsets_continue_across_writes_and_pixels() {
    let options = WriterOptions::new().with_pixel_stride(2);
    let mut writer = ColumnWriter::new(ColumnKind::String, &options).unwrap();
    let mut sink = Vec::new();

    writer.write(&strings(&[Some("xy"), Some("z")]), 2, &mut sink).unwrap();
    writer.write(&strings(&[Some("uvw")]), 1, &mut sink).unwrap();
    assert_eq!(writer.pixel_count(), 1);
    writer.flush(&mut sink).unwrap();
    assert_eq!(writer.pixel_count(), 2);

    let pixels = writer.chunk_index().pixel_statistics();
    assert_eq!(pixels[0].position, 0);
    assert_eq!(pixels[0].length, 3);
    assert_eq!(pixels[0].stats.total_length(), 3);
    assert_eq!(pixels[1].position, 3);

    let (_, starts) = starts_table(&sink, ByteOrder::LittleEndian);
    assert_eq!(starts, vec![0, 2, 3, 6]);
}

#[test]
fn shared_buffer_rows_are_written_without_copying_into_the_vector() {
    let source: Arc<[u8]> = Arc::from(&b"key=value"[..]);
    let mut vector = BinaryColumnVector::new(2);
    vector.add_ref(&source, 0, 3).unwrap();
    vector.add_ref(&source, 4, 5).unwrap();
    assert_eq!(vector.arena().memory_usage(), 0);

    let mut writer = ColumnWriter::new(ColumnKind::String, &WriterOptions::new()).unwrap();
    let mut sink = Vec::new();
    writer
        .write(&ColumnVector::from(vector), 2, &mut sink)
        .unwrap();
    assert_eq!(sink, b"keyvalue");
}

#[test]
fn stale_row_fails_the_write() {
    let source: Arc<[u8]> = Arc::from(&b"gone"[..]);
    let mut vector = BinaryColumnVector::new(1);
    vector.add_ref(&source, 0, 4).unwrap();
    drop(source);

    let mut writer = ColumnWriter::new(ColumnKind::String, &WriterOptions::new()).unwrap();
    let vector = ColumnVector::from(vector);
    assert!(writer.write(&vector, 1, &mut Vec::new()).is_err());
}
