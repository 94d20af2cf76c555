//! String and binary columns.
//!
//! Value bytes go to the sink as rows are consumed. Alongside them the
//! writer keeps the start offset of every row, nulls included, relative to
//! the first value byte of the column. `flush` appends that table:
//!
//! ```text
//! [value bytes ...][null stream][start_0]...[start_n-1][start_n][table_pos]
//!                               |<---- 4 bytes each, configured order ---->|
//! ```
//!
//! `start_n` is the closing offset, so row `i` spans `start_i..start_i+1`,
//! and `table_pos` is the sink position of `start_0`.

use eyre::{bail, Result};

use super::pixel::{flush_pixels, write_chunked, PixelEncoder, PixelState};
use super::sink::OutputSink;
use super::ColumnEncoding;
use crate::config::{WriterOptions, STARTS_ENTRY_SIZE};
use crate::encoding::write_i32;
use crate::error::ColumnError;
use crate::vector::{BinaryColumnVector, VectorBase};

#[derive(Debug)]
pub struct StringColumnWriter {
    state: PixelState,
    start_offset: usize,
    starts: Vec<i32>,
}

impl StringColumnWriter {
    pub fn new(options: &WriterOptions) -> Self {
        Self {
            state: PixelState::new(options, Self::decide_nulls_padding(options)),
            start_offset: 0,
            starts: Vec::new(),
        }
    }

    /// Padding is off at run-length levels, matching the integer writers.
    pub fn decide_nulls_padding(options: &WriterOptions) -> bool {
        options.is_nulls_padding() && !options.encoding_level().enables_runlength()
    }

    pub fn write(
        &mut self,
        vector: &BinaryColumnVector,
        length: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<usize> {
        write_chunked(self, vector, length, sink)
    }

    pub fn flush(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        flush_pixels(self, sink)?;
        self.flush_starts(sink)
    }

    /// Value bytes written for this column so far.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Starts recorded since the last flush.
    pub fn starts(&self) -> &[i32] {
        &self.starts
    }

    pub fn state(&self) -> &PixelState {
        &self.state
    }

    pub fn column_chunk_encoding(&self) -> ColumnEncoding {
        ColumnEncoding::None
    }

    pub fn close(&mut self) {
        if self.state.close() {
            self.starts = Vec::new();
            tracing::debug!(
                pixels = self.state.pixel_count(),
                bytes = self.start_offset,
                "string column writer closed"
            );
        }
    }

    fn flush_starts(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        let table_pos = sink.write_pos();
        let closing = self.current_start()?;
        let Ok(table_pos32) = i32::try_from(table_pos) else {
            bail!(ColumnError::InvalidArgument(format!(
                "starts table position {} does not fit a 4-byte back-pointer",
                table_pos
            )));
        };

        let order = self.state.byte_order;
        let mut table = Vec::with_capacity((self.starts.len() + 2) * STARTS_ENTRY_SIZE);
        for &start in self.starts.iter().chain([closing, table_pos32].iter()) {
            write_i32(&mut table, start, order);
        }
        sink.put_bytes(&table)?;

        tracing::debug!(
            entries = self.starts.len() + 1,
            table_pos,
            "string starts table flushed"
        );
        self.starts.clear();
        Ok(())
    }

    fn current_start(&self) -> Result<i32> {
        match i32::try_from(self.start_offset) {
            Ok(start) => Ok(start),
            Err(_) => bail!(ColumnError::InvalidArgument(format!(
                "string column holds {} value bytes, more than a 4-byte offset can address",
                self.start_offset
            ))),
        }
    }
}

impl PixelEncoder for StringColumnWriter {
    type Vector = BinaryColumnVector;

    fn pixel_state(&mut self) -> &mut PixelState {
        &mut self.state
    }

    fn vector_base(vector: &BinaryColumnVector) -> &VectorBase {
        vector.base()
    }

    fn consume(
        &mut self,
        vector: &BinaryColumnVector,
        offset: usize,
        len: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        for row in offset..offset + len {
            let start = self.current_start()?;
            match vector.value(row)? {
                None => {
                    self.state.count_null();
                }
                Some(value) => {
                    sink.put_bytes(&value)?;
                    self.state.count_value();
                    self.state.pixel_stats.update_binary(value.len());
                    self.start_offset += value.len();
                }
            }
            self.starts.push(start);
        }
        Ok(())
    }

    fn encode_pixel(&mut self, _sink: &mut dyn OutputSink) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ByteOrder, EncodingLevel};

    fn strings(values: &[Option<&str>]) -> BinaryColumnVector {
        let mut vector = BinaryColumnVector::new(values.len());
        for value in values {
            match value {
                Some(s) => vector.add_str(s).unwrap(),
                None => vector.add_null(),
            }
        }
        vector
    }

    fn read_i32s(bytes: &[u8], order: ByteOrder) -> Vec<i32> {
        bytes
            .chunks_exact(4)
            .map(|c| crate::encoding::fixed::read_i32(c.try_into().unwrap(), order))
            .collect()
    }

    #[test]
    fn values_go_straight_to_the_sink() {
        let options = WriterOptions::new().with_pixel_stride(10);
        let mut writer = StringColumnWriter::new(&options);
        let mut sink = Vec::new();
        writer
            .write(&strings(&[Some("ab"), None, Some("cde")]), 3, &mut sink)
            .unwrap();

        assert_eq!(sink, b"abcde");
        assert_eq!(writer.starts(), &[0, 2, 2]);
        assert_eq!(writer.start_offset(), 5);
        assert_eq!(writer.state().pixel_count(), 0);
    }

    #[test]
    fn flush_appends_starts_and_back_pointer() {
        let options = WriterOptions::new()
            .with_pixel_stride(10)
            .with_byte_order(ByteOrder::BigEndian);
        let mut writer = StringColumnWriter::new(&options);
        let mut sink = Vec::new();
        writer
            .write(&strings(&[Some("ab"), Some("cde")]), 2, &mut sink)
            .unwrap();
        writer.flush(&mut sink).unwrap();

        assert_eq!(&sink[..5], b"abcde");
        let table = read_i32s(&sink[5..], ByteOrder::BigEndian);
        assert_eq!(table, vec![0, 2, 5, 5]);
        assert_eq!(writer.state().pixel_count(), 1);
        assert!(writer.starts().is_empty());
    }

    #[test]
    fn encoding_is_always_none() {
        let writer = StringColumnWriter::new(&WriterOptions::new());
        assert_eq!(writer.column_chunk_encoding(), ColumnEncoding::None);
    }

    #[test]
    fn nulls_padding_follows_encoding_level() {
        let writer = StringColumnWriter::new(&WriterOptions::new());
        assert!(!writer.state().is_nulls_padding());

        let flat = WriterOptions::new().with_encoding_level(EncodingLevel::EL1);
        assert!(StringColumnWriter::new(&flat).state().is_nulls_padding());

        let unpadded = flat.with_nulls_padding(false);
        assert!(!StringColumnWriter::new(&unpadded).state().is_nulls_padding());
    }
}
