//! Timestamp column writer. Shares the integer pixel path with dates at
//! twice the width.

use eyre::Result;

use super::pixel::{emit_integers, write_chunked, IntWidth, PixelEncoder, PixelState};
use super::sink::OutputSink;
use super::ColumnEncoding;
use crate::config::WriterOptions;
use crate::encoding::RunLengthEncoder;
use crate::vector::{TimestampColumnVector, VectorBase};

/// Writes timestamps as 8-byte microsecond counts, run-length encoded at
/// `EL2` and above.
#[derive(Debug)]
pub struct TimestampColumnWriter {
    state: PixelState,
    cur_pixel_vector: Vec<i64>,
    encoder: Option<RunLengthEncoder>,
}

impl TimestampColumnWriter {
    pub fn new(options: &WriterOptions) -> Self {
        let runlength = options.encoding_level().enables_runlength();
        Self {
            state: PixelState::new(options, Self::decide_nulls_padding(options)),
            cur_pixel_vector: Vec::with_capacity(options.pixel_stride()),
            encoder: runlength.then(|| RunLengthEncoder::new(true)),
        }
    }

    pub fn decide_nulls_padding(options: &WriterOptions) -> bool {
        options.is_nulls_padding() && !options.encoding_level().enables_runlength()
    }

    pub fn write(
        &mut self,
        vector: &TimestampColumnVector,
        length: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<usize> {
        write_chunked(self, vector, length, sink)
    }

    pub fn state(&self) -> &PixelState {
        &self.state
    }

    pub fn column_chunk_encoding(&self) -> ColumnEncoding {
        match self.encoder {
            Some(_) => ColumnEncoding::RunLength,
            None => ColumnEncoding::None,
        }
    }

    pub fn close(&mut self) {
        if !self.state.close() {
            return;
        }
        if let Some(encoder) = &mut self.encoder {
            encoder.clear();
        }
        self.cur_pixel_vector = Vec::new();
        tracing::debug!(
            pixels = self.state.pixel_count(),
            "timestamp column writer closed"
        );
    }
}

impl PixelEncoder for TimestampColumnWriter {
    type Vector = TimestampColumnVector;

    fn pixel_state(&mut self) -> &mut PixelState {
        &mut self.state
    }

    fn vector_base(vector: &TimestampColumnVector) -> &VectorBase {
        vector.base()
    }

    fn consume(
        &mut self,
        vector: &TimestampColumnVector,
        offset: usize,
        len: usize,
        _sink: &mut dyn OutputSink,
    ) -> Result<()> {
        let nulls = &vector.base().nulls()[offset..offset + len];
        let micros = &vector.micros()[offset..offset + len];
        for (&is_null, &value) in nulls.iter().zip(micros) {
            if is_null {
                if self.state.count_null() {
                    self.cur_pixel_vector.push(0);
                }
                continue;
            }
            self.state.count_value();
            self.state.pixel_stats.update_integer(value as i128);
            self.cur_pixel_vector.push(value);
        }
        Ok(())
    }

    fn encode_pixel(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        emit_integers(
            &self.cur_pixel_vector,
            self.encoder.as_mut(),
            IntWidth::Eight,
            self.state.byte_order,
            sink,
        )?;
        self.cur_pixel_vector.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodingLevel;
    use crate::encoding::fixed::read_i64;

    #[test]
    fn values_keep_all_64_bits() {
        let options = WriterOptions::new()
            .with_pixel_stride(2)
            .with_encoding_level(EncodingLevel::EL0);
        let mut writer = TimestampColumnWriter::new(&options);
        let mut vector = TimestampColumnVector::new(2, 6).unwrap();
        let big = 1_700_000_000_123_456i64;
        vector.add(big);
        vector.add(-1);

        let mut sink = Vec::new();
        writer.write(&vector, 2, &mut sink).unwrap();
        assert_eq!(sink.len(), 16);
        let first: [u8; 8] = sink[..8].try_into().unwrap();
        let second: [u8; 8] = sink[8..].try_into().unwrap();
        assert_eq!(read_i64(first, options.byte_order()), big);
        assert_eq!(read_i64(second, options.byte_order()), -1);
    }

    #[test]
    fn leftover_rows_stay_pending_across_calls() {
        let options = WriterOptions::new().with_pixel_stride(4);
        let mut writer = TimestampColumnWriter::new(&options);
        let mut vector = TimestampColumnVector::new(3, 6).unwrap();
        for i in 0..3 {
            vector.add(i);
        }

        let mut sink = Vec::new();
        writer.write(&vector, 3, &mut sink).unwrap();
        assert_eq!(writer.state().pixel_count(), 0);
        assert!(sink.is_empty());

        writer.write(&vector, 3, &mut sink).unwrap();
        assert_eq!(writer.state().pixel_count(), 1);
        assert_eq!(writer.state().pending_rows(), 2);
        assert_eq!(writer.state().chunk_stats().max(), Some(2));
    }
}
