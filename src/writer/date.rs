//! Date column writer.

use eyre::Result;

use super::pixel::{emit_integers, write_chunked, IntWidth, PixelEncoder, PixelState};
use super::sink::OutputSink;
use super::ColumnEncoding;
use crate::config::WriterOptions;
use crate::encoding::RunLengthEncoder;
use crate::vector::{DateColumnVector, VectorBase};

/// Writes dates as 4-byte day counts, run-length encoded at `EL2` and above.
#[derive(Debug)]
pub struct DateColumnWriter {
    state: PixelState,
    cur_pixel_vector: Vec<i64>,
    encoder: Option<RunLengthEncoder>,
}

impl DateColumnWriter {
    pub fn new(options: &WriterOptions) -> Self {
        let runlength = options.encoding_level().enables_runlength();
        Self {
            state: PixelState::new(options, Self::decide_nulls_padding(options)),
            cur_pixel_vector: Vec::with_capacity(options.pixel_stride()),
            encoder: runlength.then(|| RunLengthEncoder::new(true)),
        }
    }

    /// Run-length encoding already collapses null runs, so padding is only
    /// applied below `EL2`.
    pub fn decide_nulls_padding(options: &WriterOptions) -> bool {
        options.is_nulls_padding() && !options.encoding_level().enables_runlength()
    }

    pub fn write(
        &mut self,
        vector: &DateColumnVector,
        length: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<usize> {
        write_chunked(self, vector, length, sink)
    }

    pub fn state(&self) -> &PixelState {
        &self.state
    }

    pub fn column_chunk_encoding(&self) -> ColumnEncoding {
        if self.encoder.is_some() {
            ColumnEncoding::RunLength
        } else {
            ColumnEncoding::None
        }
    }

    pub fn close(&mut self) {
        if self.state.close() {
            if let Some(encoder) = self.encoder.as_mut() {
                encoder.clear();
            }
            self.cur_pixel_vector = Vec::new();
            tracing::debug!(pixels = self.state.pixel_count(), "date column writer closed");
        }
    }
}

impl PixelEncoder for DateColumnWriter {
    type Vector = DateColumnVector;

    fn pixel_state(&mut self) -> &mut PixelState {
        &mut self.state
    }

    fn vector_base(vector: &DateColumnVector) -> &VectorBase {
        vector.base()
    }

    fn consume(
        &mut self,
        vector: &DateColumnVector,
        offset: usize,
        len: usize,
        _sink: &mut dyn OutputSink,
    ) -> Result<()> {
        let nulls = vector.base().nulls();
        let days = vector.days();
        for row in offset..offset + len {
            if nulls[row] {
                if self.state.count_null() {
                    self.cur_pixel_vector.push(0);
                }
            } else {
                self.state.count_value();
                self.state.pixel_stats.update_integer(days[row] as i128);
                self.cur_pixel_vector.push(days[row] as i64);
            }
        }
        Ok(())
    }

    fn encode_pixel(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        emit_integers(
            &self.cur_pixel_vector,
            self.encoder.as_mut(),
            IntWidth::Four,
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
    use crate::config::{ByteOrder, EncodingLevel};
    use crate::encoding::decode_runlength;

    fn dates(values: &[Option<i32>]) -> DateColumnVector {
        let mut vector = DateColumnVector::new(values.len());
        for value in values {
            match value {
                Some(days) => vector.add(*days),
                None => vector.add_null(),
            }
        }
        vector
    }

    #[test]
    fn flat_pixels_are_four_bytes_per_row() {
        let options = WriterOptions::new()
            .with_pixel_stride(2)
            .with_encoding_level(EncodingLevel::EL0)
            .with_byte_order(ByteOrder::BigEndian);
        let mut writer = DateColumnWriter::new(&options);
        let mut sink = Vec::new();

        let pos = writer.write(&dates(&[Some(1), Some(2), Some(3)]), 3, &mut sink).unwrap();
        assert_eq!(pos, 8);
        assert_eq!(sink, [0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(writer.state().pending_rows(), 1);
        assert_eq!(writer.column_chunk_encoding(), ColumnEncoding::None);
    }

    #[test]
    fn padding_writes_zero_placeholders() {
        let options = WriterOptions::new()
            .with_pixel_stride(3)
            .with_encoding_level(EncodingLevel::EL1);
        let mut writer = DateColumnWriter::new(&options);
        assert!(writer.state().is_nulls_padding());

        let mut sink = Vec::new();
        writer.write(&dates(&[Some(7), None, Some(9)]), 3, &mut sink).unwrap();
        assert_eq!(sink, [7, 0, 0, 0, 0, 0, 0, 0, 9, 0, 0, 0]);
    }

    #[test]
    fn runlength_skips_null_rows() {
        let options = WriterOptions::new().with_pixel_stride(4);
        let mut writer = DateColumnWriter::new(&options);
        assert!(!writer.state().is_nulls_padding());
        assert_eq!(writer.column_chunk_encoding(), ColumnEncoding::RunLength);

        let mut sink = Vec::new();
        writer
            .write(&dates(&[Some(5), None, Some(5), Some(5)]), 4, &mut sink)
            .unwrap();
        assert_eq!(decode_runlength(&sink, true).unwrap(), vec![5, 5, 5]);

        let pixel = &writer.state().chunk_index().pixel_statistics()[0];
        assert_eq!(pixel.rows, 4);
        assert_eq!(pixel.stats.null_count(), 1);
        assert_eq!(pixel.stats.min(), Some(5));
    }

    #[test]
    fn close_twice_is_harmless() {
        let mut writer = DateColumnWriter::new(&WriterOptions::new());
        writer.close();
        writer.close();
        assert!(writer.state().is_closed());
    }
}
