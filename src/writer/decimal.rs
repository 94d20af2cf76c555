//! Decimal column writer.
//!
//! Values skip the pixel buffer and go to the sink as they are consumed, so
//! pixel positions are known before the pixel closes.

use eyre::{bail, Result};

use super::pixel::{write_chunked, PixelEncoder, PixelState};
use super::sink::OutputSink;
use super::ColumnEncoding;
use crate::config::WriterOptions;
use crate::encoding::{write_i128, write_i64};
use crate::error::ColumnError;
use crate::vector::{DecimalColumnVector, PhysicalWidth, VectorBase};

/// Writes unscaled decimals as fixed-width integers straight to the sink:
/// 8 bytes for precisions up to 18, 16 bytes above. Decimals are never
/// run-length encoded.
#[derive(Debug)]
pub struct DecimalColumnWriter {
    state: PixelState,
    precision: u8,
    scale: u8,
    width: PhysicalWidth,
    buffer: Vec<u8>,
}

impl DecimalColumnWriter {
    pub fn new(options: &WriterOptions, precision: u8, scale: u8) -> Result<Self> {
        if scale > precision {
            bail!(ColumnError::InvalidArgument(format!(
                "decimal scale {} exceeds precision {}",
                scale, precision
            )));
        }
        Ok(Self {
            state: PixelState::new(options, Self::decide_nulls_padding(options)),
            precision,
            scale,
            width: PhysicalWidth::from_precision(precision)?,
            buffer: Vec::new(),
        })
    }

    pub fn decide_nulls_padding(options: &WriterOptions) -> bool {
        options.is_nulls_padding()
    }

    /// Bytes written per stored value.
    pub fn value_size(&self) -> usize {
        match self.width {
            PhysicalWidth::Int128 => 16,
            _ => 8,
        }
    }

    pub fn write(
        &mut self,
        vector: &DecimalColumnVector,
        length: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<usize> {
        if vector.precision() != self.precision || vector.scale() != self.scale {
            bail!(ColumnError::InvalidArgument(format!(
                "decimal({}, {}) vector given to a decimal({}, {}) writer",
                vector.precision(),
                vector.scale(),
                self.precision,
                self.scale
            )));
        }
        write_chunked(self, vector, length, sink)
    }

    pub fn state(&self) -> &PixelState {
        &self.state
    }

    pub fn column_chunk_encoding(&self) -> ColumnEncoding {
        ColumnEncoding::None
    }

    pub fn close(&mut self) {
        if self.state.close() {
            self.buffer = Vec::new();
            tracing::debug!(pixels = self.state.pixel_count(), "decimal column writer closed");
        }
    }

    fn put_value(&mut self, value: i128) {
        let order = self.state.byte_order;
        match self.width {
            PhysicalWidth::Int128 => write_i128(&mut self.buffer, value, order),
            _ => write_i64(&mut self.buffer, value as i64, order),
        }
    }
}

impl PixelEncoder for DecimalColumnWriter {
    type Vector = DecimalColumnVector;

    fn pixel_state(&mut self) -> &mut PixelState {
        &mut self.state
    }

    fn vector_base(vector: &DecimalColumnVector) -> &VectorBase {
        vector.base()
    }

    fn consume(
        &mut self,
        vector: &DecimalColumnVector,
        offset: usize,
        len: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        self.buffer.clear();
        for row in offset..offset + len {
            if vector.base().is_null(row) {
                if self.state.count_null() {
                    self.put_value(0);
                }
            } else {
                let value = vector.unscaled(row);
                self.state.count_value();
                self.state.pixel_stats.update_integer(value);
                self.put_value(value);
            }
        }
        sink.put_bytes(&self.buffer)
    }

    fn encode_pixel(&mut self, _sink: &mut dyn OutputSink) -> Result<()> {
        Ok(())
    }
}
