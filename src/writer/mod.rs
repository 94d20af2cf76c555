//! # Column Writers
//!
//! A column writer turns batches from a [`ColumnVector`] into the encoded
//! byte stream of one column chunk. Rows are grouped into pixels of
//! `pixel_stride` rows; each full pixel is encoded, appended to the sink and
//! indexed with its statistics.
//!
//! ## Variants
//!
//! | Writer                    | Vector    | Pixel payload                        | Encoding         |
//! |---------------------------|-----------|--------------------------------------|------------------|
//! | [`DateColumnWriter`]      | date      | 4-byte days or run-length stream     | RunLength at EL2 |
//! | [`TimestampColumnWriter`] | timestamp | 8-byte micros or run-length stream   | RunLength at EL2 |
//! | [`DecimalColumnWriter`]   | decimal   | 8-byte (16 for precision > 18)       | None             |
//! | [`StringColumnWriter`]    | binary    | raw bytes, plus a starts table       | None             |
//!
//! ## Lifecycle
//!
//! ```text
//! Empty --write--> Accumulating --pixel full--> new_pixel --> Accumulating
//!                       |                                          |
//!                       +-----------------flush--------------------+
//!                                           |
//!                                         close --> Closed
//! ```
//!
//! `flush` closes a partially filled pixel and appends the chunk's null
//! stream (one bit per row for every pixel that held a null). `close` clears
//! encoder state once; a second call does nothing and any later `write` or
//! `flush` fails with `InvalidArgument`.
//!
//! ## Null Padding
//!
//! With padding, a null row still occupies a zero placeholder in the pixel
//! payload so values keep their row positions. Date and timestamp writers
//! turn padding off at `EL2`, where run-length encoding is used instead.
//!
//! ## Errors
//!
//! Handing a writer a vector of another type fails with `TypeMismatch`.
//! A failed `write` leaves the writer in an unspecified state; discard it.

mod date;
mod decimal;
mod pixel;
mod sink;
mod stats;
mod string;
mod timestamp;

pub use date::DateColumnWriter;
pub use decimal::DecimalColumnWriter;
pub use pixel::PixelState;
pub use sink::{OutputSink, StreamSink};
pub use stats::{ColumnChunkIndex, PixelStatistic, StatsRecorder};
pub use string::StringColumnWriter;
pub use timestamp::TimestampColumnWriter;

use eyre::{bail, Result};

use crate::config::WriterOptions;
use crate::error::ColumnError;
use crate::vector::ColumnVector;

/// Encoding recorded in the column chunk metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnEncoding {
    None,
    RunLength,
}

/// Logical column type a writer is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Date,
    Timestamp,
    Decimal { precision: u8, scale: u8 },
    String,
}

#[derive(Debug)]
pub enum ColumnWriter {
    Date(DateColumnWriter),
    Timestamp(TimestampColumnWriter),
    Decimal(DecimalColumnWriter),
    String(StringColumnWriter),
}

impl ColumnWriter {
    pub fn new(kind: ColumnKind, options: &WriterOptions) -> Result<Self> {
        Ok(match kind {
            ColumnKind::Date => ColumnWriter::Date(DateColumnWriter::new(options)),
            ColumnKind::Timestamp => ColumnWriter::Timestamp(TimestampColumnWriter::new(options)),
            ColumnKind::Decimal { precision, scale } => {
                ColumnWriter::Decimal(DecimalColumnWriter::new(options, precision, scale)?)
            }
            ColumnKind::String => ColumnWriter::String(StringColumnWriter::new(options)),
        })
    }

    /// Name of the vector type this writer accepts.
    pub fn expected_vector(&self) -> &'static str {
        match self {
            ColumnWriter::Date(_) => "date",
            ColumnWriter::Timestamp(_) => "timestamp",
            ColumnWriter::Decimal(_) => "decimal",
            ColumnWriter::String(_) => "binary",
        }
    }

    /// Writes the first `length` rows of `vector`, returning the sink
    /// position afterwards.
    pub fn write(
        &mut self,
        vector: &ColumnVector,
        length: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<usize> {
        match (self, vector) {
            (ColumnWriter::Date(w), ColumnVector::Date(v)) => w.write(v, length, sink),
            (ColumnWriter::Timestamp(w), ColumnVector::Timestamp(v)) => w.write(v, length, sink),
            (ColumnWriter::Decimal(w), ColumnVector::Decimal(v)) => w.write(v, length, sink),
            (ColumnWriter::String(w), ColumnVector::Binary(v)) => w.write(v, length, sink),
            (writer, vector) => bail!(ColumnError::TypeMismatch {
                expected: writer.expected_vector(),
                actual: vector.type_name(),
            }),
        }
    }

    /// Closes the open pixel and appends the chunk's trailing tables.
    pub fn flush(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        match self {
            ColumnWriter::Date(w) => pixel::flush_pixels(w, sink),
            ColumnWriter::Timestamp(w) => pixel::flush_pixels(w, sink),
            ColumnWriter::Decimal(w) => pixel::flush_pixels(w, sink),
            ColumnWriter::String(w) => w.flush(sink),
        }
    }

    /// Encodes the open pixel now if it holds any rows, even if it is not
    /// full.
    pub fn new_pixel(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        match self {
            ColumnWriter::Date(w) => pixel::close_open_pixel(w, sink),
            ColumnWriter::Timestamp(w) => pixel::close_open_pixel(w, sink),
            ColumnWriter::Decimal(w) => pixel::close_open_pixel(w, sink),
            ColumnWriter::String(w) => pixel::close_open_pixel(w, sink),
        }
    }

    pub fn close(&mut self) {
        match self {
            ColumnWriter::Date(w) => w.close(),
            ColumnWriter::Timestamp(w) => w.close(),
            ColumnWriter::Decimal(w) => w.close(),
            ColumnWriter::String(w) => w.close(),
        }
    }

    pub fn state(&self) -> &PixelState {
        match self {
            ColumnWriter::Date(w) => w.state(),
            ColumnWriter::Timestamp(w) => w.state(),
            ColumnWriter::Decimal(w) => w.state(),
            ColumnWriter::String(w) => w.state(),
        }
    }

    pub fn column_chunk_encoding(&self) -> ColumnEncoding {
        match self {
            ColumnWriter::Date(w) => w.column_chunk_encoding(),
            ColumnWriter::Timestamp(w) => w.column_chunk_encoding(),
            ColumnWriter::Decimal(w) => w.column_chunk_encoding(),
            ColumnWriter::String(w) => w.column_chunk_encoding(),
        }
    }

    pub fn chunk_index(&self) -> &ColumnChunkIndex {
        self.state().chunk_index()
    }

    pub fn chunk_stats(&self) -> &StatsRecorder {
        self.state().chunk_stats()
    }

    pub fn pixel_count(&self) -> usize {
        self.state().pixel_count()
    }

    pub fn pending_rows(&self) -> usize {
        self.state().pending_rows()
    }

    pub fn is_nulls_padding(&self) -> bool {
        self.state().is_nulls_padding()
    }

    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{BinaryColumnVector, DateColumnVector};

    #[test]
    fn mismatched_vector_is_type_error() {
        let mut writer = ColumnWriter::new(ColumnKind::String, &WriterOptions::new()).unwrap();
        let vector = ColumnVector::from(DateColumnVector::new(1));
        let err = writer.write(&vector, 0, &mut Vec::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ColumnError>(),
            Some(&ColumnError::TypeMismatch {
                expected: "binary",
                actual: "date"
            })
        );
    }

    #[test]
    fn decimal_kind_validates_precision() {
        let kind = ColumnKind::Decimal {
            precision: 40,
            scale: 0,
        };
        assert!(ColumnWriter::new(kind, &WriterOptions::new()).is_err());
    }

    #[test]
    fn explicit_new_pixel_closes_partial_pixel() {
        let options = WriterOptions::new().with_pixel_stride(100);
        let mut writer = ColumnWriter::new(ColumnKind::String, &options).unwrap();
        let mut vector = BinaryColumnVector::new(2);
        vector.add_str("x").unwrap();
        let vector = ColumnVector::from(vector);

        let mut sink = Vec::new();
        writer.write(&vector, 1, &mut sink).unwrap();
        writer.new_pixel(&mut sink).unwrap();
        assert_eq!(writer.pixel_count(), 1);
        assert_eq!(writer.pending_rows(), 0);

        writer.new_pixel(&mut sink).unwrap();
        assert_eq!(writer.pixel_count(), 1);
    }

    #[test]
    fn write_after_close_fails() {
        let mut writer = ColumnWriter::new(ColumnKind::Date, &WriterOptions::new()).unwrap();
        writer.close();
        writer.close();
        assert!(writer.is_closed());
        let vector = ColumnVector::from(DateColumnVector::new(1));
        assert!(writer.write(&vector, 0, &mut Vec::new()).is_err());
        assert!(writer.flush(&mut Vec::new()).is_err());
    }
}
