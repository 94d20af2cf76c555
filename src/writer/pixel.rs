//! The pixel-chunking protocol shared by every column writer.
//!
//! A writer variant only knows how to consume rows of its vector type into
//! the open pixel and how to encode a full pixel. [`PixelState`] holds the
//! counters and side tables common to all variants, and the functions here
//! drive the chunking loop:
//!
//! ```text
//! write(vector, length):
//!     while pending + remaining >= stride:
//!         consume(stride - pending rows)
//!         new_pixel()                  encode, index, reset counters
//!     consume(remaining rows)          stays pending in the open pixel
//! ```

use eyre::{bail, Result};

use super::sink::OutputSink;
use super::stats::{ColumnChunkIndex, PixelStatistic, StatsRecorder};
use crate::config::{ByteOrder, WriterOptions};
use crate::encoding::{bit_wise_compact, write_i32, write_i64, RunLengthEncoder};
use crate::error::ColumnError;
use crate::vector::VectorBase;

#[derive(Debug)]
pub struct PixelState {
    pub(crate) pixel_stride: usize,
    pub(crate) cur_pixel_ele_index: usize,
    pub(crate) cur_pixel_vector_index: usize,
    pub(crate) cur_pixel_is_null_index: usize,
    is_null: Vec<bool>,
    has_null: bool,
    pub(crate) nulls_padding: bool,
    pub(crate) byte_order: ByteOrder,
    pub(crate) pixel_stats: StatsRecorder,
    chunk_stats: StatsRecorder,
    null_stream: Vec<u8>,
    chunk_index: ColumnChunkIndex,
    pixel_start: usize,
    pixel_count: usize,
    closed: bool,
}

impl PixelState {
    pub(crate) fn new(options: &WriterOptions, nulls_padding: bool) -> Self {
        let pixel_stride = options.pixel_stride();
        Self {
            pixel_stride,
            cur_pixel_ele_index: 0,
            cur_pixel_vector_index: 0,
            cur_pixel_is_null_index: 0,
            is_null: vec![false; pixel_stride],
            has_null: false,
            nulls_padding,
            byte_order: options.byte_order(),
            pixel_stats: StatsRecorder::new(),
            chunk_stats: StatsRecorder::new(),
            null_stream: Vec::new(),
            chunk_index: ColumnChunkIndex::default(),
            pixel_start: 0,
            pixel_count: 0,
            closed: false,
        }
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Rows consumed into the open pixel.
    pub fn pending_rows(&self) -> usize {
        self.cur_pixel_is_null_index
    }

    /// Payload slots taken in the open pixel, null placeholders included.
    pub fn pending_values(&self) -> usize {
        self.cur_pixel_vector_index
    }

    pub fn pending_elements(&self) -> usize {
        self.cur_pixel_ele_index
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub fn is_nulls_padding(&self) -> bool {
        self.nulls_padding
    }

    pub fn chunk_stats(&self) -> &StatsRecorder {
        &self.chunk_stats
    }

    pub fn chunk_index(&self) -> &ColumnChunkIndex {
        &self.chunk_index
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Null bits of the open pixel.
    pub fn pending_nulls(&self) -> &[bool] {
        &self.is_null[..self.cur_pixel_is_null_index]
    }

    /// Counts a null row. Returns `true` when the row still takes a
    /// placeholder slot in the pixel's value buffer.
    pub(crate) fn count_null(&mut self) -> bool {
        self.cur_pixel_ele_index += 1;
        self.has_null = true;
        self.pixel_stats.increment();
        if self.nulls_padding {
            self.cur_pixel_vector_index += 1;
        }
        self.nulls_padding
    }

    pub(crate) fn count_value(&mut self) {
        self.cur_pixel_ele_index += 1;
        self.cur_pixel_vector_index += 1;
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            bail!(ColumnError::InvalidArgument(
                "column writer is already closed".to_string()
            ));
        }
        Ok(())
    }

    fn check_write(&self, length: usize, available: usize) -> Result<()> {
        self.check_open()?;
        if length > available {
            bail!(ColumnError::InvalidArgument(format!(
                "cannot write {} rows from a vector holding {}",
                length, available
            )));
        }
        Ok(())
    }

    fn copy_nulls(&mut self, nulls: &[bool]) {
        let start = self.cur_pixel_is_null_index;
        self.is_null[start..start + nulls.len()].copy_from_slice(nulls);
        self.cur_pixel_is_null_index += nulls.len();
    }

    /// Indexes the pixel that ends at sink position `end` and resets the
    /// pixel-local counters.
    fn finish_pixel(&mut self, end: usize) {
        let rows = self.cur_pixel_is_null_index;
        let null_offset = if self.has_null {
            let offset = self.null_stream.len();
            bit_wise_compact(&mut self.null_stream, &self.is_null[..rows], self.byte_order);
            Some(offset)
        } else {
            None
        };

        self.chunk_stats.merge(&self.pixel_stats);
        self.chunk_index.push(PixelStatistic {
            position: self.pixel_start,
            length: end - self.pixel_start,
            rows,
            null_offset,
            stats: std::mem::take(&mut self.pixel_stats),
        });
        tracing::trace!(
            pixel = self.pixel_count,
            rows,
            bytes = end - self.pixel_start,
            has_null = self.has_null,
            "pixel closed"
        );

        self.cur_pixel_ele_index = 0;
        self.cur_pixel_vector_index = 0;
        self.cur_pixel_is_null_index = 0;
        self.has_null = false;
        self.pixel_start = end;
        self.pixel_count += 1;
    }

    /// Marks the writer closed. Returns `false` if it already was.
    pub(crate) fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.is_null = Vec::new();
        self.null_stream = Vec::new();
        true
    }
}

/// A writer variant as seen by the chunking loop.
pub(crate) trait PixelEncoder {
    type Vector;

    fn pixel_state(&mut self) -> &mut PixelState;

    fn vector_base(vector: &Self::Vector) -> &VectorBase;

    /// Consumes rows `offset..offset + len` into the open pixel.
    fn consume(
        &mut self,
        vector: &Self::Vector,
        offset: usize,
        len: usize,
        sink: &mut dyn OutputSink,
    ) -> Result<()>;

    /// Writes the open pixel's buffered payload, if the variant buffers one.
    fn encode_pixel(&mut self, sink: &mut dyn OutputSink) -> Result<()>;
}

pub(crate) fn write_chunked<W: PixelEncoder>(
    writer: &mut W,
    vector: &W::Vector,
    length: usize,
    sink: &mut dyn OutputSink,
) -> Result<usize> {
    writer
        .pixel_state()
        .check_write(length, W::vector_base(vector).write_index())?;

    let stride = writer.pixel_state().pixel_stride;
    let mut offset = 0;
    let mut remaining = length;
    while writer.pixel_state().cur_pixel_is_null_index + remaining >= stride {
        let part = stride - writer.pixel_state().cur_pixel_is_null_index;
        consume_part(writer, vector, offset, part, sink)?;
        new_pixel(writer, sink)?;
        offset += part;
        remaining -= part;
    }
    consume_part(writer, vector, offset, remaining, sink)?;

    Ok(sink.write_pos())
}

fn consume_part<W: PixelEncoder>(
    writer: &mut W,
    vector: &W::Vector,
    offset: usize,
    len: usize,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    if len == 0 {
        return Ok(());
    }
    if writer.pixel_state().cur_pixel_is_null_index == 0 {
        writer.pixel_state().pixel_start = sink.write_pos();
    }
    writer.consume(vector, offset, len, sink)?;
    let nulls = &W::vector_base(vector).nulls()[offset..offset + len];
    writer.pixel_state().copy_nulls(nulls);
    Ok(())
}

/// Closes the open pixel if it holds rows.
pub(crate) fn close_open_pixel<W: PixelEncoder>(
    writer: &mut W,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    writer.pixel_state().check_open()?;
    if writer.pixel_state().cur_pixel_is_null_index > 0 {
        new_pixel(writer, sink)?;
    }
    Ok(())
}

fn new_pixel<W: PixelEncoder>(writer: &mut W, sink: &mut dyn OutputSink) -> Result<()> {
    writer.encode_pixel(sink)?;
    let end = sink.write_pos();
    writer.pixel_state().finish_pixel(end);
    Ok(())
}

/// Closes the open pixel if it holds rows, then appends the chunk's null
/// stream and records where it starts.
pub(crate) fn flush_pixels<W: PixelEncoder>(
    writer: &mut W,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    close_open_pixel(writer, sink)?;
    let state = writer.pixel_state();
    let offset = sink.write_pos();
    sink.put_bytes(&state.null_stream)?;
    state.chunk_index.set_is_null_offset(offset);
    state.null_stream.clear();
    Ok(())
}

/// Physical width of a flat integer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntWidth {
    Four,
    Eight,
}

/// Writes a pixel of integers, run-length encoded when `encoder` is set and
/// as flat fixed-width values otherwise.
pub(crate) fn emit_integers(
    values: &[i64],
    encoder: Option<&mut RunLengthEncoder>,
    width: IntWidth,
    order: ByteOrder,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    let mut buffer = Vec::with_capacity(values.len() * 8);
    match encoder {
        Some(encoder) => {
            encoder.encode(values, &mut buffer)?;
        }
        None => {
            for &value in values {
                match width {
                    IntWidth::Four => write_i32(&mut buffer, value as i32, order),
                    IntWidth::Eight => write_i64(&mut buffer, value, order),
                }
            }
        }
    }
    sink.put_bytes(&buffer)
}
