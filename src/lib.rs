//! # pixelcol - Column Vectors and Pixel Writers
//!
//! pixelcol holds decoded rows of a columnar file in typed, growable column
//! vectors and turns them into the encoded byte stream of a column chunk.
//! Rows are grouped into fixed-size pixels; every pixel carries its own null
//! bitmap and statistics, and integer-like columns may be run-length encoded.
//!
//! - **Typed vectors**: binary, date, decimal and timestamp rows with null
//!   markers and amortized growth
//! - **Generation-checked arena**: binary views fail with `StaleReference`
//!   instead of reading freed memory
//! - **Exact decimals**: digit arithmetic with round-half-up, no floating
//!   point, true 128-bit storage
//!
//! ## Quick Start
//!
//! ```ignore
//! use pixelcol::{ColumnKind, ColumnVector, ColumnWriter, DateColumnVector, WriterOptions};
//!
//! let options = WriterOptions::new().with_pixel_stride(1024);
//! let mut writer = ColumnWriter::new(ColumnKind::Date, &options)?;
//!
//! let mut dates = DateColumnVector::new(3);
//! dates.add_str("2024-01-01")?;
//! dates.add_null();
//! dates.add(0);
//!
//! let mut sink = Vec::new();
//! writer.write(&ColumnVector::from(dates), 3, &mut sink)?;
//! writer.flush(&mut sink)?;
//! writer.close();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      ColumnWriter (date/ts/dec/str)      │
//! ├─────────────────────────────────────────┤
//! │  PixelState │ StatsRecorder │ OutputSink │
//! ├─────────────────────────────────────────┤
//! │      ColumnVector (bin/date/dec/ts)      │
//! ├────────────────────┬────────────────────┤
//! │  Parsing (text)    │  Arena (bytes)     │
//! ├────────────────────┴────────────────────┤
//! │  Encoding (fixed, bits, varint, RLE)    │
//! ├─────────────────────────────────────────┤
//! │         Config │ ColumnError             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Chunk Layout
//!
//! ```text
//! [pixel 0][pixel 1]...[pixel n-1][null stream][side tables]
//! ```
//!
//! Pixel payloads are either flat fixed-width integers in the configured
//! byte order or a run-length stream. String columns write raw value bytes
//! and append a starts table after the null stream.
//!
//! ## Module Overview
//!
//! - [`config`]: format constants and `WriterOptions`
//! - [`error`]: `ColumnError` kinds carried in `eyre::Report`
//! - [`memory`]: two-tier byte arena for binary values
//! - [`encoding`]: fixed-width, bitmap, varint and run-length codecs
//! - [`parsing`]: date, timestamp and decimal text parsing
//! - [`vector`]: column vectors
//! - [`writer`]: pixel-chunked column writers

#[macro_use]
mod macros;

pub mod config;
pub mod encoding;
pub mod error;
pub mod memory;
pub mod parsing;
pub mod vector;
pub mod writer;

pub use config::{ByteOrder, EncodingLevel, WriterOptions};
pub use error::ColumnError;
pub use vector::{
    BinaryColumnVector, BinaryValue, ColumnVector, DateColumnVector, DecimalColumnVector,
    PhysicalWidth, TimestampColumnVector,
};
pub use writer::{
    ColumnChunkIndex, ColumnEncoding, ColumnKind, ColumnWriter, OutputSink, PixelStatistic,
    StatsRecorder, StreamSink,
};
