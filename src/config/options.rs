//! # Writer Options
//!
//! `WriterOptions` is the immutable configuration shared by every column
//! writer of one file. It is built once with chained setters and passed by
//! reference to each writer constructor; writers copy what they need and
//! never consult global state.
//!
//! | Option          | Default | Description                                   |
//! |-----------------|---------|-----------------------------------------------|
//! | pixel_stride    | 10 000  | Rows per pixel                                |
//! | encoding_level  | EL2     | Gates run-length encoding and nulls padding   |
//! | nulls_padding   | true    | Write a placeholder value for null rows       |
//! | byte_order      | Little  | Byte order of fixed-width values              |
//!
//! ```ignore
//! let options = WriterOptions::new()
//!     .with_pixel_stride(1024)
//!     .with_encoding_level(EncodingLevel::EL0)
//!     .with_byte_order(ByteOrder::BigEndian);
//! ```

use eyre::{bail, Result};

use super::DEFAULT_PIXEL_STRIDE;
use crate::error::ColumnError;

/// Ordinal encoding level. Levels at or above [`EncodingLevel::EL2`] enable
/// run-length encoding for integer-backed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncodingLevel {
    EL0,
    EL1,
    EL2,
}

impl EncodingLevel {
    /// Lowest level at which run-length encoding is applied.
    pub const RUNLENGTH_THRESHOLD: EncodingLevel = EncodingLevel::EL2;

    pub fn from_ordinal(level: u8) -> Result<Self> {
        match level {
            0 => Ok(EncodingLevel::EL0),
            1 => Ok(EncodingLevel::EL1),
            2 => Ok(EncodingLevel::EL2),
            _ => bail!(ColumnError::InvalidArgument(format!(
                "unknown encoding level {}",
                level
            ))),
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn ge(self, other: EncodingLevel) -> bool {
        self >= other
    }

    pub fn enables_runlength(self) -> bool {
        self.ge(Self::RUNLENGTH_THRESHOLD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    pixel_stride: usize,
    encoding_level: EncodingLevel,
    nulls_padding: bool,
    byte_order: ByteOrder,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self {
            pixel_stride: DEFAULT_PIXEL_STRIDE,
            encoding_level: EncodingLevel::EL2,
            nulls_padding: true,
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Sets the rows per pixel. A stride of zero is clamped to one.
    pub fn with_pixel_stride(mut self, pixel_stride: usize) -> Self {
        self.pixel_stride = pixel_stride.max(1);
        self
    }

    pub fn with_encoding_level(mut self, level: EncodingLevel) -> Self {
        self.encoding_level = level;
        self
    }

    pub fn with_nulls_padding(mut self, nulls_padding: bool) -> Self {
        self.nulls_padding = nulls_padding;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    pub fn encoding_level(&self) -> EncodingLevel {
        self.encoding_level
    }

    pub fn is_nulls_padding(&self) -> bool {
        self.nulls_padding
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_format_constants() {
        let options = WriterOptions::default();
        assert_eq!(options.pixel_stride(), DEFAULT_PIXEL_STRIDE);
        assert_eq!(options.encoding_level(), EncodingLevel::EL2);
        assert!(options.is_nulls_padding());
        assert_eq!(options.byte_order(), ByteOrder::LittleEndian);
    }

    #[test]
    fn zero_stride_is_clamped() {
        let options = WriterOptions::new().with_pixel_stride(0);
        assert_eq!(options.pixel_stride(), 1);
    }

    #[test]
    fn encoding_level_ordering() {
        assert!(EncodingLevel::EL2.ge(EncodingLevel::EL1));
        assert!(!EncodingLevel::EL1.enables_runlength());
        assert!(EncodingLevel::EL2.enables_runlength());
        assert_eq!(EncodingLevel::from_ordinal(1).unwrap(), EncodingLevel::EL1);
        assert!(EncodingLevel::from_ordinal(7).is_err());
    }
}
