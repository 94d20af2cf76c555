//! # Run-Length Integer Encoding
//!
//! Default integer encoder used by date and timestamp writers when the
//! encoding level enables run-length encoding. A host file writer with its own
//! encoder only has to produce a self-delimiting byte stream per pixel.
//!
//! ## Stream Format
//!
//! A pixel is a sequence of runs. Every run starts with an unsigned varint
//! header whose lowest bit selects the run kind:
//!
//! ```text
//! header & 1 == 0   repeat run:  (header >> 1) copies of one value
//!                   [header][value]
//! header & 1 == 1   literal run: (header >> 1) distinct values
//!                   [header][value][value]...
//! ```
//!
//! Values are zigzag varints for signed encoders and plain varints for
//! unsigned ones. Runs of at least `MIN_REPEAT_RUN` equal values become repeat
//! runs; everything else is buffered into literal runs of at most
//! `MAX_LITERAL_RUN` values.

use eyre::{bail, ensure, Result};
use smallvec::SmallVec;

use super::varint::{decode_varint, write_varint, zigzag_decode, zigzag_encode};
use crate::config::{MAX_LITERAL_RUN, MIN_REPEAT_RUN};
use crate::error::ColumnError;

#[derive(Debug)]
pub struct RunLengthEncoder {
    signed: bool,
    literals: SmallVec<[i64; 16]>,
    encoded_values: u64,
}

impl RunLengthEncoder {
    pub fn new(signed: bool) -> Self {
        Self {
            signed,
            literals: SmallVec::new(),
            encoded_values: 0,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Total values encoded since construction or the last `clear`.
    pub fn encoded_values(&self) -> u64 {
        self.encoded_values
    }

    /// Encodes `values` as one self-contained run sequence appended to `out`.
    /// Returns the number of bytes appended.
    pub fn encode(&mut self, values: &[i64], out: &mut Vec<u8>) -> Result<usize> {
        let start = out.len();
        let mut i = 0;
        while i < values.len() {
            let value = values[i];
            let mut run = 1;
            while i + run < values.len() && values[i + run] == value {
                run += 1;
            }

            if run >= MIN_REPEAT_RUN {
                self.flush_literals(out)?;
                write_varint(out, (run as u64) << 1);
                self.write_value(out, value)?;
            } else {
                for _ in 0..run {
                    self.literals.push(value);
                    if self.literals.len() == MAX_LITERAL_RUN {
                        self.flush_literals(out)?;
                    }
                }
            }
            i += run;
        }
        self.flush_literals(out)?;
        self.encoded_values += values.len() as u64;
        Ok(out.len() - start)
    }

    /// Drops any buffered state.
    pub fn clear(&mut self) {
        self.literals.clear();
        self.encoded_values = 0;
    }

    fn flush_literals(&mut self, out: &mut Vec<u8>) -> Result<()> {
        if self.literals.is_empty() {
            return Ok(());
        }
        write_varint(out, ((self.literals.len() as u64) << 1) | 1);
        let literals = std::mem::take(&mut self.literals);
        for &value in &literals {
            self.write_value(out, value)?;
        }
        Ok(())
    }

    fn write_value(&self, out: &mut Vec<u8>, value: i64) -> Result<()> {
        if self.signed {
            write_varint(out, zigzag_encode(value));
        } else {
            if value < 0 {
                bail!(ColumnError::InvalidArgument(format!(
                    "negative value {} given to an unsigned run-length encoder",
                    value
                )));
            }
            write_varint(out, value as u64);
        }
        Ok(())
    }
}

/// Decodes a run sequence produced by [`RunLengthEncoder::encode`].
pub fn decode_runlength(mut bytes: &[u8], signed: bool) -> Result<Vec<i64>> {
    let mut values = Vec::new();
    while !bytes.is_empty() {
        let (header, used) = decode_varint(bytes)?;
        bytes = &bytes[used..];
        let count = (header >> 1) as usize;
        ensure!(count > 0, "run-length header with zero count");

        if header & 1 == 0 {
            let value = read_value(&mut bytes, signed)?;
            values.extend(std::iter::repeat(value).take(count));
        } else {
            for _ in 0..count {
                values.push(read_value(&mut bytes, signed)?);
            }
        }
    }
    Ok(values)
}

fn read_value(bytes: &mut &[u8], signed: bool) -> Result<i64> {
    let slice: &[u8] = bytes;
    let (raw, used) = decode_varint(slice)?;
    *bytes = &slice[used..];
    Ok(if signed { zigzag_decode(raw) } else { raw as i64 })
}
