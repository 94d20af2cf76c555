//! # Column Vectors
//!
//! A column vector holds one batch of decoded values for a single column,
//! plus a null marker per row. Vectors are filled by a producer (a reader or
//! a loader parsing text) and consumed by the column writers.
//!
//! ## Variants
//!
//! | Vector                    | Storage per row                          |
//! |---------------------------|------------------------------------------|
//! | [`BinaryColumnVector`]    | arena slot or weak view + start + length |
//! | [`DateColumnVector`]      | `i32` days since 1970-01-01              |
//! | [`DecimalColumnVector`]   | unscaled `i16`/`i32`/`i64`/`i128`        |
//! | [`TimestampColumnVector`] | `i64` microseconds since the epoch       |
//!
//! [`ColumnVector`] is the closed sum of these, which is what the writers
//! accept.
//!
//! ## Shared State
//!
//! Every vector embeds a [`VectorBase`]:
//!
//! ```text
//! length       allocated rows; is_null.len() == length
//! write_index  next row `add` writes; never exceeds length
//! read_index   cursor for current()/advance()
//! no_nulls     true until the first null since construction or reset
//! ```
//!
//! ## Growth
//!
//! `add*` on a full vector first calls `ensure_size(write_index * 2, true)`
//! (one row when empty). Growth copies the existing rows and never shrinks.
//! `ensure_size` with a size at or below `length` does nothing.
//!
//! ## Lifecycle
//!
//! `reset` rewinds the indices and clears null markers but keeps storage.
//! `close` releases storage and is idempotent; afterwards `current` returns
//! `None` and the vector has zero length.

mod binary;
mod date;
mod decimal;
mod timestamp;

pub use binary::{BinaryColumnVector, BinaryValue};
pub use date::DateColumnVector;
pub use decimal::{DecimalColumnVector, PhysicalWidth};
pub use timestamp::TimestampColumnVector;

use eyre::{bail, Result};

use crate::error::ColumnError;

#[derive(Debug, Clone)]
pub struct VectorBase {
    length: usize,
    write_index: usize,
    read_index: usize,
    is_null: Vec<bool>,
    no_nulls: bool,
    memory_usage: usize,
    closed: bool,
}

impl VectorBase {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            write_index: 0,
            read_index: 0,
            is_null: vec![false; length],
            no_nulls: true,
            memory_usage: length,
            closed: false,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    /// Null marker for `row`; rows past `length` read as not null.
    pub fn is_null(&self, row: usize) -> bool {
        self.is_null.get(row).copied().unwrap_or(false)
    }

    /// Null markers for every allocated row.
    pub fn nulls(&self) -> &[bool] {
        &self.is_null
    }

    pub fn no_nulls(&self) -> bool {
        self.no_nulls
    }

    /// Bytes allocated over the vector's lifetime, including regrowth.
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn account(&mut self, bytes: usize) {
        self.memory_usage += bytes;
    }

    /// Grows the null markers to `size` rows. Returns `false` when `size`
    /// does not exceed the current length and nothing changed.
    pub(crate) fn grow(&mut self, size: usize, preserve_data: bool) -> bool {
        if size <= self.length {
            return false;
        }
        if !preserve_data {
            self.is_null.iter_mut().for_each(|n| *n = false);
        }
        self.is_null.resize(size, false);
        self.length = size;
        self.memory_usage += size;
        true
    }

    /// Row count the vector must grow to before the next append, if any.
    pub(crate) fn growth_target(&self) -> Option<usize> {
        if self.write_index >= self.length {
            Some((self.write_index * 2).max(1))
        } else {
            None
        }
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.length {
            bail!(ColumnError::InvalidArgument(format!(
                "row {} is out of bounds for a vector of length {}",
                row, self.length
            )));
        }
        Ok(())
    }

    /// Marks `row` as holding a value and extends the written range.
    pub(crate) fn mark_value(&mut self, row: usize) {
        self.is_null[row] = false;
        self.write_index = self.write_index.max(row + 1);
    }

    pub fn set_null(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        self.is_null[row] = true;
        self.no_nulls = false;
        self.write_index = self.write_index.max(row + 1);
        Ok(())
    }

    pub(crate) fn push_null(&mut self) {
        let row = self.write_index;
        self.is_null[row] = true;
        self.no_nulls = false;
        self.write_index += 1;
    }

    /// Row at the read cursor, if it has been written and storage is live.
    pub(crate) fn current_row(&self) -> Option<usize> {
        if self.closed || self.read_index >= self.write_index {
            None
        } else {
            Some(self.read_index)
        }
    }

    pub(crate) fn advance(&mut self) {
        if self.read_index < self.write_index {
            self.read_index += 1;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
        self.is_null.iter_mut().for_each(|n| *n = false);
        self.no_nulls = true;
    }

    /// Releases the null markers. Returns `false` if already closed.
    pub(crate) fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.is_null = Vec::new();
        self.length = 0;
        self.write_index = 0;
        self.read_index = 0;
        true
    }
}

/// Any column vector a writer can consume.
#[derive(Debug)]
pub enum ColumnVector {
    Binary(BinaryColumnVector),
    Date(DateColumnVector),
    Decimal(DecimalColumnVector),
    Timestamp(TimestampColumnVector),
}

impl ColumnVector {
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnVector::Binary(_) => "binary",
            ColumnVector::Date(_) => "date",
            ColumnVector::Decimal(_) => "decimal",
            ColumnVector::Timestamp(_) => "timestamp",
        }
    }

    pub fn base(&self) -> &VectorBase {
        match self {
            ColumnVector::Binary(v) => v.base(),
            ColumnVector::Date(v) => v.base(),
            ColumnVector::Decimal(v) => v.base(),
            ColumnVector::Timestamp(v) => v.base(),
        }
    }

    pub fn write_index(&self) -> usize {
        self.base().write_index()
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.base().is_null(row)
    }

    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        match self {
            ColumnVector::Binary(v) => v.ensure_size(size, preserve_data),
            ColumnVector::Date(v) => v.ensure_size(size, preserve_data),
            ColumnVector::Decimal(v) => v.ensure_size(size, preserve_data),
            ColumnVector::Timestamp(v) => v.ensure_size(size, preserve_data),
        }
    }

    pub fn add_null(&mut self) {
        match self {
            ColumnVector::Binary(v) => v.add_null(),
            ColumnVector::Date(v) => v.add_null(),
            ColumnVector::Decimal(v) => v.add_null(),
            ColumnVector::Timestamp(v) => v.add_null(),
        }
    }

    /// Appends a textual value parsed according to the vector's type. Binary
    /// vectors store the UTF-8 bytes unchanged.
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        match self {
            ColumnVector::Binary(v) => v.add_str(value),
            ColumnVector::Date(v) => v.add_str(value),
            ColumnVector::Decimal(v) => v.add_str(value),
            ColumnVector::Timestamp(v) => v.add_str(value),
        }
    }

    pub fn reset(&mut self) {
        match self {
            ColumnVector::Binary(v) => v.reset(),
            ColumnVector::Date(v) => v.reset(),
            ColumnVector::Decimal(v) => v.reset(),
            ColumnVector::Timestamp(v) => v.reset(),
        }
    }

    pub fn close(&mut self) {
        match self {
            ColumnVector::Binary(v) => v.close(),
            ColumnVector::Date(v) => v.close(),
            ColumnVector::Decimal(v) => v.close(),
            ColumnVector::Timestamp(v) => v.close(),
        }
    }
}

impl From<BinaryColumnVector> for ColumnVector {
    fn from(v: BinaryColumnVector) -> Self {
        ColumnVector::Binary(v)
    }
}

impl From<DateColumnVector> for ColumnVector {
    fn from(v: DateColumnVector) -> Self {
        ColumnVector::Date(v)
    }
}

impl From<DecimalColumnVector> for ColumnVector {
    fn from(v: DecimalColumnVector) -> Self {
        ColumnVector::Decimal(v)
    }
}

impl From<TimestampColumnVector> for ColumnVector {
    fn from(v: TimestampColumnVector) -> Self {
        ColumnVector::Timestamp(v)
    }
}
