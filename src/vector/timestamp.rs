//! Timestamp vectors.
//!
//! Rows are `i64` microseconds since the epoch. Text rows keep only as many
//! fractional digits as the declared precision; the rest are truncated.

use eyre::{bail, Result};

use super::VectorBase;
use crate::config::{DEFAULT_VECTOR_SIZE, MAX_TIMESTAMP_PRECISION};
use crate::error::ColumnError;
use crate::parsing::{parse_timestamp, pow10};

/// Timestamps as microseconds since the epoch. `precision` is the number of
/// fractional-second digits the column declares, at most six.
#[derive(Debug, Clone)]
pub struct TimestampColumnVector {
    base: VectorBase,
    precision: u8,
    micros: Vec<i64>,
}

impl TimestampColumnVector {
    pub fn new(len: usize, precision: u8) -> Result<Self> {
        if precision > MAX_TIMESTAMP_PRECISION {
            bail!(ColumnError::InvalidArgument(format!(
                "timestamp precision {} is out of range 0-{}",
                precision, MAX_TIMESTAMP_PRECISION
            )));
        }
        let mut base = VectorBase::new(len);
        base.account(len * std::mem::size_of::<i64>());
        Ok(Self {
            base,
            precision,
            micros: vec![0; len],
        })
    }

    /// A vector of the default batch size at microsecond precision.
    pub fn with_default_size() -> Self {
        let mut base = VectorBase::new(DEFAULT_VECTOR_SIZE);
        base.account(DEFAULT_VECTOR_SIZE * std::mem::size_of::<i64>());
        Self {
            base,
            precision: MAX_TIMESTAMP_PRECISION,
            micros: vec![0; DEFAULT_VECTOR_SIZE],
        }
    }

    vector_base_accessors!();

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        if !self.base.grow(size, preserve_data) {
            return;
        }
        if !preserve_data {
            self.micros.iter_mut().for_each(|m| *m = 0);
        }
        self.micros.resize(size, 0);
        self.base.account(size * std::mem::size_of::<i64>());
    }

    pub fn set(&mut self, row: usize, micros: i64) -> Result<()> {
        self.base.check_row(row)?;
        self.micros[row] = micros;
        self.base.mark_value(row);
        Ok(())
    }

    pub fn add(&mut self, micros: i64) {
        self.grow_for_append();
        let row = self.base.write_index();
        self.micros[row] = micros;
        self.base.mark_value(row);
    }

    /// Appends `YYYY-MM-DD HH:MM:SS[.ffffff]`. Fractional digits past the
    /// vector's precision are truncated.
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let micros = self.truncate_to_precision(parse_timestamp(value)?);
        self.add(micros);
        Ok(())
    }

    fn truncate_to_precision(&self, micros: i64) -> i64 {
        match pow10(MAX_TIMESTAMP_PRECISION - self.precision) {
            Some(unit) if unit > 1 => {
                let unit = unit as i64;
                micros - micros.rem_euclid(unit)
            }
            _ => micros,
        }
    }

    pub fn get(&self, row: usize) -> Option<i64> {
        if row >= self.base.write_index() || self.base.is_null(row) {
            return None;
        }
        Some(self.micros[row])
    }

    pub fn current(&self) -> Option<i64> {
        self.base.current_row().map(|row| self.micros[row])
    }

    pub fn micros(&self) -> &[i64] {
        &self.micros
    }

    pub fn reset(&mut self) {
        self.base.reset();
    }

    pub fn close(&mut self) {
        if self.base.close() {
            self.micros = Vec::new();
        }
    }
}
