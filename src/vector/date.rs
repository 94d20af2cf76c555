//! Date vectors.
//!
//! Each row is an `i32` day count from 1970-01-01. Text rows are parsed as
//! `YYYY-MM-DD`; bools map to day 0 and 1.

use eyre::Result;

use super::VectorBase;
use crate::config::DEFAULT_VECTOR_SIZE;
use crate::parsing::parse_date;

/// Dates as days since 1970-01-01.
#[derive(Debug, Clone)]
pub struct DateColumnVector {
    base: VectorBase,
    days: Vec<i32>,
}

impl Default for DateColumnVector {
    fn default() -> Self {
        Self::new(DEFAULT_VECTOR_SIZE)
    }
}

impl DateColumnVector {
    pub fn new(len: usize) -> Self {
        let mut base = VectorBase::new(len);
        base.account(len * std::mem::size_of::<i32>());
        Self {
            base,
            days: vec![0; len],
        }
    }

    vector_base_accessors!();

    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        if !self.base.grow(size, preserve_data) {
            return;
        }
        if !preserve_data {
            self.days.iter_mut().for_each(|d| *d = 0);
        }
        self.days.resize(size, 0);
        self.base.account(size * std::mem::size_of::<i32>());
    }

    pub fn set(&mut self, row: usize, days: i32) -> Result<()> {
        self.base.check_row(row)?;
        self.days[row] = days;
        self.base.mark_value(row);
        Ok(())
    }

    pub fn add(&mut self, days: i32) {
        self.grow_for_append();
        let row = self.base.write_index();
        self.days[row] = days;
        self.base.mark_value(row);
    }

    /// Appends a `YYYY-MM-DD` date.
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let days = parse_date(value)?;
        self.add(days);
        Ok(())
    }

    /// Appends day 0 or day 1.
    pub fn add_bool(&mut self, value: bool) {
        self.add(value as i32);
    }

    /// Value at `row`, or `None` if the row is unwritten or null.
    pub fn get(&self, row: usize) -> Option<i32> {
        if row >= self.base.write_index() || self.base.is_null(row) {
            return None;
        }
        Some(self.days[row])
    }

    pub fn current(&self) -> Option<i32> {
        self.base.current_row().map(|row| self.days[row])
    }

    /// Raw values for every allocated row; null rows hold stale data.
    pub fn days(&self) -> &[i32] {
        &self.days
    }

    pub fn reset(&mut self) {
        self.base.reset();
    }

    pub fn close(&mut self) {
        if self.base.close() {
            self.days = Vec::new();
        }
    }
}
