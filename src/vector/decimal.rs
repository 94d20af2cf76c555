//! Decimal values stored as unscaled integers. A decimal(3,2) value 3.14 is
//! stored as 314. The physical width is picked once from the precision:
//!
//! | Precision | Physical width |
//! |-----------|----------------|
//! | 1 - 4     | `i16`          |
//! | 5 - 9     | `i32`          |
//! | 10 - 18   | `i64`          |
//! | 19 - 38   | `i128`         |

use eyre::{bail, Result};

use super::VectorBase;
use crate::config::{
    DECIMAL_MAX_WIDTH_INT128, DECIMAL_MAX_WIDTH_INT16, DECIMAL_MAX_WIDTH_INT32,
    DECIMAL_MAX_WIDTH_INT64,
};
use crate::error::ColumnError;
use crate::parsing::{digit_count, format_unscaled, pow10, DecimalLiteral};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalWidth {
    Int16,
    Int32,
    Int64,
    Int128,
}

impl PhysicalWidth {
    pub fn from_precision(precision: u8) -> Result<Self> {
        Ok(match precision {
            p if p <= DECIMAL_MAX_WIDTH_INT16 => PhysicalWidth::Int16,
            p if p <= DECIMAL_MAX_WIDTH_INT32 => PhysicalWidth::Int32,
            p if p <= DECIMAL_MAX_WIDTH_INT64 => PhysicalWidth::Int64,
            p if p <= DECIMAL_MAX_WIDTH_INT128 => PhysicalWidth::Int128,
            _ => bail!(ColumnError::UnsupportedWidth {
                precision,
                max: DECIMAL_MAX_WIDTH_INT128,
            }),
        })
    }

    pub fn bits(self) -> usize {
        match self {
            PhysicalWidth::Int16 => 16,
            PhysicalWidth::Int32 => 32,
            PhysicalWidth::Int64 => 64,
            PhysicalWidth::Int128 => 128,
        }
    }

    pub fn byte_size(self) -> usize {
        self.bits() / 8
    }
}

#[derive(Debug, Clone)]
enum DecimalValues {
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    I128(Vec<i128>),
}

impl DecimalValues {
    fn new(width: PhysicalWidth, len: usize) -> Self {
        match width {
            PhysicalWidth::Int16 => DecimalValues::I16(vec![0; len]),
            PhysicalWidth::Int32 => DecimalValues::I32(vec![0; len]),
            PhysicalWidth::Int64 => DecimalValues::I64(vec![0; len]),
            PhysicalWidth::Int128 => DecimalValues::I128(vec![0; len]),
        }
    }

    fn resize(&mut self, size: usize, preserve_data: bool) {
        fn apply<T: Copy + Default>(values: &mut Vec<T>, size: usize, preserve_data: bool) {
            if !preserve_data {
                values.iter_mut().for_each(|v| *v = T::default());
            }
            values.resize(size, T::default());
        }
        match self {
            DecimalValues::I16(v) => apply(v, size, preserve_data),
            DecimalValues::I32(v) => apply(v, size, preserve_data),
            DecimalValues::I64(v) => apply(v, size, preserve_data),
            DecimalValues::I128(v) => apply(v, size, preserve_data),
        }
    }

    fn get(&self, row: usize) -> i128 {
        match self {
            DecimalValues::I16(v) => v[row] as i128,
            DecimalValues::I32(v) => v[row] as i128,
            DecimalValues::I64(v) => v[row] as i128,
            DecimalValues::I128(v) => v[row],
        }
    }

    /// `value` has already been checked against the precision, which bounds
    /// it to the physical width.
    fn set(&mut self, row: usize, value: i128) {
        match self {
            DecimalValues::I16(v) => v[row] = value as i16,
            DecimalValues::I32(v) => v[row] = value as i32,
            DecimalValues::I64(v) => v[row] = value as i64,
            DecimalValues::I128(v) => v[row] = value,
        }
    }

    fn clear(&mut self) {
        match self {
            DecimalValues::I16(v) => *v = Vec::new(),
            DecimalValues::I32(v) => *v = Vec::new(),
            DecimalValues::I64(v) => *v = Vec::new(),
            DecimalValues::I128(v) => *v = Vec::new(),
        }
    }

    fn len(&self) -> usize {
        match self {
            DecimalValues::I16(v) => v.len(),
            DecimalValues::I32(v) => v.len(),
            DecimalValues::I64(v) => v.len(),
            DecimalValues::I128(v) => v.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecimalColumnVector {
    base: VectorBase,
    precision: u8,
    scale: u8,
    width: PhysicalWidth,
    values: DecimalValues,
}

impl DecimalColumnVector {
    pub fn new(len: usize, precision: u8, scale: u8) -> Result<Self> {
        if precision < 1 {
            bail!(ColumnError::InvalidArgument(
                "decimal precision must be at least 1".to_string()
            ));
        }
        if scale > precision {
            bail!(ColumnError::InvalidArgument(format!(
                "decimal scale {} exceeds precision {}",
                scale, precision
            )));
        }
        let width = PhysicalWidth::from_precision(precision)?;

        let mut base = VectorBase::new(len);
        base.account(len * width.byte_size());
        Ok(Self {
            base,
            precision,
            scale,
            width,
            values: DecimalValues::new(width, len),
        })
    }

    vector_base_accessors!();

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn physical_width(&self) -> PhysicalWidth {
        self.width
    }

    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        if !self.base.grow(size, preserve_data) {
            return;
        }
        self.values.resize(size, preserve_data);
        self.base.account(size * self.width.byte_size());
    }

    /// Stores an unscaled value at `row`.
    pub fn set(&mut self, row: usize, unscaled: i128) -> Result<()> {
        self.base.check_row(row)?;
        self.check_digits(unscaled)?;
        self.values.set(row, unscaled);
        self.base.mark_value(row);
        Ok(())
    }

    /// Appends an unscaled value.
    pub fn add_unscaled(&mut self, unscaled: i128) -> Result<()> {
        self.check_digits(unscaled)?;
        self.push(unscaled);
        Ok(())
    }

    /// Parses decimal text, rescales it to the column scale rounding half
    /// up, and appends it.
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let mut literal = DecimalLiteral::parse(value)?;
        if literal.scale() != self.scale as usize {
            literal = literal.rescale(self.scale);
        }
        literal.check_precision(self.precision)?;
        let unscaled = literal.unscaled()?;
        self.push(unscaled);
        Ok(())
    }

    /// Appends an integer, scaling it by `10^scale`.
    pub fn add_i64(&mut self, value: i64) -> Result<()> {
        let scaled = pow10(self.scale).and_then(|p| (value as i128).checked_mul(p));
        let Some(scaled) = scaled else {
            bail!(ColumnError::PrecisionOverflow {
                digits: digit_count(value as i128) + self.scale as usize,
                precision: self.precision,
            });
        };
        self.add_unscaled(scaled)
    }

    /// Appends 0 or 1. Only valid for scale 0 columns.
    pub fn add_bool(&mut self, value: bool) -> Result<()> {
        if self.scale != 0 {
            bail!(ColumnError::InvalidArgument(format!(
                "boolean value cannot be stored at scale {}",
                self.scale
            )));
        }
        self.push(value as i128);
        Ok(())
    }

    /// Unscaled value at `row`, or `None` if the row is unwritten or null.
    pub fn get(&self, row: usize) -> Option<i128> {
        if row >= self.base.write_index() || self.base.is_null(row) {
            return None;
        }
        Some(self.values.get(row))
    }

    /// Raw unscaled value regardless of the null marker. Panics past
    /// `length`.
    pub fn unscaled(&self, row: usize) -> i128 {
        self.values.get(row)
    }

    pub fn current(&self) -> Option<i128> {
        self.base.current_row().map(|row| self.values.get(row))
    }

    /// Renders `row` as decimal text at the column scale.
    pub fn format_value(&self, row: usize) -> Option<String> {
        self.get(row).map(|v| format_unscaled(v, self.scale))
    }

    pub fn reset(&mut self) {
        self.base.reset();
    }

    pub fn close(&mut self) {
        if self.base.close() {
            self.values.clear();
        }
    }

    fn check_digits(&self, unscaled: i128) -> Result<()> {
        let digits = digit_count(unscaled);
        if digits > self.precision as usize {
            bail!(ColumnError::PrecisionOverflow {
                digits,
                precision: self.precision,
            });
        }
        Ok(())
    }

    fn push(&mut self, unscaled: i128) {
        self.grow_for_append();
        let row = self.base.write_index();
        debug_assert!(row < self.values.len());
        self.values.set(row, unscaled);
        self.base.mark_value(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_error(err: eyre::Report) -> ColumnError {
        err.downcast_ref::<ColumnError>().cloned().unwrap()
    }

    #[test]
    fn width_follows_precision_thresholds() {
        let cases = [
            (1, PhysicalWidth::Int16),
            (4, PhysicalWidth::Int16),
            (5, PhysicalWidth::Int32),
            (9, PhysicalWidth::Int32),
            (10, PhysicalWidth::Int64),
            (18, PhysicalWidth::Int64),
            (19, PhysicalWidth::Int128),
            (38, PhysicalWidth::Int128),
        ];
        for (precision, width) in cases {
            let vector = DecimalColumnVector::new(1, precision, 0).unwrap();
            assert_eq!(vector.physical_width(), width, "precision {}", precision);
        }
    }

    #[test]
    fn constructor_validation() {
        assert_eq!(
            column_error(DecimalColumnVector::new(1, 39, 0).unwrap_err()),
            ColumnError::UnsupportedWidth {
                precision: 39,
                max: 38
            }
        );
        assert!(matches!(
            column_error(DecimalColumnVector::new(1, 0, 0).unwrap_err()),
            ColumnError::InvalidArgument(_)
        ));
        assert!(matches!(
            column_error(DecimalColumnVector::new(1, 3, 4).unwrap_err()),
            ColumnError::InvalidArgument(_)
        ));
    }

    #[test]
    fn add_str_rounds_half_up() {
        let mut vector = DecimalColumnVector::new(4, 3, 2).unwrap();
        vector.add_str("3.145").unwrap();
        vector.add_str("3.144").unwrap();
        vector.add_str("-3.145").unwrap();
        assert_eq!(vector.get(0), Some(315));
        assert_eq!(vector.get(1), Some(314));
        assert_eq!(vector.get(2), Some(-315));
        assert_eq!(vector.format_value(0).as_deref(), Some("3.15"));
    }

    #[test]
    fn add_str_precision_overflow() {
        let mut vector = DecimalColumnVector::new(4, 3, 2).unwrap();
        let err = column_error(vector.add_str("12.34").unwrap_err());
        assert_eq!(
            err,
            ColumnError::PrecisionOverflow {
                digits: 4,
                precision: 3
            }
        );
        assert_eq!(vector.write_index(), 0);
    }

    #[test]
    fn rounding_carry_can_overflow_precision() {
        let mut vector = DecimalColumnVector::new(4, 3, 2).unwrap();
        assert!(vector.add_str("9.995").is_err());
        vector.add_str("9.994").unwrap();
        assert_eq!(vector.get(0), Some(999));
    }

    #[test]
    fn add_i64_scales_exactly() {
        let mut vector = DecimalColumnVector::new(2, 18, 4).unwrap();
        vector.add_i64(-12).unwrap();
        assert_eq!(vector.get(0), Some(-120_000));

        let mut narrow = DecimalColumnVector::new(2, 4, 2).unwrap();
        assert!(matches!(
            column_error(narrow.add_i64(100).unwrap_err()),
            ColumnError::PrecisionOverflow { .. }
        ));
    }

    #[test]
    fn add_i64_overflowing_i128_is_precision_error() {
        let mut vector = DecimalColumnVector::new(2, 38, 38).unwrap();
        assert!(matches!(
            column_error(vector.add_i64(i64::MAX).unwrap_err()),
            ColumnError::PrecisionOverflow { .. }
        ));
    }

    #[test]
    fn add_bool_requires_scale_zero() {
        let mut vector = DecimalColumnVector::new(2, 1, 0).unwrap();
        vector.add_bool(true).unwrap();
        assert_eq!(vector.get(0), Some(1));

        let mut scaled = DecimalColumnVector::new(2, 3, 1).unwrap();
        assert!(matches!(
            column_error(scaled.add_bool(true).unwrap_err()),
            ColumnError::InvalidArgument(_)
        ));
    }

    #[test]
    fn wide_decimals_keep_full_range() {
        let mut vector = DecimalColumnVector::new(1, 38, 0).unwrap();
        let max = "9".repeat(38);
        vector.add_str(&max).unwrap();
        assert_eq!(vector.get(0), Some(10i128.pow(38) - 1));
        assert_eq!(vector.format_value(0), Some(max));
    }

    #[test]
    fn growth_preserves_every_width() {
        for precision in [4u8, 9, 18, 38] {
            let mut vector = DecimalColumnVector::new(1, precision, 0).unwrap();
            for i in 0..20 {
                vector.add_i64(i).unwrap();
            }
            let values: Vec<i128> = (0..20).map(|i| vector.get(i).unwrap()).collect();
            assert_eq!(values, (0..20).collect::<Vec<i128>>());
        }
    }

    #[test]
    fn close_releases_values() {
        let mut vector = DecimalColumnVector::new(4, 5, 2).unwrap();
        vector.add_str("1.5").unwrap();
        vector.close();
        vector.close();
        assert_eq!(vector.current(), None);
        assert_eq!(vector.get(0), None);
    }
}
