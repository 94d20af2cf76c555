//! # Decimal Literals
//!
//! Parses decimal text into a sign, a digit string and a natural scale, and
//! rescales it with exact digit arithmetic. Nothing here goes through
//! floating point: powers of ten come from a constant table and rounding
//! operates on the digits themselves.
//!
//! ## Rescaling
//!
//! ```text
//! "3.145" (scale 3) -> scale 2: drop "5", round half up -> 315
//! "3.144" (scale 3) -> scale 2: drop "4"                -> 314
//! "9.995" (scale 3) -> scale 2: carry through the 9s    -> 1000
//! "1.5"   (scale 1) -> scale 3: pad zeros               -> 1500
//! ```
//!
//! Rounding is half-up on the magnitude, so `-3.145` becomes `-315`.
//!
//! ## Precision
//!
//! The precision of a value is the number of digits of its unscaled
//! magnitude with leading zeros removed; zero has one digit.

use eyre::{bail, Result};

use crate::config::DECIMAL_MAX_WIDTH_INT128;
use crate::error::ColumnError;

const fn build_pow10() -> [i128; 39] {
    let mut table = [1i128; 39];
    let mut i = 1;
    while i < 39 {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
}

/// `POW10[n] == 10^n` for every `n` representable in an `i128` decimal.
pub const POW10: [i128; 39] = build_pow10();

const _: () = assert!(POW10.len() == DECIMAL_MAX_WIDTH_INT128 as usize + 1);

/// `10^exp`, or `None` past the 128-bit range.
pub fn pow10(exp: u8) -> Option<i128> {
    POW10.get(exp as usize).copied()
}

/// Number of decimal digits in `|value|`. Zero has one digit.
pub fn digit_count(value: i128) -> usize {
    let magnitude = value.unsigned_abs();
    let mut digits = 1;
    while digits < POW10.len() && magnitude >= POW10[digits] as u128 {
        digits += 1;
    }
    digits
}

/// Renders an unscaled integer at `scale` fractional digits.
pub fn format_unscaled(value: i128, scale: u8) -> String {
    let digits = value.unsigned_abs().to_string();
    let scale = scale as usize;
    let sign = if value < 0 { "-" } else { "" };
    if scale == 0 {
        return format!("{}{}", sign, digits);
    }
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let split = padded.len() - scale;
    format!("{}{}.{}", sign, &padded[..split], &padded[split..])
}

/// A parsed decimal literal: `(-1)^negative * digits / 10^scale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalLiteral {
    negative: bool,
    /// ASCII digits without leading zeros; `"0"` for zero.
    digits: Vec<u8>,
    scale: usize,
}

impl DecimalLiteral {
    /// Parses `[+-]digits[.digits]`. At least one digit is required on one
    /// side of the point.
    pub fn parse(text: &str) -> Result<Self> {
        let s = text.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            bail!(ColumnError::parse(text, "no digits in decimal"));
        }
        if let Some(bad) = int_part
            .bytes()
            .chain(frac_part.bytes())
            .find(|b| !b.is_ascii_digit())
        {
            bail!(ColumnError::parse(
                text,
                format!("unexpected character '{}' in decimal", bad as char)
            ));
        }

        let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
        strip_leading_zeros(&mut digits);

        Ok(Self {
            negative,
            digits,
            scale: frac_part.len(),
        })
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Number of fractional digits as written.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Digits of the unscaled magnitude.
    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Returns the literal at `target` fractional digits, padding with zeros
    /// or rounding half up.
    pub fn rescale(&self, target: u8) -> Self {
        let target = target as usize;
        let mut digits = self.digits.clone();

        if target >= self.scale {
            digits.resize(digits.len() + (target - self.scale), b'0');
        } else {
            let drop = self.scale - target;
            let keep = digits.len().saturating_sub(drop);
            let round_up = digits.len() >= drop && digits[keep] >= b'5';
            digits.truncate(keep);
            if round_up {
                increment(&mut digits);
            }
        }
        strip_leading_zeros(&mut digits);

        Self {
            negative: self.negative,
            digits,
            scale: target,
        }
    }

    /// Fails with `PrecisionOverflow` if the literal needs more than
    /// `precision` digits.
    pub fn check_precision(&self, precision: u8) -> Result<()> {
        if self.digit_count() > precision as usize {
            bail!(ColumnError::PrecisionOverflow {
                digits: self.digit_count(),
                precision,
            });
        }
        Ok(())
    }

    /// The signed unscaled integer. Fails when more than 38 digits.
    pub fn unscaled(&self) -> Result<i128> {
        self.check_precision(DECIMAL_MAX_WIDTH_INT128)?;
        let magnitude = self
            .digits
            .iter()
            .fold(0i128, |acc, &d| acc * 10 + (d - b'0') as i128);
        Ok(if self.negative { -magnitude } else { magnitude })
    }
}

fn strip_leading_zeros(digits: &mut Vec<u8>) {
    let first = digits
        .iter()
        .position(|&d| d != b'0')
        .unwrap_or(digits.len());
    digits.drain(..first);
    if digits.is_empty() {
        digits.push(b'0');
    }
}

/// Adds one to an ASCII digit string, growing it on a carry out of the
/// leading digit. An empty string counts as zero.
fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unscaled_at(text: &str, scale: u8) -> i128 {
        DecimalLiteral::parse(text)
            .unwrap()
            .rescale(scale)
            .unscaled()
            .unwrap()
    }

    #[test]
    fn pow10_table() {
        assert_eq!(pow10(0), Some(1));
        assert_eq!(pow10(18), Some(1_000_000_000_000_000_000));
        assert_eq!(pow10(38), Some(10i128.pow(38)));
        assert_eq!(pow10(39), None);
    }

    #[test]
    fn digit_counts() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(-999), 3);
        assert_eq!(digit_count(i128::MAX), 39);
        assert_eq!(digit_count(i128::MIN), 39);
    }

    #[test]
    fn parse_splits_sign_digits_scale() {
        let lit = DecimalLiteral::parse("-012.340").unwrap();
        assert!(lit.is_negative());
        assert_eq!(lit.scale(), 3);
        assert_eq!(lit.digit_count(), 5);
        assert_eq!(lit.unscaled().unwrap(), -12340);
    }

    #[test]
    fn parse_accepts_bare_point_sides() {
        assert_eq!(unscaled_at(".5", 1), 5);
        assert_eq!(unscaled_at("5.", 0), 5);
        assert_eq!(unscaled_at("+7", 0), 7);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for input in ["", "-", ".", "1.2.3", "1e5", "12a", "--1"] {
            let err = DecimalLiteral::parse(input).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<ColumnError>(),
                    Some(ColumnError::Parse { .. })
                ),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn round_half_up() {
        assert_eq!(unscaled_at("3.145", 2), 315);
        assert_eq!(unscaled_at("3.144", 2), 314);
        assert_eq!(unscaled_at("-3.145", 2), -315);
        assert_eq!(unscaled_at("0.5", 0), 1);
        assert_eq!(unscaled_at("0.49", 0), 0);
    }

    #[test]
    fn round_carries_into_integer_part() {
        assert_eq!(unscaled_at("9.995", 2), 1000);
        assert_eq!(unscaled_at("99.5", 0), 100);
    }

    #[test]
    fn rescale_drops_more_digits_than_written() {
        assert_eq!(unscaled_at("0.0005", 1), 0);
        assert_eq!(unscaled_at("0.05", 1), 1);
    }

    #[test]
    fn widening_pads_zeros() {
        assert_eq!(unscaled_at("1.5", 3), 1500);
        assert_eq!(unscaled_at("42", 2), 4200);
    }

    #[test]
    fn precision_is_checked_on_the_magnitude() {
        let lit = DecimalLiteral::parse("12.34").unwrap().rescale(2);
        assert_eq!(lit.digit_count(), 4);
        let err = lit.check_precision(3).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ColumnError>(),
            Some(&ColumnError::PrecisionOverflow {
                digits: 4,
                precision: 3
            })
        );
        assert!(DecimalLiteral::parse("0.001")
            .unwrap()
            .rescale(3)
            .check_precision(1)
            .is_ok());
    }

    #[test]
    fn unscaled_rejects_more_than_38_digits() {
        let text = "1".repeat(39);
        assert!(DecimalLiteral::parse(&text).unwrap().unscaled().is_err());
        let max = "9".repeat(38);
        assert_eq!(
            DecimalLiteral::parse(&max).unwrap().unscaled().unwrap(),
            POW10[38] - 1
        );
    }

    #[test]
    fn format_inserts_point() {
        assert_eq!(format_unscaled(314, 2), "3.14");
        assert_eq!(format_unscaled(-5, 3), "-0.005");
        assert_eq!(format_unscaled(0, 2), "0.00");
        assert_eq!(format_unscaled(1234, 0), "1234");
    }
}
