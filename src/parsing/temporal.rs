//! # Date and Timestamp Text
//!
//! Converts ISO-style text into the integer encodings stored by the date and
//! timestamp vectors. All arithmetic is proleptic Gregorian in UTC.
//!
//! | Input                         | Result                         |
//! |-------------------------------|--------------------------------|
//! | `YYYY-MM-DD`                  | `i32` days since 1970-01-01    |
//! | `HH:MM:SS[.ffffff]`           | `i64` microseconds of the day  |
//! | `YYYY-MM-DD HH:MM:SS[.f]`     | `i64` microseconds since epoch |
//!
//! Timestamps also accept `T` as the separator, or a bare date for midnight.
//! Fractional seconds keep the first six digits; further digits are
//! truncated, not rounded.

use eyre::{bail, Result};

use crate::config::{MAX_TIMESTAMP_PRECISION, MICROS_PER_DAY, MICROS_PER_SECOND};
use crate::error::ColumnError;

/// Parses `YYYY-MM-DD` into days since the epoch.
pub fn parse_date(s: &str) -> Result<i32> {
    let s = s.trim();
    let mut parts = s.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        bail!(ColumnError::parse(s, "expected YYYY-MM-DD"));
    };

    if y.len() != 4 {
        bail!(ColumnError::parse(s, format!("year '{}' must have four digits", y)));
    }
    let year: i32 = parse_component(s, y, "year")?;
    let month: u32 = parse_component(s, m, "month")?;
    let day: u32 = parse_component(s, d, "day")?;

    if !(1..=12).contains(&month) {
        bail!(ColumnError::parse(
            s,
            format!("month {} must be 1-12", month)
        ));
    }

    let max_day = days_in_month(year, month);
    if day < 1 || day > max_day {
        bail!(ColumnError::parse(
            s,
            format!("day {} out of range, month {} has {} days", day, month, max_day)
        ));
    }

    Ok(days_from_civil(year, month, day))
}

/// Parses `HH:MM:SS[.f...]` into microseconds since midnight.
pub fn parse_time(s: &str) -> Result<i64> {
    let s = s.trim();
    let (clock, fraction) = match s.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (s, None),
    };

    let mut parts = clock.splitn(3, ':');
    let (Some(h), Some(m), Some(sec)) = (parts.next(), parts.next(), parts.next()) else {
        bail!(ColumnError::parse(s, "expected HH:MM:SS"));
    };

    let hour: i64 = parse_component(s, h, "hour")?;
    let minute: i64 = parse_component(s, m, "minute")?;
    let second: i64 = parse_component(s, sec, "second")?;

    if hour > 23 {
        bail!(ColumnError::parse(s, format!("hour {} must be 0-23", hour)));
    }
    if minute > 59 {
        bail!(ColumnError::parse(s, format!("minute {} must be 0-59", minute)));
    }
    if second > 59 {
        bail!(ColumnError::parse(s, format!("second {} must be 0-59", second)));
    }

    let micros = match fraction {
        Some(frac) => parse_fraction(s, frac)?,
        None => 0,
    };

    Ok((hour * 3600 + minute * 60 + second) * MICROS_PER_SECOND + micros)
}

/// Parses a timestamp into microseconds since the epoch. The date and time
/// may be separated by a space or `T`; a bare date means midnight.
pub fn parse_timestamp(s: &str) -> Result<i64> {
    let s = s.trim();
    let (date, time) = match s.find(['T', ' ']) {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let days = parse_date(date)?;
    let micros = match time {
        Some(time) => parse_time(time)?,
        None => 0,
    };

    match (days as i64)
        .checked_mul(MICROS_PER_DAY)
        .and_then(|day_micros| day_micros.checked_add(micros))
    {
        Some(total) => Ok(total),
        None => bail!(ColumnError::parse(s, "timestamp out of range")),
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Days since 1970-01-01 for a validated civil date. Every four-digit year
/// fits in `i32`; callers with wider years must range-check first.
pub fn days_from_civil(year: i32, month: u32, day: u32) -> i32 {
    // Shift the year to start in March so the leap day is last.
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    (era * 146_097 + doe - 719_468) as i32
}

fn parse_component<T: std::str::FromStr>(input: &str, part: &str, what: &str) -> Result<T> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        bail!(ColumnError::parse(input, format!("invalid {} '{}'", what, part)));
    }
    match part.parse() {
        Ok(value) => Ok(value),
        Err(_) => bail!(ColumnError::parse(input, format!("invalid {} '{}'", what, part))),
    }
}

fn parse_fraction(input: &str, frac: &str) -> Result<i64> {
    if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
        bail!(ColumnError::parse(
            input,
            format!("invalid fractional seconds '{}'", frac)
        ));
    }
    let digits = &frac[..frac.len().min(MAX_TIMESTAMP_PRECISION as usize)];
    let mut micros: i64 = digits.bytes().fold(0, |acc, b| acc * 10 + (b - b'0') as i64);
    for _ in digits.len()..MAX_TIMESTAMP_PRECISION as usize {
        micros *= 10;
    }
    Ok(micros)
}
