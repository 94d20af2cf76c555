//! # Text Parsing
//!
//! Parsers that turn textual cell values into the integer encodings stored by
//! the column vectors.
//!
//! ## Module Structure
//!
//! - `temporal`: dates to days since the epoch, timestamps to microseconds
//! - `decimal`: decimal literals to unscaled integers at a target scale
//!
//! ## Error Reporting
//!
//! Malformed input is reported as [`ColumnError::Parse`] carrying the
//! offending text, so a caller loading a batch can name the bad cell:
//!
//! ```ignore
//! use pixelcol::parsing::{parse_date, DecimalLiteral};
//!
//! let days = parse_date("2024-01-01")?;          // 19723
//! let lit = DecimalLiteral::parse("-3.145")?;
//! let unscaled = lit.rescale(2).unscaled()?;     // -315
//! ```
//!
//! [`ColumnError::Parse`]: crate::error::ColumnError::Parse

pub mod decimal;
pub mod temporal;

pub use decimal::{digit_count, format_unscaled, pow10, DecimalLiteral};
pub use temporal::{parse_date, parse_time, parse_timestamp};
