//! # Encoding Module
//!
//! Byte-level building blocks used by the column writers:
//!
//! - **Fixed-width integers**: byte-order-aware `i32`/`i64`/`i128` writes for
//!   flat pixel payloads and string offset tables
//! - **Null bitmaps**: one bit per row, eight rows per byte
//! - **Varint encoding**: base-128 integers with zigzag mapping for signed values
//! - **Run-length encoding**: the default integer encoder for date and
//!   timestamp pixels

pub mod bits;
pub mod fixed;
pub mod runlength;
pub mod varint;

pub use bits::{bit_wise_compact, bit_wise_expand, compacted_len};
pub use fixed::{write_i128, write_i32, write_i64};
pub use runlength::{decode_runlength, RunLengthEncoder};
pub use varint::{decode_varint, encode_varint, varint_len, zigzag_decode, zigzag_encode};
