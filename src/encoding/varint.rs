//! # Base-128 Variable-Length Integers
//!
//! Unsigned values are written seven bits at a time, least significant group
//! first; the high bit of every byte except the last is set. Signed values
//! are zigzag-mapped first so small magnitudes of either sign stay short.
//!
//! | Value Range          | Bytes |
//! |----------------------|-------|
//! | 0 - 127              | 1     |
//! | 128 - 16383          | 2     |
//! | 16384 - 2097151      | 3     |
//! | ...                  | ...   |
//! | up to u64::MAX       | 10    |
//!
//! ```text
//! zigzag:  0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, 2 -> 4, ...
//! ```
//!
//! `decode_varint` returns `eyre::Result` with descriptive error messages:
//! - Empty buffer: "empty buffer for varint decode"
//! - Truncated encoding: "truncated varint after N bytes"
//! - Too long: "varint longer than 10 bytes"

use eyre::{bail, ensure, Result};

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Encodes `value` into `buf`, returning the number of bytes written.
/// `buf` must hold at least `varint_len(value)` bytes.
pub fn encode_varint(mut value: u64, buf: &mut [u8]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    i + 1
}

/// Appends the encoding of `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_varint(value, &mut buf);
    out.extend_from_slice(&buf[..len]);
}

pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize)> {
    ensure!(!buf.is_empty(), "empty buffer for varint decode");

    let mut value = 0u64;
    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            bail!("varint longer than {} bytes", MAX_VARINT_LEN);
        }
        value |= ((byte & 0x7F) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    bail!("truncated varint after {} bytes", buf.len())
}

#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
