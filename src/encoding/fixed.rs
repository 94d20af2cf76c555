//! # Fixed-Width Integer Serialization
//!
//! Writes integers as fixed-width two's-complement values in the byte order
//! chosen by the writer options. The zerocopy byte-order wrappers do the
//! conversion, so there is no per-value branching on the host endianness.
//!
//! | Column type            | Width |
//! |------------------------|-------|
//! | date, string offsets   | 4     |
//! | timestamp, decimal64   | 8     |
//! | decimal128             | 16    |

use zerocopy::byteorder::{BigEndian, LittleEndian, I128, I32, I64};
use zerocopy::IntoBytes;

use crate::config::ByteOrder;

#[inline]
pub fn write_i32(out: &mut Vec<u8>, value: i32, order: ByteOrder) {
    match order {
        ByteOrder::LittleEndian => out.extend_from_slice(I32::<LittleEndian>::new(value).as_bytes()),
        ByteOrder::BigEndian => out.extend_from_slice(I32::<BigEndian>::new(value).as_bytes()),
    }
}

#[inline]
pub fn write_i64(out: &mut Vec<u8>, value: i64, order: ByteOrder) {
    match order {
        ByteOrder::LittleEndian => out.extend_from_slice(I64::<LittleEndian>::new(value).as_bytes()),
        ByteOrder::BigEndian => out.extend_from_slice(I64::<BigEndian>::new(value).as_bytes()),
    }
}

#[inline]
pub fn write_i128(out: &mut Vec<u8>, value: i128, order: ByteOrder) {
    match order {
        ByteOrder::LittleEndian => {
            out.extend_from_slice(I128::<LittleEndian>::new(value).as_bytes())
        }
        ByteOrder::BigEndian => out.extend_from_slice(I128::<BigEndian>::new(value).as_bytes()),
    }
}

/// Reads back a 4-byte integer written by [`write_i32`].
pub fn read_i32(bytes: [u8; 4], order: ByteOrder) -> i32 {
    match order {
        ByteOrder::LittleEndian => i32::from_le_bytes(bytes),
        ByteOrder::BigEndian => i32::from_be_bytes(bytes),
    }
}

/// Reads back an 8-byte integer written by [`write_i64`].
pub fn read_i64(bytes: [u8; 8], order: ByteOrder) -> i64 {
    match order {
        ByteOrder::LittleEndian => i64::from_le_bytes(bytes),
        ByteOrder::BigEndian => i64::from_be_bytes(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i32_layout_per_byte_order() {
        let mut le = Vec::new();
        write_i32(&mut le, 0x0102_0304, ByteOrder::LittleEndian);
        assert_eq!(le, [0x04, 0x03, 0x02, 0x01]);

        let mut be = Vec::new();
        write_i32(&mut be, 0x0102_0304, ByteOrder::BigEndian);
        assert_eq!(be, [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn i64_negative_values() {
        let mut out = Vec::new();
        write_i64(&mut out, -2, ByteOrder::BigEndian);
        assert_eq!(out, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(read_i64(out.try_into().unwrap(), ByteOrder::BigEndian), -2);
    }

    #[test]
    fn i128_is_sixteen_bytes() {
        let mut out = Vec::new();
        write_i128(&mut out, 1, ByteOrder::LittleEndian);
        assert_eq!(out.len(), 16);
        assert_eq!(out[0], 1);
        assert!(out[1..].iter().all(|&b| b == 0));
    }
}
