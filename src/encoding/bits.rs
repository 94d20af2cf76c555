//! # Null Bitmap Compaction
//!
//! Packs one boolean per row into bits, eight rows per byte. The last byte is
//! zero-padded. Big-endian order fills each byte from the most significant
//! bit; little-endian order fills from the least significant bit.
//!
//! ```text
//! rows:           1 0 1 1 0 0 0 0 | 1
//! big-endian:     0b1011_0000       0b1000_0000
//! little-endian:  0b0000_1101       0b0000_0001
//! ```

use crate::config::ByteOrder;

pub fn compacted_len(rows: usize) -> usize {
    rows.div_ceil(8)
}

/// Appends the packed form of `bits` to `out`.
pub fn bit_wise_compact(out: &mut Vec<u8>, bits: &[bool], order: ByteOrder) {
    out.reserve(compacted_len(bits.len()));
    for group in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in group.iter().enumerate() {
            if bit {
                byte |= match order {
                    ByteOrder::BigEndian => 0x80 >> i,
                    ByteOrder::LittleEndian => 1 << i,
                };
            }
        }
        out.push(byte);
    }
}

/// Inverse of [`bit_wise_compact`] for the first `rows` rows.
pub fn bit_wise_expand(bytes: &[u8], rows: usize, order: ByteOrder) -> Vec<bool> {
    (0..rows)
        .map(|row| {
            let byte = bytes.get(row / 8).copied().unwrap_or(0);
            let mask = match order {
                ByteOrder::BigEndian => 0x80 >> (row % 8),
                ByteOrder::LittleEndian => 1 << (row % 8),
            };
            byte & mask != 0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [bool; 9] = [true, false, true, true, false, false, false, false, true];

    #[test]
    fn big_endian_fills_from_msb() {
        let mut out = Vec::new();
        bit_wise_compact(&mut out, &ROWS, ByteOrder::BigEndian);
        assert_eq!(out, [0b1011_0000, 0b1000_0000]);
    }

    #[test]
    fn little_endian_fills_from_lsb() {
        let mut out = Vec::new();
        bit_wise_compact(&mut out, &ROWS, ByteOrder::LittleEndian);
        assert_eq!(out, [0b0000_1101, 0b0000_0001]);
    }

    #[test]
    fn expand_reverses_compaction() {
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let mut out = Vec::new();
            bit_wise_compact(&mut out, &ROWS, order);
            assert_eq!(bit_wise_expand(&out, ROWS.len(), order), ROWS.to_vec());
        }
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut out = Vec::new();
        bit_wise_compact(&mut out, &[], ByteOrder::BigEndian);
        assert!(out.is_empty());
    }
}
