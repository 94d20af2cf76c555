//! Fuzz testing for decimal and temporal text parsing.
//!
//! Feeds arbitrary text into decimal, date and timestamp vectors. Parsing
//! must either fail with an error or store a value that fits the declared
//! precision; it must never panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use pixelcol::parsing::digit_count;
use pixelcol::{DateColumnVector, DecimalColumnVector, TimestampColumnVector};

#[derive(Debug, Arbitrary)]
struct DecimalInput {
    precision: u8,
    scale: u8,
    texts: Vec<String>,
}

fuzz_target!(|input: DecimalInput| {
    let precision = input.precision % 40;
    let scale = input.scale % 40;
    let Ok(mut decimals) = DecimalColumnVector::new(1, precision, scale) else {
        return;
    };
    let mut dates = DateColumnVector::new(1);
    let mut timestamps = TimestampColumnVector::with_default_size();

    for text in input.texts.iter().take(64) {
        let before = decimals.write_index();
        if decimals.add_str(text).is_ok() {
            let value = decimals.get(before).unwrap();
            assert!(digit_count(value) <= precision as usize);
        } else {
            assert_eq!(decimals.write_index(), before);
        }
        let _ = dates.add_str(text);
        let _ = timestamps.add_str(text);
    }
});
