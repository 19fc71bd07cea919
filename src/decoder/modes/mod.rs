//! Segment payload decoders
//!
//! Each decoder takes the bits following a segment's character count and
//! returns the decoded text with the number of bits it consumed:
//! - Numeric: digits 0-9, three per 10 bits
//! - Alphanumeric: the 45-character set, two per 11 bits
//! - Byte: raw 8-bit data

pub mod alphanumeric;
pub mod byte;
pub mod numeric;

/// Read `len` bits starting at `start` as a big-endian integer
pub(crate) fn read_value(bits: &[bool], start: usize, len: usize) -> Option<u32> {
    let slice = bits.get(start..start + len)?;
    Some(slice.iter().fold(0u32, |acc, &bit| (acc << 1) | bit as u32))
}
