/// Alphanumeric mode decoder (Mode 0010)
use super::read_value;

/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
pub const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Index of `c` in the 45-character set
pub fn alphanumeric_index(c: char) -> Option<u32> {
    ALPHANUMERIC_TABLE
        .iter()
        .position(|&t| t == c)
        .map(|i| i as u32)
}

/// Decode alphanumeric data
/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Decode `character_count` characters, returning (text, bits_consumed)
    pub fn decode(bits: &[bool], character_count: usize) -> Option<(String, usize)> {
        let mut result = String::with_capacity(character_count);
        let mut bit_idx = 0;
        let mut chars_remaining = character_count;

        while chars_remaining >= 2 {
            let value = read_value(bits, bit_idx, 11)? as usize;
            result.push(*ALPHANUMERIC_TABLE.get(value / 45)?);
            result.push(ALPHANUMERIC_TABLE[value % 45]);
            bit_idx += 11;
            chars_remaining -= 2;
        }
        if chars_remaining == 1 {
            let value = read_value(bits, bit_idx, 6)? as usize;
            result.push(*ALPHANUMERIC_TABLE.get(value)?);
            bit_idx += 6;
        }

        Some((result, bit_idx))
    }
}
