/// Numeric mode decoder (Mode 0001)
use super::read_value;

/// Decode numeric mode data
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `character_count` digits
    /// Returns (decoded_string, bits_consumed); a group whose value has
    /// more digits than the group size is rejected.
    pub fn decode(bits: &[bool], character_count: usize) -> Option<(String, usize)> {
        let mut result = String::with_capacity(character_count);
        let mut bit_idx = 0;
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            let group_size = chars_remaining.min(3);
            let bits_needed = group_size * 3 + 1;
            let value = read_value(bits, bit_idx, bits_needed)?;
            if value >= 10u32.pow(group_size as u32) {
                return None;
            }

            result.push_str(&format!("{:0width$}", value, width = group_size));
            bit_idx += bits_needed;
            chars_remaining -= group_size;
        }

        Some((result, bit_idx))
    }
}
