/// Format information: BCH(15,5) over (EC level, mask pattern)
use crate::models::{ECLevel, MaskPattern};

/// x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const GENERATOR: u16 = 0b101_0011_0111;
/// XOR applied so that no valid format word is all zero
const FORMAT_MASK: u16 = 0x5412;
/// BCH(15,5) has minimum distance 7
const MAX_CORRECTABLE: u32 = 3;

/// Error correction level and mask stored in the 15 format bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Mask applied to the data region
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Pair a level with a mask
    pub fn new(ec_level: ECLevel, mask_pattern: MaskPattern) -> Self {
        Self {
            ec_level,
            mask_pattern,
        }
    }

    /// All 32 valid combinations
    pub fn all() -> impl Iterator<Item = FormatInfo> {
        ECLevel::ALL.into_iter().flat_map(|level| {
            MaskPattern::ALL
                .into_iter()
                .map(move |mask| FormatInfo::new(level, mask))
        })
    }

    /// 15-bit masked codeword
    pub fn encode(&self) -> u16 {
        let data = ((self.ec_level.indicator_bits() as u16) << 3) | self.mask_pattern.index() as u16;
        let mut remainder = data << 10;
        for bit in (10..15).rev() {
            if remainder & (1 << bit) != 0 {
                remainder ^= GENERATOR << (bit - 10);
            }
        }
        ((data << 10) | remainder) ^ FORMAT_MASK
    }

    /// Nearest valid format word and its Hamming distance
    pub fn decode_with_distance(bits: u16) -> (Self, u32) {
        let mut best = FormatInfo::new(ECLevel::M, MaskPattern::Pattern0);
        let mut best_distance = u32::MAX;
        for candidate in Self::all() {
            let distance = (candidate.encode() ^ (bits & 0x7FFF)).count_ones();
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        (best, best_distance)
    }

    /// Decode a read, accepting up to three bit errors
    pub fn decode(bits: u16) -> Option<Self> {
        let (info, distance) = Self::decode_with_distance(bits);
        (distance <= MAX_CORRECTABLE).then_some(info)
    }

    /// Decode from both redundant copies, taking whichever is closer
    pub fn decode_pair(primary: u16, secondary: u16) -> Option<Self> {
        let (a, da) = Self::decode_with_distance(primary);
        let (b, db) = Self::decode_with_distance(secondary);
        let (info, distance) = if da <= db { (a, da) } else { (b, db) };
        (distance <= MAX_CORRECTABLE).then_some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codewords() {
        assert_eq!(FormatInfo::new(ECLevel::M, MaskPattern::Pattern0).encode(), 0x5412);
        assert_eq!(FormatInfo::new(ECLevel::L, MaskPattern::Pattern0).encode(), 0x77C4);
        assert_eq!(FormatInfo::new(ECLevel::L, MaskPattern::Pattern4).encode(), 0x662F);
    }

    #[test]
    fn test_roundtrip_all_combinations() {
        for info in FormatInfo::all() {
            assert_eq!(FormatInfo::decode(info.encode()), Some(info));
        }
        assert_eq!(FormatInfo::all().count(), 32);
    }

    #[test]
    fn test_corrects_three_bit_errors() {
        let info = FormatInfo::new(ECLevel::Q, MaskPattern::Pattern6);
        let noisy = info.encode() ^ 0b100_0000_0100_0001;
        assert_eq!(FormatInfo::decode(noisy), Some(info));
    }

    #[test]
    fn test_decode_pair_prefers_clean_copy() {
        let info = FormatInfo::new(ECLevel::H, MaskPattern::Pattern3);
        let garbage = info.encode() ^ 0b111_1100_0000_0000;
        assert_eq!(FormatInfo::decode_pair(garbage, info.encode()), Some(info));
        assert_eq!(FormatInfo::decode_pair(info.encode(), garbage), Some(info));
    }
}
