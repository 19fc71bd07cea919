/// Version information for versions 7+: BCH(18,6)
use crate::models::Version;

/// x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const GENERATOR: u32 = 0x1F25;
const MAX_CORRECTABLE: u32 = 3;

/// 18-bit version word (6 data bits + 12 BCH bits)
pub fn encode_version_info(version: Version) -> u32 {
    let data = version.number() as u32;
    let mut remainder = data << 12;
    for bit in (12..18).rev() {
        if remainder & (1 << bit) != 0 {
            remainder ^= GENERATOR << (bit - 12);
        }
    }
    (data << 12) | remainder
}

/// Nearest version with a version block, if within three bit errors
pub fn decode_version_info(bits: u32) -> Option<Version> {
    Version::all()
        .filter(|v| v.number() >= 7)
        .map(|v| (v, (encode_version_info(v) ^ (bits & 0x3FFFF)).count_ones()))
        .min_by_key(|&(_, distance)| distance)
        .filter(|&(_, distance)| distance <= MAX_CORRECTABLE)
        .map(|(v, _)| v)
}
