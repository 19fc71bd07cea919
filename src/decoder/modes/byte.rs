/// Byte mode decoder (Mode 0100) for 8-bit data
use super::read_value;

/// Decode byte mode data (8 bits per character)
pub struct ByteDecoder;

impl ByteDecoder {
    /// Read `count` raw bytes, returning them with the bits consumed
    pub fn decode_bytes(bits: &[bool], count: usize) -> Option<(Vec<u8>, usize)> {
        let bytes = (0..count)
            .map(|i| read_value(bits, i * 8, 8).map(|v| v as u8))
            .collect::<Option<Vec<u8>>>()?;
        Some((bytes, count * 8))
    }

    /// Read `count` bytes as UTF-8 text
    pub fn decode(bits: &[bool], count: usize) -> Option<(String, usize)> {
        let (bytes, used) = Self::decode_bytes(bits, count)?;
        String::from_utf8(bytes).ok().map(|s| (s, used))
    }
}
