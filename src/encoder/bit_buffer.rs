/// Append-only bit sequence, most significant bit first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `len` bits of `value`, high bit first
    pub fn append_bits(&mut self, value: u32, len: usize) {
        debug_assert!(len <= 32);
        for i in (0..len).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    /// Append a single bit
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no bits were written
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits in order
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Pack into bytes; a trailing partial byte is zero-filled
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (i, &bit)| byte | ((bit as u8) << (7 - i)))
            })
            .collect()
    }
}

impl std::fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_pack() {
        let mut buffer = BitBuffer::new();
        buffer.append_bits(0b0010, 4);
        buffer.append_bits(0b1011, 4);
        buffer.append_bits(1, 1);
        assert_eq!(buffer.len(), 9);
        assert_eq!(buffer.to_string(), "001010111");
        assert_eq!(buffer.to_bytes(), vec![0x2B, 0x80]);
    }
}
