/// Bitstream extraction from a sampled module grid
use crate::models::{BitMatrix, FunctionMask, MaskPattern};

/// Remove the data mask in place; function cells are left untouched
pub fn unmask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let size = func.size();
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask_pattern.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}

/// Extract raw bitstream from QR code matrix following zigzag pattern
pub struct BitstreamExtractor;

impl BitstreamExtractor {
    /// Data bits in placement order (excluding function patterns)
    pub fn extract(matrix: &BitMatrix, func: &FunctionMask) -> Vec<bool> {
        func.zigzag_positions()
            .into_iter()
            .map(|(x, y)| matrix.get(x, y))
            .collect()
    }
}

/// Pack bits into bytes, most significant first; trailing remainder bits are dropped
pub fn bits_to_codewords(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::matrix_builder::generate_modules;
    use crate::models::Version;

    #[test]
    fn test_extract_reads_placed_codewords() {
        let version = Version::new(1).unwrap();
        let codewords: Vec<u8> = (0..26).map(|i| (i * 29 + 3) as u8).collect();
        let matrix = generate_modules(&codewords, version);
        let func = FunctionMask::new(version);

        let bits = BitstreamExtractor::extract(matrix.modules(), &func);
        assert_eq!(bits.len(), 208);
        assert_eq!(bits_to_codewords(&bits), codewords);
    }

    #[test]
    fn test_remainder_bits_dropped() {
        let version = Version::new(2).unwrap();
        let func = FunctionMask::new(version);
        let bits = BitstreamExtractor::extract(&BitMatrix::new(25, 25), &func);
        // 359 data modules carry 44 codewords plus 7 remainder bits
        assert_eq!(bits.len(), 359);
        assert_eq!(bits_to_codewords(&bits).len(), 44);
    }

    #[test]
    fn test_unmask() {
        let version = Version::new(1).unwrap();
        let func = FunctionMask::new(version);
        let mut matrix = BitMatrix::new(21, 21);
        matrix.set(10, 10, true);
        matrix.set(11, 10, false);

        unmask(&mut matrix, MaskPattern::Pattern0, &func);

        // Pattern0: (i + j) % 2 == 0
        assert!(!matrix.get(10, 10));
        assert!(!matrix.get(11, 10));
        // Finder cells are function modules and stay as they were
        assert!(!matrix.get(0, 0));
    }
}
