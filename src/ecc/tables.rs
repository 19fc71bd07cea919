use crate::error::{QrError, Result};
use crate::models::{ECLevel, Mode, Version};

/// Block layout for one (version, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    /// Number of Reed-Solomon blocks
    pub num_blocks: usize,
    /// ECC codewords appended to every block
    pub ecc_per_block: usize,
    /// Data codewords across all blocks
    pub data_codewords: usize,
}

impl EcBlockInfo {
    /// ECC codewords across all blocks
    pub fn total_ecc(&self) -> usize {
        self.num_blocks * self.ecc_per_block
    }

    /// Data + ECC codewords
    pub fn total_codewords(&self) -> usize {
        self.data_codewords + self.total_ecc()
    }
}

// Tables from ISO/IEC 18004 (Model 2), versions 1-15.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 16]; 4] = [
    [-1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22], // Low
    [-1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24], // Medium
    [-1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30], // Quartile
    [-1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 16]; 4] = [
    [-1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6],      // Low
    [-1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10],     // Medium
    [-1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12],  // Quartile
    [-1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18], // High
];

/// Cells available for codewords (and remainder bits) in a symbol
pub fn num_raw_data_modules(version: Version) -> usize {
    let v = version.number() as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Look up the block layout, failing if the pair is not tabulated
pub fn ec_block_info(version: Version, level: ECLevel) -> Result<EcBlockInfo> {
    let idx = level.index();
    let v = version.number() as usize;
    let ecc = ECC_CODEWORDS_PER_BLOCK[idx][v];
    let blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][v];
    if ecc <= 0 || blocks <= 0 {
        return Err(QrError::UnsupportedParameters {
            version: version.number(),
            level,
        });
    }
    let total = num_raw_data_modules(version) / 8;
    let total_ecc = blocks as usize * ecc as usize;
    Ok(EcBlockInfo {
        num_blocks: blocks as usize,
        ecc_per_block: ecc as usize,
        data_codewords: total - total_ecc,
    })
}

/// Data codewords for a version/level pair
pub fn num_data_codewords(version: Version, level: ECLevel) -> Result<usize> {
    Ok(ec_block_info(version, level)?.data_codewords)
}

/// Maximum characters (bytes for Byte mode) a single segment can carry
pub fn capacity(version: Version, level: ECLevel, mode: Mode) -> Result<usize> {
    let count_bits = mode.char_count_bits(version);
    let available = (num_data_codewords(version, level)? * 8).saturating_sub(4 + count_bits);
    let by_bits = match mode {
        Mode::Numeric => {
            let rem = available % 10;
            let tail = if rem >= 7 {
                2
            } else if rem >= 4 {
                1
            } else {
                0
            };
            available / 10 * 3 + tail
        }
        Mode::Alphanumeric => available / 11 * 2 + usize::from(available % 11 >= 6),
        Mode::Byte => available / 8,
    };
    Ok(by_bits.min((1 << count_bits) - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_data_codewords() {
        let expected_m = [16, 28, 44, 64, 86, 108, 124, 154, 182, 216, 254, 290, 334, 365, 415];
        for (version, &want) in Version::all().zip(expected_m.iter()) {
            assert_eq!(num_data_codewords(version, ECLevel::M).unwrap(), want);
        }
        assert_eq!(num_data_codewords(v(1), ECLevel::L).unwrap(), 19);
        assert_eq!(num_data_codewords(v(1), ECLevel::H).unwrap(), 9);
    }

    #[test]
    fn test_raw_modules() {
        assert_eq!(num_raw_data_modules(v(1)), 208);
        assert_eq!(num_raw_data_modules(v(7)), 1568);
        assert_eq!(num_raw_data_modules(v(15)), 5243);
    }

    #[test]
    fn test_block_info() {
        let info = ec_block_info(v(5), ECLevel::Q).unwrap();
        assert_eq!(info.num_blocks, 4);
        assert_eq!(info.ecc_per_block, 18);
        assert_eq!(info.data_codewords, 62);
        assert_eq!(info.total_codewords(), 134);
    }

    #[test]
    fn test_ecc_covers_correctable_errors() {
        for version in Version::all() {
            for level in ECLevel::ALL {
                let info = ec_block_info(version, level).unwrap();
                let correctable = info.ecc_per_block / 2;
                assert!(2 * correctable <= info.ecc_per_block);
                assert!(correctable >= 3);
                assert_eq!(info.total_codewords(), num_raw_data_modules(version) / 8);
                assert_eq!(version.size(), 21 + 4 * (version.number() as usize - 1));
            }
        }
    }

    #[test]
    fn test_capacity_table() {
        assert_eq!(capacity(v(1), ECLevel::M, Mode::Numeric).unwrap(), 34);
        assert_eq!(capacity(v(1), ECLevel::M, Mode::Alphanumeric).unwrap(), 20);
        assert_eq!(capacity(v(1), ECLevel::M, Mode::Byte).unwrap(), 14);
        assert_eq!(capacity(v(1), ECLevel::H, Mode::Numeric).unwrap(), 17);
        assert_eq!(capacity(v(10), ECLevel::L, Mode::Byte).unwrap(), 271);
        assert_eq!(capacity(v(15), ECLevel::L, Mode::Numeric).unwrap(), 1250);
        assert_eq!(capacity(v(15), ECLevel::L, Mode::Alphanumeric).unwrap(), 758);
        assert_eq!(capacity(v(15), ECLevel::L, Mode::Byte).unwrap(), 520);
        assert_eq!(capacity(v(15), ECLevel::H, Mode::Byte).unwrap(), 220);
    }
}
