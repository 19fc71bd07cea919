/// Module grid to text: format info, demasking, codeword read and parsing
use crate::decoder::bitstream::{BitstreamExtractor, bits_to_codewords, unmask};
use crate::decoder::payload::{decode_payload, deinterleave_and_correct};
use crate::ecc::format::FormatInfo;
use crate::ecc::version_info::decode_version_info;
use crate::error::{QrError, Result};
use crate::models::function_mask::{format_info_positions, version_info_positions};
use crate::models::{BitMatrix, DecodedSymbol, FunctionMask, Point, Version};

fn read_word(grid: &BitMatrix, cells: &[(usize, usize)]) -> u32 {
    cells
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, &(x, y))| acc | ((grid.get(x, y) as u32) << i))
}

/// Format information from whichever copy is closer to a valid word
pub fn read_format_info(grid: &BitMatrix) -> Result<FormatInfo> {
    let (primary, secondary) = format_info_positions(grid.width());
    let a = read_word(grid, &primary) as u16;
    let b = read_word(grid, &secondary) as u16;
    FormatInfo::decode_pair(a, b).ok_or_else(|| {
        QrError::decode(format!(
            "format information unreadable ({a:015b} / {b:015b})"
        ))
    })
}

/// Version from either version block (symbols of version 7 and up)
pub fn read_version_info(grid: &BitMatrix) -> Option<Version> {
    let (top_right, bottom_left) = version_info_positions(grid.width());
    decode_version_info(read_word(grid, &top_right))
        .or_else(|| decode_version_info(read_word(grid, &bottom_left)))
}

/// Decode an upright `size x size` module grid (one cell per module)
///
/// The reported finder centers are in module coordinates.
pub fn decode_symbol(grid: &BitMatrix) -> Result<DecodedSymbol> {
    let size = grid.width();
    if grid.height() != size {
        return Err(QrError::decode(format!(
            "grid is {}x{}, not square",
            size,
            grid.height()
        )));
    }
    let version = Version::from_size(size)
        .ok_or_else(|| QrError::decode(format!("no supported version has side {size}")))?;

    if version.number() >= 7 {
        match read_version_info(grid) {
            Some(read) if read != version => {
                return Err(QrError::decode(format!(
                    "version block says {read}, grid size implies {version}"
                )));
            }
            Some(_) => {}
            None => log::debug!("version block unreadable, using size-derived version {version}"),
        }
    }

    let format = read_format_info(grid)?;
    log::debug!(
        "format info: level {:?}, mask {}",
        format.ec_level,
        format.mask_pattern.index()
    );

    let func = FunctionMask::new(version);
    let mut unmasked = grid.clone();
    unmask(&mut unmasked, format.mask_pattern, &func);

    let bits = BitstreamExtractor::extract(&unmasked, &func);
    let codewords = bits_to_codewords(&bits);
    let data_codewords = deinterleave_and_correct(&codewords, version, format.ec_level)?;
    let (data, content) = decode_payload(&data_codewords, version)?;

    let far = size as f64 - 3.5;
    Ok(DecodedSymbol {
        data,
        content,
        version,
        error_correction: format.ec_level,
        mask_pattern: format.mask_pattern,
        finders: [
            Point::new(3.5, 3.5),
            Point::new(far, 3.5),
            Point::new(3.5, far),
        ],
    })
}
