/// Function pattern layout and codeword placement
use crate::ecc::format::FormatInfo;
use crate::ecc::version_info::encode_version_info;
use crate::models::function_mask::{
    alignment_pattern_centers, format_info_positions, version_info_positions,
};
use crate::models::{ECLevel, FunctionMask, MaskPattern, ModuleMatrix, Version};

/// Matrix with every function pattern drawn and format cells reserved (light)
pub fn build_function_patterns(version: Version) -> ModuleMatrix {
    let size = version.size();
    let mut matrix = ModuleMatrix::new(size);

    draw_finder(&mut matrix, 3, 3);
    draw_finder(&mut matrix, size - 4, 3);
    draw_finder(&mut matrix, 3, size - 4);

    // Timing between the separators, dark on even indices
    for i in 8..size - 8 {
        matrix.set_function(6, i, i % 2 == 0);
        matrix.set_function(i, 6, i % 2 == 0);
    }

    for (cx, cy) in alignment_pattern_centers(version) {
        draw_alignment(&mut matrix, cx, cy);
    }

    // Reserve both format copies; the dark module is always set
    let (primary, secondary) = format_info_positions(size);
    for (x, y) in primary.into_iter().chain(secondary) {
        matrix.set_function(x, y, false);
    }
    matrix.set_function(8, size - 8, true);

    draw_version_info(&mut matrix, version);
    matrix
}

/// 7x7 finder centered on `(cx, cy)` plus its one-module light separator
fn draw_finder(matrix: &mut ModuleMatrix, cx: usize, cy: usize) {
    let size = matrix.size() as isize;
    for dy in -4isize..=4 {
        for dx in -4isize..=4 {
            let x = cx as isize + dx;
            let y = cy as isize + dy;
            if (0..size).contains(&x) && (0..size).contains(&y) {
                let ring = dx.abs().max(dy.abs());
                matrix.set_function(x as usize, y as usize, ring != 2 && ring != 4);
            }
        }
    }
}

/// 5x5 alignment pattern: dark ring, light ring, dark center
fn draw_alignment(matrix: &mut ModuleMatrix, cx: usize, cy: usize) {
    for dy in -2isize..=2 {
        for dx in -2isize..=2 {
            let x = (cx as isize + dx) as usize;
            let y = (cy as isize + dy) as usize;
            matrix.set_function(x, y, dx.abs().max(dy.abs()) != 1);
        }
    }
}

/// Write both copies of the format word for `(level, mask)`
pub fn draw_format_info(matrix: &mut ModuleMatrix, level: ECLevel, mask: MaskPattern) {
    let size = matrix.size();
    let bits = FormatInfo::new(level, mask).encode();
    let (primary, secondary) = format_info_positions(size);
    for i in 0..15 {
        let dark = (bits >> i) & 1 == 1;
        let (x, y) = primary[i];
        matrix.set_function(x, y, dark);
        let (x, y) = secondary[i];
        matrix.set_function(x, y, dark);
    }
    matrix.set_function(8, size - 8, true);
}

/// Write both version blocks (versions 7+ only)
pub fn draw_version_info(matrix: &mut ModuleMatrix, version: Version) {
    if version.number() < 7 {
        return;
    }
    let bits = encode_version_info(version);
    let (top_right, bottom_left) = version_info_positions(matrix.size());
    for i in 0..18 {
        let dark = (bits >> i) & 1 == 1;
        let (x, y) = top_right[i];
        matrix.set_function(x, y, dark);
        let (x, y) = bottom_left[i];
        matrix.set_function(x, y, dark);
    }
}

/// Fill the data region with codeword bits in zig-zag order
///
/// Bits are taken most significant first; cells left over once the
/// codewords run out (remainder bits) stay light.
pub fn place_codewords(matrix: &mut ModuleMatrix, codewords: &[u8]) {
    let Some(version) = Version::from_size(matrix.size()) else {
        return;
    };
    let func = FunctionMask::new(version);
    let mut bits = codewords
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1));
    for (x, y) in func.zigzag_positions() {
        if matrix.is_reserved(x, y) {
            continue;
        }
        matrix.set(x, y, bits.next().unwrap_or(false));
    }
}

/// Unmasked symbol: function patterns, reserved format cells and data
pub fn generate_modules(codewords: &[u8], version: Version) -> ModuleMatrix {
    let mut matrix = build_function_patterns(version);
    place_codewords(&mut matrix, codewords);
    matrix
}
