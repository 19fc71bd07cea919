use super::{BitMatrix, Version};

/// Alignment pattern center coordinates, indexed by version.
const ALIGNMENT_CENTERS: [&[usize]; 16] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
];

/// Alignment pattern centers for a given version.
pub fn alignment_pattern_positions(version: Version) -> &'static [usize] {
    ALIGNMENT_CENTERS[version.number() as usize]
}

/// Alignment centers that do not collide with a finder pattern, as `(x, y)`.
pub fn alignment_pattern_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let Some(&last) = positions.last() else {
        return Vec::new();
    };
    let mut centers = Vec::new();
    for &cy in positions {
        for &cx in positions {
            let in_tl = cx == 6 && cy == 6;
            let in_tr = cx == last && cy == 6;
            let in_bl = cx == 6 && cy == last;
            if !(in_tl || in_tr || in_bl) {
                centers.push((cx, cy));
            }
        }
    }
    centers
}

/// Cells holding the 15 format bits, as `(x, y)` indexed by bit position.
///
/// The first array is the copy around the top-left finder, the second is
/// split between the top-right and bottom-left finders.
pub fn format_info_positions(size: usize) -> ([(usize, usize); 15], [(usize, usize); 15]) {
    let mut primary = [(0, 0); 15];
    let mut secondary = [(0, 0); 15];
    for (i, cell) in primary.iter_mut().enumerate() {
        *cell = match i {
            0..=5 => (8, i),
            6 => (8, 7),
            7 => (8, 8),
            8 => (7, 8),
            _ => (14 - i, 8),
        };
    }
    for (i, cell) in secondary.iter_mut().enumerate() {
        *cell = if i < 8 {
            (size - 1 - i, 8)
        } else {
            (8, size - 15 + i)
        };
    }
    (primary, secondary)
}

/// Cells holding the 18 version bits (v7+), as `(x, y)` indexed by bit position.
///
/// The first array is the block left of the top-right finder, the second
/// its transpose above the bottom-left finder.
pub fn version_info_positions(size: usize) -> ([(usize, usize); 18], [(usize, usize); 18]) {
    let mut top_right = [(0, 0); 18];
    let mut bottom_left = [(0, 0); 18];
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        top_right[i] = (a, b);
        bottom_left[i] = (b, a);
    }
    (top_right, bottom_left)
}

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    /// Mark every finder, separator, timing, alignment, format and version cell.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns + separators (8x8 areas, clipped to bounds)
        Self::mark_finder_area(&mut mask, 0, 0);
        Self::mark_finder_area(&mut mask, size - 7, 0);
        Self::mark_finder_area(&mut mask, 0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_pattern_centers(version) {
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    mask.set(x, y, true);
                }
            }
        }

        // Format info areas; the dark module is part of the secondary copy's column
        let (primary, secondary) = format_info_positions(size);
        for (x, y) in primary.into_iter().chain(secondary) {
            mask.set(x, y, true);
        }
        mask.set(8, size - 8, true);

        if version.number() >= 7 {
            let (top_right, bottom_left) = version_info_positions(size);
            for (x, y) in top_right.into_iter().chain(bottom_left) {
                mask.set(x, y, true);
            }
        }

        Self { mask, version }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version this mask was built for
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether `(x, y)` is a reserved (non-data) cell
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Number of cells available for codeword bits
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_ones()
    }

    /// Data cells in placement order, as `(x, y)`.
    ///
    /// Column pairs are walked right to left starting at the rightmost
    /// column, column 6 is skipped, the vertical direction alternates per
    /// pair starting upward, and within a row the right column comes first.
    pub fn zigzag_positions(&self) -> Vec<(usize, usize)> {
        let size = self.size();
        let mut positions = Vec::with_capacity(self.data_modules_count());
        let mut upward = true;
        let mut col = size as isize - 1;

        while col > 0 {
            if col == 6 {
                col -= 1;
                continue;
            }
            for step in 0..size {
                let y = if upward { size - 1 - step } else { step };
                for x in [col as usize, col as usize - 1] {
                    if !self.is_function(x, y) {
                        positions.push((x, y));
                    }
                }
            }
            upward = !upward;
            col -= 2;
        }

        positions
    }

    fn mark_finder_area(mask: &mut BitMatrix, x: usize, y: usize) {
        let size = mask.width();
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 8).min(size);
        let end_y = (y + 8).min(size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                mask.set(xx, yy, true);
            }
        }
    }
}
