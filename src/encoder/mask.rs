/// Data masking and penalty-based mask selection
use rayon::prelude::*;

use crate::models::{BitMatrix, MaskPattern, ModuleMatrix};

const RUN_MIN: usize = 5;
const RUN_BASE: u32 = 3;
const BLOCK_PENALTY: u32 = 3;
const FINDER_LIKE_PENALTY: u32 = 40;
const FINDER_LIKE: [bool; 7] = [true, false, true, true, true, false, true];
const FINDER_LIKE_INVERTED: [bool; 7] = [false, true, false, false, false, true, false];
const LIGHT_PADDING: usize = 4;
const BALANCE_PENALTY: u32 = 10;

/// Copy of `matrix` with `mask` XORed onto every non-reserved cell
///
/// Masking is an involution: applying the same pattern twice restores the input.
pub fn apply_mask(matrix: &ModuleMatrix, mask: MaskPattern) -> ModuleMatrix {
    let mut masked = matrix.clone();
    let size = matrix.size();
    for y in 0..size {
        for x in 0..size {
            if !matrix.is_reserved(x, y) && mask.is_masked(y, x) {
                masked.toggle(x, y);
            }
        }
    }
    masked
}

/// Per-rule penalty breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenaltyScore {
    /// Runs of five or more same-colored modules
    pub runs: u32,
    /// 2x2 same-colored blocks
    pub blocks: u32,
    /// Finder-like 1:1:3:1:1 sequences next to four light modules
    pub finder_like: u32,
    /// Deviation of the dark ratio from one half
    pub balance: u32,
}

impl PenaltyScore {
    /// Sum of all four rules
    pub fn total(&self) -> u32 {
        self.runs + self.blocks + self.finder_like + self.balance
    }
}

/// Score a whole grid; lower is better
pub fn evaluate_mask(modules: &BitMatrix) -> PenaltyScore {
    let size = modules.width();
    let rows: Vec<Vec<bool>> = modules.to_rows();
    let cols: Vec<Vec<bool>> = (0..size)
        .map(|x| (0..size).map(|y| modules.get(x, y)).collect())
        .collect();

    let runs = rows.iter().chain(&cols).map(|line| run_penalty(line)).sum();
    let finder_like = rows
        .iter()
        .chain(&cols)
        .map(|line| finder_like_penalty(line))
        .sum();

    let mut blocks = 0;
    for y in 0..size.saturating_sub(1) {
        for x in 0..size - 1 {
            let color = modules.get(x, y);
            if modules.get(x + 1, y) == color
                && modules.get(x, y + 1) == color
                && modules.get(x + 1, y + 1) == color
            {
                blocks += BLOCK_PENALTY;
            }
        }
    }

    PenaltyScore {
        runs,
        blocks,
        finder_like,
        balance: balance_penalty(modules.count_ones(), size * size),
    }
}

fn run_penalty(line: &[bool]) -> u32 {
    let mut penalty = 0;
    let mut iter = line.iter();
    let Some(mut prev) = iter.next() else {
        return 0;
    };
    let mut count = 1;
    for module in iter {
        if module == prev {
            count += 1;
        } else {
            penalty += run_cost(count);
            count = 1;
            prev = module;
        }
    }
    penalty + run_cost(count)
}

fn run_cost(count: usize) -> u32 {
    if count >= RUN_MIN {
        RUN_BASE + (count - RUN_MIN) as u32
    } else {
        0
    }
}

fn finder_like_penalty(line: &[bool]) -> u32 {
    let len = FINDER_LIKE.len();
    if line.len() < len {
        return 0;
    }
    let all_light = |range: std::ops::Range<usize>| line[range].iter().all(|&m| !m);
    let mut penalty = 0;
    for start in 0..=line.len() - len {
        let window = &line[start..start + len];
        if window != FINDER_LIKE && window != FINDER_LIKE_INVERTED {
            continue;
        }
        let before = start >= LIGHT_PADDING && all_light(start - LIGHT_PADDING..start);
        let end = start + len;
        let after = end + LIGHT_PADDING <= line.len() && all_light(end..end + LIGHT_PADDING);
        if before || after {
            penalty += FINDER_LIKE_PENALTY;
        }
    }
    penalty
}

/// 10 points per full 5% step away from 50% dark
fn balance_penalty(dark: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let deviation = (dark * 100).abs_diff(total * 50);
    (deviation / (total * 5)) as u32 * BALANCE_PENALTY
}

/// Mask with the lowest total penalty; the lowest index wins ties
pub fn find_best_mask(matrix: &ModuleMatrix) -> (MaskPattern, u32) {
    let scores: Vec<u32> = MaskPattern::ALL
        .par_iter()
        .map(|&mask| evaluate_mask(apply_mask(matrix, mask).modules()).total())
        .collect();

    let mut best = (MaskPattern::Pattern0, u32::MAX);
    for (mask, score) in MaskPattern::ALL.into_iter().zip(scores) {
        log::trace!("mask {} penalty {}", mask.index(), score);
        if score < best.1 {
            best = (mask, score);
        }
    }
    best
}
