/// Finder pattern detection using 1:1:3:1:1 ratio scanning
use crate::config::DecodeOptions;
use crate::error::{QrError, Result};
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::{cos_angle, cross};

const EXPECTED_RATIOS: [f64; 5] = [1.0, 1.0, 3.0, 1.0, 1.0];
const FINDER_BITMAP: [[bool; 7]; 7] = {
    let mut bitmap = [[false; 7]; 7];
    let mut y = 0;
    while y < 7 {
        let mut x = 0;
        while x < 7 {
            let dx = if x > 3 { x - 3 } else { 3 - x };
            let dy = if y > 3 { y - 3 } else { 3 - y };
            let ring = if dx > dy { dx } else { dy };
            bitmap[y][x] = ring != 2;
            x += 1;
        }
        y += 1;
    }
    bitmap
};
const MIN_BITMAP_MATCH: f64 = 0.8;
/// Above this many candidates only the most confident take part in triangle selection
const MAX_TRIANGLE_CANDIDATES: usize = 16;
/// Early termination: max patterns per row
const MAX_PATTERNS_PER_ROW: usize = 8;

/// A located finder pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    /// Sub-pixel center
    pub center: Point,
    /// Estimated module size in pixels
    pub module_size: f64,
    /// 1.0 for perfect 1:1:3:1:1 runs, falling towards 0 with deviation
    pub confidence: f64,
}

impl FinderPattern {
    /// Create a pattern at `(x, y)`
    pub fn new(x: f64, y: f64, module_size: f64, confidence: f64) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            confidence,
        }
    }
}

/// Finder locator configured from [`DecodeOptions`]
#[derive(Debug, Clone)]
pub struct FinderDetector {
    ratio_tolerance: f64,
    min_module_size: f64,
    max_module_size: f64,
    min_distance: f64,
}

impl Default for FinderDetector {
    fn default() -> Self {
        Self::new(&DecodeOptions::default())
    }
}

impl FinderDetector {
    /// Detector using the tolerances and size bounds in `options`
    pub fn new(options: &DecodeOptions) -> Self {
        Self {
            ratio_tolerance: options.ratio_tolerance as f64,
            min_module_size: options.min_module_size as f64,
            max_module_size: options.max_module_size as f64,
            min_distance: options.finder_min_distance as f64,
        }
    }

    /// Three patterns ordered top-left, top-right, bottom-left
    pub fn locate(&self, matrix: &BitMatrix) -> Result<[FinderPattern; 3]> {
        let candidates = self.detect(matrix);
        log::debug!("{} finder candidates after filtering", candidates.len());
        if candidates.len() < 3 {
            return Err(QrError::FinderPatternNotFound {
                found: candidates.len(),
            });
        }
        let pool = &candidates[..candidates.len().min(MAX_TRIANGLE_CANDIDATES)];
        let [a, b, c] = select_best_triangle(pool).ok_or(QrError::FinderPatternNotFound {
            found: candidates.len(),
        })?;
        Ok(order_finder_patterns(&pool[a], &pool[b], &pool[c]))
    }

    /// Every verified candidate, most confident first, at least
    /// `finder_min_distance` apart
    pub fn detect(&self, matrix: &BitMatrix) -> Vec<FinderPattern> {
        let mut candidates = Vec::new();
        for y in 0..matrix.height() {
            candidates.extend(self.scan_row(matrix, y));
        }
        self.filter_candidates(candidates)
    }

    fn scan_row(&self, matrix: &BitMatrix, y: usize) -> Vec<FinderPattern> {
        let width = matrix.width();
        let mut candidates = Vec::new();
        let mut run_lengths: Vec<usize> = Vec::new();
        let mut run_colors: Vec<bool> = Vec::new();
        let mut run_start = 0usize;
        let mut current_color = matrix.get(0, y);

        for x in 1..=width {
            let color = x < width && matrix.get(x, y);
            if color == current_color && x < width {
                continue;
            }
            run_lengths.push(x - run_start);
            run_colors.push(current_color);
            run_start = x;
            current_color = color;

            let n = run_colors.len();
            if n < 5 {
                continue;
            }
            // Pattern should be: black-white-black-white-black
            let colors = &run_colors[n - 5..];
            if !(colors[0] && !colors[1] && colors[2] && !colors[3] && colors[4]) {
                continue;
            }
            let runs: [usize; 5] = [
                run_lengths[n - 5],
                run_lengths[n - 4],
                run_lengths[n - 3],
                run_lengths[n - 2],
                run_lengths[n - 1],
            ];
            if self.ratio_deviation(&runs).is_none() {
                continue;
            }
            let center_x = x as f64 - runs[4] as f64 - runs[3] as f64 - runs[2] as f64 / 2.0;
            if let Some(pattern) = self.confirm(matrix, center_x, y, &runs) {
                candidates.push(pattern);
                if candidates.len() >= MAX_PATTERNS_PER_ROW {
                    break;
                }
            }
        }

        candidates
    }

    /// Sum of relative run deviations, if every run is within tolerance
    /// and the implied module size is in bounds
    fn ratio_deviation(&self, runs: &[usize; 5]) -> Option<f64> {
        let total: usize = runs.iter().sum();
        let module = total as f64 / 7.0;
        if module < self.min_module_size || module > self.max_module_size {
            return None;
        }
        let mut deviation = 0.0;
        for (&run, &ratio) in runs.iter().zip(&EXPECTED_RATIOS) {
            let expected = ratio * module;
            let diff = (run as f64 - expected).abs() / expected;
            if diff > self.ratio_tolerance {
                return None;
            }
            deviation += diff;
        }
        Some(deviation)
    }

    /// Vertical cross-check, horizontal re-centering and 7x7 verification
    fn confirm(
        &self,
        matrix: &BitMatrix,
        center_x: f64,
        y: usize,
        row_runs: &[usize; 5],
    ) -> Option<FinderPattern> {
        let max_run: usize = row_runs.iter().sum();
        let (v_runs, center_y) = cross_check(matrix, center_x as usize, y, false, max_run)?;
        let v_dev = self.ratio_deviation(&v_runs)?;
        let (h_runs, center_x) =
            cross_check(matrix, center_x as usize, center_y as usize, true, max_run)?;
        let h_dev = self.ratio_deviation(&h_runs)?;

        let h_total: usize = h_runs.iter().sum();
        let v_total: usize = v_runs.iter().sum();
        if h_total.abs_diff(v_total) * 2 > h_total.max(v_total) {
            return None;
        }

        let module_size = (h_total + v_total) as f64 / 14.0;
        if module_size < self.min_module_size || module_size > self.max_module_size {
            return None;
        }
        if bitmap_match(matrix, center_x, center_y, module_size) < MIN_BITMAP_MATCH {
            return None;
        }

        let confidence = (1.0 - (h_dev + v_dev) / 10.0).max(0.0);
        Some(FinderPattern::new(center_x, center_y, module_size, confidence))
    }

    fn filter_candidates(&self, mut candidates: Vec<FinderPattern>) -> Vec<FinderPattern> {
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        let mut filtered: Vec<FinderPattern> = Vec::new();
        for candidate in candidates {
            let too_close = filtered
                .iter()
                .any(|kept| kept.center.distance(&candidate.center) < self.min_distance);
            if !too_close {
                filtered.push(candidate);
            }
        }
        filtered
    }
}

/// Runs through `(x, y)` along one axis, and the center of the middle dark run
///
/// The starting pixel must be dark; every run is capped at `max_run`.
fn cross_check(
    matrix: &BitMatrix,
    x: usize,
    y: usize,
    horizontal: bool,
    max_run: usize,
) -> Option<([usize; 5], f64)> {
    let (pos, len) = if horizontal {
        (x, matrix.width())
    } else {
        (y, matrix.height())
    };
    let get = |i: usize| {
        if horizontal {
            matrix.get(i, y)
        } else {
            matrix.get(x, i)
        }
    };
    if pos >= len || !get(pos) {
        return None;
    }

    let mut runs = [0usize; 5];

    // Backwards from the center: dark core, light ring, dark ring
    let mut i = pos as isize;
    for (slot, dark) in [(2, true), (1, false), (0, true)] {
        while i >= 0 && get(i as usize) == dark && runs[slot] <= max_run {
            runs[slot] += 1;
            i -= 1;
        }
        if runs[slot] == 0 || runs[slot] > max_run || (slot != 0 && i < 0) {
            return None;
        }
    }

    // Forwards: rest of the core, light ring, dark ring
    let mut j = pos + 1;
    for (slot, dark) in [(2, true), (3, false), (4, true)] {
        while j < len && get(j) == dark && runs[slot] <= max_run {
            runs[slot] += 1;
            j += 1;
        }
        if runs[slot] == 0 || runs[slot] > max_run || (slot != 4 && j >= len) {
            return None;
        }
    }

    let center = (j - runs[4] - runs[3]) as f64 - runs[2] as f64 / 2.0;
    Some((runs, center))
}

/// Fraction of the 7x7 finder bitmap reproduced around `(cx, cy)`
fn bitmap_match(matrix: &BitMatrix, cx: f64, cy: f64, module_size: f64) -> f64 {
    let mut matches = 0;
    for (dy, row) in FINDER_BITMAP.iter().enumerate() {
        for (dx, &expected) in row.iter().enumerate() {
            let px = cx + (dx as f64 - 3.0) * module_size;
            let py = cy + (dy as f64 - 3.0) * module_size;
            let dark = px >= 0.0 && py >= 0.0 && matrix.get(px as usize, py as usize);
            if dark == expected {
                matches += 1;
            }
        }
    }
    matches as f64 / 49.0
}

/// Score of three patterns as the corners of a symbol: confidence, closeness
/// to a right triangle and side-length consistency
pub fn triangle_score(patterns: [&FinderPattern; 3]) -> f64 {
    let mut d = [
        patterns[0].center.distance(&patterns[1].center),
        patterns[0].center.distance(&patterns[2].center),
        patterns[1].center.distance(&patterns[2].center),
    ];
    d.sort_by(f64::total_cmp);
    if d[0] == 0.0 {
        return f64::MIN;
    }
    let hyp_sq = d[2] * d[2];
    let right_angle = 1.0 - (hyp_sq - (d[0] * d[0] + d[1] * d[1])).abs() / hyp_sq;
    let confidence = patterns.iter().map(|p| p.confidence).sum::<f64>() / 3.0;
    let consistency = d[0] / d[2];
    confidence * 0.5 + right_angle * 0.3 + consistency * 0.2
}

/// Indices of the best-scoring 3-subset
pub fn select_best_triangle(patterns: &[FinderPattern]) -> Option<[usize; 3]> {
    let n = patterns.len();
    let mut best: Option<([usize; 3], f64)> = None;
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let score = triangle_score([&patterns[i], &patterns[j], &patterns[k]]);
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some(([i, j, k], score));
                }
            }
        }
    }
    best.map(|(indices, _)| indices)
}

/// Order as top-left (the right-angle corner), top-right, bottom-left
pub fn order_finder_patterns(
    a: &FinderPattern,
    b: &FinderPattern,
    c: &FinderPattern,
) -> [FinderPattern; 3] {
    let patterns = [*a, *b, *c];

    let mut best_idx = 0usize;
    let mut best_cos = f64::INFINITY;
    for i in 0..3 {
        let p = &patterns[i].center;
        let p1 = &patterns[(i + 1) % 3].center;
        let p2 = &patterns[(i + 2) % 3].center;
        let cos = cos_angle(p1, p, p2).abs();
        if cos < best_cos {
            best_cos = cos;
            best_idx = i;
        }
    }

    let tl = patterns[best_idx];
    let p1 = patterns[(best_idx + 1) % 3];
    let p2 = patterns[(best_idx + 2) % 3];
    // y grows downwards, so top-right x bottom-left is positive
    if cross(&tl.center, &p1.center, &p2.center) > 0.0 {
        [tl, p1, p2]
    } else {
        [tl, p2, p1]
    }
}
