/// Perspective rectification: image grid to an exact module grid
use super::finder::FinderPattern;
use crate::error::{QrError, Result};
use crate::models::{BitMatrix, Point, Version};
use crate::utils::geometry::PerspectiveTransform;

const MIN_FINDER_MATCH: f64 = 0.7;
const MIN_GOOD_FINDERS: usize = 2;
const MIN_TIMING_MATCH: f64 = 0.7;

/// Versions to try for these finders: the estimate first, then its neighbors
///
/// The estimate comes from the mean center distance over the mean module size;
/// finder centers sit 3.5 modules in from each edge.
pub fn candidate_versions(finders: &[FinderPattern; 3]) -> Vec<Version> {
    let [tl, tr, bl] = finders;
    let module_size = (tl.module_size + tr.module_size + bl.module_size) / 3.0;
    if module_size <= 0.0 {
        return Vec::new();
    }
    let avg_distance = (tl.center.distance(&tr.center) + tl.center.distance(&bl.center)) / 2.0;
    let dimension = avg_distance / module_size + 7.0;
    let estimate = ((dimension - 17.0) / 4.0)
        .round()
        .clamp(Version::MIN.number() as f64, Version::MAX.number() as f64) as i32;
    log::debug!("estimated dimension {dimension:.1}, version {estimate}");

    let mut versions = Vec::with_capacity(3);
    for number in [estimate, estimate - 1, estimate + 1] {
        if let Some(version) = u8::try_from(number).ok().and_then(Version::new) {
            versions.push(version);
        }
    }
    versions
}

/// Projective map from module coordinates to image coordinates
///
/// The bottom-right reference point is extrapolated as a parallelogram
/// corner, `tr + bl - tl`.
pub fn module_to_image(finders: &[FinderPattern; 3], version: Version) -> Result<PerspectiveTransform> {
    let [tl, tr, bl] = finders.map(|f| f.center);
    let br = Point::new(tr.x + bl.x - tl.x, tr.y + bl.y - tl.y);
    let far = version.size() as f64 - 3.5;
    let modules = [
        Point::new(3.5, 3.5),
        Point::new(far, 3.5),
        Point::new(3.5, far),
        Point::new(far, far),
    ];
    PerspectiveTransform::from_points(&modules, &[tl, tr, bl, br])
}

/// Resample `binary` into a `version.size()` square grid and validate it
pub fn rectify(binary: &BitMatrix, finders: &[FinderPattern; 3], version: Version) -> Result<BitMatrix> {
    let transform = module_to_image(finders, version)?;
    let size = version.size();
    let mut grid = BitMatrix::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let module_center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let dark = transform
                .transform(&module_center)
                .is_some_and(|p| sample_bilinear(binary, p.x - 0.5, p.y - 0.5) > 0.5);
            grid.set(x, y, dark);
        }
    }
    validate_grid(&grid)?;
    Ok(grid)
}

/// Bilinear interpolation of the binary grid at a pixel-index position;
/// pixels outside the image count as light
pub fn sample_bilinear(binary: &BitMatrix, x: f64, y: f64) -> f64 {
    let width = binary.width() as f64;
    let height = binary.height() as f64;
    if !(x > -1.0 && y > -1.0 && x < width && y < height) {
        return 0.0;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let at = |px: f64, py: f64| -> f64 {
        if px < 0.0 || py < 0.0 {
            return 0.0;
        }
        binary.get(px as usize, py as usize) as u8 as f64
    };
    let top = at(x0, y0) * (1.0 - fx) + at(x0 + 1.0, y0) * fx;
    let bottom = at(x0, y0 + 1.0) * (1.0 - fx) + at(x0 + 1.0, y0 + 1.0) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Fraction of the 7x7 finder bitmap matched with its top-left module at `(x0, y0)`
fn finder_match(grid: &BitMatrix, x0: usize, y0: usize) -> f64 {
    let mut matches = 0;
    for dy in 0..7 {
        for dx in 0..7 {
            let ring = (dx as isize - 3).abs().max((dy as isize - 3).abs());
            if grid.get(x0 + dx, y0 + dy) == (ring != 2) {
                matches += 1;
            }
        }
    }
    matches as f64 / 49.0
}

/// Fraction of timing modules (row and column 6) with the expected color
fn timing_match(grid: &BitMatrix) -> f64 {
    let size = grid.width();
    if size < 17 {
        return 0.0;
    }
    let mut matches = 0;
    let mut total = 0;
    for i in 8..size - 8 {
        let expected = i % 2 == 0;
        matches += (grid.get(i, 6) == expected) as usize;
        matches += (grid.get(6, i) == expected) as usize;
        total += 2;
    }
    matches as f64 / total as f64
}

/// Reject grids whose finder or timing structure did not survive sampling
pub fn validate_grid(grid: &BitMatrix) -> Result<()> {
    let size = grid.width();
    let good_finders = [(0, 0), (size - 7, 0), (0, size - 7)]
        .iter()
        .filter(|&&(x, y)| finder_match(grid, x, y) >= MIN_FINDER_MATCH)
        .count();
    if good_finders < MIN_GOOD_FINDERS {
        log::debug!("rectified grid has {good_finders}/3 recognizable finders");
        return Err(QrError::PerspectiveCorrectionFailed);
    }
    let timing = timing_match(grid);
    if timing < MIN_TIMING_MATCH {
        log::debug!("rectified grid timing match {timing:.2}");
        return Err(QrError::PerspectiveCorrectionFailed);
    }
    Ok(())
}
