/// Gray to binary conversion; `true` = dark
use crate::models::BitMatrix;

/// Summed-area table with a zero first row and column, `(width + 1) x (height + 1)`
fn integral_image(gray: &[u8], width: usize, height: usize) -> Vec<u64> {
    let stride = width + 1;
    let mut integral = vec![0u64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }
    integral
}

/// Local-mean threshold over a `block_size` window, computed with an integral image
///
/// A pixel is dark when it is below the window mean minus `offset`. Windows
/// are clipped at the image border.
pub fn adaptive_binarize(
    gray: &[u8],
    width: usize,
    height: usize,
    block_size: usize,
    offset: i32,
) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    if width == 0 || height == 0 {
        return binary;
    }
    let integral = integral_image(gray, width, height);
    let stride = width + 1;
    let half = block_size / 2;

    for y in 0..height {
        let y1 = y.saturating_sub(half);
        let y2 = (y + half + 1).min(height);
        for x in 0..width {
            let x1 = x.saturating_sub(half);
            let x2 = (x + half + 1).min(width);
            let sum = integral[y2 * stride + x2] + integral[y1 * stride + x1]
                - integral[y1 * stride + x2]
                - integral[y2 * stride + x1];
            let count = ((x2 - x1) * (y2 - y1)) as i64;
            // gray < sum / count - offset, kept in integers
            let value = gray[y * width + x] as i64;
            if (value + offset as i64) * count < sum as i64 {
                binary.set(x, y, true);
            }
        }
    }

    binary
}

/// Convert grayscale image to binary using Otsu's thresholding method
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    let threshold = calculate_otsu_threshold(gray);
    log::trace!("otsu threshold {threshold}");
    threshold_binarize(gray, width, height, threshold)
}

/// Threshold maximizing the between-class variance of the histogram
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut below_count = 0.0;
    let mut below_sum = 0.0;

    // Pixels < threshold form the dark class
    for threshold in 1..=255usize {
        below_count += histogram[threshold - 1] as f64;
        below_sum += (threshold - 1) as f64 * histogram[threshold - 1] as f64;
        let above_count = total - below_count;
        if below_count == 0.0 || above_count == 0.0 {
            continue;
        }

        let below_mean = below_sum / below_count;
        let above_mean = (total_sum - below_sum) / above_count;
        let variance =
            (below_count / total) * (above_count / total) * (below_mean - above_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);

    for y in 0..height {
        for x in 0..width {
            if gray[y * width + x] < threshold {
                binary.set(x, y, true);
            }
        }
    }

    binary
}
