/// Convert interleaved pixel buffers to one byte of gray per pixel
///
/// Color pixels use the unweighted channel mean `(R + G + B) / 3`; alpha is
/// ignored. Rows are converted in parallel.
use rayon::prelude::*;

use crate::error::{QrError, Result};

/// Smallest image side that can hold a version 1 symbol at one pixel per module
pub const MIN_IMAGE_SIDE: usize = 21;

/// Borrowed single-channel image
#[derive(Debug, Clone, Copy)]
pub struct GrayImageView<'a> {
    /// Row-major gray values
    pub pixels: &'a [u8],
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl<'a> GrayImageView<'a> {
    /// Wrap a gray buffer, checking its length and dimensions
    pub fn new(pixels: &'a [u8], width: usize, height: usize) -> Result<Self> {
        validate_dimensions(pixels.len(), width, height, 1)?;
        Ok(Self {
            pixels,
            width,
            height,
        })
    }
}

/// Reject buffers that do not match `width * height * channels` or are too small
pub fn validate_dimensions(len: usize, width: usize, height: usize, channels: usize) -> Result<()> {
    if !matches!(channels, 1 | 3 | 4) {
        return Err(QrError::invalid_image(format!(
            "{channels} channels per pixel, expected 1, 3 or 4"
        )));
    }
    if width < MIN_IMAGE_SIDE || height < MIN_IMAGE_SIDE {
        return Err(QrError::invalid_image(format!(
            "{width}x{height} is smaller than {MIN_IMAGE_SIDE}x{MIN_IMAGE_SIDE}"
        )));
    }
    let expected = width * height * channels;
    if len != expected {
        return Err(QrError::invalid_image(format!(
            "buffer holds {len} bytes, {width}x{height}x{channels} needs {expected}"
        )));
    }
    Ok(())
}

/// Gray buffer for a 1, 3 or 4 channel image
pub fn to_grayscale(pixels: &[u8], width: usize, height: usize, channels: usize) -> Result<Vec<u8>> {
    validate_dimensions(pixels.len(), width, height, channels)?;
    Ok(match channels {
        1 => pixels.to_vec(),
        _ => channel_mean(pixels, width, height, channels),
    })
}

fn channel_mean(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * channels;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * channels;
            let sum = pixels[idx] as u32 + pixels[idx + 1] as u32 + pixels[idx + 2] as u32;
            *out = (sum / 3) as u8;
        }
    });
    gray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        let mut rgb = vec![0u8; 21 * 21 * 3];
        rgb[..3].copy_from_slice(&[255, 255, 255]);
        rgb[3..6].copy_from_slice(&[255, 0, 0]);
        rgb[6..9].copy_from_slice(&[30, 60, 90]);
        let gray = to_grayscale(&rgb, 21, 21, 3).unwrap();
        assert_eq!(gray.len(), 441);
        assert_eq!(gray[0], 255);
        assert_eq!(gray[1], 85);
        assert_eq!(gray[2], 60);
        assert_eq!(gray[3], 0);
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let mut rgba = vec![0u8; 21 * 21 * 4];
        rgba[..4].copy_from_slice(&[90, 90, 90, 0]);
        let gray = to_grayscale(&rgba, 21, 21, 4).unwrap();
        assert_eq!(gray[0], 90);
    }

    #[test]
    fn test_rejects_bad_buffers() {
        assert!(matches!(
            to_grayscale(&[0u8; 20 * 20], 20, 20, 1),
            Err(QrError::InvalidImage { .. })
        ));
        assert!(to_grayscale(&[0u8; 100], 21, 21, 1).is_err());
        assert!(to_grayscale(&[0u8; 21 * 21 * 2], 21, 21, 2).is_err());
        assert!(GrayImageView::new(&[0u8; 441], 21, 21).is_ok());
    }
}
