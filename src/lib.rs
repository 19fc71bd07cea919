//! qr_codec - QR code symbol encoder and image decoder
//!
//! Encodes text into ISO/IEC 18004 module matrices (versions 1-15, all four
//! error correction levels) and reads them back from grayscale or color
//! pixel buffers.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Codec trait and the standard implementation
pub mod codec;
/// Encoder, decoder and renderer options
pub mod config;
/// QR code decoding from module grids (format extraction, correction, data modes)
pub mod decoder;
/// QR code location in binarized images (finder patterns, rectification)
pub mod detector;
/// GF(256), Reed-Solomon, block tables, format and version information
pub mod ecc;
/// QR code encoding (data packing, ECC, layout, masking)
pub mod encoder;
/// Crate error type
pub mod error;
/// Core data structures (BitMatrix, Point, Version, symbols, etc.)
pub mod models;
/// Image file helpers for the command line tool
pub mod tools;
/// Utility functions (grayscale, binarization, geometry, rendering)
pub mod utils;

pub use codec::{Codec, StandardCodec};
pub use config::{DecodeOptions, EncodeOptions, RenderOptions};
pub use error::{QrError, Result};
pub use models::{
    BitMatrix, DecodedSymbol, ECLevel, EncodedSymbol, MaskPattern, Mode, ModuleMatrix, Point,
    Version,
};
pub use utils::grayscale::GrayImageView;
pub use utils::render::render;

use decoder::decode_symbol;
use utils::grayscale::to_grayscale;

/// Encode `text` at the given error correction level
///
/// The smallest version that fits is chosen and the mask with the lowest
/// penalty is applied.
pub fn encode(text: &str, level: ECLevel) -> Result<EncodedSymbol> {
    StandardCodec.encode(text, &EncodeOptions::with_level(level))
}

/// Encode `text` with explicit options
pub fn encode_with_options(text: &str, options: &EncodeOptions) -> Result<EncodedSymbol> {
    StandardCodec.encode(text, options)
}

/// Decode a grayscale image (one byte per pixel)
///
/// Uses [`DecodeOptions::from_env`]. Returns `None` when no symbol could be
/// read; see [`try_decode_image`] for the reason.
pub fn decode(gray: &[u8], width: usize, height: usize) -> Option<String> {
    decode_image(gray, width, height, 1, &DecodeOptions::from_env())
}

/// Decode a 1, 3 or 4 channel image, `None` on any failure
pub fn decode_image(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    options: &DecodeOptions,
) -> Option<String> {
    fold(try_decode_image(pixels, width, height, channels, options))
}

/// Decode a 1, 3 or 4 channel image, keeping the failure kind
///
/// # Arguments
/// * `pixels` - Interleaved pixel bytes, row-major
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1 (gray), 3 (RGB) or 4 (RGBA)
pub fn try_decode_image(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    options: &DecodeOptions,
) -> Result<DecodedSymbol> {
    let gray = to_grayscale(pixels, width, height, channels)?;
    let image = GrayImageView::new(&gray, width, height)?;
    StandardCodec.decode_symbol(&image, options)
}

/// Decode an already binarized image (`true` = dark), `None` on any failure
pub fn decode_grid(binary: &BitMatrix, options: &DecodeOptions) -> Option<String> {
    fold(try_decode_grid(binary, options))
}

/// Decode an already binarized image, keeping the failure kind
pub fn try_decode_grid(binary: &BitMatrix, options: &DecodeOptions) -> Result<DecodedSymbol> {
    detector::decode_binary(binary, options)
}

/// Decode an exact module matrix (`modules[row][col]`, no quiet zone)
pub fn decode_modules(modules: &[Vec<bool>]) -> Option<String> {
    fold(try_decode_modules(modules))
}

/// Decode an exact module matrix, keeping the failure kind
///
/// Finder centers in the result are in module coordinates.
pub fn try_decode_modules(modules: &[Vec<bool>]) -> Result<DecodedSymbol> {
    if modules.iter().any(|row| row.len() != modules.len()) {
        return Err(QrError::decode("module rows differ in length from the row count"));
    }
    decode_symbol(&BitMatrix::from_rows(modules))
}

fn fold(result: Result<DecodedSymbol>) -> Option<String> {
    match result {
        Ok(symbol) => Some(symbol.content),
        Err(err) => {
            log::debug!("decode failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_then_decode_modules() {
        let symbol = encode("HELLO WORLD", ECLevel::M).unwrap();
        assert_eq!(symbol.version.number(), 1);
        assert_eq!(symbol.mode, Mode::Alphanumeric);
        assert_eq!(decode_modules(&symbol.modules).as_deref(), Some("HELLO WORLD"));
    }

    #[test]
    fn test_decode_rendered_gray() {
        let symbol = encode("https://example.com/qr", ECLevel::Q).unwrap();
        let (pixels, side) = render(&symbol, &RenderOptions::with_scale(5));
        assert_eq!(
            decode(&pixels, side, side).as_deref(),
            Some("https://example.com/qr")
        );
    }

    #[test]
    fn test_try_decode_reports_failure_kind() {
        let pixels = vec![255u8; 40 * 40];
        assert_eq!(decode(&pixels, 40, 40), None);
        let err = try_decode_image(&pixels, 40, 40, 1, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err, QrError::FinderPatternNotFound { found: 0 });

        let err = try_decode_image(&pixels, 20, 80, 1, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, QrError::InvalidImage { .. }));
    }

    #[test]
    fn test_decode_modules_rejects_ragged_rows() {
        let rows = vec![vec![false; 21]; 20];
        assert!(try_decode_modules(&rows).is_err());
        assert_eq!(decode_modules(&[]), None);
    }
}
