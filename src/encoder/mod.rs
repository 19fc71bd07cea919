//! QR code encoding
//!
//! Text goes through these stages to become a finished symbol:
//! - Mode detection, version selection and bit packing
//! - Block splitting with Reed-Solomon ECC and interleaving
//! - Function pattern layout and zig-zag codeword placement
//! - Mask selection by penalty score, then format stamping

/// Append-only bit sequence
pub mod bit_buffer;
/// Mode, version and payload packing
pub mod data_encoder;
/// Per-block ECC and interleaving
pub mod error_correction;
/// Data masking and penalty evaluation
pub mod mask;
/// Function patterns and codeword placement
pub mod matrix_builder;

use crate::config::EncodeOptions;
use crate::error::Result;
use crate::models::{EncodedSymbol, Version};

/// Run the full encode pipeline for `text`
pub fn encode_symbol(text: &str, options: &EncodeOptions) -> Result<EncodedSymbol> {
    let level = options.level;
    let min_version = options.min_version.unwrap_or(Version::MIN);
    let data = data_encoder::encode_text(text, level, min_version)?;
    let codewords = error_correction::add_error_correction(&data.codewords, data.version, level)?;
    let base = matrix_builder::generate_modules(&codewords, data.version);

    let mask_pattern = match options.force_mask {
        Some(mask) => mask,
        None => {
            let (mask, penalty) = mask::find_best_mask(&base);
            log::debug!("selected mask {} (penalty {})", mask.index(), penalty);
            mask
        }
    };

    let mut matrix = mask::apply_mask(&base, mask_pattern);
    matrix_builder::draw_format_info(&mut matrix, level, mask_pattern);

    Ok(EncodedSymbol {
        version: data.version,
        size: data.version.size(),
        mask_pattern,
        error_correction_level: level,
        mode: data.mode,
        modules: matrix.to_rows(),
    })
}
