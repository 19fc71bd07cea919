//! Codec seam: one trait, one production implementation.

use crate::config::{DecodeOptions, EncodeOptions};
use crate::detector;
use crate::encoder::encode_symbol;
use crate::error::Result;
use crate::models::{DecodedSymbol, EncodedSymbol};
use crate::utils::binarization::{adaptive_binarize, otsu_binarize};
use crate::utils::grayscale::GrayImageView;

/// Text to symbol and image to text
///
/// Implementations are chosen once by the caller and passed where needed.
pub trait Codec {
    /// Encode `text` into a masked, format-stamped symbol
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<EncodedSymbol>;

    /// Locate and decode a symbol in a grayscale image
    fn decode_symbol(&self, image: &GrayImageView<'_>, options: &DecodeOptions)
    -> Result<DecodedSymbol>;

    /// Decoded text only
    fn decode(&self, image: &GrayImageView<'_>, options: &DecodeOptions) -> Result<String> {
        self.decode_symbol(image, options).map(|symbol| symbol.content)
    }
}

/// The in-process codec
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCodec;

impl Codec for StandardCodec {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<EncodedSymbol> {
        encode_symbol(text, options)
    }

    fn decode_symbol(
        &self,
        image: &GrayImageView<'_>,
        options: &DecodeOptions,
    ) -> Result<DecodedSymbol> {
        let binary = adaptive_binarize(
            image.pixels,
            image.width,
            image.height,
            options.effective_block_size(),
            options.threshold_offset,
        );
        let err = match detector::decode_binary(&binary, options) {
            Ok(symbol) => return Ok(symbol),
            Err(err) => err,
        };
        if !options.otsu_fallback {
            return Err(err);
        }

        log::debug!("adaptive binarization gave no symbol ({err}), retrying with Otsu");
        let binary = otsu_binarize(image.pixels, image.width, image.height);
        detector::decode_binary(&binary, options)
    }
}
