//! QR code location in binarized images
//!
//! - Finder pattern detection (the three square markers)
//! - Version estimation from finder geometry
//! - Perspective resampling to an exact module grid

/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Version estimation and perspective resampling
pub mod rectifier;

use crate::config::DecodeOptions;
use crate::decoder::decode_symbol;
use crate::error::{QrError, Result};
use crate::models::{BitMatrix, DecodedSymbol};
use finder::FinderDetector;

/// Locate, rectify and decode the symbol in a binarized image
///
/// Each candidate version is tried in turn; the first grid that decodes
/// wins. Finder centers in the result are in image coordinates.
pub fn decode_binary(binary: &BitMatrix, options: &DecodeOptions) -> Result<DecodedSymbol> {
    let finders = FinderDetector::new(options).locate(binary)?;
    let mut last_error = QrError::PerspectiveCorrectionFailed;

    for version in rectifier::candidate_versions(&finders) {
        let attempt =
            rectifier::rectify(binary, &finders, version).and_then(|grid| decode_symbol(&grid));
        match attempt {
            Ok(mut symbol) => {
                symbol.finders = finders.map(|f| f.center);
                return Ok(symbol);
            }
            Err(err) => {
                log::debug!("version {version} rejected: {err}");
                last_error = err;
            }
        }
    }

    Err(last_error)
}
