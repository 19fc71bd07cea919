//! Error taxonomy shared by the encoder and the decoder.

use thiserror::Error;

use crate::models::ECLevel;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QrError>;

/// Every failure the codec can report.
///
/// Encode-side errors are surfaced to the caller. Decode-side errors are
/// folded into `None` by the public `decode*` functions; the `try_decode*`
/// variants return them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// Input text is empty or longer than the absolute maximum.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Input does not fit any supported version at the requested level.
    #[error("data too large: {length} units do not fit version 15 at level {level:?}")]
    DataTooLarge {
        /// Length in mode units (characters or UTF-8 bytes).
        length: usize,
        /// Requested error correction level.
        level: ECLevel,
    },

    /// Version/level pair absent from the block tables.
    #[error("unsupported parameters: version {version}, level {level:?}")]
    UnsupportedParameters {
        /// Requested version number.
        version: u8,
        /// Requested error correction level.
        level: ECLevel,
    },

    /// GF(256) division with a zero divisor.
    #[error("division by zero in GF(256)")]
    DivisionByZero,

    /// GF(256) inverse or logarithm of zero.
    #[error("invalid operand: zero has no inverse or logarithm in GF(256)")]
    InvalidOperand,

    /// Mask index outside 0..=7.
    #[error("invalid mask pattern {0}")]
    InvalidMask(u8),

    /// Pixel buffer is malformed or too small to hold a symbol.
    #[error("invalid image: {reason}")]
    InvalidImage {
        /// Why the image was rejected.
        reason: String,
    },

    /// Fewer than three usable finder patterns.
    #[error("finder patterns not found: {found} of 3 located")]
    FinderPatternNotFound {
        /// Number of distinct candidates that survived filtering.
        found: usize,
    },

    /// The sampled grid failed the structural quality checks.
    #[error("perspective correction failed")]
    PerspectiveCorrectionFailed,

    /// Format info, error correction or payload parsing failed.
    #[error("data decode error: {reason}")]
    DataDecodeError {
        /// Which stage rejected the symbol.
        reason: String,
    },
}

impl QrError {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        QrError::DataDecodeError {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        QrError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        QrError::InvalidImage {
            reason: reason.into(),
        }
    }
}
