//! Encoder, decoder and renderer options.
//!
//! Decoder defaults can be overridden process-wide through environment
//! variables, read once on first use.

use std::sync::OnceLock;

use crate::models::{ECLevel, MaskPattern, Version};

/// Smallest quiet zone a rendered symbol gets, in modules
pub const MIN_QUIET_ZONE: usize = 4;

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Options for [`crate::encode_with_options`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Error correction level
    pub level: ECLevel,
    /// Skip penalty evaluation and apply this mask
    pub force_mask: Option<MaskPattern>,
    /// Never select a version below this one
    pub min_version: Option<Version>,
}

impl EncodeOptions {
    /// Defaults with the given level
    pub fn with_level(level: ECLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

/// Options for the image decode path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// Side of the adaptive threshold window (forced odd, at least 3)
    pub block_size: usize,
    /// Constant subtracted from the local mean
    pub threshold_offset: i32,
    /// Smallest accepted finder module size in pixels
    pub min_module_size: f32,
    /// Largest accepted finder module size in pixels
    pub max_module_size: f32,
    /// Allowed relative deviation of each run from its 1:1:3:1:1 share
    pub ratio_tolerance: f32,
    /// Candidates closer than this (pixels) are treated as one finder
    pub finder_min_distance: f32,
    /// Retry with a global Otsu threshold when adaptive binarization fails
    pub otsu_fallback: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            block_size: 11,
            threshold_offset: 2,
            min_module_size: 1.0,
            max_module_size: 50.0,
            ratio_tolerance: 0.5,
            finder_min_distance: 10.0,
            otsu_fallback: true,
        }
    }
}

static ENV_DECODE_OPTIONS: OnceLock<DecodeOptions> = OnceLock::new();

impl DecodeOptions {
    /// Defaults overridden by `QR_BLOCK_SIZE`, `QR_THRESHOLD_OFFSET`,
    /// `QR_MIN_MODULE_SIZE`, `QR_MAX_MODULE_SIZE` and `QR_RATIO_TOLERANCE`
    pub fn from_env() -> Self {
        *ENV_DECODE_OPTIONS.get_or_init(|| {
            let d = DecodeOptions::default();
            DecodeOptions {
                block_size: parse_env("QR_BLOCK_SIZE", d.block_size),
                threshold_offset: parse_env("QR_THRESHOLD_OFFSET", d.threshold_offset),
                min_module_size: parse_env("QR_MIN_MODULE_SIZE", d.min_module_size),
                max_module_size: parse_env("QR_MAX_MODULE_SIZE", d.max_module_size),
                ratio_tolerance: parse_env("QR_RATIO_TOLERANCE", d.ratio_tolerance),
                ..d
            }
        })
    }

    /// Block size actually used by the binarizer
    pub fn effective_block_size(&self) -> usize {
        self.block_size.max(3) | 1
    }
}

/// Options for [`crate::render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per module
    pub scale: usize,
    /// Quiet zone in modules; values below 4 are raised to 4
    pub margin: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 10,
            margin: MIN_QUIET_ZONE,
        }
    }
}

impl RenderOptions {
    /// Options with the given scale and the minimum quiet zone
    pub fn with_scale(scale: usize) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Margin after enforcing the minimum quiet zone
    pub fn effective_margin(&self) -> usize {
        self.margin.max(MIN_QUIET_ZONE)
    }
}
