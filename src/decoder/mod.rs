//! QR code decoding from a sampled module grid
//!
//! - Format and version information recovery
//! - Demasking and zig-zag bitstream extraction
//! - Deinterleaving with Reed-Solomon correction
//! - Segment parsing (numeric, alphanumeric, byte)

/// Bitstream extraction and demasking
pub mod bitstream;
/// Data mode decoders (numeric, alphanumeric, byte)
pub mod modes;
/// Block correction and segment parsing
pub mod payload;
/// Grid-level decode orchestration
pub mod symbol_decoder;

pub use symbol_decoder::decode_symbol;
