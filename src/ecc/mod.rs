//! Error correction coding
//!
//! - GF(256) arithmetic shared by every Reed-Solomon operation
//! - Reed-Solomon encoding and decoding of codeword blocks
//! - Per-version block tables and derived capacities
//! - BCH coding of format and version information

/// BCH(15,5) format information
pub mod format;
/// GF(256) log/exp arithmetic
pub mod galois;
/// Reed-Solomon encoder and decoder
pub mod reed_solomon;
/// ISO/IEC 18004 block tables (ECC codewords/blocks)
pub mod tables;
/// BCH(18,6) version information (versions 7+)
pub mod version_info;
