//! Image helpers for the decode path and for rendering
//!
//! - Grayscale conversion (unweighted RGB(A) mean)
//! - Binarization (adaptive local mean, Otsu and fixed threshold)
//! - Geometry (projective transforms)
//! - Rendering of module matrices to pixels

pub mod binarization;
pub mod geometry;
pub mod grayscale;
pub mod render;
