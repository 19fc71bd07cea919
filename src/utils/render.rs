/// Rasterize a module matrix into a gray pixel buffer
use crate::config::RenderOptions;
use crate::models::EncodedSymbol;

/// Pixel value of a dark module
pub const DARK: u8 = 0;
/// Pixel value of a light module or the quiet zone
pub const LIGHT: u8 = 255;

/// Row-major gray buffer and its side length in pixels
///
/// The side is `(size + 2 * margin) * scale`, the margin being at least the
/// four-module quiet zone.
pub fn render(symbol: &EncodedSymbol, options: &RenderOptions) -> (Vec<u8>, usize) {
    render_modules(&symbol.modules, options)
}

/// Same as [`render`] for a bare row-major module grid
///
/// Ragged grids are drawn on a square sized to the longer of the row count
/// and the widest row.
pub fn render_modules(modules: &[Vec<bool>], options: &RenderOptions) -> (Vec<u8>, usize) {
    let scale = options.scale.max(1);
    let margin = options.effective_margin();
    let width = modules.iter().map(Vec::len).max().unwrap_or(0);
    let size = modules.len().max(width);
    let side = (size + 2 * margin) * scale;
    let mut pixels = vec![LIGHT; side * side];

    for (my, row) in modules.iter().enumerate() {
        for (mx, _) in row.iter().enumerate().filter(|(_, dark)| **dark) {
            let px = (mx + margin) * scale;
            let py = (my + margin) * scale;
            for y in py..py + scale {
                pixels[y * side + px..y * side + px + scale].fill(DARK);
            }
        }
    }

    (pixels, side)
}
