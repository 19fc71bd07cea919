use crate::config::{DecodeOptions, RenderOptions};
use crate::error::QrError;
use crate::models::{DecodedSymbol, EncodedSymbol};
use crate::utils::render::render;
use image::GenericImageView;
use std::env;
use std::path::Path;
use thiserror::Error;

/// Failures of the file-based helpers
#[derive(Debug, Error)]
pub enum ToolError {
    /// Reading or writing the image file failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// The codec rejected the input
    #[error(transparent)]
    Codec(#[from] QrError),
    /// A pixel buffer did not match its stated dimensions
    #[error("pixel buffer does not match {width}x{height}")]
    BadBuffer {
        /// Stated width
        width: u32,
        /// Stated height
        height: u32,
    },
}

fn max_dim_from_env() -> Option<u32> {
    match env::var("QR_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image as 8-bit RGBA bytes along with its dimensions.
///
/// Gray conversion is left to the decoder so files and in-memory buffers
/// binarize identically. Images larger than `QR_MAX_DIM` on either side are
/// downscaled first.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), ToolError> {
    let img = image::open(path)?;
    let img = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => {
            img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
        }
        _ => img,
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width as usize, height as usize))
}

/// Load and decode the symbol in an image file
pub fn decode_file<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<DecodedSymbol, ToolError> {
    let (rgba, width, height) = load_rgba(path)?;
    Ok(crate::try_decode_image(&rgba, width, height, 4, options)?)
}

/// Write a gray buffer as a PNG
pub fn save_gray_png<P: AsRef<Path>>(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    path: P,
) -> Result<(), ToolError> {
    let img = image::GrayImage::from_raw(width, height, pixels)
        .ok_or(ToolError::BadBuffer { width, height })?;
    img.save(path)?;
    Ok(())
}

/// Render a symbol and write it as a PNG
pub fn save_symbol_png<P: AsRef<Path>>(
    symbol: &EncodedSymbol,
    options: &RenderOptions,
    path: P,
) -> Result<(), ToolError> {
    let (pixels, side) = render(symbol, options);
    save_gray_png(pixels, side as u32, side as u32, path)
}

/// Two characters per module, dark as full blocks, with a `margin`-module border
pub fn text_art(symbol: &EncodedSymbol, margin: usize) -> String {
    let side = symbol.size + 2 * margin;
    let mut out = String::with_capacity(side * (side * 6 + 1));
    for y in 0..side {
        for x in 0..side {
            let dark = x >= margin
                && y >= margin
                && symbol.is_dark(x - margin, y - margin);
            out.push_str(if dark { "\u{2588}\u{2588}" } else { "  " });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ECLevel;
    use std::path::PathBuf;

    #[test]
    fn test_text_art_shape() {
        let symbol = crate::encode("ART", ECLevel::L).unwrap();
        let art = text_art(&symbol, 1);
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), 23);
        assert!(lines.iter().all(|line| line.chars().count() == 46));
        assert!(lines[0].trim().is_empty());
        assert!(lines[1].starts_with("  \u{2588}\u{2588}"));
    }

    #[test]
    fn test_png_round_trip() {
        let symbol = crate::encode("PNG FILE 123", ECLevel::M).unwrap();
        let path = env::temp_dir().join(format!("qr_codec_tools_{}.png", std::process::id()));
        save_symbol_png(&symbol, &RenderOptions::with_scale(4), &path).unwrap();
        let decoded = decode_file(&path, &DecodeOptions::default());
        let _ = std::fs::remove_file(&path);
        assert_eq!(decoded.unwrap().content, "PNG FILE 123");
    }

    fn color_png(text: &str, dark: [u8; 4], light: [u8; 4], name: &str) -> (Vec<u8>, usize, PathBuf) {
        let symbol = crate::encode(text, ECLevel::M).unwrap();
        let (gray, side) = render(&symbol, &RenderOptions::with_scale(4));
        let rgba: Vec<u8> = gray
            .iter()
            .flat_map(|&g| if g == crate::utils::render::DARK { dark } else { light })
            .collect();
        let path = env::temp_dir().join(format!("qr_codec_{name}_{}.png", std::process::id()));
        image::RgbaImage::from_raw(side as u32, side as u32, rgba.clone())
            .unwrap()
            .save(&path)
            .unwrap();
        (rgba, side, path)
    }

    #[test]
    fn test_color_file_matches_buffer_decode() {
        let options = DecodeOptions::default();

        // Red on white reads the same either way
        let (rgba, side, path) = color_png("RED", [255, 0, 0, 255], [255; 4], "red");
        let from_file = decode_file(&path, &options);
        let _ = std::fs::remove_file(&path);
        let from_buffer = crate::try_decode_image(&rgba, side, side, 4, &options).unwrap();
        assert_eq!(from_file.unwrap().content, from_buffer.content);

        // Blue on green averages to one flat gray (85), while weighted luma
        // would still separate the two
        let (rgba, side, path) = color_png("FLAT", [0, 0, 255, 255], [0, 255, 0, 255], "flat");
        let from_file = decode_file(&path, &options);
        let _ = std::fs::remove_file(&path);
        let from_buffer = crate::try_decode_image(&rgba, side, side, 4, &options).unwrap_err();
        match from_file {
            Err(ToolError::Codec(err)) => assert_eq!(err, from_buffer),
            other => panic!("file decode diverged from buffer decode: {other:?}"),
        }
    }

    #[test]
    fn test_save_rejects_short_buffer() {
        let path = env::temp_dir().join("qr_codec_tools_short.png");
        assert!(matches!(
            save_gray_png(vec![0u8; 10], 21, 21, &path),
            Err(ToolError::BadBuffer { .. })
        ));
    }
}
