//! Integration tests for encode -> render -> decode round trips
//!
//! Symbols are rendered to ideal gray images, optionally warped, and read
//! back through the public image decode path.

use qr_codec::ecc::format::FormatInfo;
use qr_codec::ecc::tables::{ec_block_info, num_raw_data_modules};
use qr_codec::encoder::data_encoder::encode_data;
use qr_codec::utils::geometry::PerspectiveTransform;
use qr_codec::utils::render::LIGHT;
use qr_codec::{
    DecodeOptions, ECLevel, EncodeOptions, MaskPattern, Mode, Point, QrError, RenderOptions,
    Version, decode, decode_image, decode_modules, encode, encode_with_options, render,
    try_decode_image,
};

fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

fn rendered(text: &str, level: ECLevel, scale: usize) -> (Vec<u8>, usize) {
    let symbol = encode(text, level).unwrap();
    render(&symbol, &RenderOptions::with_scale(scale))
}

/// Resample `gray` so that its corners land on `corners` (tl, tr, br, bl)
fn warp(gray: &[u8], side: usize, corners: [Point; 4]) -> Vec<u8> {
    let s = side as f64;
    let square = [
        Point::new(0.0, 0.0),
        Point::new(s, 0.0),
        Point::new(s, s),
        Point::new(0.0, s),
    ];
    let inverse = PerspectiveTransform::from_points(&corners, &square).unwrap();
    let mut out = vec![LIGHT; side * side];
    for y in 0..side {
        for x in 0..side {
            let target = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if let Some(src) = inverse.transform(&target) {
                if src.x >= 0.0 && src.y >= 0.0 && src.x < s && src.y < s {
                    out[y * side + x] = gray[src.y as usize * side + src.x as usize];
                }
            }
        }
    }
    out
}

fn rotate(gray: &[u8], side: usize, degrees: f64) -> Vec<u8> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let c = side as f64 / 2.0;
    let corner = |x: f64, y: f64| {
        let (dx, dy) = (x - c, y - c);
        Point::new(c + dx * cos - dy * sin, c + dx * sin + dy * cos)
    };
    let s = side as f64;
    warp(
        gray,
        side,
        [corner(0.0, 0.0), corner(s, 0.0), corner(s, s), corner(0.0, s)],
    )
}

#[test]
fn test_round_trip_all_levels() {
    let texts = [
        "01234567890123",
        "HELLO WORLD",
        "Mixed case, punctuation & symbols!",
        "h\u{e9}llo w\u{f6}rld \u{2713}",
    ];
    for level in ECLevel::ALL {
        for text in texts {
            let (pixels, side) = rendered(text, level, 4);
            let decoded = decode_image(&pixels, side, side, 1, &DecodeOptions::default());
            assert_eq!(decoded.as_deref(), Some(text), "level {:?}", level);
        }
    }
}

#[test]
fn test_round_trip_scales() {
    for scale in [2, 3, 5, 7, 12] {
        let (pixels, side) = rendered("SCALE TEST 99", ECLevel::M, scale);
        assert_eq!(
            decode(&pixels, side, side).as_deref(),
            Some("SCALE TEST 99"),
            "scale {}",
            scale
        );
    }
}

#[test]
fn test_round_trip_pinned_versions() {
    for number in [1u8, 4, 7, 10, 15] {
        let options = EncodeOptions {
            level: ECLevel::L,
            force_mask: None,
            min_version: Version::new(number),
        };
        let symbol = encode_with_options("VERSION PIN", &options).unwrap();
        assert_eq!(symbol.version.number(), number);
        let (pixels, side) = render(&symbol, &RenderOptions::with_scale(3));
        let result = try_decode_image(&pixels, side, side, 1, &DecodeOptions::default()).unwrap();
        assert_eq!(result.content, "VERSION PIN");
        assert_eq!(result.version.number(), number);
    }
}

#[test]
fn test_round_trip_color_channels() {
    let (gray, side) = rendered("RGB", ECLevel::Q, 4);
    let rgb: Vec<u8> = gray.iter().flat_map(|&g| [g, g, g]).collect();
    let rgba: Vec<u8> = gray.iter().flat_map(|&g| [g, g, g, 255]).collect();
    let options = DecodeOptions::default();
    assert_eq!(decode_image(&rgb, side, side, 3, &options).as_deref(), Some("RGB"));
    assert_eq!(decode_image(&rgba, side, side, 4, &options).as_deref(), Some("RGB"));
}

#[test]
fn test_decoded_metadata() {
    let options = EncodeOptions {
        level: ECLevel::H,
        force_mask: Some(MaskPattern::Pattern3),
        min_version: None,
    };
    let symbol = encode_with_options("METADATA", &options).unwrap();
    let (pixels, side) = render(&symbol, &RenderOptions::with_scale(6));
    let result = try_decode_image(&pixels, side, side, 1, &DecodeOptions::default()).unwrap();
    assert_eq!(result.error_correction, ECLevel::H);
    assert_eq!(result.mask_pattern, MaskPattern::Pattern3);
    assert_eq!(result.version, symbol.version);
    assert_eq!(result.data, b"METADATA");

    // top-left finder center: (4 + 3.5) modules at 6 px
    let tl = result.finders[0];
    assert!((tl.x - 45.0).abs() < 2.0 && (tl.y - 45.0).abs() < 2.0);
}

#[test]
fn test_small_rotation() {
    let (pixels, side) = rendered("ROTATED", ECLevel::H, 8);
    for degrees in [-4.0, 3.0] {
        let rotated = rotate(&pixels, side, degrees);
        assert_eq!(
            decode(&rotated, side, side).as_deref(),
            Some("ROTATED"),
            "{} degrees",
            degrees
        );
    }
}

#[test]
fn test_mild_perspective() {
    let (pixels, side) = rendered("WARP", ECLevel::H, 8);
    let s = side as f64;
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(s, 2.0),
        Point::new(s - 1.0, s + 1.0),
        Point::new(1.0, s - 1.0),
    ];
    let warped = warp(&pixels, side, corners);
    assert_eq!(decode(&warped, side, side).as_deref(), Some("WARP"));
}

#[test]
fn test_survives_damage_at_level_h() {
    let symbol = encode("DAMAGE CONTROL", ECLevel::H).unwrap();
    let scale = 5;
    let (mut pixels, side) = render(&symbol, &RenderOptions::with_scale(scale));
    // wipe a 3x3 module patch in the bottom-right data region
    let start = (4 + symbol.size - 6) * scale;
    for y in start..start + 3 * scale {
        for x in start..start + 3 * scale {
            pixels[y * side + x] = LIGHT;
        }
    }
    assert_eq!(decode(&pixels, side, side).as_deref(), Some("DAMAGE CONTROL"));
}

#[test]
fn test_uniform_images_decode_to_none() {
    for value in [0u8, 128, 255] {
        let pixels = vec![value; 100 * 100];
        assert_eq!(decode(&pixels, 100, 100), None);
    }
    let white = vec![255u8; 64 * 64];
    assert_eq!(
        try_decode_image(&white, 64, 64, 1, &DecodeOptions::default()).unwrap_err(),
        QrError::FinderPatternNotFound { found: 0 }
    );
}

#[test]
fn test_invalid_images() {
    let options = DecodeOptions::default();
    let cases: [(&[u8], usize, usize, usize); 3] = [
        (&[0u8; 10 * 10], 10, 10, 1),
        (&[0u8; 30 * 30 * 2], 30, 30, 2),
        (&[0u8; 100], 30, 30, 3),
    ];
    for (pixels, width, height, channels) in cases {
        let err = try_decode_image(pixels, width, height, channels, &options).unwrap_err();
        assert!(matches!(err, QrError::InvalidImage { .. }), "{:?}", err);
        assert_eq!(decode_image(pixels, width, height, channels, &options), None);
    }
}

#[test]
fn test_hello_world_scenario() {
    let symbol = encode("HELLO WORLD", ECLevel::M).unwrap();
    assert_eq!(symbol.mode, Mode::Alphanumeric);
    assert_eq!(symbol.version.number(), 1);
    assert_eq!(symbol.size, 21);

    let bits = encode_data("HELLO WORLD", Mode::Alphanumeric, symbol.version).unwrap();
    let bits = bits_to_string(bits.bits());
    assert!(bits.starts_with("0010"));
    // count 11 in 9 bits, then "HE" = 17 * 45 + 14 = 779
    assert_eq!(&bits[4..13], "000001011");
    assert_eq!(&bits[13..24], "01100001011");
    assert_eq!(decode_modules(&symbol.modules).as_deref(), Some("HELLO WORLD"));
}

#[test]
fn test_numeric_scenario() {
    let symbol = encode("12345", ECLevel::M).unwrap();
    assert_eq!(symbol.mode, Mode::Numeric);

    let bits = encode_data("12345", Mode::Numeric, symbol.version).unwrap();
    let bits = bits_to_string(bits.bits());
    assert_eq!(bits, format!("{}{}{}{}", "0001", "0000000101", "0001111011", "0101101"));
    assert_eq!(decode_modules(&symbol.modules).as_deref(), Some("12345"));
}

#[test]
fn test_size_and_codeword_tables() {
    for version in Version::all() {
        let size = version.size();
        assert_eq!(size, 21 + 4 * (version.number() as usize - 1));
        for level in ECLevel::ALL {
            let info = ec_block_info(version, level).unwrap();
            assert_eq!(info.total_codewords(), num_raw_data_modules(version) / 8);
            assert!(info.ecc_per_block >= 2);
        }
    }
}

#[test]
fn test_format_info_all_combinations() {
    for level in ECLevel::ALL {
        for mask in MaskPattern::ALL {
            let info = FormatInfo::new(level, mask);
            assert_eq!(FormatInfo::decode(info.encode()), Some(info));
        }
    }
}

#[test]
fn test_encode_errors() {
    assert!(matches!(encode("", ECLevel::M), Err(QrError::InvalidInput { .. })));
    assert!(matches!(
        encode(&"a".repeat(1000), ECLevel::H),
        Err(QrError::DataTooLarge { level: ECLevel::H, .. })
    ));
    assert!(matches!(
        encode(&"1".repeat(3000), ECLevel::L),
        Err(QrError::InvalidInput { .. })
    ));
}
