//! Property tests for the codec invariants

use proptest::prelude::*;
use qr_codec::ecc::galois::Gf256;
use qr_codec::ecc::reed_solomon::{ReedSolomonDecoder, encode as rs_encode};
use qr_codec::encoder::data_encoder::encode_text;
use qr_codec::encoder::error_correction::add_error_correction;
use qr_codec::encoder::mask::{apply_mask, evaluate_mask, find_best_mask};
use qr_codec::encoder::matrix_builder::{build_function_patterns, generate_modules};
use qr_codec::{
    DecodeOptions, ECLevel, MaskPattern, RenderOptions, Version, decode_image, decode_modules,
    encode, render,
};

fn level() -> impl Strategy<Value = ECLevel> {
    prop::sample::select(ECLevel::ALL.to_vec())
}

fn mask() -> impl Strategy<Value = MaskPattern> {
    prop::sample::select(MaskPattern::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_module_round_trip(text in "[ -~]{1,80}", level in level()) {
        let symbol = encode(&text, level).unwrap();
        prop_assert_eq!(symbol.size, symbol.version.size());
        prop_assert_eq!(decode_modules(&symbol.modules), Some(text));
    }

    #[test]
    fn prop_numeric_and_unicode_round_trip(
        digits in "[0-9]{1,200}",
        words in "\\PC{1,20}",
    ) {
        for text in [digits, words] {
            let symbol = encode(&text, ECLevel::M).unwrap();
            prop_assert_eq!(decode_modules(&symbol.modules), Some(text));
        }
    }

    #[test]
    fn prop_mask_is_self_inverse(version in 1u8..=15, mask in mask(), seed in any::<u64>()) {
        let version = Version::new(version).unwrap();
        let mut matrix = build_function_patterns(version);
        let size = matrix.size();
        let mut state = seed | 1;
        for y in 0..size {
            for x in 0..size {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                if !matrix.is_reserved(x, y) {
                    matrix.set(x, y, state & 1 == 1);
                }
            }
        }
        let twice = apply_mask(&apply_mask(&matrix, mask), mask);
        prop_assert_eq!(twice.modules(), matrix.modules());
    }

    #[test]
    fn prop_best_mask_is_minimal(text in "[A-Z0-9 ]{1,40}") {
        let data = encode_text(&text, ECLevel::L, Version::MIN).unwrap();
        let codewords = add_error_correction(&data.codewords, data.version, ECLevel::L).unwrap();
        let base = generate_modules(&codewords, data.version);
        let (best, penalty) = find_best_mask(&base);
        for candidate in MaskPattern::ALL {
            let score = evaluate_mask(apply_mask(&base, candidate).modules()).total();
            prop_assert!(penalty <= score, "{:?} beat {:?}", candidate, best);
        }
    }

    #[test]
    fn prop_reed_solomon_is_systematic(
        data in prop::collection::vec(any::<u8>(), 1..100),
        ecc in 2usize..=30,
    ) {
        let codeword = rs_encode(&data, ecc).unwrap();
        prop_assert_eq!(codeword.len(), data.len() + ecc);
        prop_assert_eq!(&codeword[..data.len()], &data[..]);
    }

    #[test]
    fn prop_reed_solomon_corrects_half_ecc(
        data in prop::collection::vec(any::<u8>(), 10..60),
        errors in prop::collection::vec((any::<prop::sample::Index>(), 1u8..=255), 0..=5),
    ) {
        let ecc = 10;
        let sent = rs_encode(&data, ecc).unwrap();
        let mut received = sent.clone();
        let mut touched = Vec::new();
        for (index, flip) in errors {
            let i = index.index(received.len());
            if !touched.contains(&i) {
                touched.push(i);
                received[i] ^= flip;
            }
        }
        let corrected = ReedSolomonDecoder::new(ecc).decode(&mut received).unwrap();
        prop_assert_eq!(corrected, touched.len());
        prop_assert_eq!(received, sent);
    }

    #[test]
    fn prop_gf_exp_log(x in 1u8..=255) {
        prop_assert_eq!(Gf256::exp(Gf256::log(x).unwrap() as usize), x);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_image_round_trip(text in "[a-zA-Z0-9 ]{1,30}", level in level(), scale in 3usize..=6) {
        let symbol = encode(&text, level).unwrap();
        let (pixels, side) = render(&symbol, &RenderOptions::with_scale(scale));
        let decoded = decode_image(&pixels, side, side, 1, &DecodeOptions::default());
        prop_assert_eq!(decoded, Some(text));
    }
}
