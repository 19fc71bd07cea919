/// Mode classification, version selection and bit packing of the payload
use super::bit_buffer::BitBuffer;
use crate::decoder::modes::alphanumeric::alphanumeric_index;
use crate::ecc::tables::{capacity, num_data_codewords};
use crate::error::{QrError, Result};
use crate::models::{ECLevel, Mode, Version};

/// Longest input accepted, in characters
pub const MAX_INPUT_LENGTH: usize = 2900;

/// Alternating filler codewords after the terminator
pub(crate) const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Reject empty input and input above [`MAX_INPUT_LENGTH`]
pub fn validate_input(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(QrError::invalid_input("text is empty"));
    }
    let length = text.chars().count();
    if length > MAX_INPUT_LENGTH {
        return Err(QrError::invalid_input(format!(
            "text has {length} characters, maximum is {MAX_INPUT_LENGTH}"
        )));
    }
    Ok(())
}

/// Densest mode able to represent every character of `text`
pub fn detect_mode(text: &str) -> Mode {
    if text.chars().all(|c| c.is_ascii_digit()) {
        Mode::Numeric
    } else if text.chars().all(|c| alphanumeric_index(c).is_some()) {
        Mode::Alphanumeric
    } else {
        Mode::Byte
    }
}

/// Length in mode units: characters, or UTF-8 bytes for Byte mode
pub fn segment_length(text: &str, mode: Mode) -> usize {
    match mode {
        Mode::Byte => text.len(),
        Mode::Numeric | Mode::Alphanumeric => text.chars().count(),
    }
}

/// Smallest version whose capacity holds `text`
pub fn determine_version(text: &str, mode: Mode, level: ECLevel) -> Result<Version> {
    determine_version_from(text, mode, level, Version::MIN)
}

/// Smallest version no lower than `min` whose capacity holds `text`
pub fn determine_version_from(
    text: &str,
    mode: Mode,
    level: ECLevel,
    min: Version,
) -> Result<Version> {
    let length = segment_length(text, mode);
    for version in Version::all().filter(|v| *v >= min) {
        if capacity(version, level, mode)? >= length {
            return Ok(version);
        }
    }
    Err(QrError::DataTooLarge { length, level })
}

/// Mode indicator, character count and packed payload
pub fn encode_data(text: &str, mode: Mode, version: Version) -> Result<BitBuffer> {
    let mut buffer = BitBuffer::new();
    buffer.append_bits(mode.indicator() as u32, 4);
    buffer.append_bits(
        segment_length(text, mode) as u32,
        mode.char_count_bits(version),
    );

    match mode {
        Mode::Numeric => {
            for group in text.as_bytes().chunks(3) {
                let value = group.iter().try_fold(0u32, |acc, &b| {
                    if b.is_ascii_digit() {
                        Ok(acc * 10 + (b - b'0') as u32)
                    } else {
                        Err(QrError::invalid_input("non-digit in numeric segment"))
                    }
                })?;
                // 3 digits -> 10 bits, 2 -> 7, 1 -> 4
                buffer.append_bits(value, group.len() * 3 + 1);
            }
        }
        Mode::Alphanumeric => {
            let indices = text
                .chars()
                .map(|c| {
                    alphanumeric_index(c).ok_or_else(|| {
                        QrError::invalid_input(format!("'{c}' is not alphanumeric"))
                    })
                })
                .collect::<Result<Vec<u32>>>()?;
            for pair in indices.chunks(2) {
                match pair {
                    [a, b] => buffer.append_bits(a * 45 + b, 11),
                    [a] => buffer.append_bits(*a, 6),
                    _ => {}
                }
            }
        }
        Mode::Byte => {
            for &byte in text.as_bytes() {
                buffer.append_bits(byte as u32, 8);
            }
        }
    }

    Ok(buffer)
}

/// Terminate, byte-align and pad the stream to exactly `data_codewords` bytes
pub fn add_padding(mut buffer: BitBuffer, data_codewords: usize) -> Result<Vec<u8>> {
    let capacity_bits = data_codewords * 8;
    if buffer.len() > capacity_bits {
        return Err(QrError::invalid_input(format!(
            "{} data bits exceed {capacity_bits} available",
            buffer.len()
        )));
    }

    let terminator = (capacity_bits - buffer.len()).min(4);
    buffer.append_bits(0, terminator);
    let alignment = (8 - buffer.len() % 8) % 8;
    buffer.append_bits(0, alignment);

    let mut bytes = buffer.to_bytes();
    let remaining = data_codewords - bytes.len();
    bytes.extend(PAD_BYTES.iter().cycle().take(remaining));
    Ok(bytes)
}

/// Chosen mode and version plus the padded data codewords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedData {
    /// Segment mode
    pub mode: Mode,
    /// Selected version
    pub version: Version,
    /// Data codewords, padded to the version/level capacity
    pub codewords: Vec<u8>,
}

/// Validate, classify, size and pack `text`
pub fn encode_text(text: &str, level: ECLevel, min_version: Version) -> Result<EncodedData> {
    validate_input(text)?;
    let mode = detect_mode(text);
    let version = determine_version_from(text, mode, level, min_version)?;
    let bits = encode_data(text, mode, version)?;
    let codewords = add_padding(bits, num_data_codewords(version, level)?)?;
    log::debug!(
        "packed {} units as {:?} into version {} ({} codewords)",
        segment_length(text, mode),
        mode,
        version,
        codewords.len()
    );
    Ok(EncodedData {
        mode,
        version,
        codewords,
    })
}
