/// Deinterleaving, Reed-Solomon correction and segment parsing
use crate::decoder::modes::{
    alphanumeric::AlphanumericDecoder, byte::ByteDecoder, numeric::NumericDecoder,
};
use crate::ecc::reed_solomon::ReedSolomonDecoder;
use crate::ecc::tables::ec_block_info;
use crate::encoder::error_correction::block_data_lengths;
use crate::error::{QrError, Result};
use crate::models::{ECLevel, Mode, Version};

const MODE_TERMINATOR: u32 = 0;
const MODE_ECI: u32 = 0b0111;

/// Split interleaved codewords back into blocks, correct each block and
/// return the concatenated data codewords
pub fn deinterleave_and_correct(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<u8>> {
    let info = ec_block_info(version, ec_level)?;
    if codewords.len() < info.total_codewords() {
        return Err(QrError::decode(format!(
            "{} codewords read, {} expected",
            codewords.len(),
            info.total_codewords()
        )));
    }

    let data_lengths = block_data_lengths(&info);
    let long_len = data_lengths.iter().copied().max().unwrap_or(0);
    let mut blocks: Vec<Vec<u8>> = data_lengths
        .iter()
        .map(|len| Vec::with_capacity(len + info.ecc_per_block))
        .collect();

    let mut stream = codewords.iter().copied();
    for i in 0..long_len {
        for (block, &len) in blocks.iter_mut().zip(&data_lengths) {
            if i < len {
                block.extend(stream.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(stream.next());
        }
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data = Vec::with_capacity(info.data_codewords);
    for (index, (block, &len)) in blocks.iter_mut().zip(&data_lengths).enumerate() {
        let corrected = rs
            .decode(block)
            .map_err(|e| QrError::decode(format!("block {index}: {e}")))?;
        if corrected > 0 {
            log::debug!("corrected {corrected} codewords in block {index}");
        }
        data.extend_from_slice(&block[..len]);
    }
    Ok(data)
}

/// Parse the segments in the data codewords into raw bytes and text
pub fn decode_payload(data_codewords: &[u8], version: Version) -> Result<(Vec<u8>, String)> {
    let bits: Vec<bool> = data_codewords
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect();
    decode_payload_from_bits(&bits, version)
}

/// Segment parser over an explicit bit sequence
pub fn decode_payload_from_bits(bits: &[bool], version: Version) -> Result<(Vec<u8>, String)> {
    let mut reader = BitReader::new(bits);
    let mut data = Vec::new();
    let mut content = String::new();

    while reader.remaining() >= 4 {
        let indicator = reader.read_bits(4)?;
        if indicator == MODE_TERMINATOR {
            break;
        }
        if indicator == MODE_ECI {
            // ECI designator: parse and ignore (content is read as UTF-8)
            let mut eci = reader.read_bits(8)?;
            if eci & 0x80 != 0 {
                eci = ((eci & 0x7F) << 8) | reader.read_bits(8)?;
                if eci & 0x4000 != 0 {
                    eci = ((eci & 0x3FFF) << 8) | reader.read_bits(8)?;
                }
            }
            log::trace!("ignoring ECI designator {eci}");
            continue;
        }

        let mode = Mode::from_indicator(indicator as u8)
            .ok_or_else(|| QrError::decode(format!("unsupported mode indicator {indicator:04b}")))?;
        let count = reader.read_bits(mode.char_count_bits(version))? as usize;
        let rest = reader.rest();
        let truncated = || QrError::decode(format!("{mode:?} segment of {count} truncated or invalid"));

        match mode {
            Mode::Numeric => {
                let (text, used) = NumericDecoder::decode(rest, count).ok_or_else(truncated)?;
                reader.advance(used);
                data.extend_from_slice(text.as_bytes());
                content.push_str(&text);
            }
            Mode::Alphanumeric => {
                let (text, used) = AlphanumericDecoder::decode(rest, count).ok_or_else(truncated)?;
                reader.advance(used);
                data.extend_from_slice(text.as_bytes());
                content.push_str(&text);
            }
            Mode::Byte => {
                let (text, used) = match ByteDecoder::decode(rest, count) {
                    Some(decoded) => decoded,
                    None if rest.len() < count * 8 => return Err(truncated()),
                    None => return Err(QrError::decode("byte segment is not valid UTF-8")),
                };
                reader.advance(used);
                data.extend_from_slice(text.as_bytes());
                content.push_str(&text);
            }
        }
    }

    if data.is_empty() {
        return Err(QrError::decode("symbol carries no data"));
    }
    Ok((data, content))
}

struct BitReader<'a> {
    bits: &'a [bool],
    idx: usize,
}

impl<'a> BitReader<'a> {
    fn new(bits: &'a [bool]) -> Self {
        Self { bits, idx: 0 }
    }

    fn remaining(&self) -> usize {
        self.bits.len().saturating_sub(self.idx)
    }

    fn rest(&self) -> &'a [bool] {
        &self.bits[self.idx.min(self.bits.len())..]
    }

    fn advance(&mut self, n: usize) {
        self.idx = (self.idx + n).min(self.bits.len());
    }

    fn read_bits(&mut self, n: usize) -> Result<u32> {
        if self.idx + n > self.bits.len() {
            return Err(QrError::decode("bitstream ended inside a segment header"));
        }
        let val = self.bits[self.idx..self.idx + n]
            .iter()
            .fold(0u32, |acc, &bit| (acc << 1) | bit as u32);
        self.idx += n;
        Ok(val)
    }
}
