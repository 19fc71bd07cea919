/// Block splitting, per-block Reed-Solomon coding and interleaving
use super::data_encoder::PAD_BYTES;
use crate::ecc::reed_solomon::ReedSolomonEncoder;
use crate::ecc::tables::{EcBlockInfo, ec_block_info};
use crate::error::{QrError, Result};
use crate::models::{ECLevel, Version};

/// One Reed-Solomon block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Data codewords
    pub data: Vec<u8>,
    /// ECC codewords for `data`
    pub ecc: Vec<u8>,
}

/// Lengths of each block's data part; short blocks come first
pub fn block_data_lengths(info: &EcBlockInfo) -> Vec<usize> {
    let short_len = info.data_codewords / info.num_blocks;
    let num_long = info.data_codewords % info.num_blocks;
    let num_short = info.num_blocks - num_long;
    (0..info.num_blocks)
        .map(|b| if b < num_short { short_len } else { short_len + 1 })
        .collect()
}

/// Split data into blocks and compute the ECC of each
pub fn split_into_blocks(data: &[u8], info: &EcBlockInfo) -> Result<Vec<Block>> {
    let rs = ReedSolomonEncoder::new(info.ecc_per_block)?;
    let mut offset = 0;
    let blocks = block_data_lengths(info)
        .into_iter()
        .map(|len| {
            let chunk = &data[offset..offset + len];
            offset += len;
            Block {
                data: chunk.to_vec(),
                ecc: rs.ecc(chunk),
            }
        })
        .collect();
    Ok(blocks)
}

/// Data codewords round-robin across blocks, then ECC codewords the same way
pub fn interleave(blocks: &[Block]) -> Vec<u8> {
    let max_data = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
    let max_ecc = blocks.iter().map(|b| b.ecc.len()).max().unwrap_or(0);
    let mut out = Vec::with_capacity(blocks.iter().map(|b| b.data.len() + b.ecc.len()).sum());
    for i in 0..max_data {
        out.extend(blocks.iter().filter_map(|b| b.data.get(i)));
    }
    for i in 0..max_ecc {
        out.extend(blocks.iter().filter_map(|b| b.ecc.get(i)));
    }
    out
}

/// Final codeword sequence for placement
///
/// Short data is padded with alternating 0xEC/0x11; data longer than the
/// version/level capacity is rejected.
pub fn add_error_correction(data: &[u8], version: Version, level: ECLevel) -> Result<Vec<u8>> {
    let info = ec_block_info(version, level)?;
    if data.len() > info.data_codewords {
        return Err(QrError::DataTooLarge {
            length: data.len(),
            level,
        });
    }
    let mut padded = data.to_vec();
    padded.extend(PAD_BYTES.iter().cycle().take(info.data_codewords - data.len()));

    if info.num_blocks == 1 {
        return Ok(ReedSolomonEncoder::new(info.ecc_per_block)?.encode(&padded));
    }
    let blocks = split_into_blocks(&padded, &info)?;
    Ok(interleave(&blocks))
}
