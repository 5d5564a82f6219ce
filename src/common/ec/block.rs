use super::{ReedSolomonDecoder, ReedSolomonEncoder};
use crate::common::error::CodecResult;

// Codeword block: data codewords followed by their ec codewords
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Block {
    data: Vec<u8>,
    // Data length
    dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], ec_len: usize, encoder: &mut ReedSolomonEncoder) -> CodecResult<Self> {
        let data = encoder.encode(raw, ec_len)?;
        Ok(Self { data, dlen: raw.len() })
    }

    pub fn with_encoded(encoded: &[u8], dlen: usize) -> Self {
        debug_assert!(dlen <= encoded.len(), "Data length exceeds block length");
        Self { data: encoded.to_vec(), dlen }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn ec_len(&self) -> usize {
        self.data.len() - self.dlen
    }

    pub fn data_len(&self) -> usize {
        self.dlen
    }

    pub fn full(&self) -> &[u8] {
        &self.data
    }

    pub fn full_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..]
    }

    // Corrects the block in place, returns the number of codewords fixed
    pub fn rectify(&mut self, decoder: &ReedSolomonDecoder) -> CodecResult<usize> {
        let ec_len = self.ec_len();
        decoder.decode(&mut self.data, ec_len)
    }
}

// Error correction blocks
//------------------------------------------------------------------------------

// Block layout for one version and ec level. Groups are (block count, data
// codewords per block) in stream order.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ECBlocks {
    pub ec_per_block: usize,
    pub groups: &'static [(usize, usize)],
}

impl ECBlocks {
    pub const fn num_blocks(&self) -> usize {
        let mut n = 0;
        let mut i = 0;
        while i < self.groups.len() {
            n += self.groups[i].0;
            i += 1;
        }
        n
    }

    pub const fn data_codewords(&self) -> usize {
        let mut n = 0;
        let mut i = 0;
        while i < self.groups.len() {
            n += self.groups[i].0 * self.groups[i].1;
            i += 1;
        }
        n
    }

    pub const fn total_codewords(&self) -> usize {
        self.data_codewords() + self.num_blocks() * self.ec_per_block
    }

    pub const fn ec_codewords(&self) -> usize {
        self.num_blocks() * self.ec_per_block
    }

    // Data codeword count of each block in order
    pub fn block_sizes(&self) -> Vec<usize> {
        self.groups.iter().flat_map(|&(count, dlen)| std::iter::repeat(dlen).take(count)).collect()
    }
}
