use super::version::{ECBlocks, Version};
use crate::common::ec::{Block, ReedSolomonDecoder, ReedSolomonEncoder};
use crate::common::error::{CodecError, CodecResult};
use crate::common::galois::QR_FIELD;
use crate::common::metadata::ECLevel;

// Interleave order
//------------------------------------------------------------------------------

// (block, offset within block) of every codeword in stream order. Data columns
// of the short length run across all blocks, the extra data column only across
// the long blocks, then ec columns across all blocks.
fn interleave_order(ecb: &ECBlocks) -> Vec<(usize, usize)> {
    let sizes = ecb.block_sizes();
    let num_blocks = sizes.len();
    let short_dlen = sizes[0];
    let long_start = sizes.iter().position(|&s| s != short_dlen).unwrap_or(num_blocks);
    let ec_len = ecb.ec_per_block;

    let mut order = Vec::with_capacity(ecb.total_codewords());
    for i in 0..short_dlen {
        order.extend((0..num_blocks).map(|j| (j, i)));
    }
    order.extend((long_start..num_blocks).map(|j| (j, short_dlen)));
    for i in short_dlen..short_dlen + ec_len {
        order.extend((0..num_blocks).map(|j| (j, if j < long_start { i } else { i + 1 })));
    }
    order
}

// Encoding
//------------------------------------------------------------------------------

// Splits data codewords into blocks, shorter blocks first
pub fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> CodecResult<Vec<&[u8]>> {
    let ecb = version.ec_blocks(ec_level);
    if data.len() != ecb.data_codewords() {
        return Err(CodecError::CodewordCountMismatch);
    }

    let mut res = Vec::with_capacity(ecb.num_blocks());
    let mut rest = data;
    for size in ecb.block_sizes() {
        let (head, tail) = rest.split_at(size);
        res.push(head);
        rest = tail;
    }
    Ok(res)
}

// Blocks with their ec codewords appended
pub fn encode_blocks(data: &[u8], version: Version, ec_level: ECLevel) -> CodecResult<Vec<Block>> {
    let ec_len = version.ec_blocks(ec_level).ec_per_block;
    let mut encoder = ReedSolomonEncoder::new(&QR_FIELD);
    blockify(data, version, ec_level)?
        .into_iter()
        .map(|b| Block::new(b, ec_len, &mut encoder))
        .collect()
}

// Final codeword sequence for placement
pub fn interleave(blocks: &[Block], version: Version, ec_level: ECLevel) -> CodecResult<Vec<u8>> {
    let ecb = version.ec_blocks(ec_level);
    let sizes = ecb.block_sizes();
    let matches_layout = blocks.len() == sizes.len()
        && blocks
            .iter()
            .zip(sizes.iter())
            .all(|(b, &s)| b.data_len() == s && b.ec_len() == ecb.ec_per_block);
    if !matches_layout {
        return Err(CodecError::CodewordCountMismatch);
    }

    Ok(interleave_order(ecb).into_iter().map(|(j, i)| blocks[j].full()[i]).collect())
}

// Decoding
//------------------------------------------------------------------------------

// Inverse of interleave: raw codewords read off the symbol back into blocks
pub fn deinterleave(raw: &[u8], version: Version, ec_level: ECLevel) -> CodecResult<Vec<Block>> {
    let ecb = version.ec_blocks(ec_level);
    if raw.len() != ecb.total_codewords() {
        return Err(CodecError::CodewordCountMismatch);
    }

    let sizes = ecb.block_sizes();
    let mut buffers: Vec<Vec<u8>> =
        sizes.iter().map(|&s| vec![0; s + ecb.ec_per_block]).collect();
    for (&(j, i), &cw) in interleave_order(ecb).iter().zip(raw.iter()) {
        buffers[j][i] = cw;
    }

    Ok(buffers.iter().zip(sizes).map(|(buf, dlen)| Block::with_encoded(buf, dlen)).collect())
}

// Corrects every block and concatenates the data codewords. Returns the data
// and the number of codewords corrected.
pub fn rectify_blocks(blocks: &mut [Block]) -> CodecResult<(Vec<u8>, usize)> {
    let decoder = ReedSolomonDecoder::new(&QR_FIELD);
    let mut data = Vec::with_capacity(blocks.iter().map(|b| b.data_len()).sum());
    let mut corrected = 0;
    for (i, blk) in blocks.iter_mut().enumerate() {
        let n = blk.rectify(&decoder)?;
        if n > 0 {
            crate::debug_log!("QR block {i}: corrected {n} codewords");
        }
        corrected += n;
        data.extend_from_slice(blk.data());
    }
    Ok((data, corrected))
}

#[cfg(test)]
mod blocks_tests {
    use super::{blockify, deinterleave, encode_blocks, interleave, interleave_order, rectify_blocks};
    use crate::common::error::CodecError;
    use crate::common::metadata::ECLevel;
    use crate::qr::version::Version;

    #[test]
    fn test_blockify() {
        let data: Vec<u8> = (0..62).collect();
        let blocks = blockify(&data, Version::new(5).unwrap(), ECLevel::Q).unwrap();
        let lens: Vec<usize> = blocks.iter().map(|b| b.len()).collect();
        assert_eq!(lens, vec![15, 15, 16, 16]);
        assert_eq!(blocks[2][0], 30);
    }

    #[test]
    fn test_add_ec_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let expected_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let blocks = encode_blocks(msg, Version::new(5).unwrap(), ECLevel::Q).unwrap();
        for (blk, exp) in blocks.iter().zip(expected_ec.iter()) {
            assert_eq!(blk.ecc(), &exp[..]);
        }
    }

    #[test]
    fn test_interleave_order_short_then_long() {
        let ecb = Version::new(5).unwrap().ec_blocks(ECLevel::Q);
        let order = interleave_order(ecb);
        assert_eq!(order.len(), 134);
        assert_eq!(&order[..5], &[(0, 0), (1, 0), (2, 0), (3, 0), (0, 1)]);
        // Extra data column only in the two long blocks
        assert_eq!(&order[60..62], &[(2, 15), (3, 15)]);
        // First ec column
        assert_eq!(&order[62..66], &[(0, 15), (1, 15), (2, 16), (3, 16)]);
        assert_eq!(order[133], (3, 33));
    }

    #[test]
    fn test_interleave_round_trip() {
        for ver in Version::all() {
            for ecl in ECLevel::ALL {
                let n = ver.data_codewords(ecl);
                let data: Vec<u8> = (0..n).map(|i| (i * 7 % 256) as u8).collect();
                let blocks = encode_blocks(&data, ver, ecl).unwrap();
                let raw = interleave(&blocks, ver, ecl).unwrap();
                assert_eq!(raw.len(), ver.total_codewords());

                let mut back = deinterleave(&raw, ver, ecl).unwrap();
                assert_eq!(back, blocks);
                let (merged, corrected) = rectify_blocks(&mut back).unwrap();
                assert_eq!(merged, data);
                assert_eq!(corrected, 0);
            }
        }
    }

    #[test]
    fn test_burst_spread_across_blocks() {
        let ver = Version::new(10).unwrap();
        let ecl = ECLevel::H;
        let n = ver.data_codewords(ecl);
        let data: Vec<u8> = (0..n).map(|i| (i * 13 % 251) as u8).collect();
        let mut raw = interleave(&encode_blocks(&data, ver, ecl).unwrap(), ver, ecl).unwrap();

        // 8 blocks with 14 correctable each: a 60 codeword burst is recoverable
        for cw in raw[100..160].iter_mut() {
            *cw ^= 0xA5;
        }
        let mut blocks = deinterleave(&raw, ver, ecl).unwrap();
        let (merged, corrected) = rectify_blocks(&mut blocks).unwrap();
        assert_eq!(merged, data);
        assert_eq!(corrected, 60);
    }

    #[test]
    fn test_count_mismatch() {
        let ver = Version::new(1).unwrap();
        assert_eq!(deinterleave(&[0; 25], ver, ECLevel::L), Err(CodecError::CodewordCountMismatch));
        assert_eq!(blockify(&[0; 20], ver, ECLevel::L), Err(CodecError::CodewordCountMismatch));
    }
}
