use super::version::Version;
use crate::common::ec::{Block, ReedSolomonDecoder, ReedSolomonEncoder};
use crate::common::error::{CodecError, CodecResult};
use crate::common::galois::DATA_MATRIX_FIELD;

// Version 24 has 8 blocks of 156 and 2 of 155 data codewords
const SPECIAL_VERSION: u8 = 24;
const SPECIAL_LONG_BLOCKS: usize = 8;

// Interleave order
//------------------------------------------------------------------------------

// (block, offset) of every codeword in stream order. Blocks take codewords
// round robin. In version 24 the ec columns start at block 8 and the two short
// blocks sit one position earlier.
fn interleave_order(version: Version) -> Vec<(usize, usize)> {
    let ecb = version.ec_blocks();
    let sizes = ecb.block_sizes();
    let n = sizes.len();
    let long_dlen = sizes[0];
    let special = *version == SPECIAL_VERSION;
    let num_long = if special { SPECIAL_LONG_BLOCKS } else { n };

    let mut order = Vec::with_capacity(ecb.total_codewords());
    for i in 0..long_dlen - 1 {
        order.extend((0..n).map(|j| (j, i)));
    }
    order.extend((0..num_long).map(|j| (j, long_dlen - 1)));
    for i in long_dlen..long_dlen + ecb.ec_per_block {
        for j in 0..n {
            let jo = if special { (j + SPECIAL_LONG_BLOCKS) % n } else { j };
            let io = if special && jo >= SPECIAL_LONG_BLOCKS { i - 1 } else { i };
            order.push((jo, io));
        }
    }
    order
}

// Encoding
//------------------------------------------------------------------------------

// Data codewords plus ec, interleaved for placement
pub fn encode_blocks(data: &[u8], version: Version) -> CodecResult<Vec<u8>> {
    let ecb = version.ec_blocks();
    if data.len() != ecb.data_codewords() {
        return Err(CodecError::CodewordCountMismatch);
    }

    // Data codewords are dealt to blocks round robin too
    let order = interleave_order(version);
    let mut split: Vec<Vec<u8>> = ecb.block_sizes().iter().map(|&s| Vec::with_capacity(s)).collect();
    for (&cw, &(j, i)) in data.iter().zip(order.iter()) {
        debug_assert_eq!(split[j].len(), i, "Data codewords dealt out of order");
        split[j].push(cw);
    }

    let mut encoder = ReedSolomonEncoder::new(&DATA_MATRIX_FIELD);
    let blocks = split
        .iter()
        .map(|b| Block::new(b, ecb.ec_per_block, &mut encoder))
        .collect::<CodecResult<Vec<_>>>()?;
    Ok(order.into_iter().map(|(j, i)| blocks[j].full()[i]).collect())
}

// Decoding
//------------------------------------------------------------------------------

pub fn deinterleave(raw: &[u8], version: Version) -> CodecResult<Vec<Block>> {
    let ecb = version.ec_blocks();
    if raw.len() != ecb.total_codewords() {
        return Err(CodecError::CodewordCountMismatch);
    }

    let sizes = ecb.block_sizes();
    let mut buffers: Vec<Vec<u8>> = sizes.iter().map(|&s| vec![0; s + ecb.ec_per_block]).collect();
    for (&(j, i), &cw) in interleave_order(version).iter().zip(raw.iter()) {
        buffers[j][i] = cw;
    }
    Ok(buffers.iter().zip(sizes).map(|(buf, dlen)| Block::with_encoded(buf, dlen)).collect())
}

// Corrects every block and joins the data codewords back into stream order.
// Returns the data and the number of codewords corrected.
pub fn rectify_blocks(blocks: &mut [Block], version: Version) -> CodecResult<(Vec<u8>, usize)> {
    let decoder = ReedSolomonDecoder::new(&DATA_MATRIX_FIELD);
    let mut corrected = 0;
    for (i, blk) in blocks.iter_mut().enumerate() {
        let n = blk.rectify(&decoder)?;
        if n > 0 {
            crate::debug_log!("Data Matrix block {i}: corrected {n} codewords");
        }
        corrected += n;
    }

    let dlen = version.data_codewords();
    let data = interleave_order(version)
        .into_iter()
        .take(dlen)
        .map(|(j, i)| blocks[j].data()[i])
        .collect();
    Ok((data, corrected))
}

#[cfg(test)]
mod blocks_tests {
    use super::{deinterleave, encode_blocks, interleave_order, rectify_blocks};
    use crate::common::error::CodecError;
    use crate::datamatrix::version::Version;

    fn ver(v: u8) -> Version {
        Version::new(v).unwrap()
    }

    #[test]
    fn test_single_block_is_identity() {
        let v = ver(1);
        let encoded = encode_blocks(&[142, 164, 186], v).unwrap();
        assert_eq!(encoded, vec![142, 164, 186, 114, 25, 5, 88, 102]);
    }

    #[test]
    fn test_order_covers_every_codeword_once() {
        for v in Version::all() {
            let order = interleave_order(v);
            let sizes = v.ec_blocks().block_sizes();
            let ec = v.ec_blocks().ec_per_block;
            assert_eq!(order.len(), v.total_codewords());
            let mut seen: Vec<Vec<bool>> = sizes.iter().map(|&s| vec![false; s + ec]).collect();
            for (j, i) in order {
                assert!(!seen[j][i], "Version {}: ({j}, {i}) twice", *v);
                seen[j][i] = true;
            }
        }
    }

    #[test]
    fn test_version_24_order() {
        let order = interleave_order(ver(24));
        // Last data column only in the eight long blocks
        assert_eq!(&order[1550..1558], &(0..8).map(|j| (j, 155)).collect::<Vec<_>>()[..]);
        // Ec columns start at block 8, short blocks one position earlier
        assert_eq!(&order[1558..1561], &[(8, 155), (9, 155), (0, 156)]);
        assert_eq!(order[2177], (7, 217));
    }

    #[test]
    fn test_round_trip_all_versions() {
        for v in Version::all() {
            let n = v.data_codewords();
            let data: Vec<u8> = (0..n).map(|i| (i * 31 % 254 + 1) as u8).collect();
            let raw = encode_blocks(&data, v).unwrap();
            assert_eq!(raw.len(), v.total_codewords());
            // Data codewords keep their positions at the front
            assert_eq!(&raw[..n], &data[..]);

            let mut blocks = deinterleave(&raw, v).unwrap();
            let (back, corrected) = rectify_blocks(&mut blocks, v).unwrap();
            assert_eq!(back, data);
            assert_eq!(corrected, 0);
        }
    }

    #[test]
    fn test_correction_across_blocks() {
        let v = ver(17);
        let data: Vec<u8> = (0..v.data_codewords()).map(|i| (i % 200) as u8 + 1).collect();
        let mut raw = encode_blocks(&data, v).unwrap();
        // 4 blocks with 18 correctable each
        for cw in raw[40..100].iter_mut() {
            *cw = cw.wrapping_add(77);
        }
        let mut blocks = deinterleave(&raw, v).unwrap();
        let (back, corrected) = rectify_blocks(&mut blocks, v).unwrap();
        assert_eq!(back, data);
        assert_eq!(corrected, 60);
    }

    #[test]
    fn test_count_mismatch() {
        assert_eq!(encode_blocks(&[1, 2], ver(1)), Err(CodecError::CodewordCountMismatch));
        assert_eq!(deinterleave(&[0; 7], ver(1)), Err(CodecError::CodewordCountMismatch));
    }
}
