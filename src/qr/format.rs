use super::mask::MaskPattern;
use super::version::Version;
use crate::common::error::{CodecError, CodecResult};
use crate::common::metadata::ECLevel;

// BCH codes for the format and version info
//------------------------------------------------------------------------------

const FORMAT_POLY: u32 = 0x537;
const FORMAT_MASK: u32 = 0x5412;
const VERSION_POLY: u32 = 0x1F25;

// Remainder of value * x^deg(poly) divided by poly, appended to value
fn bch_encode(value: u32, poly: u32) -> u32 {
    let deg = 31 - poly.leading_zeros();
    let mut rem = value << deg;
    while rem != 0 && 31 - rem.leading_zeros() >= deg {
        rem ^= poly << (31 - rem.leading_zeros() - deg);
    }
    (value << deg) | rem
}

// Closest valid number to any of the reads, within err_capacity bit flips
fn rectify_info(reads: &[u32], valid: &[u32], err_capacity: u32) -> Option<usize> {
    let (dist, idx) = valid
        .iter()
        .enumerate()
        .flat_map(|(i, v)| reads.iter().map(move |r| ((r ^ v).count_ones(), i)))
        .min()?;
    if dist <= err_capacity {
        Some(idx)
    } else {
        None
    }
}

// Format info
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask: MaskPattern,
}

impl FormatInfo {
    pub fn new(ec_level: ECLevel, mask: MaskPattern) -> Self {
        Self { ec_level, mask }
    }

    // 15 bit masked format word
    pub fn bits(self) -> u32 {
        let data = (self.ec_level.format_bits() << 3) | *self.mask as u32;
        bch_encode(data, FORMAT_POLY) ^ FORMAT_MASK
    }

    fn from_data(data: u32) -> Self {
        let ec_level = ECLevel::from_format_bits(data >> 3);
        Self { ec_level, mask: MaskPattern::new((data & 0b111) as u8) }
    }

    // Decodes the two redundant copies, accepting up to 3 bit errors
    pub fn decode(copy1: u32, copy2: u32) -> CodecResult<Self> {
        let valid: Vec<u32> = (0..32).map(|d| bch_encode(d, FORMAT_POLY) ^ FORMAT_MASK).collect();
        match rectify_info(&[copy1, copy2], &valid, 3) {
            Some(data) => Ok(Self::from_data(data as u32)),
            None => Err(CodecError::InvalidFormatInfo),
        }
    }
}

// Version info
//------------------------------------------------------------------------------

// 18 bit version word, 6 bits of version and 12 bits of BCH code
pub fn version_info(version: Version) -> u32 {
    bch_encode(*version as u32, VERSION_POLY)
}
