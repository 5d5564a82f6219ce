use std::ops::Deref;

pub use crate::common::ec::ECBlocks;
use crate::common::error::{CodecError, CodecResult};
use crate::common::metadata::ECLevel;

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(v: u8) -> CodecResult<Self> {
        if !(1..=40).contains(&v) {
            return Err(CodecError::InvalidVersion);
        }
        Ok(Self(v))
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    // Provisional version from the side length of the symbol
    pub fn from_dimension(dim: usize) -> CodecResult<Self> {
        if dim % 4 != 1 || dim < 21 || dim > 177 {
            return Err(CodecError::VersionNotFound);
        }
        Ok(Self(((dim - 17) / 4) as u8))
    }

    // Best match for the 18 bit version info, within 3 bit errors
    pub fn from_version_bits(bits: u32) -> CodecResult<Self> {
        let mut best = (u32::MAX, 0);
        for (i, &target) in VERSION_DECODE_INFO.iter().enumerate() {
            if target == bits {
                return Ok(Self(i as u8 + 7));
            }
            let dist = (bits ^ target).count_ones();
            if dist < best.0 {
                best = (dist, i as u8 + 7);
            }
        }
        if best.0 <= 3 {
            Ok(Self(best.1))
        } else {
            Err(CodecError::InvalidVersionInfo)
        }
    }

    // 18 bit version info, only carried by versions 7 and above
    pub fn info_bits(self) -> Option<u32> {
        if self.0 < 7 {
            return None;
        }
        Some(VERSION_DECODE_INFO[self.0 as usize - 7])
    }

    pub fn ec_blocks(self, ecl: ECLevel) -> &'static ECBlocks {
        &EC_BLOCKS[self.0 as usize - 1][ecl as usize]
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0 as usize - 1]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.ec_blocks(ecl).data_codewords()
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn alignment_centers(self) -> &'static [usize] {
        ALIGNMENT_CENTERS[self.0 as usize - 1]
    }

    // Leftover modules after the last full codeword
    pub fn remainder_bits(self) -> usize {
        match self.0 {
            2..=6 => 7,
            14..=20 | 28..=34 => 3,
            21..=27 => 4,
            _ => 0,
        }
    }
}

const fn tables_consistent() -> bool {
    let mut v = 0;
    while v < 40 {
        let mut l = 0;
        while l < 4 {
            if EC_TABLE[v][l].total_codewords() != CODEWORD_TOTALS[v] {
                return false;
            }
            l += 1;
        }
        v += 1;
    }
    true
}

const _: () = assert!(tables_consistent(), "EC block table disagrees with codeword totals");

// Global constants
//------------------------------------------------------------------------------

macro_rules! ecb {
    ($ec:expr; $($count:expr, $dlen:expr);+) => {
        ECBlocks { ec_per_block: $ec, groups: &[$(($count, $dlen)),+] }
    };
}

static TOTAL_CODEWORDS: [usize; 40] = CODEWORD_TOTALS;

static EC_BLOCKS: [[ECBlocks; 4]; 40] = EC_TABLE;

const CODEWORD_TOTALS: [usize; 40] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761, 2876,
    3034, 3196, 3362, 3532, 3706,
];

// Indexed [version - 1][ec level]
const EC_TABLE: [[ECBlocks; 4]; 40] = [
    // 1
    [ecb!(7; 1, 19), ecb!(10; 1, 16), ecb!(13; 1, 13), ecb!(17; 1, 9)],
    // 2
    [ecb!(10; 1, 34), ecb!(16; 1, 28), ecb!(22; 1, 22), ecb!(28; 1, 16)],
    // 3
    [ecb!(15; 1, 55), ecb!(26; 1, 44), ecb!(18; 2, 17), ecb!(22; 2, 13)],
    // 4
    [ecb!(20; 1, 80), ecb!(18; 2, 32), ecb!(26; 2, 24), ecb!(16; 4, 9)],
    // 5
    [ecb!(26; 1, 108), ecb!(24; 2, 43), ecb!(18; 2, 15; 2, 16), ecb!(22; 2, 11; 2, 12)],
    // 6
    [ecb!(18; 2, 68), ecb!(16; 4, 27), ecb!(24; 4, 19), ecb!(28; 4, 15)],
    // 7
    [ecb!(20; 2, 78), ecb!(18; 4, 31), ecb!(18; 2, 14; 4, 15), ecb!(26; 4, 13; 1, 14)],
    // 8
    [ecb!(24; 2, 97), ecb!(22; 2, 38; 2, 39), ecb!(22; 4, 18; 2, 19), ecb!(26; 4, 14; 2, 15)],
    // 9
    [ecb!(30; 2, 116), ecb!(22; 3, 36; 2, 37), ecb!(20; 4, 16; 4, 17), ecb!(24; 4, 12; 4, 13)],
    // 10
    [ecb!(18; 2, 68; 2, 69), ecb!(26; 4, 43; 1, 44), ecb!(24; 6, 19; 2, 20), ecb!(28; 6, 15; 2, 16)],
    // 11
    [ecb!(20; 4, 81), ecb!(30; 1, 50; 4, 51), ecb!(28; 4, 22; 4, 23), ecb!(24; 3, 12; 8, 13)],
    // 12
    [ecb!(24; 2, 92; 2, 93), ecb!(22; 6, 36; 2, 37), ecb!(26; 4, 20; 6, 21), ecb!(28; 7, 14; 4, 15)],
    // 13
    [ecb!(26; 4, 107), ecb!(22; 8, 37; 1, 38), ecb!(24; 8, 20; 4, 21), ecb!(22; 12, 11; 4, 12)],
    // 14
    [ecb!(30; 3, 115; 1, 116), ecb!(24; 4, 40; 5, 41), ecb!(20; 11, 16; 5, 17), ecb!(24; 11, 12; 5, 13)],
    // 15
    [ecb!(22; 5, 87; 1, 88), ecb!(24; 5, 41; 5, 42), ecb!(30; 5, 24; 7, 25), ecb!(24; 11, 12; 7, 13)],
    // 16
    [ecb!(24; 5, 98; 1, 99), ecb!(28; 7, 45; 3, 46), ecb!(24; 15, 19; 2, 20), ecb!(30; 3, 15; 13, 16)],
    // 17
    [ecb!(28; 1, 107; 5, 108), ecb!(28; 10, 46; 1, 47), ecb!(28; 1, 22; 15, 23), ecb!(28; 2, 14; 17, 15)],
    // 18
    [ecb!(30; 5, 120; 1, 121), ecb!(26; 9, 43; 4, 44), ecb!(28; 17, 22; 1, 23), ecb!(28; 2, 14; 19, 15)],
    // 19
    [ecb!(28; 3, 113; 4, 114), ecb!(26; 3, 44; 11, 45), ecb!(26; 17, 21; 4, 22), ecb!(26; 9, 13; 16, 14)],
    // 20
    [ecb!(28; 3, 107; 5, 108), ecb!(26; 3, 41; 13, 42), ecb!(30; 15, 24; 5, 25), ecb!(28; 15, 15; 10, 16)],
    // 21
    [ecb!(28; 4, 116; 4, 117), ecb!(26; 17, 42), ecb!(28; 17, 22; 6, 23), ecb!(30; 19, 16; 6, 17)],
    // 22
    [ecb!(28; 2, 111; 7, 112), ecb!(28; 17, 46), ecb!(30; 7, 24; 16, 25), ecb!(24; 34, 13)],
    // 23
    [ecb!(30; 4, 121; 5, 122), ecb!(28; 4, 47; 14, 48), ecb!(30; 11, 24; 14, 25), ecb!(30; 16, 15; 14, 16)],
    // 24
    [ecb!(30; 6, 117; 4, 118), ecb!(28; 6, 45; 14, 46), ecb!(30; 11, 24; 16, 25), ecb!(30; 30, 16; 2, 17)],
    // 25
    [ecb!(26; 8, 106; 4, 107), ecb!(28; 8, 47; 13, 48), ecb!(30; 7, 24; 22, 25), ecb!(30; 22, 15; 13, 16)],
    // 26
    [ecb!(28; 10, 114; 2, 115), ecb!(28; 19, 46; 4, 47), ecb!(28; 28, 22; 6, 23), ecb!(30; 33, 16; 4, 17)],
    // 27
    [ecb!(30; 8, 122; 4, 123), ecb!(28; 22, 45; 3, 46), ecb!(30; 8, 23; 26, 24), ecb!(30; 12, 15; 28, 16)],
    // 28
    [ecb!(30; 3, 117; 10, 118), ecb!(28; 3, 45; 23, 46), ecb!(30; 4, 24; 31, 25), ecb!(30; 11, 15; 31, 16)],
    // 29
    [ecb!(30; 7, 116; 7, 117), ecb!(28; 21, 45; 7, 46), ecb!(30; 1, 23; 37, 24), ecb!(30; 19, 15; 26, 16)],
    // 30
    [ecb!(30; 5, 115; 10, 116), ecb!(28; 19, 47; 10, 48), ecb!(30; 15, 24; 25, 25), ecb!(30; 23, 15; 25, 16)],
    // 31
    [ecb!(30; 13, 115; 3, 116), ecb!(28; 2, 46; 29, 47), ecb!(30; 42, 24; 1, 25), ecb!(30; 23, 15; 28, 16)],
    // 32
    [ecb!(30; 17, 115), ecb!(28; 10, 46; 23, 47), ecb!(30; 10, 24; 35, 25), ecb!(30; 19, 15; 35, 16)],
    // 33
    [ecb!(30; 17, 115; 1, 116), ecb!(28; 14, 46; 21, 47), ecb!(30; 29, 24; 19, 25), ecb!(30; 11, 15; 46, 16)],
    // 34
    [ecb!(30; 13, 115; 6, 116), ecb!(28; 14, 46; 23, 47), ecb!(30; 44, 24; 7, 25), ecb!(30; 59, 16; 1, 17)],
    // 35
    [ecb!(30; 12, 121; 7, 122), ecb!(28; 12, 47; 26, 48), ecb!(30; 39, 24; 14, 25), ecb!(30; 22, 15; 41, 16)],
    // 36
    [ecb!(30; 6, 121; 14, 122), ecb!(28; 6, 47; 34, 48), ecb!(30; 46, 24; 10, 25), ecb!(30; 2, 15; 64, 16)],
    // 37
    [ecb!(30; 17, 122; 4, 123), ecb!(28; 29, 46; 14, 47), ecb!(30; 49, 24; 10, 25), ecb!(30; 24, 15; 46, 16)],
    // 38
    [ecb!(30; 4, 122; 18, 123), ecb!(28; 13, 46; 32, 47), ecb!(30; 48, 24; 14, 25), ecb!(30; 42, 15; 32, 16)],
    // 39
    [ecb!(30; 20, 117; 4, 118), ecb!(28; 40, 47; 7, 48), ecb!(30; 43, 24; 22, 25), ecb!(30; 10, 15; 67, 16)],
    // 40
    [ecb!(30; 19, 118; 6, 119), ecb!(28; 18, 47; 31, 48), ecb!(30; 34, 24; 34, 25), ecb!(30; 20, 15; 61, 16)],
];

static ALIGNMENT_CENTERS: [&[usize]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

// Version info for versions 7 to 40: 6 bit version and 12 bit BCH code
static VERSION_DECODE_INFO: [u32; 34] = [
    0x07C94, 0x085BC, 0x09A99, 0x0A4D3, 0x0BBF6, 0x0C762, 0x0D847, 0x0E60D, 0x0F928, 0x10B78,
    0x1145D, 0x12A17, 0x13532, 0x149A6, 0x15683, 0x168C9, 0x177EC, 0x18EC4, 0x191E1, 0x1AFAB,
    0x1B08E, 0x1CC1A, 0x1D33F, 0x1ED75, 0x1F250, 0x209D5, 0x216F0, 0x228BA, 0x2379F, 0x24B0B,
    0x2542E, 0x26A64, 0x27541, 0x28C69,
];
