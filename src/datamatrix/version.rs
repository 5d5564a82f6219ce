use std::ops::Deref;

use crate::common::ec::ECBlocks;
use crate::common::error::{CodecError, CodecResult};

// Symbol shape
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum SymbolShape {
    #[default]
    Square,
    Rectangle,
    Any,
}

// Version
//------------------------------------------------------------------------------

// ECC 200 symbol size, 1 to 24 square and 25 to 30 rectangular
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub fn new(v: u8) -> CodecResult<Self> {
        if !(1..=30).contains(&v) {
            return Err(CodecError::InvalidVersion);
        }
        Ok(Self(v))
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=30).map(Version)
    }

    pub fn from_dimensions(rows: usize, cols: usize) -> CodecResult<Self> {
        if rows & 1 != 0 || cols & 1 != 0 {
            return Err(CodecError::VersionNotFound);
        }
        Self::all()
            .find(|v| v.rows() == rows && v.cols() == cols)
            .ok_or(CodecError::VersionNotFound)
    }

    fn info(self) -> &'static VersionInfo {
        &VERSIONS[self.0 as usize - 1]
    }

    pub fn rows(self) -> usize {
        self.info().rows
    }

    pub fn cols(self) -> usize {
        self.info().cols
    }

    pub fn is_square(self) -> bool {
        self.rows() == self.cols()
    }

    pub fn fits_shape(self, shape: SymbolShape) -> bool {
        match shape {
            SymbolShape::Square => self.is_square(),
            SymbolShape::Rectangle => !self.is_square(),
            SymbolShape::Any => true,
        }
    }

    // Data region size without its finder and timing edges
    pub fn region_rows(self) -> usize {
        self.info().region_rows
    }

    pub fn region_cols(self) -> usize {
        self.info().region_cols
    }

    pub fn regions_vertical(self) -> usize {
        self.rows() / (self.region_rows() + 2)
    }

    pub fn regions_horizontal(self) -> usize {
        self.cols() / (self.region_cols() + 2)
    }

    // Size of the codeword mapping matrix, all regions joined
    pub fn mapping_rows(self) -> usize {
        self.regions_vertical() * self.region_rows()
    }

    pub fn mapping_cols(self) -> usize {
        self.regions_horizontal() * self.region_cols()
    }

    pub fn ec_blocks(self) -> &'static ECBlocks {
        &self.info().ec_blocks
    }

    pub fn data_codewords(self) -> usize {
        self.ec_blocks().data_codewords()
    }

    pub fn total_codewords(self) -> usize {
        self.ec_blocks().total_codewords()
    }
}

// Version table
//------------------------------------------------------------------------------

#[derive(Debug)]
struct VersionInfo {
    rows: usize,
    cols: usize,
    region_rows: usize,
    region_cols: usize,
    ec_blocks: ECBlocks,
}

macro_rules! ver {
    ($rows:expr, $cols:expr, $rrows:expr, $rcols:expr, $ec:expr, [$(($cnt:expr, $dlen:expr)),+]) => {
        VersionInfo {
            rows: $rows,
            cols: $cols,
            region_rows: $rrows,
            region_cols: $rcols,
            ec_blocks: ECBlocks { ec_per_block: $ec, groups: &[$(($cnt, $dlen)),+] },
        }
    };
}

const VERSION_TABLE: [VersionInfo; 30] = [
    ver!(10, 10, 8, 8, 5, [(1, 3)]),
    ver!(12, 12, 10, 10, 7, [(1, 5)]),
    ver!(14, 14, 12, 12, 10, [(1, 8)]),
    ver!(16, 16, 14, 14, 12, [(1, 12)]),
    ver!(18, 18, 16, 16, 14, [(1, 18)]),
    ver!(20, 20, 18, 18, 18, [(1, 22)]),
    ver!(22, 22, 20, 20, 20, [(1, 30)]),
    ver!(24, 24, 22, 22, 24, [(1, 36)]),
    ver!(26, 26, 24, 24, 28, [(1, 44)]),
    ver!(32, 32, 14, 14, 36, [(1, 62)]),
    ver!(36, 36, 16, 16, 42, [(1, 86)]),
    ver!(40, 40, 18, 18, 48, [(1, 114)]),
    ver!(44, 44, 20, 20, 56, [(1, 144)]),
    ver!(48, 48, 22, 22, 68, [(1, 174)]),
    ver!(52, 52, 24, 24, 42, [(2, 102)]),
    ver!(64, 64, 14, 14, 56, [(2, 140)]),
    ver!(72, 72, 16, 16, 36, [(4, 92)]),
    ver!(80, 80, 18, 18, 48, [(4, 114)]),
    ver!(88, 88, 20, 20, 56, [(4, 144)]),
    ver!(96, 96, 22, 22, 68, [(4, 174)]),
    ver!(104, 104, 24, 24, 56, [(6, 136)]),
    ver!(120, 120, 18, 18, 68, [(6, 175)]),
    ver!(132, 132, 20, 20, 62, [(8, 163)]),
    ver!(144, 144, 22, 22, 62, [(8, 156), (2, 155)]),
    ver!(8, 18, 6, 16, 7, [(1, 5)]),
    ver!(8, 32, 6, 14, 11, [(1, 10)]),
    ver!(12, 26, 10, 24, 14, [(1, 16)]),
    ver!(12, 36, 10, 16, 18, [(1, 22)]),
    ver!(16, 36, 14, 16, 24, [(1, 32)]),
    ver!(16, 48, 14, 22, 28, [(1, 49)]),
];

// Every codeword fills 8 modules of the mapping matrix, leftovers are below 8
const fn table_consistent() -> bool {
    let mut i = 0;
    while i < VERSION_TABLE.len() {
        let v = &VERSION_TABLE[i];
        let vertical = v.rows / (v.region_rows + 2);
        let horizontal = v.cols / (v.region_cols + 2);
        if vertical * (v.region_rows + 2) != v.rows || horizontal * (v.region_cols + 2) != v.cols {
            return false;
        }
        let bits = vertical * v.region_rows * horizontal * v.region_cols;
        if bits / 8 != v.ec_blocks.total_codewords() {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(table_consistent(), "Data Matrix version table is inconsistent");

static VERSIONS: [VersionInfo; 30] = VERSION_TABLE;
