use std::ops::Deref;

use super::placement::build_matrix;
use super::version::Version;
use crate::common::error::{CodecError, CodecResult};
use crate::common::matrix::ModuleMatrix;
use crate::common::metadata::ECLevel;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }

    pub fn try_new(pattern: u8) -> CodecResult<Self> {
        if pattern >= 8 {
            return Err(CodecError::InvalidMask);
        }
        Ok(Self(pattern))
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    // Whether the data module at (row, col) is inverted
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            _ => mask_functions::meadow,
        }
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Builds the symbol under every mask and keeps the one with the lowest penalty
pub fn build_with_best_mask(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> (ModuleMatrix, MaskPattern) {
    MaskPattern::all()
        .map(|m| (build_matrix(codewords, version, ec_level, m), m))
        .min_by_key(|(qr, m)| (compute_total_penalty(qr), **m))
        .unwrap_or_else(|| unreachable!("There are always 8 masks"))
}

pub fn compute_total_penalty(qr: &ModuleMatrix) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr, true) + compute_adjacent_penalty(qr, false);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen = compute_finder_pattern_penalty(qr, true) + compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen + bal_pen
}

// Penalty weights
const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

// Runs of 5 or more same colored modules in a line
fn compute_adjacent_penalty(qr: &ModuleMatrix, is_hor: bool) -> u32 {
    let w = qr.width() as i16;
    let get = |i, j| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };

    let mut pen = 0;
    for i in 0..w {
        let mut last = get(i, 0);
        let mut run = 1;
        for j in 1..w {
            let clr = get(i, j);
            if clr == last {
                run += 1;
                continue;
            }
            if run >= 5 {
                pen += N1 + run - 5;
            }
            last = clr;
            run = 1;
        }
        if run >= 5 {
            pen += N1 + run - 5;
        }
    }
    pen
}

// 2x2 blocks of one color
fn compute_block_penalty(qr: &ModuleMatrix) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += N2;
            }
        }
    }
    pen
}

// 1:1:3:1:1 finder like runs with four light modules on either side
fn compute_finder_pattern_penalty(qr: &ModuleMatrix, is_hor: bool) -> u32 {
    static PATTERN: [bool; 7] = [true, false, true, true, true, false, true];

    let w = qr.width() as i16;
    let get = |i, j| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };

    let mut pen = 0;
    for i in 0..w {
        for j in 0..w - 6 {
            if (j..j + 7).map(|k| get(i, k)).ne(PATTERN.iter().copied()) {
                continue;
            }
            // Modules beyond the edge count as light
            let is_light = |k: i16| k < 0 || k >= w || !get(i, k);
            if (j - 4..j).all(is_light) || (j + 7..j + 11).all(is_light) {
                pen += N3;
            }
        }
    }
    pen
}

// Deviation of the dark ratio from 50%, in steps of 5%
fn compute_balance_penalty(qr: &ModuleMatrix) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let tot = w * w;
    let deviation = (dark_cnt * 2).abs_diff(tot) * 10 / tot;
    deviation as u32 * N4
}
