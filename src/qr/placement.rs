use super::format::{version_info, FormatInfo};
use super::mask::MaskPattern;
use super::version::Version;
use crate::common::error::{CodecError, CodecResult};
use crate::common::matrix::{BitMatrix, Module, ModuleMatrix};
use crate::common::metadata::ECLevel;

// Zigzag traversal
//------------------------------------------------------------------------------

// Every module of the symbol in placement order: two column strips from the
// right edge, alternating upward and downward, skipping the vertical timing
// column. Callers filter out function modules.
pub struct ZigZagIter {
    w: i16,
    c: i16,
    count: i16,
    k: i16,
    upward: bool,
}

impl ZigZagIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { w, c: w - 1, count: 0, k: 0, upward: true }
    }
}

impl Iterator for ZigZagIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c <= 0 {
            return None;
        }
        let r = if self.upward { self.w - 1 - self.count } else { self.count };
        let res = (r, self.c - self.k);

        self.k += 1;
        if self.k == 2 {
            self.k = 0;
            self.count += 1;
            if self.count == self.w {
                self.count = 0;
                self.upward = !self.upward;
                self.c -= 2;
                if self.c == 6 {
                    self.c -= 1;
                }
            }
        }
        Some(res)
    }
}

// Finder patterns
//------------------------------------------------------------------------------

impl ModuleMatrix {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // 7x7 finder centred at (r, c) with its light separator
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.claim(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(false),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(true),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(false),
                        _ => Module::Func(true),
                    },
                );
            }
        }
    }
}

// Alignment patterns
//------------------------------------------------------------------------------

impl ModuleMatrix {
    // Skips centres already covered by a finder pattern
    fn draw_alignment_patterns(&mut self, version: Version) {
        let centers = version.alignment_centers();
        for &r in centers {
            for &c in centers {
                if self.get(r as i16, c as i16) == Module::Empty {
                    self.draw_alignment_pattern_at(r as i16, c as i16);
                }
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        for i in -2..=2i16 {
            for j in -2..=2i16 {
                let dark = i.abs() == 2 || j.abs() == 2 || (i == 0 && j == 0);
                self.claim(r + i, c + j, Module::Func(dark));
            }
        }
    }
}

// Timing patterns
//------------------------------------------------------------------------------

impl ModuleMatrix {
    fn draw_timing_patterns(&mut self) {
        let last = self.width() as i16 - 9;
        self.draw_line(6, 8, 6, last);
        self.draw_line(8, 6, last, 6);
    }

    // Alternating line, leaves modules claimed by alignment patterns alone
    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        for i in r1..=r2 {
            for j in c1..=c2 {
                if self.get(i, j) == Module::Empty {
                    self.set(i, j, Module::Func((i + j) & 1 == 0));
                }
            }
        }
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl ModuleMatrix {
    pub fn draw_all_function_patterns(&mut self, version: Version) {
        self.draw_finder_patterns();
        self.draw_alignment_patterns(version);
        self.draw_timing_patterns();
    }

    fn draw_format_info(&mut self, format_info: u32) {
        let (off, on) = (Module::Format(false), Module::Format(true));
        self.draw_number(format_info, off, on, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(format_info, off, on, &FORMAT_INFO_COORDS_SIDE);
        self.set(-8, 8, Module::Format(true));
    }

    fn draw_version_info(&mut self, version: Version) {
        if *version < 7 {
            return;
        }
        let info = version_info(version);
        let (off, on) = (Module::Version(false), Module::Version(true));
        self.draw_number(info, off, on, &VERSION_INFO_COORDS_BL);
        self.draw_number(info, off, on, &VERSION_INFO_COORDS_TR);
    }

    // Most significant bit goes to the first coordinate
    fn draw_number(&mut self, number: u32, off: Module, on: Module, coords: &[(i16, i16)]) {
        let mut mask = 1 << (coords.len() - 1);
        for &(r, c) in coords {
            self.set(r, c, if number & mask == 0 { off } else { on });
            mask >>= 1;
        }
    }
}

// Data
//------------------------------------------------------------------------------

impl ModuleMatrix {
    // Fills every remaining empty module, padding with light modules once the
    // codewords run out, and applies the mask
    fn draw_codewords(&mut self, version: Version, codewords: &[u8], mask: MaskPattern) {
        let mask_fn = mask.mask_functions();
        let mut bits = codewords.iter().flat_map(|&cw| (0..8).rev().map(move |i| (cw >> i) & 1 == 1));
        for (r, c) in ZigZagIter::new(version) {
            if self.get(r, c) != Module::Empty {
                continue;
            }
            let bit = bits.next().unwrap_or(false);
            self.set(r, c, Module::Data(bit ^ mask_fn(r, c)));
        }
        debug_assert!(bits.next().is_none(), "Codewords exceed the data region");
    }
}

// Full symbol with the given interleaved codewords
pub fn build_matrix(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
    mask: MaskPattern,
) -> ModuleMatrix {
    debug_assert!(codewords.len() == version.total_codewords(), "Codeword count mismatch");

    let mut qr = ModuleMatrix::new(version.width());
    qr.draw_all_function_patterns(version);
    qr.draw_format_info(FormatInfo::new(ec_level, mask).bits());
    qr.draw_version_info(version);
    qr.draw_codewords(version, codewords, mask);

    debug_assert!(qr.is_complete(), "Symbol has unfilled modules");
    qr
}

// Reading
//------------------------------------------------------------------------------

// Function patterns plus reserved format and version areas
pub fn function_pattern_mask(version: Version) -> ModuleMatrix {
    let mut qr = ModuleMatrix::new(version.width());
    qr.draw_all_function_patterns(version);
    qr.draw_format_info(0);
    qr.draw_version_info(version);
    qr
}

fn get_wrapped(m: &BitMatrix, r: i16, c: i16) -> bool {
    let w = m.width() as i16;
    let r = if r < 0 { r + w } else { r };
    let c = if c < 0 { c + w } else { c };
    m.get(r as usize, c as usize)
}

fn read_number(m: &BitMatrix, coords: &[(i16, i16)]) -> u32 {
    coords.iter().fold(0, |acc, &(r, c)| (acc << 1) | get_wrapped(m, r, c) as u32)
}

pub fn read_format_info(m: &BitMatrix) -> CodecResult<FormatInfo> {
    let copy1 = read_number(m, &FORMAT_INFO_COORDS_MAIN);
    let copy2 = read_number(m, &FORMAT_INFO_COORDS_SIDE);
    FormatInfo::decode(copy1, copy2)
}

// Version from the dimension, confirmed by the version info from version 7
pub fn read_version(m: &BitMatrix) -> CodecResult<Version> {
    if m.width() != m.height() {
        return Err(CodecError::VersionNotFound);
    }
    let provisional = Version::from_dimension(m.width())?;
    if *provisional <= 6 {
        return Ok(provisional);
    }

    for coords in [&VERSION_INFO_COORDS_TR, &VERSION_INFO_COORDS_BL] {
        if let Ok(ver) = Version::from_version_bits(read_number(m, coords)) {
            if ver.width() == m.width() {
                return Ok(ver);
            }
        }
    }
    Err(CodecError::InvalidVersionInfo)
}

// Unmasked codewords in placement order
pub fn read_codewords(m: &BitMatrix, version: Version, mask: MaskPattern) -> CodecResult<Vec<u8>> {
    let w = version.width();
    if m.width() != w || m.height() != w {
        return Err(CodecError::VersionNotFound);
    }

    let func = function_pattern_mask(version);
    let mask_fn = mask.mask_functions();
    let mut res = Vec::with_capacity(version.total_codewords());
    let mut curr = 0u8;
    let mut bits_read = 0;
    for (r, c) in ZigZagIter::new(version) {
        if func.get(r, c) != Module::Empty {
            continue;
        }
        let bit = m.get(r as usize, c as usize) ^ mask_fn(r, c);
        curr = (curr << 1) | bit as u8;
        bits_read += 1;
        if bits_read == 8 {
            res.push(curr);
            curr = 0;
            bits_read = 0;
        }
    }

    if res.len() != version.total_codewords() {
        return Err(CodecError::CodewordCountMismatch);
    }
    Ok(res)
}

// Global constants
//------------------------------------------------------------------------------

// Format info modules, most significant bit first. Negative coordinates count
// from the far edge.
static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

#[cfg(test)]
mod placement_tests {
    use super::{
        build_matrix, function_pattern_mask, read_codewords, read_format_info, read_version,
        ZigZagIter,
    };
    use crate::common::error::CodecError;
    use crate::common::matrix::{BitMatrix, Module, ModuleMatrix};
    use crate::common::metadata::ECLevel;
    use crate::qr::format::FormatInfo;
    use crate::qr::mask::MaskPattern;
    use crate::qr::version::Version;

    fn codewords(version: Version, seed: usize) -> Vec<u8> {
        (0..version.total_codewords()).map(|i| ((i * 31 + seed * 7) % 256) as u8).collect()
    }

    #[test]
    fn test_all_function_patterns() {
        let mut qr = ModuleMatrix::new(29);
        qr.draw_all_function_patterns(Version::new(3).unwrap());
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.............Ffffffff\n\
             fFFFFFfF.............FfFFFFFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFFFFFfF.............FfFFFFFf\n\
             fffffffFfFfFfFfFfFfFfFfffffff\n\
             FFFFFFFF.............FFFFFFFF\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f.............fffff....\n\
             FFFFFFFF............fFFFf....\n\
             fffffffF............fFfFf....\n\
             fFFFFFfF............fFFFf....\n\
             fFfffFfF............fffff....\n\
             fFfffFfF.....................\n\
             fFfffFfF.....................\n\
             fFFFFFfF.....................\n\
             fffffffF.....................\n"
        );
    }

    #[test]
    fn test_zigzag_covers_all_but_timing_column() {
        for ver in [Version::new(1).unwrap(), Version::new(7).unwrap()] {
            let w = ver.width();
            let coords: Vec<_> = ZigZagIter::new(ver).collect();
            assert_eq!(coords.len(), w * (w - 1));
            assert_eq!(coords[0], (w as i16 - 1, w as i16 - 1));
            assert_eq!(coords[1], (w as i16 - 1, w as i16 - 2));
            assert!(coords.iter().all(|&(_, c)| c != 6));
        }
    }

    #[test]
    fn test_data_region_size() {
        for ver in Version::all() {
            let func = function_pattern_mask(ver);
            let data_modules = func.grid().iter().filter(|m| **m == Module::Empty).count();
            assert_eq!(data_modules / 8, ver.total_codewords(), "Version {}", *ver);
            assert_eq!(data_modules % 8, ver.remainder_bits(), "Version {}", *ver);
        }
    }

    #[test]
    fn test_placement_idempotence() {
        for ver in Version::all() {
            for mask in MaskPattern::all() {
                let cws = codewords(ver, *mask as usize);
                let ecl = ECLevel::ALL[*mask as usize % 4];
                let m = build_matrix(&cws, ver, ecl, mask).to_bit_matrix();

                assert_eq!(read_version(&m), Ok(ver));
                assert_eq!(read_format_info(&m), Ok(FormatInfo::new(ecl, mask)));
                assert_eq!(read_codewords(&m, ver, mask).unwrap(), cws, "Version {}", *ver);
            }
        }
    }

    #[test]
    fn test_dark_module() {
        let ver = Version::new(2).unwrap();
        let qr = build_matrix(&codewords(ver, 0), ver, ECLevel::L, MaskPattern::new(0));
        assert_eq!(qr.get(-8, 8), Module::Format(true));
    }

    #[test]
    fn test_format_info_survives_damage() {
        let ver = Version::new(1).unwrap();
        let mask = MaskPattern::new(3);
        let mut m = build_matrix(&codewords(ver, 1), ver, ECLevel::H, mask).to_bit_matrix();
        // Wipe part of the main copy, the side copy still reads
        for c in 0..6 {
            m.flip(8, c);
        }
        assert_eq!(read_format_info(&m), Ok(FormatInfo::new(ECLevel::H, mask)));
    }

    #[test]
    fn test_version_info_fallback() {
        let ver = Version::new(12).unwrap();
        let mut m = build_matrix(&codewords(ver, 2), ver, ECLevel::M, MaskPattern::new(1))
            .to_bit_matrix();
        let w = m.width();
        // Destroy the top right copy
        for r in 0..6 {
            for c in w - 11..w - 8 {
                m.flip(r, c);
            }
        }
        assert_eq!(read_version(&m), Ok(ver));
    }

    #[test]
    fn test_bad_dimensions() {
        assert_eq!(read_version(&BitMatrix::new(21, 25)), Err(CodecError::VersionNotFound));
        assert_eq!(read_version(&BitMatrix::square(23)), Err(CodecError::VersionNotFound));
        let ver = Version::new(2).unwrap();
        let res = read_codewords(&BitMatrix::square(21), ver, MaskPattern::new(0));
        assert_eq!(res, Err(CodecError::VersionNotFound));
    }
}
