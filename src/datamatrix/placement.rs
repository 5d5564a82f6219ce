use super::version::Version;
use crate::common::error::{CodecError, CodecResult};
use crate::common::matrix::BitMatrix;

// Codeword mapping
//------------------------------------------------------------------------------

// Module positions of every codeword in the mapping matrix, MSB first
#[derive(Debug)]
pub struct Mapping {
    pub positions: Vec<[(usize, usize); 8]>,
    // Bottom right 2x2 corner left over, filled with a fixed pattern
    pub unvisited_corner: bool,
}

struct Traversal {
    rows: isize,
    cols: isize,
    visited: Vec<bool>,
    positions: Vec<[(usize, usize); 8]>,
}

impl Traversal {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows as isize,
            cols: cols as isize,
            visited: vec![false; rows * cols],
            positions: Vec::with_capacity(rows * cols / 8),
        }
    }

    fn is_visited(&self, r: isize, c: isize) -> bool {
        self.visited[(r * self.cols + c) as usize]
    }

    // Wraps positions that fall off the top or left edge
    fn module(&mut self, mut r: isize, mut c: isize) -> (usize, usize) {
        if r < 0 {
            r += self.rows;
            c += 4 - ((self.rows + 4) & 7);
        }
        if c < 0 {
            c += self.cols;
            r += 4 - ((self.cols + 4) & 7);
        }
        if r >= self.rows {
            r -= self.rows;
        }
        self.visited[(r * self.cols + c) as usize] = true;
        (r as usize, c as usize)
    }

    fn push(&mut self, coords: [(isize, isize); 8]) {
        let pos = coords.map(|(r, c)| self.module(r, c));
        self.positions.push(pos);
    }

    // Standard L shaped codeword with (r, c) as its last module
    fn utah(&mut self, r: isize, c: isize) {
        self.push([
            (r - 2, c - 2),
            (r - 2, c - 1),
            (r - 1, c - 2),
            (r - 1, c - 1),
            (r - 1, c),
            (r, c - 2),
            (r, c - 1),
            (r, c),
        ]);
    }

    fn corner1(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.push([
            (r - 1, 0),
            (r - 1, 1),
            (r - 1, 2),
            (0, c - 2),
            (0, c - 1),
            (1, c - 1),
            (2, c - 1),
            (3, c - 1),
        ]);
    }

    fn corner2(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.push([
            (r - 3, 0),
            (r - 2, 0),
            (r - 1, 0),
            (0, c - 4),
            (0, c - 3),
            (0, c - 2),
            (0, c - 1),
            (1, c - 1),
        ]);
    }

    fn corner3(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.push([
            (r - 1, 0),
            (r - 1, c - 1),
            (0, c - 3),
            (0, c - 2),
            (0, c - 1),
            (1, c - 3),
            (1, c - 2),
            (1, c - 1),
        ]);
    }

    fn corner4(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.push([
            (r - 3, 0),
            (r - 2, 0),
            (r - 1, 0),
            (0, c - 2),
            (0, c - 1),
            (1, c - 1),
            (2, c - 1),
            (3, c - 1),
        ]);
    }
}

// Diagonal zigzag over the mapping matrix with the four corner special cases
pub fn codeword_positions(rows: usize, cols: usize) -> Mapping {
    let mut t = Traversal::new(rows, cols);
    let (nr, nc) = (t.rows, t.cols);
    let (mut r, mut c) = (4isize, 0isize);
    let mut corners = [false; 4];

    loop {
        if r == nr && c == 0 && !corners[0] {
            t.corner1();
            corners[0] = true;
            r -= 2;
            c += 2;
        } else if r == nr - 2 && c == 0 && nc & 3 != 0 && !corners[1] {
            t.corner2();
            corners[1] = true;
            r -= 2;
            c += 2;
        } else if r == nr + 4 && c == 2 && nc & 7 == 0 && !corners[2] {
            t.corner3();
            corners[2] = true;
            r -= 2;
            c += 2;
        } else if r == nr - 2 && c == 0 && nc & 7 == 4 && !corners[3] {
            t.corner4();
            corners[3] = true;
            r -= 2;
            c += 2;
        } else {
            // Up and to the right
            loop {
                if r < nr && c >= 0 && !t.is_visited(r, c) {
                    t.utah(r, c);
                }
                r -= 2;
                c += 2;
                if r < 0 || c >= nc {
                    break;
                }
            }
            r += 1;
            c += 3;

            // Down and to the left
            loop {
                if r >= 0 && c < nc && !t.is_visited(r, c) {
                    t.utah(r, c);
                }
                r += 2;
                c -= 2;
                if r >= nr || c < 0 {
                    break;
                }
            }
            r += 3;
            c += 1;
        }

        if r >= nr && c >= nc {
            break;
        }
    }

    let unvisited_corner = !t.is_visited(nr - 1, nc - 1);
    Mapping { positions: t.positions, unvisited_corner }
}

// Symbol layout
//------------------------------------------------------------------------------

// Symbol module of a mapping matrix position, skipping the region edges
fn symbol_position(version: Version, y: usize, x: usize) -> (usize, usize) {
    let (rr, rc) = (version.region_rows(), version.region_cols());
    ((y / rr) * (rr + 2) + 1 + y % rr, (x / rc) * (rc + 2) + 1 + x % rc)
}

// Full symbol from the interleaved codewords
pub fn build_symbol(codewords: &[u8], version: Version) -> BitMatrix {
    debug_assert_eq!(codewords.len(), version.total_codewords(), "Codeword count mismatch");

    let (rows, cols) = (version.rows(), version.cols());
    let (rr, rc) = (version.region_rows(), version.region_cols());
    let mut symbol = BitMatrix::new(cols, rows);

    // Finder edges on the left and bottom, timing edges on the top and right
    for ry in 0..version.regions_vertical() {
        let top = ry * (rr + 2);
        let bottom = top + rr + 1;
        for x in 0..cols {
            symbol.set(top, x, x % 2 == 0);
            symbol.set(bottom, x, true);
        }
        for rx in 0..version.regions_horizontal() {
            let left = rx * (rc + 2);
            let right = left + rc + 1;
            for i in 0..rr {
                symbol.set(top + 1 + i, left, true);
                symbol.set(top + 1 + i, right, i % 2 == 0);
            }
        }
    }

    let mapping = codeword_positions(version.mapping_rows(), version.mapping_cols());
    for (cw, pos) in codewords.iter().zip(mapping.positions.iter()) {
        for (k, &(y, x)) in pos.iter().enumerate() {
            let (r, c) = symbol_position(version, y, x);
            symbol.set(r, c, cw & (0x80 >> k) != 0);
        }
    }
    if mapping.unvisited_corner {
        let (my, mx) = (version.mapping_rows(), version.mapping_cols());
        for (y, x, dark) in [(my - 1, mx - 1, true), (my - 2, mx - 2, true)] {
            let (r, c) = symbol_position(version, y, x);
            symbol.set(r, c, dark);
        }
    }
    symbol
}

// Reading
//------------------------------------------------------------------------------

pub fn read_version(symbol: &BitMatrix) -> CodecResult<Version> {
    Version::from_dimensions(symbol.height(), symbol.width())
}

// Codewords in placement order, before deinterleaving
pub fn read_codewords(symbol: &BitMatrix, version: Version) -> CodecResult<Vec<u8>> {
    if symbol.height() != version.rows() || symbol.width() != version.cols() {
        return Err(CodecError::VersionNotFound);
    }

    let mapping = codeword_positions(version.mapping_rows(), version.mapping_cols());
    let res: Vec<u8> = mapping
        .positions
        .iter()
        .map(|pos| {
            pos.iter().fold(0u8, |cw, &(y, x)| {
                let (r, c) = symbol_position(version, y, x);
                (cw << 1) | symbol.get(r, c) as u8
            })
        })
        .collect();

    if res.len() != version.total_codewords() {
        return Err(CodecError::CodewordCountMismatch);
    }
    Ok(res)
}

#[cfg(test)]
mod placement_tests {
    use super::{build_symbol, codeword_positions, read_codewords, read_version, symbol_position};
    use crate::common::error::CodecError;
    use crate::common::matrix::BitMatrix;
    use crate::datamatrix::version::Version;

    #[test]
    fn test_positions_cover_mapping_matrix() {
        for v in Version::all() {
            let (rows, cols) = (v.mapping_rows(), v.mapping_cols());
            let mapping = codeword_positions(rows, cols);
            assert_eq!(mapping.positions.len(), v.total_codewords(), "Version {}", *v);

            let mut seen = vec![false; rows * cols];
            for &(y, x) in mapping.positions.iter().flatten() {
                assert!(!seen[y * cols + x], "Version {}: ({y}, {x}) twice", *v);
                seen[y * cols + x] = true;
            }
            let missing: Vec<usize> = (0..rows * cols).filter(|&i| !seen[i]).collect();
            if mapping.unvisited_corner {
                let corner = [(rows - 2) * cols + cols - 2, (rows - 2) * cols + cols - 1];
                let corner = [corner[0], corner[1], corner[0] + cols, corner[1] + cols];
                assert_eq!(missing, corner, "Version {}", *v);
            } else {
                assert!(missing.is_empty(), "Version {}", *v);
            }
        }
    }

    #[test]
    fn test_first_codeword_positions() {
        // 8x8 mapping matrix of the 10x10 symbol
        let mapping = codeword_positions(8, 8);
        assert!(!mapping.unvisited_corner);
        assert_eq!(
            mapping.positions[0],
            [(2, 6), (2, 7), (3, 6), (3, 7), (3, 0), (4, 6), (4, 7), (4, 0)]
        );
    }

    #[test]
    fn test_10x10_layout() {
        let v = Version::new(1).unwrap();
        let symbol = build_symbol(&[0; 8], v);
        for i in 0..10 {
            assert!(symbol.get(i, 0), "Left finder row {i}");
            assert!(symbol.get(9, i), "Bottom finder col {i}");
            assert_eq!(symbol.get(0, i), i % 2 == 0, "Top timing col {i}");
        }
        for i in 1..9 {
            assert_eq!(symbol.get(i, 9), i % 2 == 1, "Right timing row {i}");
        }
    }

    #[test]
    fn test_symbol_position() {
        let v = Version::new(10).unwrap();
        assert_eq!(symbol_position(v, 0, 0), (1, 1));
        assert_eq!(symbol_position(v, 13, 13), (14, 14));
        assert_eq!(symbol_position(v, 14, 14), (17, 17));
        assert_eq!(symbol_position(v, 27, 27), (30, 30));
    }

    #[test]
    fn test_placement_idempotence() {
        for v in Version::all() {
            let n = v.total_codewords();
            let codewords: Vec<u8> = (0..n).map(|i| (i * 73 + 11) as u8).collect();
            let symbol = build_symbol(&codewords, v);
            assert_eq!(read_version(&symbol), Ok(v));
            assert_eq!(read_codewords(&symbol, v).unwrap(), codewords, "Version {}", *v);
        }
    }

    #[test]
    fn test_read_bad_dimensions() {
        assert_eq!(read_version(&BitMatrix::new(11, 11)), Err(CodecError::VersionNotFound));
        let v = Version::new(2).unwrap();
        assert_eq!(read_codewords(&BitMatrix::new(10, 10), v), Err(CodecError::VersionNotFound));
    }
}
