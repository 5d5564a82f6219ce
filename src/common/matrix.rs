use std::ops::Deref;

// Bit matrix
//------------------------------------------------------------------------------

// Light/dark grid handed to the readers and produced by the builders.
// Indexed (row, column), true is dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    w: usize,
    h: usize,
    bits: Vec<bool>,
}

impl BitMatrix {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h, bits: vec![false; w * h] }
    }

    pub fn square(w: usize) -> Self {
        Self::new(w, w)
    }

    // Parses rows of '#'/'X'/'1' (dark) and anything else (light)
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let h = rows.len();
        let w = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut res = Self::new(w, h);
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.as_ref().chars().take(w).enumerate() {
                res.set(r, c, matches!(ch, '#' | 'X' | '1' | '█'));
            }
        }
        res
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.h && c < self.w, "Module out of bounds: Row {r}, Col {c}");
        self.bits[r * self.w + c]
    }

    pub fn set(&mut self, r: usize, c: usize, dark: bool) {
        debug_assert!(r < self.h && c < self.w, "Module out of bounds: Row {r}, Col {c}");
        self.bits[r * self.w + c] = dark;
    }

    pub fn flip(&mut self, r: usize, c: usize) {
        let i = r * self.w + c;
        self.bits[i] = !self.bits[i];
    }

    pub fn count_dark_modules(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    // Text rendering with a light quiet zone, dark modules as '█'
    pub fn to_str(&self, quiet_zone: usize) -> String {
        let total_w = self.w + 2 * quiet_zone;
        let total_h = self.h + 2 * quiet_zone;
        let mut canvas = String::with_capacity((total_w + 1) * total_h * 3);
        for i in 0..total_h {
            for j in 0..total_w {
                let dark = i >= quiet_zone
                    && i < quiet_zone + self.h
                    && j >= quiet_zone
                    && j < quiet_zone + self.w
                    && self.get(i - quiet_zone, j - quiet_zone);
                canvas.push(if dark { '█' } else { ' ' });
            }
            canvas.push('\n');
        }
        canvas
    }
}

// Module
//------------------------------------------------------------------------------

// Encoder side cell. Empty marks cells no pattern or data bit has claimed yet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(bool),
    Version(bool),
    Format(bool),
    Data(bool),
}

impl Deref for Module {
    type Target = bool;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &false,
            Module::Func(c) | Module::Version(c) | Module::Format(c) | Module::Data(c) => c,
        }
    }
}

// Module matrix
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ModuleMatrix {
    grid: Vec<Module>,
    w: usize,
}

impl ModuleMatrix {
    pub fn new(w: usize) -> Self {
        Self { grid: vec![Module::Empty; w * w], w }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    // Negative coordinates count from the far edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row out of bounds: {r}");
        debug_assert!(-w <= c && c < w, "Column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }

    // Pattern embedding must only claim empty cells
    pub fn claim(&mut self, r: i16, c: i16, module: Module) {
        assert!(
            matches!(self.get(r, c), Module::Empty),
            "Module already populated at: Row {r}, Col {c}"
        );
        self.set(r, c, module);
    }

    pub fn is_complete(&self) -> bool {
        !self.grid.contains(&Module::Empty)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| ***m).count()
    }

    pub fn to_bit_matrix(&self) -> BitMatrix {
        let mut res = BitMatrix::square(self.w);
        for (i, m) in self.grid.iter().enumerate() {
            res.bits[i] = **m;
        }
        res
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((self.w + 1) * self.w + 1);
        res.push('\n');
        for r in 0..w {
            for c in 0..w {
                let ch = match self.get(r, c) {
                    Module::Empty => '.',
                    Module::Func(true) => 'f',
                    Module::Func(false) => 'F',
                    Module::Version(true) => 'v',
                    Module::Version(false) => 'V',
                    Module::Format(true) => 'm',
                    Module::Format(false) => 'M',
                    Module::Data(true) => 'd',
                    Module::Data(false) => 'D',
                };
                res.push(ch);
            }
            res.push('\n');
        }
        res
    }
}

#[cfg(test)]
mod matrix_tests {
    use super::{BitMatrix, Module, ModuleMatrix};

    #[test]
    fn test_bit_matrix() {
        let mut m = BitMatrix::new(3, 2);
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        m.set(1, 2, true);
        assert!(m.get(1, 2));
        m.flip(1, 2);
        m.flip(0, 0);
        assert!(!m.get(1, 2));
        assert!(m.get(0, 0));
        assert_eq!(m.count_dark_modules(), 1);
    }

    #[test]
    fn test_from_rows() {
        let m = BitMatrix::from_rows(&["#.#", "..#"]);
        assert!(m.get(0, 0) && !m.get(0, 1) && m.get(0, 2));
        assert!(!m.get(1, 0) && m.get(1, 2));
        assert_eq!(m.to_str(0), "█ █\n  █\n");
    }

    #[test]
    fn test_index_wrap() {
        let mut m = ModuleMatrix::new(5);
        m.set(-1, -1, Module::Func(true));
        assert_eq!(m.get(4, 4), Module::Func(true));
        m.set(0, -5, Module::Data(false));
        assert_eq!(m.get(0, 0), Module::Data(false));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let m = ModuleMatrix::new(5);
        m.get(5, 0);
    }

    #[test]
    #[should_panic]
    fn test_claim_populated() {
        let mut m = ModuleMatrix::new(5);
        m.claim(1, 1, Module::Func(true));
        m.claim(1, 1, Module::Data(true));
    }

    #[test]
    fn test_to_bit_matrix() {
        let mut m = ModuleMatrix::new(2);
        m.set(0, 0, Module::Func(true));
        m.set(0, 1, Module::Format(false));
        m.set(1, 0, Module::Version(true));
        assert!(!m.is_complete());
        m.set(1, 1, Module::Data(true));
        assert!(m.is_complete());
        assert_eq!(m.count_dark_modules(), 3);
        assert_eq!(m.to_bit_matrix(), BitMatrix::from_rows(&["#.", "##"]));
        assert_eq!(m.to_debug_str(), "\nfM\nvd\n");
    }
}
