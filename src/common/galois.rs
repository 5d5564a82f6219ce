//! GF(256) arithmetic shared by the QR Code and Data Matrix Reed-Solomon codes.
//!
//! An element is a byte whose bits are the coefficients of a degree 7
//! polynomial. Addition is XOR. Multiplication goes through discrete log
//! tables generated from the field's primitive polynomial; both symbologies
//! use x (2) as the generator but different primitive polynomials:
//!
//! - QR Code: x^8 + x^4 + x^3 + x^2 + 1 (0x11D), generator base 0
//! - Data Matrix: x^8 + x^5 + x^3 + x^2 + 1 (0x12D), generator base 1
//!
//! The tables are computed at compile time, so both fields are plain statics
//! that can be shared across threads without any initialisation step.

use super::error::{CodecError, CodecResult};

pub static QR_FIELD: GaloisField = GaloisField::new(0x011D, 0);

pub static DATA_MATRIX_FIELD: GaloisField = GaloisField::new(0x012D, 1);

const fn compute_exp_log(primitive: u16) -> ([u8; 256], [u8; 256]) {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        exp[i] = x as u8;
        x <<= 1;
        if x >= 256 {
            x ^= primitive;
        }
        i += 1;
    }
    // log[0] stays 0 as a sentinel, it is never read
    let mut i = 0;
    while i < 255 {
        log[exp[i] as usize] = i as u8;
        i += 1;
    }
    (exp, log)
}

#[derive(Debug)]
pub struct GaloisField {
    exp: [u8; 256],
    log: [u8; 256],
    primitive: u16,
    base: usize,
}

impl GaloisField {
    pub const fn new(primitive: u16, base: usize) -> Self {
        let (exp, log) = compute_exp_log(primitive);
        Self { exp, log, primitive, base }
    }

    pub fn primitive(&self) -> u16 {
        self.primitive
    }

    // Offset of the first generator root: roots are α^base, α^(base+1), ...
    pub fn generator_base(&self) -> usize {
        self.base
    }

    #[inline]
    pub fn add(a: u8, b: u8) -> u8 {
        a ^ b
    }

    #[inline]
    pub fn exp(&self, i: usize) -> u8 {
        self.exp[i % 255]
    }

    pub fn log(&self, a: u8) -> CodecResult<usize> {
        if a == 0 {
            return Err(CodecError::LogOfZero);
        }
        Ok(self.log[a as usize] as usize)
    }

    pub fn inverse(&self, a: u8) -> CodecResult<u8> {
        if a == 0 {
            return Err(CodecError::DivideByZero);
        }
        Ok(self.exp[255 - self.log[a as usize] as usize])
    }

    #[inline]
    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log[a as usize] as usize + self.log[b as usize] as usize;
        self.exp[sum % 255]
    }
}
