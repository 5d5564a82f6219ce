use std::ptr;

use super::error::{CodecError, CodecResult};
use super::galois::GaloisField;

// Polynomial over GF(256)
//------------------------------------------------------------------------------

// Coefficients are stored highest degree first. The leading coefficient is
// never zero, except for the zero polynomial which is a single 0.
#[derive(Debug, Clone)]
pub struct Polynomial {
    field: &'static GaloisField,
    coeffs: Vec<u8>,
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.field, other.field) && self.coeffs == other.coeffs
    }
}

impl Eq for Polynomial {}

impl Polynomial {
    pub fn new(field: &'static GaloisField, coeffs: &[u8]) -> Self {
        match coeffs.iter().position(|&c| c != 0) {
            Some(first) => Self { field, coeffs: coeffs[first..].to_vec() },
            None => Self::zero(field),
        }
    }

    pub fn zero(field: &'static GaloisField) -> Self {
        Self { field, coeffs: vec![0] }
    }

    pub fn one(field: &'static GaloisField) -> Self {
        Self { field, coeffs: vec![1] }
    }

    pub fn monomial(field: &'static GaloisField, degree: usize, coeff: u8) -> Self {
        if coeff == 0 {
            return Self::zero(field);
        }
        let mut coeffs = vec![0; degree + 1];
        coeffs[0] = coeff;
        Self { field, coeffs }
    }

    pub fn field(&self) -> &'static GaloisField {
        self.field
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs[0] == 0
    }

    // Coefficient of x^degree
    pub fn coefficient(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coeffs[self.coeffs.len() - 1 - degree]
    }

    pub fn evaluate_at(&self, x: u8) -> u8 {
        match x {
            0 => self.coefficient(0),
            1 => self.coeffs.iter().fold(0, |acc, &c| acc ^ c),
            _ => self.coeffs.iter().fold(0, |acc, &c| self.field.multiply(acc, x) ^ c),
        }
    }
}

// Arithmetic
//------------------------------------------------------------------------------

impl Polynomial {
    pub fn add(&self, other: &Self) -> Self {
        debug_assert!(ptr::eq(self.field, other.field), "Polynomials belong to different fields");

        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (small, large) = if self.coeffs.len() > other.coeffs.len() {
            (&other.coeffs, &self.coeffs)
        } else {
            (&self.coeffs, &other.coeffs)
        };
        let diff = large.len() - small.len();
        let mut sum = large.clone();
        for (s, &c) in sum[diff..].iter_mut().zip(small.iter()) {
            *s ^= c;
        }
        Self::new(self.field, &sum)
    }

    pub fn multiply(&self, other: &Self) -> Self {
        debug_assert!(ptr::eq(self.field, other.field), "Polynomials belong to different fields");

        if self.is_zero() || other.is_zero() {
            return Self::zero(self.field);
        }

        let mut product = vec![0u8; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                product[i + j] ^= self.field.multiply(a, b);
            }
        }
        Self::new(self.field, &product)
    }

    pub fn multiply_scalar(&self, scalar: u8) -> Self {
        match scalar {
            0 => Self::zero(self.field),
            1 => self.clone(),
            _ => {
                let coeffs: Vec<u8> =
                    self.coeffs.iter().map(|&c| self.field.multiply(c, scalar)).collect();
                Self::new(self.field, &coeffs)
            }
        }
    }

    pub fn multiply_by_monomial(&self, degree: usize, coeff: u8) -> Self {
        if coeff == 0 {
            return Self::zero(self.field);
        }
        let mut product = vec![0u8; self.coeffs.len() + degree];
        for (p, &c) in product.iter_mut().zip(self.coeffs.iter()) {
            *p = self.field.multiply(c, coeff);
        }
        Self::new(self.field, &product)
    }

    // Long division, returns (quotient, remainder)
    pub fn divide(&self, other: &Self) -> CodecResult<(Self, Self)> {
        debug_assert!(ptr::eq(self.field, other.field), "Polynomials belong to different fields");

        if other.is_zero() {
            return Err(CodecError::DivideByZero);
        }

        let field = self.field;
        let mut quotient = Self::zero(field);
        let mut remainder = self.clone();

        let lead_inv = field.inverse(other.coefficient(other.degree()))?;

        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_diff = remainder.degree() - other.degree();
            let scale = field.multiply(remainder.coefficient(remainder.degree()), lead_inv);
            let term = other.multiply_by_monomial(degree_diff, scale);
            quotient = quotient.add(&Self::monomial(field, degree_diff, scale));
            remainder = remainder.add(&term);
        }

        Ok((quotient, remainder))
    }
}
