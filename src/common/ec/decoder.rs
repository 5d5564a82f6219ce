use crate::common::error::{CodecError, CodecResult};
use crate::common::galois::GaloisField;
use crate::common::poly::Polynomial;

#[cfg(test)]
thread_local! {
    pub(crate) static EUCLIDEAN_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

// Reed-Solomon decoder
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct ReedSolomonDecoder {
    field: &'static GaloisField,
}

impl ReedSolomonDecoder {
    pub fn new(field: &'static GaloisField) -> Self {
        Self { field }
    }

    // Corrects received in place and returns the number of codewords fixed
    pub fn decode(&self, received: &mut [u8], ec_len: usize) -> CodecResult<usize> {
        if ec_len == 0 || ec_len >= received.len() || received.len() > 255 {
            return Err(CodecError::InvalidEcLength);
        }

        let syndromes = match self.syndromes(received, ec_len) {
            Some(s) => s,
            None => return Ok(0),
        };

        let field = self.field;
        let (sigma, omega) =
            self.euclidean(Polynomial::monomial(field, ec_len, 1), syndromes, ec_len)?;
        let locations = self.error_locations(&sigma)?;
        let magnitudes = self.error_magnitudes(&omega, &locations)?;

        let len = received.len();
        for (&loc, &mag) in locations.iter().zip(magnitudes.iter()) {
            let log = field.log(loc)?;
            if log >= len {
                return Err(CodecError::BadErrorLocation);
            }
            received[len - 1 - log] ^= mag;
        }

        // A pattern beyond capacity can still yield a consistent looking locator
        if self.syndromes(received, ec_len).is_some() {
            return Err(CodecError::TooManyErrors);
        }

        Ok(locations.len())
    }

    // Syndrome polynomial, or None when every syndrome is zero
    fn syndromes(&self, received: &[u8], ec_len: usize) -> Option<Polynomial> {
        let field = self.field;
        let base = field.generator_base();
        let poly = Polynomial::new(field, received);

        let mut coeffs = vec![0u8; ec_len];
        for i in 0..ec_len {
            coeffs[ec_len - 1 - i] = poly.evaluate_at(field.exp(i + base));
        }

        if coeffs.iter().all(|&s| s == 0) {
            None
        } else {
            Some(Polynomial::new(field, &coeffs))
        }
    }

    // Returns (sigma, omega): error locator and error evaluator
    fn euclidean(
        &self,
        a: Polynomial,
        b: Polynomial,
        ec_len: usize,
    ) -> CodecResult<(Polynomial, Polynomial)> {
        #[cfg(test)]
        EUCLIDEAN_CALLS.with(|c| c.set(c.get() + 1));

        let field = self.field;
        let (a, b) = if a.degree() < b.degree() { (b, a) } else { (a, b) };

        let mut r_last = a;
        let mut r = b;
        let mut t_last = Polynomial::zero(field);
        let mut t = Polynomial::one(field);

        // Stop once the remainder degree drops below ec_len / 2
        while 2 * r.degree() >= ec_len {
            let r_last_last = std::mem::replace(&mut r_last, r);
            let t_last_last = std::mem::replace(&mut t_last, t);

            if r_last.is_zero() {
                return Err(CodecError::TooManyErrors);
            }

            let (q, rem) = r_last_last.divide(&r_last)?;
            r = rem;
            t = q.multiply(&t_last).add(&t_last_last);

            if !r.is_zero() && r.degree() >= r_last.degree() {
                return Err(CodecError::TooManyErrors);
            }
        }

        let sigma_at_zero = t.coefficient(0);
        if sigma_at_zero == 0 {
            return Err(CodecError::TooManyErrors);
        }

        let inv = field.inverse(sigma_at_zero)?;
        Ok((t.multiply_scalar(inv), r.multiply_scalar(inv)))
    }

    // Chien search: inverses of the roots of sigma
    fn error_locations(&self, sigma: &Polynomial) -> CodecResult<Vec<u8>> {
        let field = self.field;
        let num_errors = sigma.degree();
        if num_errors == 1 {
            return Ok(vec![sigma.coefficient(1)]);
        }

        let mut res = Vec::with_capacity(num_errors);
        for i in 1..=255u8 {
            if res.len() == num_errors {
                break;
            }
            if sigma.evaluate_at(i) == 0 {
                res.push(field.inverse(i)?);
            }
        }

        if res.len() != num_errors {
            return Err(CodecError::DegreeMismatch);
        }
        Ok(res)
    }

    // Forney algorithm
    fn error_magnitudes(&self, omega: &Polynomial, locations: &[u8]) -> CodecResult<Vec<u8>> {
        let field = self.field;
        let mut res = Vec::with_capacity(locations.len());

        for (i, &loc) in locations.iter().enumerate() {
            let xi_inv = field.inverse(loc)?;
            let mut denominator = 1u8;
            for (j, &other) in locations.iter().enumerate() {
                if i != j {
                    // 1 + loc_j * xi^-1
                    let term = field.multiply(other, xi_inv);
                    denominator = field.multiply(denominator, term ^ 1);
                }
            }

            let mut mag = field.multiply(omega.evaluate_at(xi_inv), field.inverse(denominator)?);
            if field.generator_base() != 0 {
                mag = field.multiply(mag, xi_inv);
            }
            res.push(mag);
        }

        Ok(res)
    }
}
