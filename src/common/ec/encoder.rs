use crate::common::error::{CodecError, CodecResult};
use crate::common::galois::GaloisField;
use crate::common::poly::Polynomial;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

// Systematic encoder. Generator polynomials are built incrementally and
// cached by degree, so repeated calls with the same ec length reuse them.
#[derive(Debug, Clone)]
pub struct ReedSolomonEncoder {
    field: &'static GaloisField,
    generators: Vec<Polynomial>,
}

impl ReedSolomonEncoder {
    pub fn new(field: &'static GaloisField) -> Self {
        Self { field, generators: vec![Polynomial::one(field)] }
    }

    // Generator of the given degree: Π (x - α^(i + base)) for i in 0..degree
    fn generator(&mut self, degree: usize) -> &Polynomial {
        let base = self.field.generator_base();
        while self.generators.len() <= degree {
            let d = self.generators.len();
            let root = self.field.exp(d - 1 + base);
            let last = &self.generators[d - 1];
            let next = last.multiply(&Polynomial::new(self.field, &[1, root]));
            self.generators.push(next);
        }
        &self.generators[degree]
    }

    // Returns data followed by ec_len parity codewords
    pub fn encode(&mut self, data: &[u8], ec_len: usize) -> CodecResult<Vec<u8>> {
        if ec_len == 0 {
            return Err(CodecError::InvalidEcLength);
        }
        if data.is_empty() {
            return Err(CodecError::EmptyData);
        }
        if data.len() + ec_len > 255 {
            return Err(CodecError::DataTooLong);
        }

        let field = self.field;
        let generator = self.generator(ec_len).clone();
        let info = Polynomial::new(field, data).multiply_by_monomial(ec_len, 1);
        let (_, remainder) = info.divide(&generator)?;

        let coeffs = remainder.coefficients();
        let pad = ec_len - coeffs.len();
        let mut res = Vec::with_capacity(data.len() + ec_len);
        res.extend_from_slice(data);
        res.resize(data.len() + pad, 0);
        res.extend_from_slice(coeffs);
        Ok(res)
    }

    // Parity codewords only
    pub fn parity(&mut self, data: &[u8], ec_len: usize) -> CodecResult<Vec<u8>> {
        let mut res = self.encode(data, ec_len)?;
        Ok(res.split_off(data.len()))
    }
}

#[cfg(test)]
mod encoder_tests {
    use super::ReedSolomonEncoder;
    use crate::common::error::CodecError;
    use crate::common::galois::{DATA_MATRIX_FIELD, QR_FIELD};

    #[test]
    fn test_poly_mod_1() {
        let mut enc = ReedSolomonEncoder::new(&QR_FIELD);
        let res = enc.parity(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10).unwrap();
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let mut enc = ReedSolomonEncoder::new(&QR_FIELD);
        let res = enc.parity(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13).unwrap();
        assert_eq!(&*res, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let mut enc = ReedSolomonEncoder::new(&QR_FIELD);
        let res = enc.parity(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18).unwrap();
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_data_matrix_parity() {
        // "123456" in ASCII digit pairs, 10x10 symbol
        let mut enc = ReedSolomonEncoder::new(&DATA_MATRIX_FIELD);
        let res = enc.encode(&[142, 164, 186], 5).unwrap();
        assert_eq!(res, vec![142, 164, 186, 114, 25, 5, 88, 102]);
    }

    #[test]
    fn test_generator_cache() {
        let mut enc = ReedSolomonEncoder::new(&QR_FIELD);
        let first = enc.encode(&[1, 2, 3, 4], 7).unwrap();
        let second = enc.encode(&[1, 2, 3, 4], 7).unwrap();
        assert_eq!(first, second);
        assert_eq!(enc.generators.len(), 8);
        assert_eq!(enc.generators[7].degree(), 7);
    }

    #[test]
    fn test_parity_zero_padded() {
        let mut enc = ReedSolomonEncoder::new(&QR_FIELD);
        let res = enc.encode(&[0, 0, 0], 4).unwrap();
        assert_eq!(res, vec![0; 7]);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut enc = ReedSolomonEncoder::new(&QR_FIELD);
        assert_eq!(enc.encode(&[1, 2, 3], 0), Err(CodecError::InvalidEcLength));
        assert_eq!(enc.encode(&[], 4), Err(CodecError::EmptyData));
        assert_eq!(enc.encode(&[7; 250], 6), Err(CodecError::DataTooLong));
    }
}
