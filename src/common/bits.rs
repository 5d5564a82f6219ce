use num_traits::PrimInt;

use super::error::{CodecError, CodecResult};

// Bit source
//------------------------------------------------------------------------------

// Reads bits MSB first from a byte slice
#[derive(Debug, Clone)]
pub struct BitSource<'a> {
    data: &'a [u8],
    // Index of the next unread byte
    byte_offset: usize,
    // Bits already read from data[byte_offset]
    bit_offset: usize,
}

impl<'a> BitSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, byte_offset: 0, bit_offset: 0 }
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    pub fn available(&self) -> usize {
        8 * (self.data.len() - self.byte_offset) - self.bit_offset
    }

    pub fn read_bits(&mut self, n: usize) -> CodecResult<u32> {
        if !(1..=32).contains(&n) || n > self.available() {
            return Err(CodecError::InvalidBitCount);
        }

        let mut res = 0u32;
        let mut left = n;
        while left > 0 {
            let bits_in_byte = 8 - self.bit_offset;
            let take = bits_in_byte.min(left);
            let shift = bits_in_byte - take;
            let mask = (0xFFu16 >> (8 - take)) as u8;
            let chunk = (self.data[self.byte_offset] >> shift) & mask;

            // Shift in two steps to keep n == 32 from overflowing
            res = (res << (take - 1) << 1) | chunk as u32;
            left -= take;
            self.bit_offset += take;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.byte_offset += 1;
            }
        }
        Ok(res)
    }
}

// Bit vector
//------------------------------------------------------------------------------

// Growable MSB first bit buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len_in_bytes(&self) -> usize {
        (self.len + 7) >> 3
    }

    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len, "Bit index out of range: Index {i}, Length {}", self.len);
        self.data[i >> 3] & (0x80 >> (i & 7)) != 0
    }

    // Backing bytes, the last one zero padded
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len_in_bytes()]
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }

    fn ensure_capacity(&mut self, bits: usize) {
        let bytes = (bits + 7) >> 3;
        if bytes > self.data.len() {
            let new_len = bytes.max(self.data.len() * 2).max(8);
            self.data.resize(new_len, 0);
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.ensure_capacity(self.len + 1);
        if bit {
            self.data[self.len >> 3] |= 0x80 >> (self.len & 7);
        }
        self.len += 1;
    }

    pub fn append_bits<T: PrimInt>(&mut self, value: T, n: usize) -> CodecResult<()> {
        if n > 32 || n > T::zero().count_zeros() as usize {
            return Err(CodecError::InvalidBitCount);
        }
        // Value must fit in n bits
        if n < (T::zero().count_zeros() - value.leading_zeros()) as usize {
            return Err(CodecError::InvalidBitCount);
        }

        self.ensure_capacity(self.len + n);
        for i in (0..n).rev() {
            let bit = (value >> i) & T::one() == T::one();
            self.push(bit);
        }
        Ok(())
    }

    pub fn append_bit_vector(&mut self, other: &BitVector) {
        self.ensure_capacity(self.len + other.len);
        for bit in other.iter() {
            self.push(bit);
        }
    }

    pub fn xor(&mut self, other: &BitVector) -> CodecResult<()> {
        if self.len != other.len {
            return Err(CodecError::SizeMismatch);
        }
        let n = self.len_in_bytes();
        for (a, b) in self.data[..n].iter_mut().zip(other.data[..n].iter()) {
            *a ^= b;
        }
        Ok(())
    }

    // Packs the bits into bytes, the last byte zero padded
    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

#[cfg(test)]
mod bits_tests {
    use super::{BitSource, BitVector};
    use crate::common::error::CodecError;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn test_read_bits() {
        let data = [0b10110011, 0b01010101, 0xFF, 0x00, 0x12];
        let mut src = BitSource::new(&data);
        assert_eq!(src.available(), 40);
        assert_eq!(src.read_bits(1).unwrap(), 1);
        assert_eq!(src.read_bits(3).unwrap(), 0b011);
        assert_eq!(src.read_bits(6).unwrap(), 0b001101);
        assert_eq!(src.byte_offset(), 1);
        assert_eq!(src.bit_offset(), 2);
        assert_eq!(src.read_bits(14).unwrap(), 0b01010111111111);
        assert_eq!(src.available(), 16);
        assert_eq!(src.read_bits(16).unwrap(), 0x0012);
        assert_eq!(src.available(), 0);
    }

    #[test]
    fn test_read_32_bits() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let mut src = BitSource::new(&data);
        assert_eq!(src.read_bits(32).unwrap(), 0xDEADBEEF);
    }

    #[test_case(0)]
    #[test_case(33)]
    fn test_read_invalid_count(n: usize) {
        let data = [0u8; 8];
        let mut src = BitSource::new(&data);
        assert_eq!(src.read_bits(n), Err(CodecError::InvalidBitCount));
    }

    #[test]
    fn test_read_past_end() {
        let data = [0u8];
        let mut src = BitSource::new(&data);
        src.read_bits(5).unwrap();
        assert_eq!(src.read_bits(4), Err(CodecError::InvalidBitCount));
    }

    #[test]
    fn test_append_bits() {
        let mut bv = BitVector::new();
        bv.append_bits(0b101u8, 3).unwrap();
        bv.append_bits(0u8, 0).unwrap();
        bv.append_bits(0b11110000_1u16, 9).unwrap();
        assert_eq!(bv.len(), 12);
        assert_eq!(bv.as_bytes(), &[0b10111110, 0b00010000]);
    }

    #[test]
    fn test_append_invalid_count() {
        let mut bv = BitVector::new();
        assert_eq!(bv.append_bits(0u64, 33), Err(CodecError::InvalidBitCount));
        assert_eq!(bv.append_bits(0u8, 9), Err(CodecError::InvalidBitCount));
    }

    #[test]
    fn test_append_value_wider_than_count() {
        let mut bv = BitVector::new();
        assert_eq!(bv.append_bits(0b1000u8, 3), Err(CodecError::InvalidBitCount));
        assert_eq!(bv.append_bits(0x1_0000u32, 16), Err(CodecError::InvalidBitCount));
        assert_eq!(bv.len(), 0);
        bv.append_bits(0xFFFFu32, 16).unwrap();
        assert_eq!(bv.len(), 16);
    }

    #[test]
    fn test_growth() {
        let mut bv = BitVector::new();
        for i in 0..1000 {
            bv.push(i % 3 == 0);
        }
        assert_eq!(bv.len(), 1000);
        assert!((0..1000).all(|i| bv.get(i) == (i % 3 == 0)));
    }

    #[test]
    fn test_xor() {
        let mut a = BitVector::new();
        a.append_bits(0b101010101010101u16, 15).unwrap();
        let mut b = BitVector::new();
        b.append_bits(0b101010000010010u16, 15).unwrap();
        a.xor(&b).unwrap();
        let mut expected = BitVector::new();
        expected.append_bits(0b000000101000111u16, 15).unwrap();
        assert_eq!(a, expected);

        let mut c = BitVector::new();
        c.append_bits(1u8, 1).unwrap();
        assert_eq!(a.xor(&c), Err(CodecError::SizeMismatch));
    }

    proptest! {
        #[test]
        fn proptest_write_read(pairs in prop::collection::vec((any::<u32>(), 1usize..=32), 0..64)) {
            let pairs: Vec<(u32, usize)> = pairs
                .into_iter()
                .map(|(v, n)| (if n == 32 { v } else { v & ((1u32 << n) - 1) }, n))
                .collect();

            let mut bv = BitVector::new();
            for &(v, n) in &pairs {
                bv.append_bits(v, n).unwrap();
            }

            let bytes = bv.to_bytes();
            let mut src = BitSource::new(&bytes);
            for &(v, n) in &pairs {
                prop_assert_eq!(src.read_bits(n).unwrap(), v);
            }
            prop_assert!(src.available() < 8);
        }
    }
}
