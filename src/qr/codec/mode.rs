use crate::common::error::{CodecError, CodecResult};
use crate::qr::version::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Terminator = 0b0000,
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    StructuredAppend = 0b0011,
    Byte = 0b0100,
    Fnc1First = 0b0101,
    Eci = 0b0111,
    Kanji = 0b1000,
    Fnc1Second = 0b1001,
    Hanzi = 0b1101,
}

static ALPHANUMERIC_CHARS: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

// Subset indicator of GB2312 in a Hanzi segment header
pub const GB2312_SUBSET: u8 = 1;

impl Mode {
    pub fn from_bits(bits: u32) -> CodecResult<Self> {
        match bits {
            0b0000 => Ok(Self::Terminator),
            0b0001 => Ok(Self::Numeric),
            0b0010 => Ok(Self::Alphanumeric),
            0b0011 => Ok(Self::StructuredAppend),
            0b0100 => Ok(Self::Byte),
            0b0101 => Ok(Self::Fnc1First),
            0b0111 => Ok(Self::Eci),
            0b1000 => Ok(Self::Kanji),
            0b1001 => Ok(Self::Fnc1Second),
            0b1101 => Ok(Self::Hanzi),
            _ => Err(CodecError::UnsupportedMode),
        }
    }

    // Bit width of the character count field
    pub fn char_count_bits(self, version: Version) -> usize {
        let i = match *version {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Self::Numeric => [10, 12, 14][i],
            Self::Alphanumeric => [9, 11, 13][i],
            Self::Byte => [8, 16, 16][i],
            Self::Kanji | Self::Hanzi => [8, 10, 12][i],
            _ => 0,
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        ALPHANUMERIC_CHARS.iter().position(|&c| c == char).unwrap_or(0) as u16
    }

    pub fn alphanumeric_char(digit: u32) -> CodecResult<u8> {
        ALPHANUMERIC_CHARS.get(digit as usize).copied().ok_or(CodecError::MalformedSegment)
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conver: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conver: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conver: {len}");
                data[0] as u16
            }
            Self::Kanji => {
                debug_assert!(is_kanji_pair(data), "Invalid kanji data: {data:?}");
                let sjw = u16::from_be_bytes([data[0], data[1]]);
                let v = if sjw <= 0x9FFC { sjw - 0x8140 } else { sjw - 0xC140 };
                (v >> 8) * 0xC0 + (v & 0xFF)
            }
            Self::Hanzi => {
                debug_assert!(is_hanzi_pair(data), "Invalid hanzi data: {data:?}");
                let gbw = u16::from_be_bytes([data[0], data[1]]);
                let v = if gbw <= 0xAAFE { gbw - 0xA1A1 } else { gbw - 0xA6A1 };
                (v >> 8) * 0x60 + (v & 0xFF)
            }
            _ => unreachable!("Mode {self:?} doesn't have characters"),
        }
    }

    // Inverse of the 13 bit double byte packing
    pub fn decode_double_byte(&self, data: u16) -> [u8; 2] {
        let (div, lo_base, hi_base, split) = match self {
            Self::Hanzi => (0x60, 0xA1A1, 0xA6A1, 0x0A00),
            _ => (0xC0, 0x8140, 0xC140, 0x1F00),
        };
        let assembled = ((data / div) << 8) | (data % div);
        let word = if assembled < split { assembled + lo_base } else { assembled + hi_base };
        word.to_be_bytes()
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => ALPHANUMERIC_CHARS.contains(&byte),
            Self::Byte => true,
            _ => false,
        }
    }

    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji | Self::Hanzi => (len / 2) * 13,
            _ => 0,
        }
    }
}

// Shift_JIS double byte characters representable in kanji mode
pub fn is_kanji_pair(pair: &[u8]) -> bool {
    let [hi, lo] = pair else { return false };
    let sjw = u16::from_be_bytes([*hi, *lo]);
    ((0x8140..=0x9FFC).contains(&sjw) || (0xE040..=0xEBBF).contains(&sjw))
        && (0x40..=0xFC).contains(lo)
        && *lo != 0x7F
}

// GB2312 double byte characters representable in hanzi mode
pub fn is_hanzi_pair(pair: &[u8]) -> bool {
    let [hi, lo] = pair else { return false };
    ((0xA1..=0xAA).contains(hi) || (0xB0..=0xFA).contains(hi)) && (0xA1..=0xFE).contains(lo)
}

// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub mode: Mode,
    pub len_bits: usize, // Bit len of char count
    pub data: &'a [u8],  // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, version: Version, data: &'a [u8]) -> Self {
        Self { mode, len_bits: mode.char_count_bits(version), data }
    }

    pub fn char_count(&self) -> usize {
        match self.mode {
            Mode::Kanji | Mode::Hanzi => self.data.len() / 2,
            _ => self.data.len(),
        }
    }

    pub fn bit_len(&self) -> usize {
        let subset_bits = if self.mode == Mode::Hanzi { 4 } else { 0 };
        4 + subset_bits + self.len_bits + self.mode.encoded_len(self.data.len())
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

pub static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

#[cfg(test)]
mod mode_tests {

    use super::Mode;
    use super::Mode::*;
    use crate::common::error::CodecError;
    use crate::qr::version::Version;
    use test_case::test_case;

    #[test]
    fn test_from_bits() {
        for m in [Terminator, Numeric, Alphanumeric, StructuredAppend, Byte, Eci, Kanji, Hanzi] {
            assert_eq!(Mode::from_bits(m as u32), Ok(m));
        }
        assert_eq!(Mode::from_bits(0b0110), Err(CodecError::UnsupportedMode));
        assert_eq!(Mode::from_bits(0b1111), Err(CodecError::UnsupportedMode));
    }

    #[test_case(1, [10, 9, 8, 8])]
    #[test_case(9, [10, 9, 8, 8])]
    #[test_case(10, [12, 11, 16, 10])]
    #[test_case(26, [12, 11, 16, 10])]
    #[test_case(27, [14, 13, 16, 12])]
    #[test_case(40, [14, 13, 16, 12])]
    fn test_char_count_bits(ver: u8, exp: [usize; 4]) {
        let ver = Version::new(ver).unwrap();
        let bits = [Numeric, Alphanumeric, Byte, Kanji].map(|m| m.char_count_bits(ver));
        assert_eq!(bits, exp);
        assert_eq!(Hanzi.char_count_bits(ver), exp[3]);
    }

    #[test]
    fn test_numeric_digit() {
        assert_eq!(Mode::numeric_digit(b'0'), 0);
        assert_eq!(Mode::numeric_digit(b'9'), 9);
    }

    #[test]
    fn test_alphanumeric_digit() {
        assert_eq!(Mode::alphanumeric_digit(b'0'), 0);
        assert_eq!(Mode::alphanumeric_digit(b'9'), 9);
        assert_eq!(Mode::alphanumeric_digit(b'A'), 10);
        assert_eq!(Mode::alphanumeric_digit(b'Z'), 35);
        assert_eq!(Mode::alphanumeric_digit(b' '), 36);
        assert_eq!(Mode::alphanumeric_digit(b':'), 44);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_invalid_alphanumeric_digit() {
        Mode::alphanumeric_digit(b'a');
    }

    #[test]
    fn test_alphanumeric_char() {
        assert_eq!(Mode::alphanumeric_char(10), Ok(b'A'));
        assert_eq!(Mode::alphanumeric_char(44), Ok(b':'));
        assert_eq!(Mode::alphanumeric_char(45), Err(CodecError::MalformedSegment));
    }

    #[test]
    fn test_numeric_encoding() {
        assert_eq!(Numeric.encode_chunk("012".as_bytes()), 0b0000001100);
        assert_eq!(Numeric.encode_chunk("345".as_bytes()), 0b0101011001);
        assert_eq!(Numeric.encode_chunk("901".as_bytes()), 0b1110000101);
        assert_eq!(Numeric.encode_chunk("67".as_bytes()), 0b1000011);
        assert_eq!(Numeric.encode_chunk("8".as_bytes()), 0b1000);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_invalid_numeric_encoding() {
        Numeric.encode_chunk("1234".as_bytes());
    }

    #[test]
    fn test_alphanumeric_encoding() {
        assert_eq!(Alphanumeric.encode_chunk("AC".as_bytes()), 0b00111001110);
        assert_eq!(Alphanumeric.encode_chunk("-4".as_bytes()), 0b11100111001);
        assert_eq!(Alphanumeric.encode_chunk("2".as_bytes()), 0b000010);
    }

    // Shift_JIS 0x935F and 0xE4AA
    #[test_case([0x93, 0x5F], 0x0D9F)]
    #[test_case([0xE4, 0xAA], 0x1AAA)]
    fn test_kanji_chunk(pair: [u8; 2], exp: u16) {
        assert_eq!(Kanji.encode_chunk(&pair), exp);
        assert_eq!(Kanji.decode_double_byte(exp), pair);
    }

    // GB2312 0xB0A1 and 0xA1A2
    #[test_case([0xB0, 0xA1], 0x03C0)]
    #[test_case([0xA1, 0xA2], 0x0001)]
    fn test_hanzi_chunk(pair: [u8; 2], exp: u16) {
        assert_eq!(Hanzi.encode_chunk(&pair), exp);
        assert_eq!(Hanzi.decode_double_byte(exp), pair);
    }

    #[test]
    fn test_double_byte_ranges() {
        assert!(super::is_kanji_pair(&[0x81, 0x40]));
        assert!(super::is_kanji_pair(&[0xEB, 0xBF]));
        assert!(!super::is_kanji_pair(&[0x81, 0x7F]));
        assert!(!super::is_kanji_pair(&[0xA0, 0x40]));
        assert!(!super::is_kanji_pair(&[0x81]));
        assert!(super::is_hanzi_pair(&[0xB0, 0xA1]));
        assert!(!super::is_hanzi_pair(&[0xAB, 0xA1]));
        assert!(!super::is_hanzi_pair(&[0xB0, 0xA0]));
    }

    #[test]
    fn test_is_alphanumeric() {
        assert!(Alphanumeric.contains(b'0'));
        assert!(Alphanumeric.contains(b'Z'));
        assert!(Alphanumeric.contains(b' '));
        assert!(Alphanumeric.contains(b':'));
        assert!(!Alphanumeric.contains(b'@'));
        assert!(!Alphanumeric.contains(b'a'));
        assert!(!Eci.contains(b'0'));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Numeric.encoded_len(3), 10);
        assert_eq!(Numeric.encoded_len(2), 7);
        assert_eq!(Numeric.encoded_len(1), 4);
        assert_eq!(Alphanumeric.encoded_len(2), 11);
        assert_eq!(Alphanumeric.encoded_len(1), 6);
        assert_eq!(Byte.encoded_len(1), 8);
        assert_eq!(Kanji.encoded_len(4), 26);
    }
}
