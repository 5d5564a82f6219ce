// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    // Two bit value carried in the format info
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }

    pub fn from_format_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b01 => Self::L,
            0b00 => Self::M,
            0b11 => Self::Q,
            _ => Self::H,
        }
    }
}

// Charset
//------------------------------------------------------------------------------

// Character set used to encode text into a QR symbol
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Charset {
    #[default]
    Utf8,
    ShiftJis,
    Gb2312,
}

// Structured append
//------------------------------------------------------------------------------

// Position of a QR symbol within a sequence of up to 16 symbols
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct StructuredAppend {
    pub index: u8,
    pub total: u8,
    pub parity: u8,
}

// Decoded result
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedResult {
    pub text: String,
    // Corrected data codewords in stream order
    pub raw_codewords: Vec<u8>,
    // Raw bytes of each byte or Base256 segment
    pub byte_segments: Vec<Vec<u8>>,
    pub ec_level: Option<ECLevel>,
    pub structured_append: Option<StructuredAppend>,
    pub errors_corrected: usize,
}

impl DecodedResult {
    pub fn new(text: String, raw_codewords: Vec<u8>) -> Self {
        Self { text, raw_codewords, ..Default::default() }
    }
}
