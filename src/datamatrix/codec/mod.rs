mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::{encode, encode_with_version, Encodation};

// Codewords shared by both directions
//------------------------------------------------------------------------------

pub(crate) const PAD: u8 = 129;
pub(crate) const LATCH_C40: u8 = 230;
pub(crate) const LATCH_BASE256: u8 = 231;
pub(crate) const UPPER_SHIFT: u8 = 235;
pub(crate) const LATCH_X12: u8 = 238;
pub(crate) const LATCH_TEXT: u8 = 239;
pub(crate) const LATCH_EDIFACT: u8 = 240;
pub(crate) const UNLATCH: u8 = 254;

// EDIFACT value that returns to ASCII
pub(crate) const EDIFACT_UNLATCH: u8 = 0x1F;

pub(crate) static C40_SHIFT2_CHARS: &[u8; 27] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_";

// 1 based position dependent offset applied to Base256 codewords
pub(crate) fn randomize_255_offset(position: usize) -> u8 {
    ((149 * position) % 255 + 1) as u8
}
