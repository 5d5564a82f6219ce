use super::{
    randomize_255_offset, C40_SHIFT2_CHARS, EDIFACT_UNLATCH, LATCH_BASE256, LATCH_C40,
    LATCH_EDIFACT, LATCH_TEXT, LATCH_X12, PAD, UNLATCH, UPPER_SHIFT,
};
use crate::common::bits::BitVector;
use crate::common::error::{CodecError, CodecResult};
use crate::datamatrix::version::{SymbolShape, Version};

// Encodation
//------------------------------------------------------------------------------

// Scheme used for the data, Auto picks the shortest
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Encodation {
    #[default]
    Auto,
    Ascii,
    C40,
    Text,
    X12,
    Edifact,
    Base256,
}

impl Encodation {
    const CANDIDATES: [Encodation; 6] = [
        Encodation::Ascii,
        Encodation::C40,
        Encodation::Text,
        Encodation::X12,
        Encodation::Edifact,
        Encodation::Base256,
    ];
}

// Encoded data before padding
#[derive(Debug, PartialEq, Eq)]
struct Encoded {
    codewords: Vec<u8>,
    // A final unlatch that may be dropped when the symbol is exactly full
    trailing_unlatch: bool,
    // Smallest data capacity that still decodes, may exceed the codewords
    min_len: usize,
}

impl Encoded {
    fn new(codewords: Vec<u8>, trailing_unlatch: bool) -> Self {
        let min_len = codewords.len() - trailing_unlatch as usize;
        Self { codewords, trailing_unlatch, min_len }
    }

    fn min_len(&self) -> usize {
        self.min_len
    }
}

// Encoder
//------------------------------------------------------------------------------

// Data codewords in the smallest symbol of the shape that fits
pub fn encode(
    data: &[u8],
    encodation: Encodation,
    shape: SymbolShape,
) -> CodecResult<(Vec<u8>, Version)> {
    let enc = encode_data(data, encodation)?;
    let ver = Version::all()
        .filter(|v| v.fits_shape(shape) && v.data_codewords() >= enc.min_len())
        .min_by_key(|v| v.data_codewords())
        .ok_or(CodecError::DataTooLong)?;
    crate::debug_log!("Data Matrix encode: {} codewords, version {}", enc.min_len(), *ver);
    Ok((pad(enc, ver.data_codewords()), ver))
}

pub fn encode_with_version(
    data: &[u8],
    encodation: Encodation,
    version: Version,
) -> CodecResult<Vec<u8>> {
    let enc = encode_data(data, encodation)?;
    if enc.min_len() > version.data_codewords() {
        return Err(CodecError::DataTooLong);
    }
    Ok(pad(enc, version.data_codewords()))
}

fn encode_data(data: &[u8], encodation: Encodation) -> CodecResult<Encoded> {
    if data.is_empty() {
        return Err(CodecError::EmptyData);
    }
    match encodation {
        Encodation::Auto => {
            // Ties go to the earlier scheme, ASCII first
            let mut best: Option<Encoded> = None;
            for e in Encodation::CANDIDATES {
                let Ok(enc) = encode_data(data, e) else { continue };
                if best.as_ref().map_or(true, |b| enc.min_len() < b.min_len()) {
                    best = Some(enc);
                }
            }
            best.ok_or(CodecError::UnencodableText)
        }
        Encodation::Ascii => Ok(Encoded::new(encode_ascii(data), false)),
        Encodation::C40 => encode_triplets(data, LATCH_C40, |b, out| c40_values(b, false, out)),
        Encodation::Text => encode_triplets(data, LATCH_TEXT, |b, out| c40_values(b, true, out)),
        Encodation::X12 => {
            if !data.iter().all(|&b| x12_value(b).is_some()) {
                return Err(CodecError::InvalidChar);
            }
            encode_triplets(data, LATCH_X12, |b, out| out.extend(x12_value(b)))
        }
        Encodation::Edifact => encode_edifact(data),
        Encodation::Base256 => encode_base256(data),
    }
}

// Digit pairs in one codeword, extended ASCII behind an upper shift
fn encode_ascii(data: &[u8]) -> Vec<u8> {
    let mut res = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        match data.get(i + 1) {
            Some(&n) if b.is_ascii_digit() && n.is_ascii_digit() => {
                res.push(130 + (b - b'0') * 10 + (n - b'0'));
                i += 2;
                continue;
            }
            _ => {}
        }
        if b >= 128 {
            res.push(UPPER_SHIFT);
            res.push(b - 128 + 1);
        } else {
            res.push(b + 1);
        }
        i += 1;
    }
    res
}

// C40 and Text values of one byte, with shift prefixes
fn c40_values(b: u8, text: bool, out: &mut Vec<u8>) {
    if b >= 128 {
        out.extend([1, 30]);
        return c40_values(b - 128, text, out);
    }
    match b {
        b' ' => out.push(3),
        b'0'..=b'9' => out.push(b - b'0' + 4),
        b'A'..=b'Z' if !text => out.push(b - b'A' + 14),
        b'a'..=b'z' if text => out.push(b - b'a' + 14),
        // Text shift 3 holds the capitals where C40 holds lower case
        b'A'..=b'Z' => out.extend([2, b - b'A' + 1]),
        0..=31 => out.extend([0, b]),
        _ => match C40_SHIFT2_CHARS.iter().position(|&c| c == b) {
            Some(i) => out.extend([1, i as u8]),
            None => out.extend([2, b - 96]),
        },
    }
}

fn x12_value(b: u8) -> Option<u8> {
    match b {
        b'\r' => Some(0),
        b'*' => Some(1),
        b'>' => Some(2),
        b' ' => Some(3),
        b'0'..=b'9' => Some(b - 44),
        b'A'..=b'Z' => Some(b - 51),
        _ => None,
    }
}

// Packs values in triplets after the latch. Trailing characters that don't
// fill a triplet go to ASCII after an unlatch.
fn encode_triplets(
    data: &[u8],
    latch: u8,
    values: impl Fn(u8, &mut Vec<u8>),
) -> CodecResult<Encoded> {
    let mut per_char: Vec<Vec<u8>> = data
        .iter()
        .map(|&b| {
            let mut v = Vec::with_capacity(4);
            values(b, &mut v);
            v
        })
        .collect();
    let is_x12 = latch == LATCH_X12;

    let mut count: usize = per_char.iter().map(|v| v.len()).sum();
    let mut tail = 0;
    // X12 has no shift value to pad with
    while (count % 3 == 1 || (is_x12 && count % 3 != 0)) && !per_char.is_empty() {
        if let Some(v) = per_char.pop() {
            count -= v.len();
            tail += 1;
        }
    }

    let mut flat: Vec<u8> = per_char.concat();
    if flat.len() % 3 == 2 {
        flat.push(0);
    }

    let mut res = Vec::with_capacity(1 + flat.len() * 2 / 3 + 1 + tail * 2);
    res.push(latch);
    for t in flat.chunks(3) {
        let v = 1600 * t[0] as u16 + 40 * t[1] as u16 + t[2] as u16 + 1;
        res.extend(v.to_be_bytes());
    }
    res.push(UNLATCH);
    res.extend(encode_ascii(&data[data.len() - tail..]));
    Ok(Encoded::new(res, tail == 0))
}

// Four 6 bit values per three codewords, closed by an unlatch value. A reader
// only starts a group with at least three codewords left, so the last group
// must fit whole in the symbol even when its tail is padding.
fn encode_edifact(data: &[u8]) -> CodecResult<Encoded> {
    if !data.iter().all(|b| (32..=94).contains(b)) {
        return Err(CodecError::InvalidChar);
    }
    let mut bits = BitVector::new();
    for &b in data {
        bits.append_bits(b & 0x3F, 6)?;
    }
    bits.append_bits(EDIFACT_UNLATCH, 6)?;

    let mut codewords = Vec::with_capacity(1 + bits.len_in_bytes());
    codewords.push(LATCH_EDIFACT);
    codewords.extend(bits.to_bytes());
    let groups = (data.len() + 1).div_ceil(4);
    Ok(Encoded { codewords, trailing_unlatch: false, min_len: 1 + 3 * groups })
}

fn encode_base256(data: &[u8]) -> CodecResult<Encoded> {
    let n = data.len();
    let mut res = vec![LATCH_BASE256];
    match n {
        0..=249 => res.push(n as u8),
        250..=1555 => res.extend([(n / 250 + 249) as u8, (n % 250) as u8]),
        _ => return Err(CodecError::DataTooLong),
    }
    res.extend_from_slice(data);
    for (i, cw) in res.iter_mut().enumerate().skip(1) {
        *cw = cw.wrapping_add(randomize_255_offset(i + 1));
    }
    Ok(Encoded::new(res, false))
}

// Fills the symbol capacity, first pad plain, the rest randomized
fn pad(enc: Encoded, capacity: usize) -> Vec<u8> {
    let mut res = enc.codewords;
    if enc.trailing_unlatch && res.len() == capacity + 1 {
        res.pop();
    }
    if res.len() < capacity {
        res.push(PAD);
    }
    while res.len() < capacity {
        let pos = res.len() + 1;
        let v = PAD as usize + (149 * pos) % 253 + 1;
        res.push(if v > 254 { v - 254 } else { v } as u8);
    }
    res
}
