use encoding_rs::Encoding;

use super::mode::{Mode, GB2312_SUBSET};
use crate::common::bits::BitSource;
use crate::common::error::{CodecError, CodecResult};
use crate::common::metadata::{DecodedResult, StructuredAppend};
use crate::qr::version::Version;

// Group separator emitted for FNC1 in alphanumeric segments
const GS: char = '\u{1D}';

// Decoder
//------------------------------------------------------------------------------

// Decodes corrected data codewords into text and segment metadata
pub fn decode(codewords: &[u8], ver: Version) -> CodecResult<DecodedResult> {
    let mut bits = BitSource::new(codewords);
    let mut res = DecodedResult::new(String::new(), codewords.to_vec());
    let mut charset: Option<&'static Encoding> = None;
    let mut fnc1 = false;

    loop {
        // Running out of bits is an implicit terminator
        let mode =
            if bits.available() < 4 { Mode::Terminator } else { Mode::from_bits(read(&mut bits, 4)?)? };
        match mode {
            Mode::Terminator => break,
            Mode::Fnc1First | Mode::Fnc1Second => fnc1 = true,
            Mode::StructuredAppend => {
                let seq = read(&mut bits, 8)? as u8;
                let parity = read(&mut bits, 8)? as u8;
                res.structured_append =
                    Some(StructuredAppend { index: seq >> 4, total: (seq & 0xF) + 1, parity });
            }
            Mode::Eci => {
                let eci = parse_eci(&mut bits)?;
                crate::debug_log!("QR decode: ECI {eci}");
                charset = Some(eci_encoding(eci)?);
            }
            Mode::Hanzi => {
                let subset = read(&mut bits, 4)? as u8;
                if subset != GB2312_SUBSET {
                    return Err(CodecError::UnsupportedMode);
                }
                let cnt = read(&mut bits, mode.char_count_bits(ver))? as usize;
                decode_double_byte(&mut bits, cnt, mode, &mut res)?;
            }
            _ => {
                let cnt = read(&mut bits, mode.char_count_bits(ver))? as usize;
                match mode {
                    Mode::Numeric => decode_numeric(&mut bits, cnt, &mut res.text)?,
                    Mode::Alphanumeric => decode_alphanumeric(&mut bits, cnt, fnc1, &mut res.text)?,
                    Mode::Byte => decode_byte(&mut bits, cnt, charset, &mut res)?,
                    _ => decode_double_byte(&mut bits, cnt, mode, &mut res)?,
                }
            }
        }
    }
    Ok(res)
}

// Short reads inside a segment mean the stream is malformed
fn read(bits: &mut BitSource, n: usize) -> CodecResult<u32> {
    bits.read_bits(n).map_err(|_| CodecError::MalformedSegment)
}

fn decode_numeric(bits: &mut BitSource, mut cnt: usize, out: &mut String) -> CodecResult<()> {
    let mut push_digits = |n: usize, len: usize, limit: u32| -> CodecResult<()> {
        let v = read(bits, n)?;
        if v >= limit {
            return Err(CodecError::MalformedSegment);
        }
        out.push_str(&format!("{v:0len$}"));
        Ok(())
    };
    while cnt >= 3 {
        push_digits(10, 3, 1000)?;
        cnt -= 3;
    }
    match cnt {
        2 => push_digits(7, 2, 100),
        1 => push_digits(4, 1, 10),
        _ => Ok(()),
    }
}

fn decode_alphanumeric(
    bits: &mut BitSource,
    mut cnt: usize,
    fnc1: bool,
    out: &mut String,
) -> CodecResult<()> {
    let mut seg = Vec::with_capacity(cnt);
    while cnt > 1 {
        let v = read(bits, 11)?;
        seg.push(Mode::alphanumeric_char(v / 45)?);
        seg.push(Mode::alphanumeric_char(v % 45)?);
        cnt -= 2;
    }
    if cnt == 1 {
        seg.push(Mode::alphanumeric_char(read(bits, 6)?)?);
    }

    if !fnc1 {
        out.extend(seg.iter().map(|&b| b as char));
        return Ok(());
    }
    // In FNC1 symbols "%%" is a literal percent and a lone "%" separates fields
    let mut it = seg.iter().peekable();
    while let Some(&b) = it.next() {
        match b {
            b'%' if it.peek() == Some(&&b'%') => {
                it.next();
                out.push('%');
            }
            b'%' => out.push(GS),
            _ => out.push(b as char),
        }
    }
    Ok(())
}

fn decode_byte(
    bits: &mut BitSource,
    cnt: usize,
    charset: Option<&'static Encoding>,
    res: &mut DecodedResult,
) -> CodecResult<()> {
    if cnt * 8 > bits.available() {
        return Err(CodecError::MalformedSegment);
    }
    let bytes = (0..cnt).map(|_| read(bits, 8).map(|b| b as u8)).collect::<CodecResult<Vec<_>>>()?;
    let text = match charset {
        Some(enc) => enc.decode_without_bom_handling(&bytes).0.into_owned(),
        None => guess_text(&bytes),
    };
    res.text.push_str(&text);
    res.byte_segments.push(bytes);
    Ok(())
}

fn decode_double_byte(
    bits: &mut BitSource,
    cnt: usize,
    mode: Mode,
    res: &mut DecodedResult,
) -> CodecResult<()> {
    if cnt * 13 > bits.available() {
        return Err(CodecError::MalformedSegment);
    }
    let mut bytes = Vec::with_capacity(cnt * 2);
    for _ in 0..cnt {
        let v = read(bits, 13)? as u16;
        bytes.extend(mode.decode_double_byte(v));
    }
    let enc = if mode == Mode::Kanji { encoding_rs::SHIFT_JIS } else { encoding_rs::GBK };
    res.text.push_str(&enc.decode_without_bom_handling(&bytes).0);
    Ok(())
}

// Byte segments without an ECI are UTF-8 when valid, else ISO-8859-1
fn guess_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}

// ECI
//------------------------------------------------------------------------------

// ECI designator in its 1, 2 or 3 byte form
fn parse_eci(bits: &mut BitSource) -> CodecResult<u32> {
    let first = read(bits, 8)?;
    if first & 0x80 == 0 {
        Ok(first & 0x7F)
    } else if first & 0xC0 == 0x80 {
        Ok(((first & 0x3F) << 8) | read(bits, 8)?)
    } else if first & 0xE0 == 0xC0 {
        Ok(((first & 0x1F) << 16) | read(bits, 16)?)
    } else {
        Err(CodecError::UnsupportedEci)
    }
}

pub fn eci_encoding(eci: u32) -> CodecResult<&'static Encoding> {
    use encoding_rs::*;
    let enc = match eci {
        1 | 3 | 23 | 27 => WINDOWS_1252,
        4 => ISO_8859_2,
        5 => ISO_8859_3,
        6 => ISO_8859_4,
        7 => ISO_8859_5,
        8 => ISO_8859_6,
        9 => ISO_8859_7,
        10 => ISO_8859_8,
        11 => WINDOWS_1254,
        12 => ISO_8859_10,
        13 => WINDOWS_874,
        15 => ISO_8859_13,
        16 => ISO_8859_14,
        17 => ISO_8859_15,
        18 => ISO_8859_16,
        20 => SHIFT_JIS,
        21 => WINDOWS_1250,
        22 => WINDOWS_1251,
        24 => WINDOWS_1256,
        25 => UTF_16BE,
        26 => UTF_8,
        28 => BIG5,
        29 => GB18030,
        30 => EUC_KR,
        _ => return Err(CodecError::UnsupportedEci),
    };
    Ok(enc)
}
