use super::{
    randomize_255_offset, C40_SHIFT2_CHARS, EDIFACT_UNLATCH, LATCH_BASE256, LATCH_C40,
    LATCH_EDIFACT, LATCH_TEXT, LATCH_X12, PAD, UNLATCH, UPPER_SHIFT,
};
use crate::common::bits::BitSource;
use crate::common::error::{CodecError, CodecResult};
use crate::common::metadata::DecodedResult;

const FNC1: u8 = 232;
const MACRO_05: u8 = 236;
const MACRO_06: u8 = 237;

const GS: u8 = 0x1D;
const MACRO_05_HEADER: &[u8] = b"[)>\x1E05\x1D";
const MACRO_06_HEADER: &[u8] = b"[)>\x1E06\x1D";
const MACRO_TRAILER: &[u8] = b"\x1E\x04";

static TEXT_SHIFT3_CHARS: &[u8; 32] = b"`ABCDEFGHIJKLMNOPQRSTUVWXYZ{|}~\x7F";

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum Scheme {
    Pad,
    Ascii,
    C40,
    Text,
    X12,
    Edifact,
    Base256,
}

// Decoder
//------------------------------------------------------------------------------

// Decodes corrected data codewords. Text holds one char per decoded byte, bytes
// above 0x7F map to the Latin-1 range.
pub fn decode(codewords: &[u8]) -> CodecResult<DecodedResult> {
    let mut bits = BitSource::new(codewords);
    let mut res = DecodedResult::new(String::new(), codewords.to_vec());
    let mut out = Vec::with_capacity(codewords.len() * 2);
    let mut trailer: Option<&[u8]> = None;

    let mut scheme = Scheme::Ascii;
    while scheme != Scheme::Pad && bits.available() > 0 {
        scheme = match scheme {
            Scheme::Ascii => decode_ascii(&mut bits, &mut out, &mut trailer)?,
            Scheme::C40 => {
                decode_c40_text(&mut bits, false, &mut out)?;
                Scheme::Ascii
            }
            Scheme::Text => {
                decode_c40_text(&mut bits, true, &mut out)?;
                Scheme::Ascii
            }
            Scheme::X12 => {
                decode_x12(&mut bits, &mut out)?;
                Scheme::Ascii
            }
            Scheme::Edifact => {
                decode_edifact(&mut bits, &mut out)?;
                Scheme::Ascii
            }
            Scheme::Base256 => {
                let bytes = decode_base256(&mut bits)?;
                out.extend_from_slice(&bytes);
                res.byte_segments.push(bytes);
                Scheme::Ascii
            }
            Scheme::Pad => break,
        };
        if scheme != Scheme::Ascii {
            crate::debug_log!("Data Matrix decode: {scheme:?} at codeword {}", bits.byte_offset());
        }
    }
    if let Some(t) = trailer {
        out.extend_from_slice(t);
    }

    res.text = out.iter().map(|&b| b as char).collect();
    Ok(res)
}

fn read(bits: &mut BitSource, n: usize) -> CodecResult<u8> {
    bits.read_bits(n).map(|v| v as u8).map_err(|_| CodecError::MalformedSegment)
}

// Reads until a latch or a pad, returning the next scheme
fn decode_ascii(
    bits: &mut BitSource,
    out: &mut Vec<u8>,
    trailer: &mut Option<&[u8]>,
) -> CodecResult<Scheme> {
    let mut upper_shift = false;
    while bits.available() >= 8 {
        let cw = read(bits, 8)?;
        match cw {
            0 => return Err(CodecError::MalformedSegment),
            1..=128 => {
                let c = cw - 1;
                out.push(if upper_shift { c + 128 } else { c });
                upper_shift = false;
            }
            PAD => return Ok(Scheme::Pad),
            130..=229 => out.extend_from_slice(format!("{:02}", cw - 130).as_bytes()),
            LATCH_C40 => return Ok(Scheme::C40),
            LATCH_BASE256 => return Ok(Scheme::Base256),
            FNC1 => {
                // Leading FNC1 only flags GS1 data
                if !out.is_empty() {
                    out.push(GS);
                }
            }
            // Only the marker is skipped. Structured append parameters and
            // ECI values that follow are read back as plain ASCII codewords.
            233 | 234 | 241 => {}
            UPPER_SHIFT => upper_shift = true,
            MACRO_05 | MACRO_06 => {
                out.extend_from_slice(if cw == MACRO_05 { MACRO_05_HEADER } else { MACRO_06_HEADER });
                *trailer = Some(MACRO_TRAILER);
            }
            LATCH_X12 => return Ok(Scheme::X12),
            LATCH_TEXT => return Ok(Scheme::Text),
            LATCH_EDIFACT => return Ok(Scheme::Edifact),
            // Unlatch as the very last codeword is tolerated
            UNLATCH if bits.available() == 0 => {}
            _ => return Err(CodecError::UnsupportedMode),
        }
    }
    Ok(Scheme::Ascii)
}

// Three values packed in two codewords: (v1 * 1600) + (v2 * 40) + v3 + 1
fn unpack_triplet(b1: u8, b2: u8) -> [u8; 3] {
    let v = ((b1 as u16) << 8 | b2 as u16).wrapping_sub(1);
    [(v / 1600) as u8, (v / 40 % 40) as u8, (v % 40) as u8]
}

// Next triplet, or none at an unlatch or a single trailing codeword
fn next_triplet(bits: &mut BitSource) -> CodecResult<Option<[u8; 3]>> {
    if bits.available() <= 8 {
        return Ok(None);
    }
    let b1 = read(bits, 8)?;
    if b1 == UNLATCH {
        return Ok(None);
    }
    let b2 = read(bits, 8)?;
    Ok(Some(unpack_triplet(b1, b2)))
}

fn decode_c40_text(bits: &mut BitSource, text: bool, out: &mut Vec<u8>) -> CodecResult<()> {
    let mut shift = 0;
    let mut upper_shift = false;
    let mut emit = |c: u8, upper_shift: &mut bool| {
        out.push(if *upper_shift { c.wrapping_add(128) } else { c });
        *upper_shift = false;
    };

    while let Some(values) = next_triplet(bits)? {
        for v in values {
            match shift {
                0 => match v {
                    0..=2 => shift = v + 1,
                    3 => emit(b' ', &mut upper_shift),
                    4..=13 => emit(b'0' + v - 4, &mut upper_shift),
                    14..=39 => {
                        let base = if text { b'a' } else { b'A' };
                        emit(base + v - 14, &mut upper_shift);
                    }
                    _ => return Err(CodecError::MalformedSegment),
                },
                1 => {
                    emit(v, &mut upper_shift);
                    shift = 0;
                }
                2 => {
                    match v {
                        0..=26 => emit(C40_SHIFT2_CHARS[v as usize], &mut upper_shift),
                        27 => emit(GS, &mut upper_shift),
                        30 => upper_shift = true,
                        _ => return Err(CodecError::MalformedSegment),
                    }
                    shift = 0;
                }
                _ => {
                    if v >= 32 {
                        return Err(CodecError::MalformedSegment);
                    }
                    let c = if text { TEXT_SHIFT3_CHARS[v as usize] } else { v + 96 };
                    emit(c, &mut upper_shift);
                    shift = 0;
                }
            }
        }
    }
    Ok(())
}

fn decode_x12(bits: &mut BitSource, out: &mut Vec<u8>) -> CodecResult<()> {
    while let Some(values) = next_triplet(bits)? {
        for v in values {
            out.push(match v {
                0 => b'\r',
                1 => b'*',
                2 => b'>',
                3 => b' ',
                4..=13 => v + 44,
                14..=39 => v + 51,
                _ => return Err(CodecError::MalformedSegment),
            });
        }
    }
    Ok(())
}

// Four 6 bit values per three codewords, 0x1F unlatches
fn decode_edifact(bits: &mut BitSource, out: &mut Vec<u8>) -> CodecResult<()> {
    while bits.available() > 16 {
        for _ in 0..4 {
            let v = read(bits, 6)?;
            if v == EDIFACT_UNLATCH {
                // Rest of the codeword is padding
                let left = 8 - bits.bit_offset();
                if left != 8 {
                    read(bits, left)?;
                }
                return Ok(());
            }
            out.push(if v & 0x20 == 0 { v | 0x40 } else { v });
        }
    }
    Ok(())
}

fn decode_base256(bits: &mut BitSource) -> CodecResult<Vec<u8>> {
    let mut pos = 1 + bits.byte_offset();
    let mut next = |bits: &mut BitSource| -> CodecResult<u8> {
        let v = read(bits, 8)?.wrapping_sub(randomize_255_offset(pos));
        pos += 1;
        Ok(v)
    };

    let d1 = next(bits)? as usize;
    let count = match d1 {
        // Zero length runs to the end of the symbol
        0 => bits.available() / 8,
        1..=249 => d1,
        _ => 250 * (d1 - 249) + next(bits)? as usize,
    };

    let mut bytes = Vec::with_capacity(count);
    for _ in 0..count {
        if bits.available() < 8 {
            return Err(CodecError::MalformedSegment);
        }
        bytes.push(next(bits)?);
    }
    Ok(bytes)
}

#[cfg(test)]
mod decoder_tests {
    use super::{decode, unpack_triplet};
    use crate::common::error::CodecError;
    use crate::datamatrix::codec::{encode, Encodation};
    use crate::datamatrix::version::SymbolShape;
    use test_case::test_case;

    fn latin1(data: &[u8]) -> String {
        data.iter().map(|&b| b as char).collect()
    }

    #[test]
    fn test_ascii_digits_and_pad() {
        let res = decode(&[142, 164, 186, 129, 70]).unwrap();
        assert_eq!(res.text, "123456");
        assert_eq!(res.raw_codewords, vec![142, 164, 186, 129, 70]);
    }

    #[test]
    fn test_upper_shift() {
        assert_eq!(decode(&[235, 106, 66]).unwrap().text, "\u{E9}A");
    }

    #[test]
    fn test_unpack_triplet() {
        assert_eq!(unpack_triplet(91, 11), [14, 22, 26]);
    }

    #[test]
    fn test_c40() {
        assert_eq!(decode(&[230, 91, 11, 254, 66]).unwrap().text, "AIMA");
        // Single codeword after the triplets goes back to ASCII
        assert_eq!(decode(&[230, 91, 11, 66]).unwrap().text, "AIMA");
    }

    #[test]
    fn test_skipped_markers_keep_parameters() {
        assert_eq!(decode(&[233, 66, 67, 68, 69]).unwrap().text, "ABCD");
        assert_eq!(decode(&[241, 4, 66]).unwrap().text, "\u{3}A");
        assert_eq!(decode(&[234, 66]).unwrap().text, "A");
    }

    #[test]
    fn test_macro_header() {
        let res = decode(&[236, 66, 129]).unwrap();
        assert_eq!(res.text, "[)>\u{1E}05\u{1D}A\u{1E}\u{04}");
    }

    #[test]
    fn test_edifact() {
        // A B C then unlatch: 000001 000010 000011 011111
        assert_eq!(decode(&[240, 0x04, 0x20, 0xDF, 66]).unwrap().text, "ABCA");
    }

    #[test]
    fn test_base256() {
        let res = decode(&[231, 45, 0x6C]).unwrap();
        assert_eq!(res.byte_segments, vec![vec![0xAB]]);
        assert_eq!(res.text, "\u{AB}");
    }

    #[test]
    fn test_base256_to_end_of_symbol() {
        // Length 0 at position 2 is randomized to 44
        let res = decode(&[231, 44, 0xABu8.wrapping_add(193), 0x01u8.wrapping_add(87)]).unwrap();
        assert_eq!(res.byte_segments, vec![vec![0xAB, 0x01]]);
    }

    #[test]
    fn test_fnc1() {
        // Leading FNC1 is a GS1 flag, later ones separate fields
        assert_eq!(decode(&[232, 66, 232, 67]).unwrap().text, "A\u{1D}B");
    }

    #[test_case(&[0], CodecError::MalformedSegment)]
    #[test_case(&[250], CodecError::UnsupportedMode)]
    #[test_case(&[254, 66], CodecError::UnsupportedMode)]
    #[test_case(&[231, 46], CodecError::MalformedSegment)]
    #[test_case(&[230, 0xFA, 0x01], CodecError::MalformedSegment)]
    fn test_malformed(codewords: &[u8], err: CodecError) {
        assert_eq!(decode(codewords), Err(err));
    }

    #[test_case(b"Hello, World! 123", Encodation::Auto)]
    #[test_case(b"Hello, World! 123", Encodation::C40)]
    #[test_case(b"hello `World` {~}", Encodation::Text)]
    #[test_case(b"AB>*12\r 9Z", Encodation::X12)]
    #[test_case(b"ABCD", Encodation::X12)]
    #[test_case(b"\x00\x1F\x7F\xE9\xFF tail", Encodation::C40)]
    #[test_case(b"\x00\x1F\x7F\xE9\xFF tail", Encodation::Text)]
    #[test_case(b"\x00\x1F\x7F\xE9\xFF tail", Encodation::Base256)]
    #[test_case(b"0123456789 digits", Encodation::Ascii)]
    #[test_case(b"ABCD", Encodation::Edifact)]
    #[test_case(b"EDI 0123:?@^ UNH+1", Encodation::Edifact)]
    fn test_codec_round_trip(data: &[u8], encodation: Encodation) {
        let (codewords, ver) = encode(data, encodation, SymbolShape::Any).unwrap();
        assert_eq!(codewords.len(), ver.data_codewords());
        assert_eq!(decode(&codewords).unwrap().text, latin1(data));
    }

    #[test]
    fn test_long_base256_length() {
        let data: Vec<u8> = (0..600).map(|i| (i % 256) as u8).collect();
        let (codewords, _) = encode(&data, Encodation::Base256, SymbolShape::Square).unwrap();
        let res = decode(&codewords).unwrap();
        assert_eq!(res.byte_segments, vec![data]);
    }
}
