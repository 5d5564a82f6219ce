use std::borrow::Cow;
use std::mem::swap;

use encoding_rs::{GBK, SHIFT_JIS};

use super::mode::{
    is_hanzi_pair, is_kanji_pair, Mode, Segment, GB2312_SUBSET, MODES, PADDING_CODEWORDS,
};
use crate::common::bits::BitVector;
use crate::common::error::{CodecError, CodecResult};
use crate::common::metadata::{Charset, ECLevel};
use crate::qr::version::Version;

pub use encode::*;

// ECI designators written by the encoder
const ECI_SHIFT_JIS: u32 = 20;
const ECI_UTF8: u32 = 26;
const ECI_GB18030: u32 = 29;

// Payload
//------------------------------------------------------------------------------

// Bytes to be segmented, after charset conversion
#[derive(Debug)]
pub(crate) struct Payload<'a> {
    pub eci: Option<u32>,
    pub bytes: Cow<'a, [u8]>,
    // Single mode for the whole payload, bypassing segmentation
    pub fixed_mode: Option<Mode>,
}

impl<'a> Payload<'a> {
    pub fn new(data: &'a [u8], charset: Charset) -> CodecResult<Self> {
        match charset {
            Charset::Utf8 => {
                let eci = match std::str::from_utf8(data) {
                    Ok(s) if !s.is_ascii() => Some(ECI_UTF8),
                    _ => None,
                };
                Ok(Self { eci, bytes: Cow::Borrowed(data), fixed_mode: None })
            }
            Charset::ShiftJis => Self::double_byte(data, SHIFT_JIS, Mode::Kanji, ECI_SHIFT_JIS),
            Charset::Gb2312 => Self::double_byte(data, GBK, Mode::Hanzi, ECI_GB18030),
        }
    }

    fn double_byte(
        data: &[u8],
        encoding: &'static encoding_rs::Encoding,
        mode: Mode,
        eci: u32,
    ) -> CodecResult<Self> {
        let text = std::str::from_utf8(data).map_err(|_| CodecError::UnencodableText)?;
        let (encoded, _, had_errors) = encoding.encode(text);
        if had_errors {
            return Err(CodecError::UnencodableText);
        }
        let bytes = encoded.into_owned();
        let fits = |pair: &[u8]| match mode {
            Mode::Kanji => is_kanji_pair(pair),
            _ => is_hanzi_pair(pair),
        };
        if bytes.len() % 2 == 0 && bytes.chunks(2).all(fits) {
            Ok(Self { eci: None, bytes: Cow::Owned(bytes), fixed_mode: Some(mode) })
        } else {
            // Trail bytes may look alphanumeric, keep multibyte chars in one segment
            Ok(Self { eci: Some(eci), bytes: Cow::Owned(bytes), fixed_mode: Some(Mode::Byte) })
        }
    }

    fn eci_bit_len(&self) -> usize {
        match self.eci {
            None => 0,
            Some(0..=127) => 12,
            Some(128..=16383) => 20,
            Some(_) => 28,
        }
    }

    fn segments(&self, ver: Version) -> Vec<Segment> {
        match self.fixed_mode {
            Some(mode) => vec![Segment::new(mode, ver, &self.bytes)],
            None => encode::compute_optimal_segments(&self.bytes, ver),
        }
    }
}

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use super::*;
    use super::writer::{pad_remaining_capacity, push_eci, push_segment, push_terminator};

    // Data codewords in the smallest version that fits
    pub fn encode(
        data: &[u8],
        ecl: ECLevel,
        charset: Charset,
    ) -> CodecResult<(Vec<u8>, Version)> {
        if data.is_empty() {
            return Err(CodecError::EmptyData);
        }
        let payload = Payload::new(data, charset)?;
        let (ver, segs) = find_optimal_version_and_segments(&payload, ecl)?;
        crate::debug_log!("QR encode: {} segments, version {}", segs.len(), *ver);
        let codewords = write_codewords(&payload, &segs, ver, ecl)?;
        Ok((codewords, ver))
    }

    pub fn encode_with_version(
        data: &[u8],
        ver: Version,
        ecl: ECLevel,
        charset: Charset,
    ) -> CodecResult<Vec<u8>> {
        if data.is_empty() {
            return Err(CodecError::EmptyData);
        }
        let payload = Payload::new(data, charset)?;
        let segs = payload.segments(ver);
        write_codewords(&payload, &segs, ver, ecl)
    }

    fn write_codewords(
        payload: &Payload,
        segs: &[Segment],
        ver: Version,
        ecl: ECLevel,
    ) -> CodecResult<Vec<u8>> {
        let bcap = ver.data_bit_capacity(ecl);
        let sz = payload.eci_bit_len() + segs.iter().map(|s| s.bit_len()).sum::<usize>();
        if sz > bcap {
            return Err(CodecError::DataTooLong);
        }

        let mut bs = BitVector::new();
        if let Some(eci) = payload.eci {
            push_eci(eci, &mut bs)?;
        }
        for seg in segs {
            push_segment(seg, &mut bs)?;
        }
        push_terminator(&mut bs, bcap)?;
        pad_remaining_capacity(&mut bs, bcap)?;
        Ok(bs.to_bytes())
    }

    pub(super) fn find_optimal_version_and_segments<'a>(
        payload: &'a Payload,
        ecl: ECLevel,
    ) -> CodecResult<(Version, Vec<Segment<'a>>)> {
        let mut segs = vec![];
        let mut sz = 0;
        for ver in Version::all() {
            let bcap = ver.data_bit_capacity(ecl);
            // Char count widths only change at these versions
            if matches!(*ver, 1 | 10 | 27) {
                segs = payload.segments(ver);
                sz = payload.eci_bit_len() + segs.iter().map(|s| s.bit_len()).sum::<usize>();
            }
            if sz <= bcap {
                return Ok((ver, segs));
            }
        }
        Err(CodecError::DataTooLong)
    }

    // Dynamic programming to compute optimum mode segments
    pub(super) fn compute_optimal_segments(data: &[u8], ver: Version) -> Vec<Segment> {
        if data.is_empty() {
            return vec![];
        }

        let len = data.len();
        let mut prev_cost = [0usize; 3];
        MODES
            .iter()
            .enumerate()
            .for_each(|(i, &m)| prev_cost[i] = (4 + m.char_count_bits(ver)) * 6);
        let mut cur_cost = [usize::MAX; 3];
        let mut min_path = vec![[usize::MAX; 3]; len];
        for (i, b) in data.iter().enumerate() {
            for (j, to_mode) in MODES.iter().enumerate() {
                if !to_mode.contains(*b) {
                    continue;
                }
                // Sixths of a bit per character
                let encoded_char_size = match to_mode {
                    Mode::Numeric => 20,
                    Mode::Alphanumeric => 33,
                    _ => 48,
                };
                for (k, from_mode) in MODES.iter().enumerate() {
                    if prev_cost[k] == usize::MAX {
                        continue;
                    }
                    let mut cost = 0;
                    if to_mode != from_mode {
                        cost += prev_cost[k].div_ceil(6) * 6;
                        cost += (4 + to_mode.char_count_bits(ver)) * 6;
                    } else {
                        cost += prev_cost[k];
                    }
                    cost += encoded_char_size;
                    if cost < cur_cost[j] {
                        cur_cost[j] = cost;
                        min_path[i][j] = k;
                    }
                }
            }
            swap(&mut prev_cost, &mut cur_cost);
            cur_cost.fill(usize::MAX);
        }

        let char_modes = trace_optimal_modes(min_path, prev_cost);
        build_segments(ver, char_modes, data)
    }

    // Backtrack min_path and identify optimal char mode
    fn trace_optimal_modes(min_path: Vec<[usize; 3]>, prev_cost: [usize; 3]) -> Vec<Mode> {
        let len = min_path.len();
        let mut mode_index = 0;
        for i in 1..3 {
            if prev_cost[i] < prev_cost[mode_index] {
                mode_index = i;
            }
        }
        (0..len)
            .rev()
            .scan(mode_index, |mi, i| {
                let old_mi = *mi;
                *mi = min_path[i][*mi];
                Some(MODES[old_mi])
            })
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    // Groups consecutive chars of one mode into a segment
    pub(super) fn build_segments(ver: Version, char_modes: Vec<Mode>, data: &[u8]) -> Vec<Segment> {
        let len = data.len();
        let mut segs: Vec<Segment> = vec![];
        let mut seg_start = 0;
        let mut seg_mode = char_modes[0];
        for (i, &m) in char_modes.iter().enumerate().skip(1) {
            if seg_mode != m {
                segs.push(Segment::new(seg_mode, ver, &data[seg_start..i]));
                seg_mode = m;
                seg_start = i;
            }
        }
        segs.push(Segment::new(seg_mode, ver, &data[seg_start..len]));

        segs
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use super::{GB2312_SUBSET, PADDING_CODEWORDS};
    use crate::common::bits::BitVector;
    use crate::common::error::{CodecError, CodecResult};
    use crate::qr::codec::mode::{Mode, Segment};

    pub fn push_segment(seg: &Segment, out: &mut BitVector) -> CodecResult<()> {
        push_header(seg, out)?;
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Kanji | Mode::Hanzi => push_double_byte_data(seg.mode, seg.data, out),
            _ => push_byte_data(seg.data, out),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitVector) -> CodecResult<()> {
        out.append_bits(seg.mode as u8, 4)?;
        if seg.mode == Mode::Hanzi {
            out.append_bits(GB2312_SUBSET, 4)?;
        }
        let char_cnt = seg.char_count();
        if char_cnt >= (1 << seg.len_bits) {
            return Err(CodecError::DataTooLong);
        }
        out.append_bits(char_cnt as u32, seg.len_bits)
    }

    pub fn push_eci(eci: u32, out: &mut BitVector) -> CodecResult<()> {
        out.append_bits(Mode::Eci as u8, 4)?;
        match eci {
            0..=127 => out.append_bits(eci, 8),
            128..=16383 => out.append_bits(0x8000 | eci, 16),
            16384..=999999 => out.append_bits(0xC00000 | eci, 24),
            _ => Err(CodecError::UnsupportedEci),
        }
    }

    fn push_numeric_data(data: &[u8], out: &mut BitVector) -> CodecResult<()> {
        for chunk in data.chunks(3) {
            let len = (chunk.len() * 10).div_ceil(3);
            out.append_bits(Mode::Numeric.encode_chunk(chunk), len)?;
        }
        Ok(())
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitVector) -> CodecResult<()> {
        for chunk in data.chunks(2) {
            let len = (chunk.len() * 11).div_ceil(2);
            out.append_bits(Mode::Alphanumeric.encode_chunk(chunk), len)?;
        }
        Ok(())
    }

    fn push_byte_data(data: &[u8], out: &mut BitVector) -> CodecResult<()> {
        for &b in data {
            out.append_bits(b, 8)?;
        }
        Ok(())
    }

    fn push_double_byte_data(mode: Mode, data: &[u8], out: &mut BitVector) -> CodecResult<()> {
        for pair in data.chunks(2) {
            out.append_bits(mode.encode_chunk(pair), 13)?;
        }
        Ok(())
    }

    // Up to four zero bits, fewer if the capacity runs out
    pub fn push_terminator(out: &mut BitVector, bit_capacity: usize) -> CodecResult<()> {
        let bit_len = out.len();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.append_bits(0u8, term_len)?;
        }
        Ok(())
    }

    pub fn pad_remaining_capacity(out: &mut BitVector, bit_capacity: usize) -> CodecResult<()> {
        push_padding_bits(out)?;
        push_padding_codewords(out, bit_capacity)
    }

    fn push_padding_bits(out: &mut BitVector) -> CodecResult<()> {
        let offset = out.len() & 7;
        if offset > 0 {
            out.append_bits(0u8, 8 - offset)?;
        }
        Ok(())
    }

    fn push_padding_codewords(out: &mut BitVector, bit_capacity: usize) -> CodecResult<()> {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = bit_capacity.saturating_sub(out.len()) >> 3;
        for pc in PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity) {
            out.append_bits(pc, 8)?;
        }
        Ok(())
    }

}
