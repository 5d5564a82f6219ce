use crate::common::error::CodecResult;
use crate::common::matrix::BitMatrix;
use crate::common::metadata::DecodedResult;
use crate::{datamatrix, qr};

// QR reader
//------------------------------------------------------------------------------

pub struct QRReader();

impl QRReader {
    // Decodes a sampled symbol grid, one module per cell and no quiet zone
    pub fn read(symbol: &BitMatrix) -> CodecResult<DecodedResult> {
        crate::debug_log!("Reading QR...");

        crate::debug_log!("Reading version...");
        let ver = qr::placement::read_version(symbol)?;

        crate::debug_log!("Reading format info...");
        let format = qr::placement::read_format_info(symbol)?;
        let ecl = format.ec_level;
        crate::debug_log!("Version: {}, Ec level: {ecl:?}, Mask: {}", *ver, *format.mask);

        crate::debug_log!("Extracting codewords...");
        let raw = qr::placement::read_codewords(symbol, ver, format.mask)?;

        crate::debug_log!("Deinterleaving & rectifying blocks...");
        let mut blocks = qr::blocks::deinterleave(&raw, ver, ecl)?;
        let (data, corrected) = qr::blocks::rectify_blocks(&mut blocks)?;

        crate::debug_log!("Decoding segments...");
        let mut res = qr::codec::decode(&data, ver)?;
        res.ec_level = Some(ecl);
        res.errors_corrected = corrected;
        Ok(res)
    }
}

// Data Matrix reader
//------------------------------------------------------------------------------

pub struct DataMatrixReader();

impl DataMatrixReader {
    // Decodes a sampled symbol grid including its finder and timing edges
    pub fn read(symbol: &BitMatrix) -> CodecResult<DecodedResult> {
        crate::debug_log!("Reading Data Matrix...");
        let ver = datamatrix::placement::read_version(symbol)?;
        crate::debug_log!("Version: {}, {}x{}", *ver, ver.rows(), ver.cols());

        crate::debug_log!("Extracting codewords...");
        let raw = datamatrix::placement::read_codewords(symbol, ver)?;

        crate::debug_log!("Deinterleaving & rectifying blocks...");
        let mut blocks = datamatrix::blocks::deinterleave(&raw, ver)?;
        let (data, corrected) = datamatrix::blocks::rectify_blocks(&mut blocks, ver)?;

        crate::debug_log!("Decoding segments...");
        let mut res = datamatrix::codec::decode(&data)?;
        res.errors_corrected = corrected;
        Ok(res)
    }
}
