use crate::common::error::{CodecError, CodecResult};
use crate::common::matrix::{BitMatrix, ModuleMatrix};
use crate::common::metadata::{Charset, ECLevel};
use crate::datamatrix::{self, Encodation, SymbolShape};
use crate::qr::{self, MaskPattern};

// QR
//------------------------------------------------------------------------------

pub struct QR {
    version: qr::Version,
    ec_level: ECLevel,
    mask: MaskPattern,
    grid: ModuleMatrix,
}

impl QR {
    pub fn version(&self) -> qr::Version {
        self.version
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.count_dark_modules()
    }

    pub fn to_bit_matrix(&self) -> BitMatrix {
        self.grid.to_bit_matrix()
    }

    pub fn to_str(&self, quiet_zone: usize) -> String {
        self.to_bit_matrix().to_str(quiet_zone)
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Version: {}, Ec level: {:?}, Mask: {} }}",
            *self.version, self.ec_level, *self.mask
        )
    }
}

// QR builder
//------------------------------------------------------------------------------

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<u8>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    charset: Charset,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None, charset: Charset::Utf8 }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: u8) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn charset(&mut self, charset: Charset) -> &mut Self {
        self.charset = charset;
        self
    }

    pub fn metadata(&self) -> String {
        let ver = self.version.map_or("None".to_string(), |v| v.to_string());
        format!(
            "{{ Version: {ver}, Ec level: {:?}, Charset: {:?} }}",
            self.ec_level, self.charset
        )
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> CodecResult<QR> {
        crate::debug_log!("Generating QR {}...", self.metadata());
        if self.data.is_empty() {
            return Err(CodecError::EmptyData);
        }

        crate::debug_log!("Encoding data...");
        let (data, version) = match self.version {
            Some(v) => {
                let ver = qr::Version::new(v)?;
                (qr::codec::encode_with_version(self.data, ver, self.ec_level, self.charset)?, ver)
            }
            None => {
                crate::debug_log!("Finding best version...");
                qr::codec::encode(self.data, self.ec_level, self.charset)?
            }
        };

        crate::debug_log!("Computing ecc & interleaving...");
        let blocks = qr::blocks::encode_blocks(&data, version, self.ec_level)?;
        let payload = qr::blocks::interleave(&blocks, version, self.ec_level)?;

        let (grid, mask) = match self.mask {
            Some(m) => {
                crate::debug_log!("Applying mask {}...", *m);
                (qr::placement::build_matrix(&payload, version, self.ec_level, m), m)
            }
            None => {
                crate::debug_log!("Finding & applying best mask...");
                qr::mask::build_with_best_mask(&payload, version, self.ec_level)
            }
        };

        let qr = QR { version, ec_level: self.ec_level, mask, grid };
        crate::debug_log!(
            "QR generated {}: {} data codewords, {} dark of {} modules",
            qr.metadata(),
            data.len(),
            qr.count_dark_modules(),
            qr.width() * qr.width()
        );
        Ok(qr)
    }
}

// Data Matrix
//------------------------------------------------------------------------------

pub struct DataMatrix {
    version: datamatrix::Version,
    grid: BitMatrix,
}

impl DataMatrix {
    pub fn version(&self) -> datamatrix::Version {
        self.version
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn to_bit_matrix(&self) -> BitMatrix {
        self.grid.clone()
    }

    pub fn to_str(&self, quiet_zone: usize) -> String {
        self.grid.to_str(quiet_zone)
    }
}

// Data Matrix builder
//------------------------------------------------------------------------------

pub struct DataMatrixBuilder<'a> {
    data: &'a [u8],
    version: Option<u8>,
    shape: SymbolShape,
    encodation: Encodation,
}

impl<'a> DataMatrixBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, shape: SymbolShape::Square, encodation: Encodation::Auto }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: u8) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn shape(&mut self, shape: SymbolShape) -> &mut Self {
        self.shape = shape;
        self
    }

    pub fn encodation(&mut self, encodation: Encodation) -> &mut Self {
        self.encodation = encodation;
        self
    }

    pub fn build(&self) -> CodecResult<DataMatrix> {
        crate::debug_log!("Generating Data Matrix with {:?} encodation...", self.encodation);
        let (data, version) = match self.version {
            Some(v) => {
                let ver = datamatrix::Version::new(v)?;
                (datamatrix::codec::encode_with_version(self.data, self.encodation, ver)?, ver)
            }
            None => datamatrix::codec::encode(self.data, self.encodation, self.shape)?,
        };

        crate::debug_log!("Computing ecc & interleaving...");
        let payload = datamatrix::blocks::encode_blocks(&data, version)?;

        crate::debug_log!("Placing codewords...");
        let grid = datamatrix::placement::build_symbol(&payload, version);
        crate::debug_log!("Data Matrix generated: {}x{}", grid.height(), grid.width());
        Ok(DataMatrix { version, grid })
    }
}

#[cfg(test)]
mod builder_tests {
    use super::{DataMatrixBuilder, QRBuilder};
    use crate::common::error::CodecError;
    use crate::common::metadata::{Charset, ECLevel};
    use crate::datamatrix::{Encodation, SymbolShape};
    use crate::qr::MaskPattern;

    #[test]
    fn test_metadata() {
        let mut builder = QRBuilder::new(b"Hello, world!");
        builder.version(1).ec_level(ECLevel::L);
        assert_eq!(builder.metadata(), "{ Version: 1, Ec level: L, Charset: Utf8 }");
        builder.unset_version().charset(Charset::ShiftJis);
        assert_eq!(builder.metadata(), "{ Version: None, Ec level: L, Charset: ShiftJis }");
    }

    #[test]
    fn test_build_qr() {
        let qr = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::L).build().unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.width(), 21);
        assert_eq!(qr.ec_level(), ECLevel::L);
    }

    #[test]
    fn test_build_qr_fixed_mask() {
        let qr = QRBuilder::new(b"HELLO WORLD").mask(MaskPattern::new(5)).build().unwrap();
        assert_eq!(*qr.mask(), 5);
        assert_eq!(qr.metadata(), "{ Version: 1, Ec level: M, Mask: 5 }");
    }

    #[test]
    fn test_build_qr_errors() {
        assert_eq!(QRBuilder::new(b"").build().err(), Some(CodecError::EmptyData));
        assert_eq!(QRBuilder::new(b"1").version(41).build().err(), Some(CodecError::InvalidVersion));
        let long = vec![b'a'; 100];
        assert_eq!(
            QRBuilder::new(&long).version(1).build().err(),
            Some(CodecError::DataTooLong)
        );
    }

    #[test]
    fn test_build_data_matrix() {
        let dm = DataMatrixBuilder::new(b"123456").build().unwrap();
        assert_eq!((dm.height(), dm.width()), (10, 10));

        let dm = DataMatrixBuilder::new(b"Hello").shape(SymbolShape::Rectangle).build().unwrap();
        assert_eq!((dm.height(), dm.width()), (8, 18));

        let dm = DataMatrixBuilder::new(b"abc").version(10).encodation(Encodation::Text).build();
        assert_eq!(*dm.unwrap().version(), 10);
    }
}
