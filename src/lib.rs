//! # gridcode
//!
//! A Rust library for encoding and decoding QR Code and Data Matrix (ECC 200) symbols
//! with Reed-Solomon error correction over GF(256).
//!
//! ## Features
//!
//! - **QR Code**: Versions 1-40, error correction levels L, M, Q and H, optimal
//!   numeric/alphanumeric/byte segmentation, Kanji and Hanzi modes, ECI, FNC1 and
//!   structured append
//! - **Data Matrix**: All 24 square and 6 rectangular ECC 200 sizes, ASCII, C40, Text,
//!   X12, EDIFACT and Base256 encodation, Macro 05/06 decoding
//! - **Reed-Solomon Error Correction**: Shared GF(256) arithmetic with compile time
//!   tables for both symbologies
//!
//! Symbols go in and out as a [`BitMatrix`], one module per cell, dark is `true`.
//! Locating a symbol in an image and sampling its grid is left to the caller.
//!
//! ## Quick Start
//!
//! ### Encoding and Decoding a QR Code
//!
//! ```rust
//! use gridcode::{ECLevel, QRBuilder, QRReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"HELLO WORLD")
//!     .ec_level(ECLevel::L)  // Error correction level - if not provided, defaults to ECLevel::M
//!     .build()?;
//! assert_eq!(qr.width(), 21);
//!
//! let decoded = QRReader::read(&qr.to_bit_matrix())?;
//! assert_eq!(decoded.text, "HELLO WORLD");
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use gridcode::{Charset, ECLevel, MaskPattern, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("点茗".as_bytes())
//!     .version(2)                   // QR version - if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::Q)         // Error correction level - if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3))    // Mask pattern - if not provided, finds best mask based on penalty score
//!     .charset(Charset::ShiftJis)   // Text charset - if not provided, defaults to Charset::Utf8
//!     .build()?;
//!
//! println!("{}", qr.to_str(2));
//! # Ok(())
//! # }
//! ```
//!
//! ### Data Matrix
//!
//! ```rust
//! use gridcode::{DataMatrixBuilder, DataMatrixReader, SymbolShape};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dm = DataMatrixBuilder::new(b"123456").build()?;
//! assert_eq!((dm.height(), dm.width()), (10, 10));
//!
//! let rect = DataMatrixBuilder::new(b"Hello").shape(SymbolShape::Rectangle).build()?;
//! assert_eq!(DataMatrixReader::read(&rect.to_bit_matrix())?.text, "Hello");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! Data Matrix has a single fixed level per symbol size, roughly 25% to 40% of the codewords.
//!
//! ## Diagnostics
//!
//! Set `GRIDCODE_DEBUG` in the environment to trace every pipeline stage on stderr.

pub mod builder;
pub mod common;
pub mod datamatrix;
pub mod qr;
pub mod reader;

pub use builder::{DataMatrix, DataMatrixBuilder, QRBuilder, QR};
pub use common::error::{CodecError, CodecResult, ErrorKind};
pub use common::matrix::BitMatrix;
pub use common::metadata::{Charset, DecodedResult, ECLevel, StructuredAppend};
pub use datamatrix::{Encodation, SymbolShape};
pub use qr::MaskPattern;
pub use reader::{DataMatrixReader, QRReader};
