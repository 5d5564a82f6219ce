use std::fmt::{Display, Error, Formatter};

// Error kind
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    Argument,
    Arithmetic,
    Format,
    Checksum,
}

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CodecError {
    // Caller
    InvalidBitCount,
    InvalidEcLength,
    SizeMismatch,
    EmptyData,
    DataTooLong,
    InvalidVersion,
    InvalidMask,
    InvalidChar,
    UnencodableText,

    // Field arithmetic
    DivideByZero,
    LogOfZero,

    // Symbol format
    VersionNotFound,
    InvalidFormatInfo,
    InvalidVersionInfo,
    CodewordCountMismatch,
    DegreeMismatch,
    BadErrorLocation,
    UnsupportedMode,
    MalformedSegment,
    UnsupportedEci,

    // Reed-Solomon
    TooManyErrors,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBitCount
            | Self::InvalidEcLength
            | Self::SizeMismatch
            | Self::EmptyData
            | Self::DataTooLong
            | Self::InvalidVersion
            | Self::InvalidMask
            | Self::InvalidChar
            | Self::UnencodableText => ErrorKind::Argument,
            Self::DivideByZero | Self::LogOfZero => ErrorKind::Arithmetic,
            Self::VersionNotFound
            | Self::InvalidFormatInfo
            | Self::InvalidVersionInfo
            | Self::CodewordCountMismatch
            | Self::DegreeMismatch
            | Self::BadErrorLocation
            | Self::UnsupportedMode
            | Self::MalformedSegment
            | Self::UnsupportedEci => ErrorKind::Format,
            Self::TooManyErrors => ErrorKind::Checksum,
        }
    }

    // Format and checksum failures both mean the symbol can't be read
    pub fn is_unreadable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Format | ErrorKind::Checksum)
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            // Caller
            Self::InvalidBitCount => "Bit count out of range",
            Self::InvalidEcLength => "Invalid error correction codeword count",
            Self::SizeMismatch => "Operand sizes differ",
            Self::EmptyData => "Empty data",
            Self::DataTooLong => "Data too long",
            Self::InvalidVersion => "Invalid version",
            Self::InvalidMask => "Invalid masking pattern",
            Self::InvalidChar => "Invalid character",
            Self::UnencodableText => "Text cannot be represented in the requested charset",

            // Field arithmetic
            Self::DivideByZero => "Division by zero in GF(256)",
            Self::LogOfZero => "Logarithm of zero in GF(256)",

            // Symbol format
            Self::VersionNotFound => "No version matches the symbol dimensions",
            Self::InvalidFormatInfo => "Invalid format info detected",
            Self::InvalidVersionInfo => "Invalid version info detected",
            Self::CodewordCountMismatch => "Codeword count doesn't match the version",
            Self::DegreeMismatch => "Error locator degree doesn't match number of roots",
            Self::BadErrorLocation => "Error location outside the codeword",
            Self::UnsupportedMode => "Unsupported or malformed mode indicator",
            Self::MalformedSegment => "Malformed segment data",
            Self::UnsupportedEci => "Unsupported ECI designator",

            // Reed-Solomon
            Self::TooManyErrors => "Too many errors to correct successfully",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CodecError {}

pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod error_tests {
    use super::{CodecError, ErrorKind};
    use test_case::test_case;

    #[test_case(CodecError::InvalidBitCount, ErrorKind::Argument)]
    #[test_case(CodecError::LogOfZero, ErrorKind::Arithmetic)]
    #[test_case(CodecError::DegreeMismatch, ErrorKind::Format)]
    #[test_case(CodecError::TooManyErrors, ErrorKind::Checksum)]
    fn test_kind(err: CodecError, kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn test_unreadable() {
        assert!(CodecError::TooManyErrors.is_unreadable());
        assert!(CodecError::InvalidFormatInfo.is_unreadable());
        assert!(!CodecError::InvalidBitCount.is_unreadable());
        assert!(!CodecError::DivideByZero.is_unreadable());
    }

    #[test]
    fn test_display() {
        assert_eq!(CodecError::TooManyErrors.to_string(), "Too many errors to correct successfully");
    }
}
