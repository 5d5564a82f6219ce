mod decoder;
mod encoder;
pub mod mode;

pub use decoder::{decode, eci_encoding};
pub use encoder::{encode, encode_with_version};
pub use mode::Mode;
