pub mod bits;
pub mod ec;
pub mod error;
pub mod galois;
pub mod macros;
pub mod matrix;
pub mod metadata;
pub mod poly;

pub use bits::*;
pub use error::*;
pub use matrix::*;
pub use metadata::*;
