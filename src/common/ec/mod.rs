mod block;
mod decoder;
mod encoder;

pub use block::*;
pub use decoder::ReedSolomonDecoder;
pub use encoder::ReedSolomonEncoder;
