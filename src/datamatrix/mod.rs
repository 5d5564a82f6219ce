pub mod blocks;
pub mod codec;
pub mod placement;
pub mod version;

pub use codec::Encodation;
pub use version::{SymbolShape, Version};
