pub mod blocks;
pub mod codec;
pub mod format;
pub mod mask;
pub mod placement;
pub mod version;

pub use format::FormatInfo;
pub use mask::MaskPattern;
pub use version::{ECBlocks, Version};
