mod ycbcr;
pub use ycbcr::*;
