#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image border cropping module.
pub mod crop;

/// image filtering module.
pub mod filter;

/// image quality metrics module.
pub mod metrics;

/// preparation of images before computing a metric.
pub mod preprocess;
