#![deny(missing_docs)]
//! Image types and traits for image quality metrics

/// image representation backed by dynamic-rank arrays.
pub mod image;

/// Error types for the image module.
pub mod error;

/// basic operations shared by the metric implementations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageLayout, ImageSize};
