//! Filter operations
//!
//! This module provides the Gaussian window used by the structural similarity metric.

/// Filter kernels
pub mod kernels;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
