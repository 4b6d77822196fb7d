//! Image quality metrics.
//!
//! This module provides functions for quantitatively comparing a generated
//! image against its reference, useful for:
//!
//! - Evaluating image generation and restoration models
//! - Measuring reconstruction quality across training epochs
//!
//! # Available Metrics
//!
//! - **MSE** (Mean Squared Error): Average squared difference between samples
//! - **PSNR** (Peak Signal-to-Noise Ratio): Quality metric in dB scale
//! - **SSIM** (Structural Similarity): Gaussian windowed comparison of luminance,
//!   contrast and structure
//!
//! All metrics promote the samples to `f64` and expect the range [0, 255].

mod mse;
mod ssim;

pub use mse::{mse, psnr, DEFAULT_DATA_RANGE};
pub use ssim::{
    ssim, ssim_single_channel, ssim_with, SsimChannelPolicy, SSIM_SIGMA, SSIM_WINDOW_SIZE,
};
