use std::path::{Path, PathBuf};

use imgqa_imgproc::{
    color::{ChannelOrder, RoundingMode},
    metrics::{SsimChannelPolicy, DEFAULT_DATA_RANGE},
    preprocess::{ColorSpace, PrepareOptions, DEFAULT_CROP_BORDER},
};
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// The metric computed by an evaluation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Peak signal-to-noise ratio in dB.
    #[default]
    Psnr,
    /// Structural similarity index.
    Ssim,
}

impl Metric {
    /// Upper case name used as result file prefix, e.g. `PSNR`.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Metric::Psnr => "PSNR",
            Metric::Ssim => "SSIM",
        }
    }

    /// Lower case name used as CSV column, e.g. `psnr`.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Psnr => "psnr",
            Metric::Ssim => "ssim",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.file_prefix())
    }
}

/// What to do when a single image pair fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the evaluation and return the error.
    #[default]
    Abort,
    /// Log the error, leave the pair out of the mean and continue.
    Skip,
}

/// Configuration of an evaluation pass.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use imgqa_eval::{EvalConfig, Metric};
///
/// let config = EvalConfig::from_json_str(r#"{ "metric": "ssim", "test_y": true }"#).unwrap();
///
/// assert_eq!(config.metric, Metric::Ssim);
/// assert_eq!(config.crop_border, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Directory receiving the result tables.
    pub result_dir: PathBuf,
    /// Pixels removed from each spatial edge.
    pub crop_border: usize,
    /// Evaluate the luma (Y) channel instead of the stored channels.
    pub test_y: bool,
    /// How 3-channel images store their channels.
    pub channel_order: ChannelOrder,
    /// Rounding of the luma conversion for 8-bit images.
    pub rounding: RoundingMode,
    /// The metric to compute.
    pub metric: Metric,
    /// Peak sample value used by PSNR.
    pub data_range: f64,
    /// How SSIM averages three channels.
    pub ssim_policy: SsimChannelPolicy,
    /// What to do with pairs that fail.
    pub on_error: ErrorPolicy,
    /// Log progress every this many images, 0 disables it.
    pub log_every: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            result_dir: PathBuf::from("results"),
            crop_border: DEFAULT_CROP_BORDER,
            test_y: false,
            channel_order: ChannelOrder::Bgr,
            rounding: RoundingMode::HalfToEven,
            metric: Metric::Psnr,
            data_range: DEFAULT_DATA_RANGE,
            ssim_policy: SsimChannelPolicy::Reference,
            on_error: ErrorPolicy::Abort,
            log_every: 50,
        }
    }
}

impl EvalConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, EvalError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EvalError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// The preprocessing options derived from this configuration.
    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            color_space: if self.test_y {
                ColorSpace::Luma
            } else {
                ColorSpace::Native
            },
            border: self.crop_border,
            channel_order: self.channel_order,
            rounding: self.rounding,
        }
    }
}
