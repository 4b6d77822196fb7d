use imgqa_image::{ImageDtype, ImageError};
use ndarray::{Array2, Array3, ArrayView3, Axis, Zip};

/// Luma weights in channel-index order for data stored as B, G, R.
const Y_WEIGHTS_BGR: [f64; 3] = [24.966, 128.553, 65.481];

/// Full YCbCr transform, rows indexed by the input channel (B, G, R).
const YCBCR_MATRIX_BGR: [[f64; 3]; 3] = [
    [24.966, 112.0, -18.214],
    [128.553, -74.203, -93.786],
    [65.481, -37.797, 112.0],
];

const YCBCR_OFFSET: [f64; 3] = [16.0, 128.0, 128.0];

/// Order in which the three color channels are stored.
///
/// The luma weights are applied by channel index, so the order decides
/// which weight each stored channel receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChannelOrder {
    /// Channel 0 is blue. Channel 0 receives the 24.966 weight.
    #[default]
    Bgr,
    /// Channel 0 is red. Channel 0 receives the 65.481 weight.
    Rgb,
}

impl ChannelOrder {
    /// Index permutation mapping B, G, R onto the stored channel index.
    fn bgr_indices(self) -> [usize; 3] {
        match self {
            ChannelOrder::Bgr => [0, 1, 2],
            ChannelOrder::Rgb => [2, 1, 0],
        }
    }
}

/// Rounding applied to color conversions of quantized (8-bit) images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoundingMode {
    /// Ties go to the nearest even integer, `2.5 -> 2`.
    #[default]
    HalfToEven,
    /// Ties go away from zero, `2.5 -> 3`.
    HalfAwayFromZero,
    /// Quantized inputs are converted like float inputs, without rounding.
    ///
    /// Matches evaluation logs computed on images rescaled to [0, 1] first.
    Disabled,
}

impl RoundingMode {
    /// Round a value to an integer using this mode.
    ///
    /// # Example
    ///
    /// ```
    /// use imgqa_imgproc::color::RoundingMode;
    ///
    /// assert_eq!(RoundingMode::HalfToEven.round(16.5), 16.0);
    /// assert_eq!(RoundingMode::HalfAwayFromZero.round(16.5), 17.0);
    /// assert_eq!(RoundingMode::Disabled.round(16.5), 16.5);
    /// ```
    pub fn round(self, x: f64) -> f64 {
        match self {
            RoundingMode::HalfToEven => x.round_ties_even(),
            RoundingMode::HalfAwayFromZero => x.round(),
            RoundingMode::Disabled => x,
        }
    }
}

fn check_three_channels<T>(src: &ArrayView3<'_, T>) -> Result<(), ImageError> {
    let channels = src.len_of(Axis(2));
    if channels != 3 {
        return Err(ImageError::InvalidChannelCount(channels));
    }
    Ok(())
}

/// Compute the luma (Y) channel of a color image.
///
/// The input samples are in the range [0, 255] and the output follows the
/// studio-swing convention, Y in [16, 235]:
///
/// Y = (24.966 * B + 128.553 * G + 65.481 * R) / 255 + 16
///
/// Quantized inputs (e.g. `u8`) are rounded with `rounding`; float inputs are not.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 3).
/// * `order` - How the color channels are stored in `src`.
/// * `rounding` - The rounding mode for quantized inputs.
///
/// # Returns
///
/// The luma image with shape (H, W).
///
/// # Errors
///
/// Returns [`ImageError::InvalidChannelCount`] if the image does not have 3 channels.
///
/// # Example
///
/// ```
/// use imgqa_imgproc::color::{luma_from_bgr, ChannelOrder, RoundingMode};
/// use ndarray::Array3;
///
/// let white = Array3::<u8>::from_elem((2, 2, 3), 255);
/// let y = luma_from_bgr(&white.view(), ChannelOrder::Bgr, RoundingMode::HalfToEven).unwrap();
///
/// assert_eq!(y.dim(), (2, 2));
/// assert_eq!(y[[0, 0]], 235.0);
/// ```
pub fn luma_from_bgr<T: ImageDtype>(
    src: &ArrayView3<'_, T>,
    order: ChannelOrder,
    rounding: RoundingMode,
) -> Result<Array2<f64>, ImageError> {
    check_three_channels(src)?;

    let [b, g, r] = order.bgr_indices();
    let (height, width, _) = src.dim();
    let mut dst = Array2::<f64>::zeros((height, width));

    Zip::from(&mut dst)
        .and(src.lanes(Axis(2)))
        .for_each(|y, pixel| {
            let value = (pixel[b].to_f64() * Y_WEIGHTS_BGR[0]
                + pixel[g].to_f64() * Y_WEIGHTS_BGR[1]
                + pixel[r].to_f64() * Y_WEIGHTS_BGR[2])
                / 255.0
                + YCBCR_OFFSET[0];
            *y = if T::QUANTIZED {
                rounding.round(value)
            } else {
                value
            };
        });

    Ok(dst)
}

/// Convert a color image to YCbCr.
///
/// Uses the same studio-swing transform as [`luma_from_bgr`] with the chroma
/// channels added, offsets {16, 128, 128}. Input samples are in [0, 255].
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 3).
/// * `order` - How the color channels are stored in `src`.
/// * `rounding` - The rounding mode for quantized inputs.
///
/// # Returns
///
/// The YCbCr image with shape (H, W, 3) in the order Y, Cb, Cr.
///
/// # Errors
///
/// Returns [`ImageError::InvalidChannelCount`] if the image does not have 3 channels.
pub fn ycbcr_from_bgr<T: ImageDtype>(
    src: &ArrayView3<'_, T>,
    order: ChannelOrder,
    rounding: RoundingMode,
) -> Result<Array3<f64>, ImageError> {
    check_three_channels(src)?;

    let [b, g, r] = order.bgr_indices();
    let mut dst = Array3::<f64>::zeros(src.dim());

    Zip::from(dst.lanes_mut(Axis(2)))
        .and(src.lanes(Axis(2)))
        .for_each(|mut out, pixel| {
            let bgr = [pixel[b].to_f64(), pixel[g].to_f64(), pixel[r].to_f64()];
            for (j, out_val) in out.iter_mut().enumerate() {
                let acc = bgr
                    .iter()
                    .zip(YCBCR_MATRIX_BGR.iter())
                    .map(|(&c, row)| c * row[j])
                    .sum::<f64>();
                let value = acc / 255.0 + YCBCR_OFFSET[j];
                *out_val = if T::QUANTIZED {
                    rounding.round(value)
                } else {
                    value
                };
            }
        });

    Ok(dst)
}
