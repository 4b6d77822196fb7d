use imgqa_image::{ops::cast_and_scale, Image, ImageDtype, ImageError, ImageLayout};
use ndarray::{ArrayViewD, Ix3};

use crate::color::{luma_from_bgr, ycbcr_from_bgr, ChannelOrder, RoundingMode};
use crate::crop::crop_border;

/// Number of pixels removed from each edge before computing a metric.
pub const DEFAULT_CROP_BORDER: usize = 4;

/// The color representation a metric is computed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorSpace {
    /// Keep the stored channels as they are.
    #[default]
    Native,
    /// Project 3-channel images to their luma (Y) channel.
    Luma,
    /// Convert 3-channel images to Y, Cb, Cr.
    YCbCr,
}

/// Options of [`prepare_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrepareOptions {
    /// The color representation of the output.
    pub color_space: ColorSpace,
    /// Pixels removed from each spatial edge.
    pub border: usize,
    /// How 3-channel inputs store their channels.
    pub channel_order: ChannelOrder,
    /// Rounding of color conversions for quantized inputs.
    pub rounding: RoundingMode,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            color_space: ColorSpace::Native,
            border: DEFAULT_CROP_BORDER,
            channel_order: ChannelOrder::Bgr,
            rounding: RoundingMode::HalfToEven,
        }
    }
}

/// Prepare an image for metric computation.
///
/// Shorthand for [`prepare_with`] choosing [`ColorSpace::Luma`] when `to_luma`
/// is set and [`ColorSpace::Native`] otherwise.
///
/// # Arguments
///
/// * `image` - The input image in the range [0, 255], (H, W) or (H, W, C).
/// * `to_luma` - Whether to project 3-channel images to their luma channel.
/// * `border` - Pixels removed from each spatial edge.
///
/// # Example
///
/// ```
/// use imgqa_image::{Image, ImageSize};
/// use imgqa_imgproc::preprocess::prepare;
///
/// let image = Image::gray_from_size_val(ImageSize { width: 20, height: 20 }, 10u8);
/// let prepared = prepare(image.view(), false, 4).unwrap();
///
/// assert_eq!(prepared.shape(), &[12, 12]);
/// ```
pub fn prepare<T: ImageDtype>(
    image: ArrayViewD<'_, T>,
    to_luma: bool,
    border: usize,
) -> Result<Image<f64>, ImageError> {
    let options = PrepareOptions {
        color_space: if to_luma {
            ColorSpace::Luma
        } else {
            ColorSpace::Native
        },
        border,
        ..Default::default()
    };
    prepare_with(image, &options)
}

/// Prepare an image for metric computation.
///
/// Crops `options.border` pixels from every spatial edge, converts 3-channel
/// images to the requested color space and promotes the samples to `f64`.
/// The output stays in the range [0, 255]. Color conversion only applies to
/// 3-channel images; other layouts keep their channels.
///
/// # Returns
///
/// The prepared image. Its rank is 2 for a luma projection, otherwise the rank
/// and channel count of the input.
///
/// # Errors
///
/// * [`ImageError::InvalidDimension`] if the image is neither 2-D nor 3-D.
/// * [`ImageError::DegenerateCrop`] if the border leaves no pixels.
pub fn prepare_with<T: ImageDtype>(
    image: ArrayViewD<'_, T>,
    options: &PrepareOptions,
) -> Result<Image<f64>, ImageError> {
    let layout = ImageLayout::from_shape(image.shape())?;
    let cropped = crop_border(image, options.border)?;

    let prepared = match (options.color_space, layout.num_channels()) {
        (ColorSpace::Luma, 3) => {
            let cropped = cropped.into_dimensionality::<Ix3>()?;
            luma_from_bgr(&cropped, options.channel_order, options.rounding)?.into_dyn()
        }
        (ColorSpace::YCbCr, 3) => {
            let cropped = cropped.into_dimensionality::<Ix3>()?;
            ycbcr_from_bgr(&cropped, options.channel_order, options.rounding)?.into_dyn()
        }
        _ => cast_and_scale(&cropped, 1.0),
    };

    Ok(Image(prepared))
}
