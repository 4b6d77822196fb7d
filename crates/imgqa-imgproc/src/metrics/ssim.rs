use imgqa_image::{ops::check_same_shape, ImageDtype, ImageError, ImageLayout};
use ndarray::{Array3, ArrayView3, ArrayViewD, Axis, Ix3, Zip};

use crate::filter::{kernels::gaussian_kernel_1d, separable_filter_valid};

/// Side of the gaussian window used for the local statistics.
pub const SSIM_WINDOW_SIZE: usize = 11;

/// Standard deviation of the gaussian window.
pub const SSIM_SIGMA: f64 = 1.5;

// Stabilizers, fixed to the 8-bit range whatever the input range is.
const C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// How a 3-channel SSIM is reduced to a single value.
///
/// Both policies average the three channels with the same weight. They agree
/// up to floating point rounding since each channel map has the same size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SsimChannelPolicy {
    /// SSIM over the whole 3-channel array, averaged three times.
    ///
    /// Reproduces the values of earlier evaluation logs bit for bit.
    #[default]
    Reference,
    /// SSIM of every channel slice on its own, then averaged.
    PerChannel,
}

/// Promote an image to a (H, W, C) `f64` array, a 2-D image gets one channel.
fn promote<T: ImageDtype>(image: &ArrayViewD<'_, T>) -> Result<Array3<f64>, ImageError> {
    let promoted = image.mapv(|x| x.to_f64());
    match promoted.ndim() {
        2 => Ok(promoted.insert_axis(Axis(2)).into_dimensionality::<Ix3>()?),
        3 => Ok(promoted.into_dimensionality::<Ix3>()?),
        ndim => Err(ImageError::InvalidDimension(ndim)),
    }
}

/// Compute the per-pixel SSIM map of two (H, W, C) images.
///
/// Channels are filtered independently and the output has shape
/// (H - 10, W - 10, C).
fn ssim_map(
    img1: &ArrayView3<'_, f64>,
    img2: &ArrayView3<'_, f64>,
) -> Result<Array3<f64>, ImageError> {
    let kernel = gaussian_kernel_1d(SSIM_WINDOW_SIZE, SSIM_SIGMA);
    let window = |src: &ArrayView3<'_, f64>| separable_filter_valid(src, &kernel, &kernel);

    let mu1 = window(img1)?;
    let mu2 = window(img2)?;

    let img1_sq = img1 * img1;
    let img2_sq = img2 * img2;
    let img12 = img1 * img2;

    let mut sigma1_sq = window(&img1_sq.view())?;
    let mut sigma2_sq = window(&img2_sq.view())?;
    let mut sigma12 = window(&img12.view())?;

    Zip::from(&mut sigma1_sq)
        .and(&mut sigma2_sq)
        .and(&mut sigma12)
        .and(&mu1)
        .and(&mu2)
        .for_each(|s1, s2, s12, &m1, &m2| {
            *s1 -= m1 * m1;
            *s2 -= m2 * m2;
            *s12 -= m1 * m2;
        });

    let mut map = Array3::<f64>::zeros(mu1.dim());
    Zip::from(&mut map)
        .and(&mu1)
        .and(&mu2)
        .and(&sigma1_sq)
        .and(&sigma2_sq)
        .and(&sigma12)
        .for_each(|out, &m1, &m2, &s1, &s2, &s12| {
            let mu1_sq = m1 * m1;
            let mu2_sq = m2 * m2;
            let mu1_mu2 = m1 * m2;
            *out = ((2.0 * mu1_mu2 + C1) * (2.0 * s12 + C2))
                / ((mu1_sq + mu2_sq + C1) * (s1 + s2 + C2));
        });

    Ok(map)
}

/// Compute the structural similarity of two images without channel dispatch.
///
/// The local means, variances and covariance are gaussian weighted
/// (11x11 window, sigma 1.5) and only evaluated where the window fits inside
/// the image. The result is the mean of the SSIM map:
///
/// $ SSIM = \frac{(2 \mu_1 \mu_2 + C_1)(2 \sigma_{12} + C_2)}{(\mu_1^2 + \mu_2^2 + C_1)(\sigma_1^2 + \sigma_2^2 + C_2)} $
///
/// with $C_1 = (0.01 \cdot 255)^2$ and $C_2 = (0.03 \cdot 255)^2$.
///
/// A 3-D input is filtered channel by channel and its map averaged over all
/// channels at once.
///
/// # Arguments
///
/// * `img1` - The first input image in the range [0, 255], (H, W) or (H, W, C).
/// * `img2` - The second input image with the same shape.
///
/// # Errors
///
/// * [`ImageError::ShapeMismatch`] if the two images have different shapes.
/// * [`ImageError::InvalidDimension`] if the images are neither 2-D nor 3-D.
/// * [`ImageError::ImageTooSmall`] if a spatial side is shorter than the window.
pub fn ssim_single_channel<T: ImageDtype>(
    img1: ArrayViewD<'_, T>,
    img2: ArrayViewD<'_, T>,
) -> Result<f64, ImageError> {
    check_same_shape(&img1, &img2)?;

    let img1 = promote(&img1)?;
    let img2 = promote(&img2)?;

    let map = ssim_map(&img1.view(), &img2.view())?;

    Ok(map.sum() / map.len() as f64)
}

/// Compute the structural similarity index (SSIM) between two images.
///
/// Same as [`ssim_with`] using [`SsimChannelPolicy::Reference`].
///
/// # Example
///
/// ```
/// use imgqa_image::{Image, ImageSize};
/// use imgqa_imgproc::metrics::ssim;
///
/// let size = ImageSize { width: 16, height: 16 };
/// let image = Image::from_size_val(size, 3, 128u8);
///
/// let ssim = ssim(image.view(), image.view()).unwrap();
/// assert!((ssim - 1.0).abs() < 1e-6);
/// ```
pub fn ssim<T: ImageDtype>(
    img1: ArrayViewD<'_, T>,
    img2: ArrayViewD<'_, T>,
) -> Result<f64, ImageError> {
    ssim_with(img1, img2, SsimChannelPolicy::Reference)
}

/// Compute the structural similarity index (SSIM) between two images.
///
/// Dispatches by layout:
///
/// * (H, W): [`ssim_single_channel`] directly.
/// * (H, W, 3): reduced according to `policy`.
/// * (H, W, 1): squeezed to (H, W).
///
/// # Arguments
///
/// * `img1` - The first input image in the range [0, 255].
/// * `img2` - The second input image with the same shape.
/// * `policy` - How three channels are averaged.
///
/// # Returns
///
/// The SSIM in [-1, 1], 1 meaning identical images.
///
/// # Errors
///
/// * [`ImageError::ShapeMismatch`] if the two images have different shapes.
/// * [`ImageError::InvalidDimension`] if the images are neither 2-D nor 3-D.
/// * [`ImageError::InvalidChannelCount`] for a channel count other than 1 or 3.
/// * [`ImageError::ImageTooSmall`] if a spatial side is shorter than the window.
pub fn ssim_with<T: ImageDtype>(
    img1: ArrayViewD<'_, T>,
    img2: ArrayViewD<'_, T>,
    policy: SsimChannelPolicy,
) -> Result<f64, ImageError> {
    check_same_shape(&img1, &img2)?;

    match ImageLayout::from_shape(img1.shape())? {
        ImageLayout::Gray(_) => ssim_single_channel(img1, img2),
        ImageLayout::Channels(_, 3) => {
            let ssims = match policy {
                SsimChannelPolicy::Reference => {
                    let value = ssim_single_channel(img1, img2)?;
                    [value; 3]
                }
                SsimChannelPolicy::PerChannel => {
                    let mut values = [0.0; 3];
                    for (i, value) in values.iter_mut().enumerate() {
                        *value = ssim_single_channel(
                            img1.index_axis(Axis(2), i),
                            img2.index_axis(Axis(2), i),
                        )?;
                    }
                    values
                }
            };
            Ok(ssims.iter().sum::<f64>() / 3.0)
        }
        ImageLayout::Channels(_, 1) => ssim_single_channel(
            img1.index_axis_move(Axis(2), 0),
            img2.index_axis_move(Axis(2), 0),
        ),
        ImageLayout::Channels(_, channels) => Err(ImageError::InvalidChannelCount(channels)),
    }
}
