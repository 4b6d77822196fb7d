use imgqa_image::ImageError;
use ndarray::{Array3, ArrayView3};

/// A separable 2D filter that applies horizontal and vertical 1D correlations sequentially.
///
/// Only positions where the kernel fully overlaps the image are evaluated, so
/// no border handling is involved.
struct SeparableFilter<'a> {
    kernel_x: &'a [f64],
    kernel_y: &'a [f64],
}

impl SeparableFilter<'_> {
    /// Apply the filter to every channel of an image independently.
    ///
    /// Performs horizontal filtering into a temporary buffer followed by vertical filtering.
    fn apply_valid(&self, src: &ArrayView3<'_, f64>) -> Result<Array3<f64>, ImageError> {
        let (rows, cols, channels) = src.dim();
        let (kx, ky) = (self.kernel_x.len(), self.kernel_y.len());

        if kx == 0 || ky == 0 || rows < ky || cols < kx {
            return Err(ImageError::ImageTooSmall {
                height: rows,
                width: cols,
                window: kx.max(ky),
            });
        }

        let out_rows = rows - ky + 1;
        let out_cols = cols - kx + 1;

        let src = src.as_standard_layout();
        let src_data = src.as_slice().ok_or(ImageError::ImageDataNotContiguous)?;

        // Horizontal
        let mut temp = vec![0.0f64; rows * out_cols * channels];
        for r in 0..rows {
            let src_row = r * cols * channels;
            let temp_row = r * out_cols * channels;
            for c in 0..out_cols {
                for ch in 0..channels {
                    let acc = self
                        .kernel_x
                        .iter()
                        .enumerate()
                        .map(|(k, &w)| src_data[src_row + (c + k) * channels + ch] * w)
                        .sum::<f64>();
                    temp[temp_row + c * channels + ch] = acc;
                }
            }
        }

        // Vertical
        let mut dst = vec![0.0f64; out_rows * out_cols * channels];
        for r in 0..out_rows {
            let dst_row = r * out_cols * channels;
            for c in 0..out_cols {
                for ch in 0..channels {
                    let acc = self
                        .kernel_y
                        .iter()
                        .enumerate()
                        .map(|(k, &w)| temp[(r + k) * out_cols * channels + c * channels + ch] * w)
                        .sum::<f64>();
                    dst[dst_row + c * channels + ch] = acc;
                }
            }
        }

        Ok(Array3::from_shape_vec((out_rows, out_cols, channels), dst)?)
    }
}

/// Apply a separable filter to an image, keeping only fully supported positions.
///
/// Every channel is filtered independently. This matches a full 2-D filter with
/// the outer product of `kernel_y` and `kernel_x` followed by discarding the
/// margin where the kernel would leave the image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
///
/// # Returns
///
/// The filtered image with shape (H - len(kernel_y) + 1, W - len(kernel_x) + 1, C).
///
/// # Errors
///
/// Returns [`ImageError::ImageTooSmall`] if a kernel is empty or larger than the image.
///
/// # Example
///
/// ```
/// use imgqa_imgproc::filter::separable_filter_valid;
/// use ndarray::Array3;
///
/// let image = Array3::<f64>::from_elem((5, 6, 1), 2.0);
/// let filtered = separable_filter_valid(&image.view(), &[0.25, 0.5, 0.25], &[0.5, 0.5]).unwrap();
///
/// assert_eq!(filtered.dim(), (4, 4, 1));
/// assert!(filtered.iter().all(|&v| (v - 2.0).abs() < 1e-12));
/// ```
pub fn separable_filter_valid(
    src: &ArrayView3<'_, f64>,
    kernel_x: &[f64],
    kernel_y: &[f64],
) -> Result<Array3<f64>, ImageError> {
    SeparableFilter { kernel_x, kernel_y }.apply_valid(src)
}

/// Blur an image with a gaussian kernel, keeping only fully supported positions.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_size` - The side of the square gaussian window.
/// * `sigma` - The standard deviation of the gaussian.
///
/// # Returns
///
/// The blurred image with shape (H - kernel_size + 1, W - kernel_size + 1, C).
pub fn gaussian_blur_valid(
    src: &ArrayView3<'_, f64>,
    kernel_size: usize,
    sigma: f64,
) -> Result<Array3<f64>, ImageError> {
    let kernel = super::kernels::gaussian_kernel_1d(kernel_size, sigma);
    separable_filter_valid(src, &kernel, &kernel)
}
