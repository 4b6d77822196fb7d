use imgqa_image::{ops::check_same_shape, ImageDtype, ImageError};
use ndarray::{ArrayViewD, Zip};

/// The peak value of 8-bit images, used as the default PSNR data range.
pub const DEFAULT_DATA_RANGE: f64 = 255.0;

/// Compute the mean squared error (MSE) between two images.
///
/// The MSE is defined as:
///
/// $ MSE = \frac{1}{n} \sum_{i=1}^{n} (I_1 - I_2)^2 $
///
/// where `I_1` and `I_2` are the two images and `n` is the number of samples.
/// Samples are promoted to `f64` before the subtraction.
///
/// # Arguments
///
/// * `image1` - The first input image.
/// * `image2` - The second input image with the same shape.
///
/// # Returns
///
/// The mean squared error between the two images.
///
/// # Errors
///
/// Returns [`ImageError::ShapeMismatch`] if the two images have different shapes.
///
/// # Example
///
/// ```
/// use imgqa_image::Image;
/// use imgqa_imgproc::metrics::mse;
///
/// let image1 = Image::<u8>::new(&[3, 2], vec![0, 1, 2, 3, 4, 5]).unwrap();
/// let image2 = Image::<u8>::new(&[3, 2], vec![0, 1, 2, 3, 4, 5]).unwrap();
///
/// let mse = mse(image1.view(), image2.view()).unwrap();
/// assert_eq!(mse, 0.0);
/// ```
pub fn mse<T: ImageDtype>(
    image1: ArrayViewD<'_, T>,
    image2: ArrayViewD<'_, T>,
) -> Result<f64, ImageError> {
    check_same_shape(&image1, &image2)?;

    let numel = image1.len();
    if numel == 0 {
        return Ok(0.0);
    }

    let mut sum = 0.0f64;
    Zip::from(&image1).and(&image2).for_each(|&a, &b| {
        let diff = a.to_f64() - b.to_f64();
        sum += diff * diff;
    });

    Ok(sum / numel as f64)
}

/// Compute the peak signal-to-noise ratio (PSNR) between two images.
///
/// The PSNR is defined as:
///
/// $ PSNR = 10 \log_{10} \left( \frac{MAX^2}{MSE} \right) $
///
/// where `MAX` is the data range of the samples and `MSE` is the mean squared error.
///
/// # Arguments
///
/// * `image1` - The first input image.
/// * `image2` - The second input image with the same shape.
/// * `data_range` - The maximum possible sample value, [`DEFAULT_DATA_RANGE`] for 8-bit data.
///
/// # Returns
///
/// The PSNR in decibels, or `f64::INFINITY` if the images are identical.
///
/// # Errors
///
/// Returns [`ImageError::ShapeMismatch`] if the two images have different shapes.
///
/// # Example
/// ```
/// use imgqa_image::Image;
/// use imgqa_imgproc::metrics::{psnr, DEFAULT_DATA_RANGE};
///
/// let zeros = Image::<u8>::new(&[8, 8], vec![0; 64]).unwrap();
/// let whites = Image::<u8>::new(&[8, 8], vec![255; 64]).unwrap();
///
/// let psnr = psnr(zeros.view(), whites.view(), DEFAULT_DATA_RANGE).unwrap();
///
/// assert_eq!(psnr, 0.0);
/// ```
///
/// # Note
///
/// The PSNR is symmetric in its two arguments. The higher the PSNR, the
/// closer the generated image is to the reference.
pub fn psnr<T: ImageDtype>(
    image1: ArrayViewD<'_, T>,
    image2: ArrayViewD<'_, T>,
    data_range: f64,
) -> Result<f64, ImageError> {
    let mse = mse(image1, image2)?;

    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }

    Ok(10.0 * (data_range * data_range / mse).log10())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use imgqa_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_equal() -> Result<(), ImageError> {
        let image1 = Image::<f32>::new(&[3, 2], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])?;
        let image2 = Image::<f32>::new(&[3, 2], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])?;
        let mse = crate::metrics::mse(image1.view(), image2.view())?;
        assert_eq!(mse, 0.0);

        Ok(())
    }

    #[test]
    fn test_not_equal() -> Result<(), ImageError> {
        let image1 = Image::<f32>::new(&[2, 2], vec![0.0, 1.0, 2.0, 3.0])?;
        let image2 = Image::<f32>::new(&[2, 2], vec![0.0, 3.0, 2.0, 3.0])?;
        let mse = crate::metrics::mse(image1.view(), image2.view())?;
        assert_eq!(mse, 1.0);

        Ok(())
    }

    #[test]
    fn test_mse_u8_does_not_wrap() -> Result<(), ImageError> {
        let image1 = Image::<u8>::new(&[1, 2], vec![0, 255])?;
        let image2 = Image::<u8>::new(&[1, 2], vec![255, 0])?;
        let mse = crate::metrics::mse(image1.view(), image2.view())?;
        assert_eq!(mse, 65025.0);

        Ok(())
    }

    #[test]
    fn test_psnr_zero_db() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let reference = Image::gray_from_size_val(size, 0u8);
        let generated = Image::gray_from_size_val(size, 255u8);

        let mse = crate::metrics::mse(generated.view(), reference.view())?;
        assert_eq!(mse, 65025.0);

        let psnr = crate::metrics::psnr(generated.view(), reference.view(), 255.0)?;
        assert_eq!(psnr, 0.0);

        Ok(())
    }

    #[test]
    fn test_psnr_identical_is_infinite() -> Result<(), ImageError> {
        let image = Image::from_size_val(
            ImageSize {
                width: 16,
                height: 16,
            },
            3,
            128u8,
        );
        let psnr = crate::metrics::psnr(image.view(), image.view(), 255.0)?;
        assert_eq!(psnr, f64::INFINITY);

        Ok(())
    }

    #[test]
    fn test_psnr() -> Result<(), ImageError> {
        let image1 = Image::<f64>::new(&[2, 1, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])?;
        let image2 = Image::<f64>::new(&[2, 1, 3], vec![1.0, 3.0, 2.0, 4.0, 5.0, 6.0])?;
        // mse = (1 + 4 + 0 + 1 + 1 + 1) / 6
        let psnr = crate::metrics::psnr(image1.view(), image2.view(), 255.0)?;
        assert_relative_eq!(psnr, 10.0 * (65025.0f64 * 6.0 / 8.0).log10(), epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_psnr_symmetric() -> Result<(), ImageError> {
        let image1 = Image::<u8>::new(&[2, 3], vec![10, 20, 30, 40, 50, 60])?;
        let image2 = Image::<u8>::new(&[2, 3], vec![12, 18, 33, 40, 41, 66])?;
        let ab = crate::metrics::psnr(image1.view(), image2.view(), 255.0)?;
        let ba = crate::metrics::psnr(image2.view(), image1.view(), 255.0)?;
        assert_eq!(ab, ba);

        Ok(())
    }

    #[test]
    fn test_shape_mismatch() -> Result<(), ImageError> {
        let image1 = Image::<u8>::new(&[2, 3], vec![0; 6])?;
        let image2 = Image::<u8>::new(&[3, 2], vec![0; 6])?;
        let res = crate::metrics::psnr(image1.view(), image2.view(), 255.0);
        assert!(matches!(res, Err(ImageError::ShapeMismatch(_, _))));

        Ok(())
    }
}
