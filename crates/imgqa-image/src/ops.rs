use ndarray::{ArrayD, ArrayViewD};

use crate::{ImageDtype, ImageError};

/// Check that two images have exactly the same shape.
///
/// # Errors
///
/// Returns [`ImageError::ShapeMismatch`] carrying both shapes otherwise.
///
/// Example:
///
/// ```
/// use imgqa_image::{ops::check_same_shape, Image};
///
/// let a = Image::<u8>::new(&[2, 2], vec![0; 4]).unwrap();
/// let b = Image::<u8>::new(&[2, 2, 1], vec![0; 4]).unwrap();
///
/// assert!(check_same_shape(&a.view(), &a.view()).is_ok());
/// assert!(check_same_shape(&a.view(), &b.view()).is_err());
/// ```
pub fn check_same_shape<A, B>(
    image1: &ArrayViewD<'_, A>,
    image2: &ArrayViewD<'_, B>,
) -> Result<(), ImageError> {
    if image1.shape() != image2.shape() {
        return Err(ImageError::ShapeMismatch(
            image1.shape().to_vec(),
            image2.shape().to_vec(),
        ));
    }
    Ok(())
}

/// Promote the samples of an image to `f64` and scale them.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `scale` - The scale to multiply the promoted samples with.
///
/// Example:
///
/// ```
/// use imgqa_image::{ops::cast_and_scale, Image};
///
/// let image = Image::<u8>::new(&[1, 2], vec![0u8, 255]).unwrap();
///
/// let image_f64 = cast_and_scale(&image.view(), 1. / 255.0);
///
/// assert_eq!(image_f64[[0, 0]], 0.0);
/// assert_eq!(image_f64[[0, 1]], 1.0);
/// ```
pub fn cast_and_scale<T: ImageDtype>(src: &ArrayViewD<'_, T>, scale: f64) -> ArrayD<f64> {
    src.mapv(|x| x.to_f64() * scale)
}

#[cfg(test)]
mod tests {
    use crate::{Image, ImageError};

    #[test]
    fn shape_mismatch_reports_both_shapes() -> Result<(), ImageError> {
        let a = Image::<f32>::new(&[2, 3], vec![0.0; 6])?;
        let b = Image::<f32>::new(&[3, 2], vec![0.0; 6])?;

        match super::check_same_shape(&a.view(), &b.view()) {
            Err(ImageError::ShapeMismatch(s1, s2)) => {
                assert_eq!(s1, vec![2, 3]);
                assert_eq!(s2, vec![3, 2]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn cast_identity() -> Result<(), ImageError> {
        let image = Image::<u8>::new(&[1, 3, 1], vec![1, 2, 250])?;
        let promoted = super::cast_and_scale(&image.view(), 1.0);
        assert_eq!(promoted.shape(), &[1, 3, 1]);
        assert_eq!(promoted.as_slice(), Some(&[1.0, 2.0, 250.0][..]));

        Ok(())
    }
}
