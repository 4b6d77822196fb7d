use imgqa_image::{ImageError, ImageLayout};
use ndarray::{ArrayViewD, Axis, Slice};

/// Crop a border of pixels from every edge of an image.
///
/// The crop keeps rows and columns in `border..dim - border` and leaves the
/// channel axis untouched, so a 2-D image stays 2-D and a 3-D image keeps its
/// channel count. No data is copied.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W) or (H, W, C).
/// * `border` - The number of pixels to remove from each edge.
///
/// # Returns
///
/// A view into `src` with shape (H - 2 * border, W - 2 * border[, C]).
///
/// # Errors
///
/// * [`ImageError::InvalidDimension`] if the image is neither 2-D nor 3-D.
/// * [`ImageError::DegenerateCrop`] if the crop would leave no pixels.
///
/// # Examples
///
/// ```rust
/// use imgqa_imgproc::crop::crop_border;
/// use ndarray::Array2;
///
/// let image = Array2::<u8>::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as u8).into_dyn();
///
/// let cropped = crop_border(image.view(), 1).unwrap();
///
/// assert_eq!(cropped.shape(), &[2, 2]);
/// assert_eq!(cropped.iter().copied().collect::<Vec<_>>(), vec![5u8, 6, 9, 10]);
/// ```
pub fn crop_border<T>(
    src: ArrayViewD<'_, T>,
    border: usize,
) -> Result<ArrayViewD<'_, T>, ImageError> {
    let size = ImageLayout::from_shape(src.shape())?.size();

    let row_end = size.height.saturating_sub(border);
    let col_end = size.width.saturating_sub(border);
    if row_end <= border || col_end <= border {
        return Err(ImageError::DegenerateCrop {
            border,
            height: size.height,
            width: size.width,
        });
    }

    let mut cropped = src;
    cropped.slice_axis_inplace(Axis(0), Slice::from(border..row_end));
    cropped.slice_axis_inplace(Axis(1), Slice::from(border..col_end));

    Ok(cropped)
}

#[cfg(test)]
mod tests {
    use imgqa_image::{Image, ImageError, ImageSize};
    use ndarray::Array3;

    #[test]
    fn test_crop_gray() -> Result<(), ImageError> {
        let image = Image::gray_from_size_val(
            ImageSize {
                width: 20,
                height: 20,
            },
            7u8,
        );

        let cropped = super::crop_border(image.view(), 4)?;
        assert_eq!(cropped.shape(), &[12, 12]);

        Ok(())
    }

    #[test]
    fn test_crop_keeps_channels() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Array3::from_shape_vec(
            (3, 3, 2),
            vec![
                0u8, 1, 2, 3, 4, 5,
                6, 7, 8, 9, 10, 11,
                12, 13, 14, 15, 16, 17,
            ],
        )?
        .into_dyn();

        let cropped = super::crop_border(image.view(), 1)?;
        assert_eq!(cropped.shape(), &[1, 1, 2]);
        assert_eq!(cropped.iter().copied().collect::<Vec<_>>(), vec![8u8, 9]);

        Ok(())
    }

    #[test]
    fn test_crop_zero_border() -> Result<(), ImageError> {
        let image = Image::<f32>::new(&[2, 3], vec![0.0; 6])?;
        let cropped = super::crop_border(image.view(), 0)?;
        assert_eq!(cropped.shape(), &[2, 3]);

        Ok(())
    }

    #[test]
    fn test_crop_degenerate() -> Result<(), ImageError> {
        let image = Image::<u8>::new(&[8, 20], vec![0; 160])?;
        let res = super::crop_border(image.view(), 4);
        assert!(matches!(
            res,
            Err(ImageError::DegenerateCrop {
                border: 4,
                height: 8,
                width: 20
            })
        ));

        // larger than the image must not underflow
        assert!(super::crop_border(image.view(), 100).is_err());

        Ok(())
    }

    #[test]
    fn test_crop_invalid_rank() -> Result<(), ImageError> {
        let image = Image::<u8>::new(&[1, 10, 10, 3], vec![0; 300])?;
        let res = super::crop_border(image.view(), 1);
        assert!(matches!(res, Err(ImageError::InvalidDimension(4))));

        Ok(())
    }
}
