use std::ops;

use ndarray::{Array2, Array3, ArrayD, IxDyn};
use num_traits::AsPrimitive;

use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use imgqa_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for image sample types.
///
/// Every sample is promoted to `f64` before any arithmetic so that 8-bit
/// differences cannot wrap around.
pub trait ImageDtype: AsPrimitive<f64> + Copy + Default + Send + Sync {
    /// Whether the type stores integer samples, e.g. 8-bit images.
    ///
    /// Color conversions round their output for quantized inputs.
    const QUANTIZED: bool;

    /// Promote the sample to `f64`.
    fn to_f64(self) -> f64 {
        self.as_()
    }
}

impl ImageDtype for u8 {
    const QUANTIZED: bool = true;
}

impl ImageDtype for u16 {
    const QUANTIZED: bool = true;
}

impl ImageDtype for f32 {
    const QUANTIZED: bool = false;
}

impl ImageDtype for f64 {
    const QUANTIZED: bool = false;
}

/// The spatial layout of an image array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageLayout {
    /// A 2-D array with shape (H, W).
    Gray(ImageSize),
    /// A 3-D array with shape (H, W, C).
    Channels(ImageSize, usize),
}

impl ImageLayout {
    /// Derive the layout from an array shape.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDimension`] if the shape has neither 2 nor 3 axes.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgqa_image::{ImageLayout, ImageSize};
    ///
    /// let layout = ImageLayout::from_shape(&[20, 10, 3]).unwrap();
    /// assert_eq!(layout, ImageLayout::Channels(ImageSize { width: 10, height: 20 }, 3));
    ///
    /// assert!(ImageLayout::from_shape(&[1, 20, 10, 3]).is_err());
    /// ```
    pub fn from_shape(shape: &[usize]) -> Result<Self, ImageError> {
        match *shape {
            [height, width] => Ok(ImageLayout::Gray(ImageSize { width, height })),
            [height, width, channels] => Ok(ImageLayout::Channels(
                ImageSize { width, height },
                channels,
            )),
            _ => Err(ImageError::InvalidDimension(shape.len())),
        }
    }

    /// Get the spatial size of the image.
    pub fn size(&self) -> ImageSize {
        match *self {
            ImageLayout::Gray(size) | ImageLayout::Channels(size, _) => size,
        }
    }

    /// Get the number of channels. A 2-D image has one channel.
    pub fn num_channels(&self) -> usize {
        match *self {
            ImageLayout::Gray(_) => 1,
            ImageLayout::Channels(_, channels) => channels,
        }
    }
}

/// Represents an image with pixel data.
///
/// The image is a dense row-major array with shape (H, W) or (H, W, C).
/// The rank is not validated on construction; operations that need a
/// particular layout check it and return [`ImageError::InvalidDimension`].
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T>(pub ArrayD<T>);

/// helper to deference the inner array
impl<T> ops::Deref for Image<T> {
    type Target = ArrayD<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// helper to deference the inner array
impl<T> ops::DerefMut for Image<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<Array2<T>> for Image<T> {
    fn from(array: Array2<T>) -> Self {
        Image(array.into_dyn())
    }
}

impl<T> From<Array3<T>> for Image<T> {
    fn from(array: Array3<T>) -> Self {
        Image(array.into_dyn())
    }
}

impl<T> From<ArrayD<T>> for Image<T> {
    fn from(array: ArrayD<T>) -> Self {
        Image(array)
    }
}

impl<T> Image<T> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the image, (H, W) or (H, W, C).
    /// * `data` - The pixel data of the image in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the shape, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgqa_image::Image;
    ///
    /// let image = Image::<u8>::new(&[20, 10, 3], vec![0u8; 10 * 20 * 3]).unwrap();
    ///
    /// assert_eq!(image.size().unwrap().width, 10);
    /// assert_eq!(image.size().unwrap().height, 20);
    /// assert_eq!(image.num_channels().unwrap(), 3);
    /// ```
    pub fn new(shape: &[usize], data: Vec<T>) -> Result<Self, ImageError> {
        let numel = shape.iter().product::<usize>();
        if data.len() != numel {
            return Err(ImageError::InvalidChannelShape(data.len(), numel));
        }

        Ok(Self(ArrayD::from_shape_vec(IxDyn(shape), data)?))
    }

    /// Create a new 3-D image with the given size, channels and fill value.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgqa_image::{Image, ImageSize};
    ///
    /// let image = Image::from_size_val(ImageSize { width: 16, height: 16 }, 3, 128u8);
    ///
    /// assert_eq!(image.shape(), &[16, 16, 3]);
    /// ```
    pub fn from_size_val(size: ImageSize, channels: usize, val: T) -> Self
    where
        T: Clone,
    {
        Self(ArrayD::from_elem(
            IxDyn(&[size.height, size.width, channels]),
            val,
        ))
    }

    /// Create a new 2-D (single channel) image with the given size and fill value.
    pub fn gray_from_size_val(size: ImageSize, val: T) -> Self
    where
        T: Clone,
    {
        Self(ArrayD::from_elem(IxDyn(&[size.height, size.width]), val))
    }

    /// Get the layout of the image.
    pub fn layout(&self) -> Result<ImageLayout, ImageError> {
        ImageLayout::from_shape(self.shape())
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> Result<ImageSize, ImageError> {
        Ok(self.layout()?.size())
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> Result<usize, ImageError> {
        Ok(self.layout()?.num_channels())
    }

    /// Consume the image and return the inner array.
    pub fn into_inner(self) -> ArrayD<T> {
        self.0
    }
}
