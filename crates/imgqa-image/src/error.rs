/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when two paired images do not have the same shape.
    #[error("Image shapes do not match: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Error when the image rank is neither 2 nor 3.
    #[error("Wrong image dimension: {0}. Should be 2 or 3")]
    InvalidDimension(usize),

    /// Error when cropping the border would leave an empty region.
    #[error("Cannot crop a border of {border} from an image of size {height}x{width}")]
    DegenerateCrop {
        /// Border requested on every edge.
        border: usize,
        /// Height of the image before cropping.
        height: usize,
        /// Width of the image before cropping.
        width: usize,
    },

    /// Error when the number of channels is not supported by the operation.
    #[error("Unsupported number of channels: {0}")]
    InvalidChannelCount(usize),

    /// Error when the image is smaller than the filter window.
    #[error("Image of size {height}x{width} is smaller than the {window}x{window} window")]
    ImageTooSmall {
        /// Height of the image.
        height: usize,
        /// Width of the image.
        width: usize,
        /// Side of the square window.
        window: usize,
    },

    /// Error when the image data is not contiguous.
    #[error("Image data is not contiguous")]
    ImageDataNotContiguous,

    /// Error when shape is not valid.
    #[error("Invalid shape")]
    InvalidShape(#[from] ndarray::ShapeError),

    /// Error when the data length does not match the requested shape.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),
}
