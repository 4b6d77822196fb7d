#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use imgqa_image as image;

#[doc(inline)]
pub use imgqa_imgproc as imgproc;

#[doc(inline)]
pub use imgqa_eval as eval;
