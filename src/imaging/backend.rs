//! Image backend trait and shared error type.
//!
//! The [`ImageBackend`] trait is the contract with the library that owns the
//! pixels. Every backend must support three operations: report an image's
//! natural dimensions, crop a pixel region, and resample to exact dimensions.
//! Everything else in this crate (fit, fill, centered crop-to-fit) is geometry
//! layered on top of these three calls.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's `DynamicImage`.

use super::params::{Dimensions, Interpolation, PixelRect};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Crop region {rect} exceeds image bounds {bounds}")]
    OutOfBounds { rect: PixelRect, bounds: Dimensions },
}

/// Trait for image processing backends.
///
/// Implementations own the image type and all pixel work. Callers pass
/// regions and sizes already rounded to whole pixels; a backend must not
/// clamp them silently. A crop outside the image is reported as an error. A
/// resize to an empty size succeeds with an empty image.
pub trait ImageBackend: Sync {
    type Image;

    /// Natural pixel dimensions of `image`.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// A new image holding exactly the pixels of `rect`.
    fn crop(&self, image: &Self::Image, rect: PixelRect) -> Result<Self::Image, BackendError>;

    /// A new image resampled to exactly `size`.
    fn resize(
        &self,
        image: &Self::Image,
        size: Dimensions,
        quality: Interpolation,
    ) -> Result<Self::Image, BackendError>;
}
