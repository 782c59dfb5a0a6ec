//! High-level image operations.
//!
//! These functions combine the pure geometry in
//! [`calculations`](super::calculations) with backend execution. They never
//! fail on their own: every error comes from the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{
    Rect, Size, center_crop_pixels, center_crop_rect, fill_dimensions, fill_size, fit_size,
};
use super::params::{Dimensions, Interpolation, PixelRect};
use serde::Serialize;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Natural size of `image` as reported by the backend.
pub fn image_size<B: ImageBackend>(backend: &B, image: &B::Image) -> Size {
    Size::from(backend.dimensions(image))
}

/// Largest size with the image's aspect ratio that fits inside `bounds`.
pub fn size_that_fits<B: ImageBackend>(backend: &B, image: &B::Image, bounds: Size) -> Size {
    fit_size(image_size(backend, image), bounds)
}

/// Smallest size with the image's aspect ratio that covers `bounds`.
pub fn size_that_fills<B: ImageBackend>(backend: &B, image: &B::Image, bounds: Size) -> Size {
    fill_size(image_size(backend, image), bounds)
}

pub fn is_landscape<B: ImageBackend>(backend: &B, image: &B::Image) -> bool {
    image_size(backend, image).is_landscape()
}

/// Crop `rect` out of `image`. The region is rounded to whole pixels and
/// passed through without clamping.
pub fn crop<B: ImageBackend>(backend: &B, image: &B::Image, rect: Rect) -> Result<B::Image> {
    backend.crop(image, rect.to_pixel_rect())
}

/// Resample `image` to exactly `size` (rounded to whole pixels).
pub fn resize<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    size: Size,
    quality: Interpolation,
) -> Result<B::Image> {
    backend.resize(image, size.to_dimensions(), quality)
}

/// Resample `image` to the largest size that fits in `bounds`, keeping its
/// aspect ratio. No padding is added.
pub fn resize_to_fit<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    bounds: Size,
    quality: Interpolation,
) -> Result<B::Image> {
    let fitted = size_that_fits(backend, image, bounds);
    debug!(%bounds, %fitted, "Resizing to fit");
    resize(backend, image, fitted, quality)
}

/// The two steps of a crop-to-fit: resample to `filled`, then cut `crop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropToFitPlan {
    pub filled: Dimensions,
    pub crop: PixelRect,
}

/// Plan a crop-to-fit without executing it.
///
/// # Examples
/// ```
/// # use imgfit::imaging::{Dimensions, PixelRect, plan_crop_to_fit};
/// let plan = plan_crop_to_fit(Dimensions::new(200, 100), Dimensions::new(50, 50));
/// assert_eq!(plan.filled, Dimensions::new(100, 50));
/// assert_eq!(plan.crop, PixelRect::new(25, 0, 50, 50));
/// ```
pub fn plan_crop_to_fit(source: Dimensions, target: Dimensions) -> CropToFitPlan {
    let filled = fill_dimensions(source, target);
    if filled.is_empty() {
        // Nothing to cut from: the result collapses to zero
        return CropToFitPlan {
            filled: Dimensions::default(),
            crop: PixelRect::default(),
        };
    }
    CropToFitPlan {
        filled,
        crop: center_crop_pixels(filled, target),
    }
}

/// Resize to cover `target`, then crop the centered `target`-sized region.
///
/// The output is exactly `target` with no letterboxing; excess is trimmed
/// symmetrically from whichever axis overflows.
pub fn resize_and_crop_to_fit<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    target: Size,
    quality: Interpolation,
) -> Result<B::Image> {
    let source = backend.dimensions(image);
    let plan = plan_crop_to_fit(source, target.to_dimensions());
    debug!(
        %source,
        filled = %plan.filled,
        crop = %plan.crop,
        "Resizing and cropping to fit"
    );
    let filled = backend.resize(image, plan.filled, quality)?;
    backend.crop(&filled, plan.crop)
}

/// Every derived value for one source/bounds pair, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub source: Size,
    pub bounds: Size,
    pub fit: Size,
    pub fill: Size,
    pub landscape: bool,
    /// Centered `bounds`-sized region of the fill size.
    pub crop: Rect,
}

pub fn measure(source: Size, bounds: Size) -> Measurement {
    let fill = fill_size(source, bounds);
    Measurement {
        source,
        bounds,
        fit: fit_size(source, bounds),
        fill,
        landscape: source.is_landscape(),
        crop: center_crop_rect(fill, bounds),
    }
}
