//! Image geometry and processing.
//!
//! | Operation | Function |
//! |---|---|
//! | **Fit size** | [`fit_size`] / [`size_that_fits`] |
//! | **Fill size** | [`fill_size`] / [`size_that_fills`] |
//! | **Orientation** | [`is_landscape`] (strict: a square is not landscape) |
//! | **Crop** | [`crop`] |
//! | **Resize** | [`resize`], [`resize_to_fit`] |
//! | **Thumbnail** | [`resize_and_crop_to_fit`]: fill, then center-crop |
//!
//! The module is split into:
//! - **Calculations**: Pure geometry (unit testable, no images)
//! - **Parameters**: Pixel-domain value types and quality settings
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    ParseGeometryError, Point, Rect, Size, center_crop_pixels, center_crop_rect, fill_dimensions,
    fill_size, fit_size, is_landscape,
};
pub use operations::{
    CropToFitPlan, Measurement, crop, image_size, measure, plan_crop_to_fit, resize,
    resize_and_crop_to_fit, resize_to_fit, size_that_fills, size_that_fits,
};
pub use params::{Dimensions, Interpolation, PixelRect, Quality};
pub use rust_backend::RustBackend;
