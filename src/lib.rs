//! # imgfit
//!
//! Aspect-preserving sizing, cropping and resizing for raster images.
//!
//! The core is plain geometry: given an image's natural size and a bounding
//! box, compute the size that *fits* inside the box, the size that *fills* it,
//! and the centered region to cut when filling. Pixel work is delegated to an
//! [`ImageBackend`](imaging::ImageBackend); the bundled
//! [`RustBackend`](imaging::RustBackend) drives the `image` crate.
//!
//! ```
//! use imgfit::imaging::{Size, fill_size, fit_size, is_landscape};
//!
//! let photo = Size::new(200.0, 100.0);
//! let frame = Size::new(50.0, 50.0);
//! assert_eq!(fit_size(photo, frame), Size::new(50.0, 25.0));
//! assert_eq!(fill_size(photo, frame), Size::new(100.0, 50.0));
//! assert!(is_landscape(photo));
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Geometry, backend trait, `image`-crate backend, high-level operations |
//! | [`batch`] | Parallel crop-to-fit / fit over a directory tree |
//! | [`config`] | `imgfit.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Exact Geometry, Rounded Pixels
//!
//! Fit and fill sizes are computed in `f64` and the binding axis is pinned to
//! the bound exactly, so a result never drifts past the box. Rounding to whole
//! pixels (half away from zero) happens once, at the backend boundary. Centered
//! crop offsets in pixels floor-halve the overflow.
//!
//! ## Degenerate Input Is Not an Error
//!
//! A zero-width or zero-height source fits and fills to a zero size, and
//! crop-to-fit of such a source yields an empty image. The only geometric
//! failure is an out-of-bounds crop, which the backend reports instead of
//! clamping.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
