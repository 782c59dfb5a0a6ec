//! Pure geometry for fit/fill scaling, orientation and centered cropping.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Geometry is computed in exact `f64`. Rounding to whole pixels happens only
//! at the boundary ([`Size::to_dimensions`], [`Rect::to_pixel_rect`]) and uses
//! round-half-away-from-zero. Centered crop offsets in the pixel domain are
//! the overflow halved with integer division.

use super::params::{Dimensions, PixelRect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseGeometryError {
    #[error("expected WIDTHxHEIGHT, got {0:?}")]
    Size(String),
    #[error("expected WIDTHxHEIGHT+X+Y, got {0:?}")]
    Rect(String),
    #[error("invalid number {0:?} (must be finite and non-negative)")]
    Number(String),
}

/// A width/height pair in (possibly fractional) pixels.
///
/// Components are expected to be non-negative. A size with a zero, negative or
/// NaN component is *degenerate*: it is accepted everywhere and produces
/// degenerate output rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True unless both components are strictly positive.
    pub fn is_degenerate(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Width divided by height, or `None` for a degenerate size.
    pub fn aspect_ratio(self) -> Option<f64> {
        (!self.is_degenerate()).then(|| self.width / self.height)
    }

    pub fn is_landscape(self) -> bool {
        is_landscape(self)
    }

    /// Round to whole pixels (half away from zero). Negative and NaN become 0.
    pub fn to_dimensions(self) -> Dimensions {
        Dimensions::new(to_pixels(self.width), to_pixels(self.height))
    }

    fn clamp_non_negative(self) -> Self {
        // f64::max returns the non-NaN operand
        Self::new(self.width.max(0.0), self.height.max(0.0))
    }
}

impl From<Dimensions> for Size {
    fn from(dims: Dimensions) -> Self {
        Self::new(f64::from(dims.width), f64::from(dims.height))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = ParseGeometryError;

    /// Parse `WIDTHxHEIGHT`, e.g. `200x100` or `12.5x4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ParseGeometryError::Size(s.to_string()))?;
        Ok(Size::new(parse_component(w)?, parse_component(h)?))
    }
}

/// A point in (possibly fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A cropping region: an origin plus a size.
///
/// Nothing here checks the region against an image; staying in bounds is the
/// caller's job and violations are reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn to_pixel_rect(self) -> PixelRect {
        let dims = self.size.to_dimensions();
        PixelRect::new(
            to_pixels(self.origin.x),
            to_pixels(self.origin.y),
            dims.width,
            dims.height,
        )
    }
}

impl From<PixelRect> for Rect {
    fn from(rect: PixelRect) -> Self {
        Self::new(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}+{}", self.size, self.origin.x, self.origin.y)
    }
}

impl FromStr for Rect {
    type Err = ParseGeometryError;

    /// Parse ImageMagick-style geometry `WIDTHxHEIGHT+X+Y`, e.g. `50x50+25+0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGeometryError::Rect(s.to_string());
        let (size, offsets) = s.trim().split_once('+').ok_or_else(err)?;
        let (x, y) = offsets.split_once('+').ok_or_else(err)?;
        let size: Size = size.parse().map_err(|_| err())?;
        Ok(Rect {
            origin: Point::new(parse_component(x)?, parse_component(y)?),
            size,
        })
    }
}

fn parse_component(s: &str) -> Result<f64, ParseGeometryError> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| ParseGeometryError::Number(s.to_string()))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParseGeometryError::Number(s.to_string()))
    }
}

/// `as` saturates: negatives and NaN become 0, overflow becomes `u32::MAX`.
fn to_pixels(value: f64) -> u32 {
    value.round() as u32
}

/// Scale factors closer than a few ulps are treated as a tie, so the result
/// binds both axes and fitting a size into itself is a no-op.
fn is_tie(a: f64, b: f64) -> bool {
    (a - b).abs() <= 4.0 * f64::EPSILON * a.abs().max(b.abs())
}

/// Apply `scale` to `source`, pinning the binding axis to the bound exactly.
fn bind(source: Size, bounds: Size, sx: f64, sy: f64, scale: f64) -> Size {
    if is_tie(sx, sy) {
        bounds
    } else if scale == sx {
        Size::new(bounds.width, source.height * scale)
    } else {
        Size::new(source.width * scale, bounds.height)
    }
}

/// Largest size with the aspect ratio of `source` that fits inside `bounds`.
///
/// `scale = min(bounds.w / source.w, bounds.h / source.h)`; the axis that
/// produced the smaller factor equals the bound exactly. A degenerate source
/// yields [`Size::ZERO`]; negative bound components are treated as zero.
///
/// # Examples
/// ```
/// # use imgfit::imaging::{Size, fit_size};
/// // 2:1 into a square: width binds
/// assert_eq!(fit_size(Size::new(200.0, 100.0), Size::new(50.0, 50.0)), Size::new(50.0, 25.0));
/// ```
pub fn fit_size(source: Size, bounds: Size) -> Size {
    if source.is_degenerate() {
        return Size::ZERO;
    }
    let bounds = bounds.clamp_non_negative();
    let sx = bounds.width / source.width;
    let sy = bounds.height / source.height;
    bind(source, bounds, sx, sy, sx.min(sy))
}

/// Smallest size with the aspect ratio of `source` that covers `bounds`.
///
/// `scale = max(bounds.w / source.w, bounds.h / source.h)`; the axis that
/// produced the larger factor equals the bound exactly, the other overflows.
///
/// # Examples
/// ```
/// # use imgfit::imaging::{Size, fill_size};
/// // 2:1 over a square: height binds
/// assert_eq!(fill_size(Size::new(200.0, 100.0), Size::new(50.0, 50.0)), Size::new(100.0, 50.0));
/// ```
pub fn fill_size(source: Size, bounds: Size) -> Size {
    if source.is_degenerate() {
        return Size::ZERO;
    }
    let bounds = bounds.clamp_non_negative();
    let sx = bounds.width / source.width;
    let sy = bounds.height / source.height;
    bind(source, bounds, sx, sy, sx.max(sy))
}

/// Strictly wider than tall. A square is not landscape.
pub fn is_landscape(size: Size) -> bool {
    size.width > size.height
}

/// The `target`-sized region centered inside `filled`.
///
/// Origin is `((filled.w - target.w) / 2, (filled.h - target.h) / 2)`.
pub fn center_crop_rect(filled: Size, target: Size) -> Rect {
    Rect {
        origin: Point::new(
            (filled.width - target.width) / 2.0,
            (filled.height - target.height) / 2.0,
        ),
        size: target,
    }
}

/// Pixel-domain fill: [`fill_size`] rounded, never smaller than `target`
/// unless the source is degenerate (then zero).
pub fn fill_dimensions(source: Dimensions, target: Dimensions) -> Dimensions {
    if source.is_empty() {
        return Dimensions::default();
    }
    let filled = fill_size(source.into(), target.into()).to_dimensions();
    Dimensions::new(
        filled.width.max(target.width),
        filled.height.max(target.height),
    )
}

/// Pixel-domain [`center_crop_rect`]. An axis where `target` exceeds
/// `filled` gets offset 0.
pub fn center_crop_pixels(filled: Dimensions, target: Dimensions) -> PixelRect {
    PixelRect::new(
        filled.width.saturating_sub(target.width) / 2,
        filled.height.saturating_sub(target.height) / 2,
        target.width,
        target.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
    }

    /// A spread of sizes covering wide, tall, square, tiny and fractional inputs.
    fn sample_sizes() -> Vec<Size> {
        vec![
            Size::new(200.0, 100.0),
            Size::new(100.0, 200.0),
            Size::new(80.0, 80.0),
            Size::new(1.0, 3.0),
            Size::new(4032.0, 3024.0),
            Size::new(0.5, 0.25),
            Size::new(333.3, 17.0),
            Size::new(1920.0, 1080.0),
        ]
    }

    // =========================================================================
    // fit_size tests
    // =========================================================================

    #[test]
    fn fit_width_bound() {
        let fit = fit_size(Size::new(200.0, 100.0), Size::new(50.0, 50.0));
        assert_eq!(fit, Size::new(50.0, 25.0));
    }

    #[test]
    fn fit_height_bound() {
        let fit = fit_size(Size::new(100.0, 200.0), Size::new(50.0, 50.0));
        assert_eq!(fit, Size::new(25.0, 50.0));
    }

    #[test]
    fn fit_upscales_small_source() {
        let fit = fit_size(Size::new(4.0, 3.0), Size::new(800.0, 800.0));
        assert_eq!(fit, Size::new(800.0, 600.0));
    }

    #[test]
    fn fit_same_aspect_binds_both_axes() {
        let fit = fit_size(Size::new(800.0, 600.0), Size::new(400.0, 300.0));
        assert_eq!(fit, Size::new(400.0, 300.0));
    }

    #[test]
    fn fit_stays_within_bounds() {
        for source in sample_sizes() {
            for bounds in sample_sizes() {
                let fit = fit_size(source, bounds);
                assert!(fit.width <= bounds.width * (1.0 + TOLERANCE), "{source} in {bounds}");
                assert!(fit.height <= bounds.height * (1.0 + TOLERANCE), "{source} in {bounds}");
            }
        }
    }

    #[test]
    fn fit_binding_axis_matches_bound_exactly() {
        for source in sample_sizes() {
            for bounds in sample_sizes() {
                let fit = fit_size(source, bounds);
                assert!(
                    fit.width == bounds.width || fit.height == bounds.height,
                    "{source} in {bounds} gave {fit}"
                );
            }
        }
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        for source in sample_sizes() {
            for bounds in sample_sizes() {
                let fit = fit_size(source, bounds);
                assert!(approx(
                    fit.aspect_ratio().unwrap(),
                    source.aspect_ratio().unwrap()
                ));
            }
        }
    }

    #[test]
    fn fit_is_idempotent() {
        for source in sample_sizes() {
            for bounds in sample_sizes() {
                let once = fit_size(source, bounds);
                assert_eq!(fit_size(source, once), once, "{source} in {bounds}");
            }
        }
    }

    #[test]
    fn fit_degenerate_source_collapses_to_zero() {
        assert_eq!(fit_size(Size::new(0.0, 100.0), Size::new(50.0, 50.0)), Size::ZERO);
        assert_eq!(fit_size(Size::new(100.0, 0.0), Size::new(50.0, 50.0)), Size::ZERO);
        assert_eq!(fit_size(Size::new(-5.0, 10.0), Size::new(50.0, 50.0)), Size::ZERO);
        assert_eq!(fit_size(Size::new(f64::NAN, 10.0), Size::new(50.0, 50.0)), Size::ZERO);
    }

    #[test]
    fn fit_zero_bounds_collapses_to_zero() {
        assert_eq!(fit_size(Size::new(200.0, 100.0), Size::ZERO), Size::ZERO);
        assert_eq!(fit_size(Size::new(200.0, 100.0), Size::new(0.0, 50.0)), Size::ZERO);
    }

    #[test]
    fn fit_negative_bounds_treated_as_zero() {
        assert_eq!(fit_size(Size::new(200.0, 100.0), Size::new(-50.0, 50.0)), Size::ZERO);
    }

    // =========================================================================
    // fill_size tests
    // =========================================================================

    #[test]
    fn fill_height_bound() {
        let fill = fill_size(Size::new(200.0, 100.0), Size::new(50.0, 50.0));
        assert_eq!(fill, Size::new(100.0, 50.0));
    }

    #[test]
    fn fill_width_bound() {
        let fill = fill_size(Size::new(100.0, 200.0), Size::new(50.0, 50.0));
        assert_eq!(fill, Size::new(50.0, 100.0));
    }

    #[test]
    fn fill_wider_source_to_portrait_target() {
        // 4:3 over 400x500: height binds, width = 500 * 4/3
        let fill = fill_size(Size::new(800.0, 600.0), Size::new(400.0, 500.0));
        assert_eq!(fill.height, 500.0);
        assert!(approx(fill.width, 2000.0 / 3.0));
    }

    #[test]
    fn fill_covers_bounds() {
        for source in sample_sizes() {
            for bounds in sample_sizes() {
                let fill = fill_size(source, bounds);
                assert!(fill.width >= bounds.width * (1.0 - TOLERANCE), "{source} over {bounds}");
                assert!(fill.height >= bounds.height * (1.0 - TOLERANCE), "{source} over {bounds}");
            }
        }
    }

    #[test]
    fn fill_binding_axis_matches_bound_exactly() {
        for source in sample_sizes() {
            for bounds in sample_sizes() {
                let fill = fill_size(source, bounds);
                assert!(fill.width == bounds.width || fill.height == bounds.height);
            }
        }
    }

    #[test]
    fn fill_preserves_aspect_ratio() {
        for source in sample_sizes() {
            for bounds in sample_sizes() {
                let fill = fill_size(source, bounds);
                assert!(approx(
                    fill.aspect_ratio().unwrap(),
                    source.aspect_ratio().unwrap()
                ));
            }
        }
    }

    #[test]
    fn fill_degenerate_source_collapses_to_zero() {
        assert_eq!(fill_size(Size::new(0.0, 0.0), Size::new(50.0, 50.0)), Size::ZERO);
        assert_eq!(fill_size(Size::new(10.0, -1.0), Size::new(50.0, 50.0)), Size::ZERO);
    }

    #[test]
    fn fill_with_one_zero_bound_uses_other_axis() {
        let fill = fill_size(Size::new(200.0, 100.0), Size::new(0.0, 50.0));
        assert_eq!(fill, Size::new(100.0, 50.0));
    }

    // =========================================================================
    // is_landscape tests
    // =========================================================================

    #[test]
    fn landscape_wide() {
        assert!(is_landscape(Size::new(100.0, 50.0)));
    }

    #[test]
    fn landscape_tall_is_not() {
        assert!(!is_landscape(Size::new(50.0, 100.0)));
    }

    #[test]
    fn landscape_square_is_not() {
        assert!(!is_landscape(Size::new(80.0, 80.0)));
        assert!(!Size::new(80.0, 80.0).is_landscape());
    }

    // =========================================================================
    // Cropping tests
    // =========================================================================

    #[test]
    fn center_crop_landscape_overflow() {
        let rect = center_crop_rect(Size::new(100.0, 50.0), Size::new(50.0, 50.0));
        assert_eq!(rect, Rect::new(25.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn center_crop_portrait_overflow() {
        let rect = center_crop_rect(Size::new(50.0, 100.0), Size::new(50.0, 50.0));
        assert_eq!(rect.origin, Point::new(0.0, 25.0));
    }

    #[test]
    fn center_crop_pixels_floors_odd_overflow() {
        let rect = center_crop_pixels(Dimensions::new(101, 50), Dimensions::new(50, 50));
        assert_eq!(rect, PixelRect::new(25, 0, 50, 50));
    }

    #[test]
    fn center_crop_pixels_target_larger_than_filled() {
        let rect = center_crop_pixels(Dimensions::new(40, 40), Dimensions::new(50, 50));
        assert_eq!(rect, PixelRect::new(0, 0, 50, 50));
    }

    #[test]
    fn fill_dimensions_never_undercuts_target() {
        // 800x600 (4:3) over 400x500: 666.67 rounds to 667
        assert_eq!(
            fill_dimensions(Dimensions::new(800, 600), Dimensions::new(400, 500)),
            Dimensions::new(667, 500)
        );
        assert_eq!(
            fill_dimensions(Dimensions::new(600, 800), Dimensions::new(500, 400)),
            Dimensions::new(500, 667)
        );
    }

    #[test]
    fn fill_dimensions_empty_source_is_zero() {
        assert_eq!(
            fill_dimensions(Dimensions::new(0, 600), Dimensions::new(400, 500)),
            Dimensions::default()
        );
    }

    // =========================================================================
    // Rounding and parsing tests
    // =========================================================================

    #[test]
    fn to_dimensions_rounds_half_away_from_zero() {
        assert_eq!(Size::new(2.5, 3.49).to_dimensions(), Dimensions::new(3, 3));
        assert_eq!(Size::new(-4.0, f64::NAN).to_dimensions(), Dimensions::new(0, 0));
    }

    #[test]
    fn rect_to_pixel_rect_rounds_every_component() {
        let rect = Rect::new(24.5, 0.4, 49.6, 50.0).to_pixel_rect();
        assert_eq!(rect, PixelRect::new(25, 0, 50, 50));
    }

    #[test]
    fn parse_size() {
        assert_eq!("200x100".parse::<Size>().unwrap(), Size::new(200.0, 100.0));
        assert_eq!(" 12.5X4 ".parse::<Size>().unwrap(), Size::new(12.5, 4.0));
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert!(matches!("200".parse::<Size>(), Err(ParseGeometryError::Size(_))));
        assert!(matches!("ax1".parse::<Size>(), Err(ParseGeometryError::Number(_))));
        assert!(matches!("-1x1".parse::<Size>(), Err(ParseGeometryError::Number(_))));
        assert!(matches!("infx1".parse::<Size>(), Err(ParseGeometryError::Number(_))));
    }

    #[test]
    fn parse_rect() {
        let rect: Rect = "50x50+25+0".parse().unwrap();
        assert_eq!(rect, Rect::new(25.0, 0.0, 50.0, 50.0));
        assert_eq!(rect.to_string(), "50x50+25+0");
    }

    #[test]
    fn parse_rect_requires_both_offsets() {
        assert!(matches!("50x50+25".parse::<Rect>(), Err(ParseGeometryError::Rect(_))));
        assert!(matches!("50x50".parse::<Rect>(), Err(ParseGeometryError::Rect(_))));
    }

    #[test]
    fn aspect_ratio_of_degenerate_is_none() {
        assert_eq!(Size::new(0.0, 10.0).aspect_ratio(), None);
        assert_eq!(Size::new(20.0, 10.0).aspect_ratio(), Some(2.0));
    }
}
