//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! vocabulary shared between the geometry in
//! [`calculations`](super::calculations), the high-level
//! [`operations`](super::operations), and the [`backend`](super::backend) that
//! does the actual pixel work.
//!
//! ## Types
//!
//! - [`Dimensions`]: natural pixel size of an image, as reported by a backend.
//! - [`PixelRect`]: a crop region in whole pixels.
//! - [`Interpolation`]: resampling quality, passed through to the backend unchanged.
//! - [`Quality`]: lossy encoding quality (1–100, default 90). Clamped on construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangular region in whole pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn dimensions(self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Whether the region lies entirely inside an image of the given size.
    pub fn fits_within(self, bounds: Dimensions) -> bool {
        // u64 so that x + width cannot overflow
        u64::from(self.x) + u64::from(self.width) <= u64::from(bounds.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(bounds.height)
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Resampling quality for resize operations.
///
/// The core never interprets this value; it is handed to the backend as-is.
/// [`RustBackend`](super::RustBackend) maps the levels to
/// `Nearest`, `Triangle`, `CatmullRom` and `Lanczos3` respectively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    None,
    Low,
    Medium,
    #[default]
    High,
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interpolation::None => "none",
            Interpolation::Low => "low",
            Interpolation::Medium => "medium",
            Interpolation::High => "high",
        };
        f.write_str(name)
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn interpolation_default_is_high() {
        assert_eq!(Interpolation::default(), Interpolation::High);
    }

    #[test]
    fn interpolation_serializes_lowercase() {
        let json = serde_json::to_string(&Interpolation::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let parsed: Interpolation = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, Interpolation::None);
    }

    #[test]
    fn dimensions_empty_when_any_side_is_zero() {
        assert!(Dimensions::new(0, 10).is_empty());
        assert!(Dimensions::new(10, 0).is_empty());
        assert!(!Dimensions::new(1, 1).is_empty());
    }

    #[test]
    fn pixel_rect_fits_within_exact_bounds() {
        let bounds = Dimensions::new(100, 50);
        assert!(PixelRect::new(25, 0, 50, 50).fits_within(bounds));
        assert!(PixelRect::new(0, 0, 100, 50).fits_within(bounds));
    }

    #[test]
    fn pixel_rect_outside_bounds() {
        let bounds = Dimensions::new(100, 50);
        assert!(!PixelRect::new(51, 0, 50, 50).fits_within(bounds));
        assert!(!PixelRect::new(0, 1, 100, 50).fits_within(bounds));
    }

    #[test]
    fn pixel_rect_extreme_offsets_do_not_overflow() {
        let rect = PixelRect::new(u32::MAX, 0, u32::MAX, 1);
        assert!(!rect.fits_within(Dimensions::new(u32::MAX, 1)));
    }

    #[test]
    fn display_uses_geometry_notation() {
        assert_eq!(Dimensions::new(640, 480).to_string(), "640x480");
        assert_eq!(PixelRect::new(25, 0, 50, 50).to_string(), "50x50+25+0");
    }
}
