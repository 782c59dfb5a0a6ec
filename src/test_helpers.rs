//! Shared test utilities: synthetic images and on-disk fixtures.
//!
//! Images are generated in-test so the suite needs no fixture files. The
//! gradient encodes `x` in red and `y` in green, which lets crop tests check
//! which source pixels ended up where.

use image::{DynamicImage, ImageEncoder, RgbImage};
use std::path::Path;

/// A `width`x`height` RGB gradient.
pub fn create_test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// Write a small valid JPEG with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = create_test_image(width, height).to_rgb8();
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a lossless PNG with the given dimensions.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    create_test_image(width, height).save(path).unwrap();
}
