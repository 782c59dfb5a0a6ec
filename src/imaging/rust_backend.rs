//! Pure Rust image backend on top of the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | Crop | `DynamicImage::crop_imm`, bounds-checked first |
//! | Resize | `DynamicImage::resize_exact` with the mapped `FilterType` |
//! | Encode → JPEG / AVIF | `JpegEncoder` / `AvifEncoder` (rav1e, speed 6) with quality |
//! | Encode → PNG / TIFF / WebP | `DynamicImage::write_to` (lossless) |

use super::backend::{BackendError, ImageBackend};
use super::params::{Dimensions, Interpolation, PixelRect, Quality};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Extensions whose decoders are compiled in.
///
/// AVIF is output-only: the `image` crate's `"avif"` feature enables the
/// encoder but not a decoder.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has one of the [`supported_input_extensions`] (any case).
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Backend over [`DynamicImage`].
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_type(quality: Interpolation) -> FilterType {
    match quality {
        Interpolation::None => FilterType::Nearest,
        Interpolation::Low => FilterType::Triangle,
        Interpolation::Medium => FilterType::CatmullRom,
        Interpolation::High => FilterType::Lanczos3,
    }
}

/// Read pixel dimensions from the file header without decoding.
pub fn identify(path: &Path) -> Result<Dimensions, BackendError> {
    let (width, height) = image::image_dimensions(path).map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "Failed to read dimensions of {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(Dimensions::new(width, height))
}

/// Load and decode an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save `img` to `path`, inferring the format from the extension.
///
/// `quality` applies to JPEG and AVIF; the other formats are lossless.
pub fn save_image(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let format = ImageFormat::from_extension(&ext)
        .filter(|f| is_writable(*f))
        .ok_or_else(|| BackendError::UnsupportedFormat(format!("extension {ext:?}")))?;

    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = std::io::BufWriter::new(file);
    write_encoded(img, &mut writer, format, quality)?;
    writer.flush().map_err(BackendError::Io)
}

/// Encode `img` into the format named by a MIME type such as `image/jpeg`.
pub fn encode_image(
    img: &DynamicImage,
    mime_type: &str,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let format = ImageFormat::from_mime_type(mime_type)
        .filter(|f| is_writable(*f))
        .ok_or_else(|| BackendError::UnsupportedFormat(format!("MIME type {mime_type:?}")))?;
    let mut cursor = Cursor::new(Vec::new());
    write_encoded(img, &mut cursor, format, quality)?;
    Ok(cursor.into_inner())
}

fn is_writable(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg
            | ImageFormat::Avif
            | ImageFormat::WebP
            | ImageFormat::Png
            | ImageFormat::Tiff
    )
}

/// Drop to 8 bits per channel, keeping alpha only when the source has it.
fn to_8bit(img: &DynamicImage, keep_alpha: bool) -> DynamicImage {
    if keep_alpha && img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

fn write_encoded<W: Write + Seek>(
    img: &DynamicImage,
    writer: &mut W,
    format: ImageFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let q = quality.value() as u8;
    let encode_err = |e: image::ImageError| {
        BackendError::ProcessingFailed(format!("{format:?} encode failed: {e}"))
    };

    match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => to_8bit(img, false)
            .write_with_encoder(JpegEncoder::new_with_quality(writer, q))
            .map_err(encode_err),
        ImageFormat::Avif => to_8bit(img, true)
            .write_with_encoder(AvifEncoder::new_with_speed_quality(writer, 6, q))
            .map_err(encode_err),
        ImageFormat::WebP => to_8bit(img, true)
            .write_to(writer, format)
            .map_err(encode_err),
        ImageFormat::Png | ImageFormat::Tiff => img.write_to(writer, format).map_err(encode_err),
        other => Err(BackendError::UnsupportedFormat(format!("{other:?}"))),
    }
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions::new(image.width(), image.height())
    }

    fn crop(&self, image: &DynamicImage, rect: PixelRect) -> Result<DynamicImage, BackendError> {
        let bounds = self.dimensions(image);
        if !rect.fits_within(bounds) {
            return Err(BackendError::OutOfBounds { rect, bounds });
        }
        debug!(%bounds, %rect, "Cropping");
        Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
    }

    fn resize(
        &self,
        image: &DynamicImage,
        size: Dimensions,
        quality: Interpolation,
    ) -> Result<DynamicImage, BackendError> {
        let current = self.dimensions(image);
        if size.is_empty() || current.is_empty() {
            // Nothing to sample from or into: a blank image of the requested size
            debug!(from = %current, to = %size, "Degenerate resize");
            return Ok(DynamicImage::new(size.width, size.height, image.color()));
        }
        if current == size {
            debug!(%size, "Image already at target size, skipping resize");
            return Ok(image.clone());
        }
        debug!(from = %current, to = %size, %quality, "Resizing");
        Ok(image.resize_exact(size.width, size.height, filter_type(quality)))
    }
}
