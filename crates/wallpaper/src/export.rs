//! Writing finished images to disk or memory.
//!
//! Formats that can store alpha get the RGBA canvas as-is. Everything else
//! is flattened onto an opaque colour first; JPEG is written at quality 95.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError, ImageFormat, Rgb, RgbImage, RgbaImage};
use tracing::info;

const JPEG_QUALITY: u8 = 95;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Image encode error: {0}")]
    Image(#[from] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether `format` can carry 8-bit RGBA.
pub fn supports_alpha(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Tiff
            | ImageFormat::WebP
            | ImageFormat::Tga
            | ImageFormat::Ico
            | ImageFormat::Qoi
    )
}

/// Composite every pixel over an opaque `background`.
pub fn flatten(image: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let fg = image.get_pixel(x, y);
        let alpha = f32::from(fg[3]) / 255.0;
        let inv = 1.0 - alpha;
        Rgb([
            (f32::from(fg[0]) * alpha + f32::from(background[0]) * inv).round() as u8,
            (f32::from(fg[1]) * alpha + f32::from(background[1]) * inv).round() as u8,
            (f32::from(fg[2]) * alpha + f32::from(background[2]) * inv).round() as u8,
        ])
    })
}

/// Whether `format` has an 8-bit encoder this crate writes through.
///
/// HDR, OpenEXR, farbfeld and the rest need float or 16-bit input and are
/// rejected up front.
pub fn is_writable(format: ImageFormat) -> bool {
    supports_alpha(format)
        || matches!(
            format,
            ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Gif | ImageFormat::Pnm
        )
}

/// Save `image` to `path`, picking the format from its extension.
///
/// The image is encoded in memory first, so a failed encode never leaves a
/// partial file behind.
pub fn save(
    image: &RgbaImage,
    path: &Path,
    flatten_color: Rgb<u8>,
) -> Result<ImageFormat, ExportError> {
    let extension = || {
        path.extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    };
    let format =
        ImageFormat::from_path(path).map_err(|_| ExportError::UnsupportedFormat(extension()))?;
    if !is_writable(format) {
        return Err(ExportError::UnsupportedFormat(extension()));
    }

    let bytes = encode_to_vec(image, format, flatten_color)?;
    std::fs::write(path, &bytes)?;

    info!(
        path = %path.display(),
        ?format,
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Image saved"
    );
    Ok(format)
}

/// Encode `image` into an in-memory buffer.
pub fn encode_to_vec(
    image: &RgbaImage,
    format: ImageFormat,
    flatten_color: Rgb<u8>,
) -> Result<Vec<u8>, ExportError> {
    if !is_writable(format) {
        return Err(ExportError::UnsupportedFormat(format!("{format:?}")));
    }

    let mut cursor = Cursor::new(Vec::new());
    if supports_alpha(format) {
        DynamicImage::ImageRgba8(image.clone()).write_to(&mut cursor, format)?;
        return Ok(cursor.into_inner());
    }

    let flat = DynamicImage::ImageRgb8(flatten(image, flatten_color));
    if format == ImageFormat::Jpeg {
        flat.write_with_encoder(JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY))?;
    } else {
        flat.write_to(&mut cursor, format)?;
    }
    Ok(cursor.into_inner())
}
