//! Raster encoding for export.
//!
//! PNG and BMP are lossless. JPEG quality is clamped to 1-100.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;
use tracing::info;

use super::format::{normalize_path, ImageFormat};
use crate::raster::RasterBuffer;

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: ImageFormat,
        message: String,
    },

    /// The destination could not be written
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encode a raster into the bytes of an image file.
///
/// # Quality Guidelines
///
/// `jpeg_quality` only affects JPEG:
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-80: Medium quality, acceptable for web
/// * Below 60: Low quality, visible artifacts
pub fn encode(
    raster: &RasterBuffer,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let pixels = raster.to_packed();
    let mut buffer = Cursor::new(Vec::new());
    let result = match format {
        ImageFormat::Png => PngEncoder::new(&mut buffer).write_image(
            &pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100))
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8),
        ImageFormat::Bmp => BmpEncoder::new(&mut buffer).write_image(
            &pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed {
        format,
        message: e.to_string(),
    })?;

    Ok(buffer.into_inner())
}

/// Encode `raster` and write it to `path`, normalized to carry `format`'s
/// extension. Returns the path actually written.
pub fn save(
    raster: &RasterBuffer,
    path: impl AsRef<Path>,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<PathBuf, EncodeError> {
    let path = normalize_path(path, format);
    let bytes = encode(raster, format, jpeg_quality)?;
    std::fs::write(&path, &bytes).map_err(|source| EncodeError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), ?format, size = bytes.len(), "image saved");
    Ok(path)
}
