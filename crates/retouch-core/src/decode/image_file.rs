//! PNG, JPEG and BMP decoding with EXIF orientation handling.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use super::{DecodeError, Orientation};
use crate::raster::RasterBuffer;

/// Decode an image file held in memory into an RGB raster.
///
/// The format is sniffed from the leading bytes; PNG, JPEG and BMP are
/// accepted. EXIF orientation is applied when present, so the raster is
/// always upright.
///
/// # Errors
///
/// * `DecodeError::Empty` for empty input or a zero-sized image.
/// * `DecodeError::InvalidFormat` if the bytes are not a supported format.
/// * `DecodeError::CorruptedFile` if the format is right but decoding fails.
pub fn decode_bytes(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = detect_format(bytes).ok_or(DecodeError::InvalidFormat)?;
    let orientation = get_orientation(bytes);
    debug!(?format, ?orientation, size = bytes.len(), "decoding image");

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let rgb = apply_orientation(img, orientation).into_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(RasterBuffer::from_rgb_image(rgb))
}

/// Read and decode an image file.
pub fn load_file(path: impl AsRef<Path>) -> Result<RasterBuffer, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raster = decode_bytes(&bytes)?;
    info!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "image loaded"
    );
    Ok(raster)
}

/// Sniff the container format, `None` unless PNG, JPEG or BMP.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    match image::guess_format(bytes).ok()? {
        format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp) => Some(format),
        _ => None,
    }
}

/// EXIF orientation of an image file, `Normal` when absent or unreadable.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
