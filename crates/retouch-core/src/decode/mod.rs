//! Image loading for Retouch.
//!
//! Decodes PNG, JPEG and BMP files into an upright RGB [`RasterBuffer`],
//! applying EXIF orientation. All failures are typed; nothing here touches
//! session state.
//!
//! [`RasterBuffer`]: crate::RasterBuffer

mod image_file;
mod types;

pub use image_file::{decode_bytes, detect_format, get_orientation, load_file};
pub use types::{DecodeError, Orientation};
