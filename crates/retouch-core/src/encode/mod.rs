//! Image export for Retouch.
//!
//! Encodes a [`RasterBuffer`](crate::RasterBuffer) as PNG, JPEG or BMP and
//! writes it to disk. Save paths are normalized to carry the extension of
//! the chosen format.
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::encode::{save, ImageFormat};
//!
//! let written = save(&preview, "exports/shot", ImageFormat::Jpeg, 90)?;
//! assert_eq!(written.extension().unwrap(), "jpg");
//! ```

mod encoder;
mod format;

pub use encoder::{encode, save, EncodeError};
pub use format::{normalize_path, ImageFormat};
