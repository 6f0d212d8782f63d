//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Retouch
//! raster, plus helpers for reading enum names sent from JavaScript.

use retouch_core::RasterBuffer;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use wasm_bindgen::prelude::*;

/// An RGB raster wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()` or
/// `rgba()`, a copy is made to JavaScript memory. For large images keep the
/// raster on the WASM side and only extract pixels when drawing.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create a new JsRaster from dimensions and packed RGB pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRaster {
        JsRaster {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns packed RGB pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns RGBA pixel data with opaque alpha, ready for `ImageData`.
    ///
    /// ```typescript
    /// const data = new ImageData(raster.rgba(), raster.width, raster.height);
    /// ctx.putImageData(data, 0, 0);
    /// ```
    pub fn rgba(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.rgba_bytes().as_slice())
    }
}

impl JsRaster {
    pub(crate) fn from_raster(raster: &RasterBuffer) -> Self {
        Self {
            width: raster.width(),
            height: raster.height(),
            pixels: raster.to_packed(),
        }
    }

    /// Convert to a core raster, checking the buffer length.
    pub(crate) fn to_raster(&self) -> Result<RasterBuffer, String> {
        RasterBuffer::from_pixels(self.width, self.height, self.pixels.clone())
            .map_err(|e| e.to_string())
    }

    pub(crate) fn rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect()
    }
}

/// Read a snake_case enum name such as `"gaussian"` or `"zoom_in"`.
pub(crate) fn parse_name<T: DeserializeOwned>(name: &str) -> Result<T, String> {
    let de: StrDeserializer<'_, ValueError> = name.into_deserializer();
    T::deserialize(de).map_err(|e| format!("'{name}': {e}"))
}

/// Convert a binding error message to a JavaScript error value.
pub(crate) fn to_js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}
