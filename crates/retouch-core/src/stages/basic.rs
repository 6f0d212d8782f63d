//! Basic stage: linear brightness and contrast.
//!
//! `dst = clamp(src * contrast + brightness, 0, 255)` per channel.

use crate::color::saturate_u8;
use crate::raster::RasterBuffer;

/// Apply brightness offset and contrast gain.
///
/// Returns an exact copy of `src` when `brightness == 0` and
/// `contrast == 1.0`.
pub fn basic(src: &RasterBuffer, brightness: i32, contrast: f32) -> RasterBuffer {
    if brightness == 0 && contrast == 1.0 {
        return src.clone();
    }

    // 256-entry table: the transform only depends on the input level
    let mut lut = [0u8; 256];
    for (level, entry) in lut.iter_mut().enumerate() {
        *entry = saturate_u8(level as f32 * contrast + brightness as f32);
    }

    src.map_pixels(|px| px.map(|c| lut[c as usize]))
}
