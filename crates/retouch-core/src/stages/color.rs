//! Color stage: luma equalization and hue / saturation / value shifts.
//!
//! The two sub-steps run in a fixed order and each one short-circuits when
//! at identity, so toggling equalization never perturbs HSV-adjusted pixels
//! through an extra color-space round trip.

use crate::color::{hsv_to_rgb, rgb_to_hsv, rgb_to_ycrcb, saturate_u8, ycrcb_to_rgb};
use crate::histogram::{channel_histogram, equalization_lut};
use crate::raster::RasterBuffer;

/// Highest 8-bit hue value (half-degrees).
const HUE_MAX: i32 = 180;

/// Apply the color stage.
pub fn color(
    src: &RasterBuffer,
    equalize: bool,
    hue: i32,
    saturation: f32,
    value: f32,
) -> RasterBuffer {
    let hsv_identity = hue == 0 && saturation == 1.0 && value == 1.0;
    match (equalize, hsv_identity) {
        (false, true) => src.clone(),
        (true, true) => equalize_luma(src),
        (false, false) => adjust_hsv(src, hue, saturation, value),
        (true, false) => adjust_hsv(&equalize_luma(src), hue, saturation, value),
    }
}

/// Equalize the luma histogram, leaving chroma untouched.
pub fn equalize_luma(src: &RasterBuffer) -> RasterBuffer {
    let ycc = src.map_pixels(rgb_to_ycrcb);
    let lut = equalization_lut(&channel_histogram(ycc.as_bytes(), 0));
    ycc.map_pixels(|[y, cr, cb]| ycrcb_to_rgb([lut[y as usize], cr, cb]))
}

/// Shift a hue by `shift`, clamping into `[0, 180]`.
///
/// Hue is clamped rather than wrapped: shifting past either end of the
/// range saturates at that end.
#[inline]
pub fn shift_hue(hue: u8, shift: i32) -> u8 {
    (hue as i32 + shift).clamp(0, HUE_MAX) as u8
}

/// Shift hue and scale saturation and value.
pub fn adjust_hsv(src: &RasterBuffer, hue: i32, saturation: f32, value: f32) -> RasterBuffer {
    src.map_pixels(|px| {
        let [mut h, mut s, mut v] = rgb_to_hsv(px);
        if hue != 0 {
            h = shift_hue(h, hue);
        }
        if saturation != 1.0 {
            s = saturate_u8(s as f32 * saturation);
        }
        if value != 1.0 {
            v = saturate_u8(v as f32 * value);
        }
        hsv_to_rgb([h, s, v])
    })
}
