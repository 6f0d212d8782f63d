//! Sharpen stage: unsharp mask against the pre-smoothing buffer.

use crate::color::saturate_u8;
use crate::raster::{RasterBuffer, CHANNELS};

/// Unsharp mask.
///
/// `mask = color_out - blur_out` per channel, re-centered on its own global
/// mean so flat regions are untouched, then
/// `dst = clamp(color_out + amount * mask)`. The mask measures the detail
/// removed by the current smoothing setting, so with smoothing at identity
/// the mask is empty and the output equals `color_out`.
///
/// With `amount == 0.0` the result is exactly `blur_out`.
pub fn sharpen(color_out: &RasterBuffer, blur_out: &RasterBuffer, amount: f32) -> RasterBuffer {
    if amount == 0.0 {
        return blur_out.clone();
    }
    debug_assert_eq!(
        (color_out.width(), color_out.height()),
        (blur_out.width(), blur_out.height()),
        "sharpen inputs must have the same dimensions"
    );

    let (w, h) = (color_out.width(), color_out.height());
    if color_out.is_empty() {
        return blur_out.clone();
    }

    let mut sums = [0.0f64; 3];
    for y in 0..h {
        for (c_px, b_px) in color_out
            .row(y)
            .chunks_exact(CHANNELS)
            .zip(blur_out.row(y).chunks_exact(CHANNELS))
        {
            for c in 0..CHANNELS {
                sums[c] += c_px[c] as f64 - b_px[c] as f64;
            }
        }
    }
    let count = color_out.pixel_count() as f64;
    let mean = sums.map(|s| (s / count) as f32);

    let mut dst = RasterBuffer::new(w, h);
    for y in 0..h {
        let c_row = color_out.row(y);
        let b_row = blur_out.row(y);
        let out = dst.row_mut(y);
        for i in 0..out.len() {
            let detail = c_row[i] as f32 - b_row[i] as f32 - mean[i % CHANNELS];
            out[i] = saturate_u8(c_row[i] as f32 + amount * detail);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount_returns_blur_exactly() {
        let color_out = RasterBuffer::from_pixels(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let blur_out = RasterBuffer::with_stride(2, 1, 8, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(sharpen(&color_out, &blur_out, 0.0), blur_out);
    }

    #[test]
    fn test_no_detail_no_change() {
        let img = RasterBuffer::from_pixels(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
        assert_eq!(sharpen(&img, &img, 2.0), img);
    }

    #[test]
    fn test_uniform_offset_is_recentered() {
        // A constant difference is pure mean, so nothing is added back
        let color_out = RasterBuffer::filled(3, 3, [100, 100, 100]);
        let blur_out = RasterBuffer::filled(3, 3, [90, 90, 90]);
        let out = sharpen(&color_out, &blur_out, 1.5);
        assert_eq!(out, color_out);
    }

    #[test]
    fn test_detail_is_amplified() {
        let color_out = RasterBuffer::from_pixels(2, 1, vec![120, 120, 120, 80, 80, 80]).unwrap();
        let blur_out = RasterBuffer::filled(2, 1, [100, 100, 100]);
        // mask = +20 / -20, mean 0
        let out = sharpen(&color_out, &blur_out, 1.0);
        assert_eq!(out.pixel(0, 0), [140, 140, 140]);
        assert_eq!(out.pixel(1, 0), [60, 60, 60]);
    }

    #[test]
    fn test_result_is_clamped() {
        let color_out = RasterBuffer::from_pixels(2, 1, vec![250, 250, 250, 5, 5, 5]).unwrap();
        let blur_out = RasterBuffer::filled(2, 1, [128, 128, 128]);
        let out = sharpen(&color_out, &blur_out, 5.0);
        assert_eq!(out.pixel(0, 0), [255, 255, 255]);
        assert_eq!(out.pixel(1, 0), [0, 0, 0]);
    }
}
