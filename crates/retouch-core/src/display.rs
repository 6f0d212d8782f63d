//! Helpers for showing a preview on screen.
//!
//! The pipeline never resizes for display. A front end calls
//! [`fit_to_viewport`] on the finished preview to get a copy that fills its
//! viewport without distortion, and [`to_rgba`] when the surface expects
//! four channels.

use image::imageops::FilterType;

use crate::raster::RasterBuffer;

/// Largest size with the image's aspect ratio that fits the viewport.
///
/// Small images are scaled up to fill the viewport, large ones scaled down.
/// Returns `(0, 0)` when either the image or the viewport is empty.
pub fn fit_dimensions(width: u32, height: u32, viewport_w: u32, viewport_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 || viewport_w == 0 || viewport_h == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;
    let viewport_ratio = viewport_w as f64 / viewport_h as f64;

    if viewport_ratio > ratio {
        // Viewport is wider: constrain by height
        let w = (viewport_h as f64 * ratio).round() as u32;
        (w.clamp(1, viewport_w), viewport_h)
    } else {
        // Viewport is taller: constrain by width
        let h = (viewport_w as f64 / ratio).round() as u32;
        (viewport_w, h.clamp(1, viewport_h))
    }
}

/// Resample `raster` to [`fit_dimensions`] with a triangle filter.
pub fn fit_to_viewport(raster: &RasterBuffer, viewport_w: u32, viewport_h: u32) -> RasterBuffer {
    let (w, h) = fit_dimensions(raster.width(), raster.height(), viewport_w, viewport_h);
    if (w, h) == (raster.width(), raster.height()) {
        return raster.clone();
    }
    if w == 0 || h == 0 {
        return RasterBuffer::new(0, 0);
    }
    let Some(rgb) = raster.to_rgb_image() else {
        return RasterBuffer::new(0, 0);
    };
    let resized = image::imageops::resize(&rgb, w, h, FilterType::Triangle);
    RasterBuffer::from_rgb_image(resized)
}

/// Packed RGBA bytes with opaque alpha, row padding dropped.
pub fn to_rgba(raster: &RasterBuffer) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(raster.pixel_count() * 4);
    for y in 0..raster.height() {
        for px in raster.row(y).chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
    }
    rgba
}
