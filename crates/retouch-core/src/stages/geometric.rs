//! Geometric stage: rotation and uniform scale about the image center.
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel we compute the source position it
//! came from and interpolate there. With `(cx, cy)` the center of the pixel
//! grid, `s` the scale and θ the angle:
//!
//! ```text
//! src_x = ( cos θ * dx - sin θ * dy) / s + cx
//! src_y = ( sin θ * dx + cos θ * dy) / s + cy
//! ```
//!
//! where `(dx, dy)` is the output pixel relative to the center. Positive
//! angles rotate counter-clockwise as seen on screen. The output keeps the
//! input dimensions; output pixels that map outside the source are black.

use serde::{Deserialize, Serialize};

use crate::raster::RasterBuffer;

/// How far outside the pixel grid a sample may land and still count as
/// inside. Absorbs trigonometric rounding at exact multiples of 90 degrees.
const EDGE_EPSILON: f64 = 1e-6;

/// Interpolation filter used when resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// Sharper Lanczos3 interpolation, bilinear within 3 pixels of an edge.
    Lanczos3,
}

/// Inverse similarity transform from output to source coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTransform {
    cos: f64,
    sin: f64,
    inv_scale: f64,
    cx: f64,
    cy: f64,
}

impl SimilarityTransform {
    /// Build the transform for a `width x height` image.
    ///
    /// Returns `None` when `scale` is not a positive finite number or the
    /// angle is not finite.
    pub fn new(width: u32, height: u32, angle_degrees: f32, scale: f32) -> Option<Self> {
        if !scale.is_finite() || scale <= 0.0 || !angle_degrees.is_finite() {
            return None;
        }
        let theta = (angle_degrees as f64).to_radians();
        Some(Self {
            cos: theta.cos(),
            sin: theta.sin(),
            inv_scale: 1.0 / scale as f64,
            cx: (width as f64 - 1.0) / 2.0,
            cy: (height as f64 - 1.0) / 2.0,
        })
    }

    /// Source position that lands on output pixel `(x, y)`.
    #[inline]
    pub fn source_point(&self, x: u32, y: u32) -> (f64, f64) {
        let dx = x as f64 - self.cx;
        let dy = y as f64 - self.cy;
        (
            (self.cos * dx - self.sin * dy) * self.inv_scale + self.cx,
            (self.sin * dx + self.cos * dy) * self.inv_scale + self.cy,
        )
    }
}

/// Rotate by `angle` degrees and scale by `scale` about the image center.
///
/// Identity parameters (`angle == 0`, `scale == 1`) return an exact copy.
/// A non-positive or non-finite scale yields an all-black image of the same
/// size.
pub fn geometric(
    src: &RasterBuffer,
    angle: f32,
    scale: f32,
    interpolation: Interpolation,
) -> RasterBuffer {
    if angle == 0.0 && scale == 1.0 {
        return src.clone();
    }

    let (w, h) = (src.width(), src.height());
    let mut dst = RasterBuffer::new(w, h);
    let Some(transform) = SimilarityTransform::new(w, h, angle, scale) else {
        return dst;
    };

    for y in 0..h {
        for x in 0..w {
            let (sx, sy) = transform.source_point(x, y);
            let pixel = match interpolation {
                Interpolation::Bilinear => sample_bilinear(src, sx, sy),
                Interpolation::Lanczos3 => sample_lanczos3(src, sx, sy),
            };
            if let Some(px) = pixel {
                dst.set_pixel(x, y, px);
            }
        }
    }

    dst
}

#[inline]
fn pixel_f64(image: &RasterBuffer, x: usize, y: usize) -> [f64; 3] {
    image.pixel(x as u32, y as u32).map(|c| c as f64)
}

/// Bilinear sample, `None` outside the source grid.
fn sample_bilinear(image: &RasterBuffer, x: f64, y: f64) -> Option<[u8; 3]> {
    let max_x = image.width() as f64 - 1.0;
    let max_y = image.height() as f64 - 1.0;

    if !(x >= -EDGE_EPSILON
        && x <= max_x + EDGE_EPSILON
        && y >= -EDGE_EPSILON
        && y <= max_y + EDGE_EPSILON)
    {
        return None;
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(max_x as usize);
    let y1 = (y0 + 1).min(max_y as usize);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = pixel_f64(image, x0, y0);
    let p10 = pixel_f64(image, x1, y0);
    let p01 = pixel_f64(image, x0, y1);
    let p11 = pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    Some(result)
}

/// Lanczos3 sample over a 6x6 neighborhood.
fn sample_lanczos3(image: &RasterBuffer, x: f64, y: f64) -> Option<[u8; 3]> {
    let (w, h) = (image.width() as i64, image.height() as i64);

    // Kernel would leave the image: fall back to bilinear
    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = pixel_f64(image, px as usize, py as usize);
            for c in 0..3 {
                sum[c] += pixel[c] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for c in 0..3 {
            result[c] = (sum[c] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    Some(result)
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` for `|x| < a`, zero outside.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gradient test image.
    fn test_image(width: u32, height: u32) -> RasterBuffer {
        let mut img = RasterBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 4) as u8;
                img.set_pixel(x, y, [v, v, v]);
            }
        }
        img
    }

    #[test]
    fn test_identity_is_exact_copy() {
        let img = RasterBuffer::with_stride(2, 1, 7, vec![1, 2, 3, 4, 5, 6, 0]).unwrap();
        assert_eq!(geometric(&img, 0.0, 1.0, Interpolation::Bilinear), img);
        assert_eq!(geometric(&img, 0.0, 1.0, Interpolation::Lanczos3), img);
    }

    #[test]
    fn test_rotation_keeps_dimensions() {
        let img = test_image(40, 20);
        for filter in [Interpolation::Bilinear, Interpolation::Lanczos3] {
            let out = geometric(&img, 33.0, 1.0, filter);
            assert_eq!((out.width(), out.height()), (40, 20));
        }
    }

    #[test]
    fn test_180_degrees_on_uniform_2x2() {
        let img = RasterBuffer::filled(2, 2, [90, 60, 30]);
        let out = geometric(&img, 180.0, 1.0, Interpolation::Bilinear);
        assert_eq!(out, img);
    }

    #[test]
    fn test_180_degrees_flips_both_axes() {
        let mut img = RasterBuffer::new(3, 2);
        img.set_pixel(0, 0, [255, 0, 0]);
        let out = geometric(&img, 180.0, 1.0, Interpolation::Bilinear);
        assert_eq!(out.pixel(2, 1), [255, 0, 0]);
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_90_degrees_is_counter_clockwise() {
        // Marker right of center ends up above center
        let mut img = RasterBuffer::new(3, 3);
        img.set_pixel(2, 1, [200, 200, 200]);
        let out = geometric(&img, 90.0, 1.0, Interpolation::Bilinear);
        assert_eq!(out.pixel(1, 0), [200, 200, 200]);
        assert_eq!(out.pixel(2, 1), [0, 0, 0]);
    }

    #[test]
    fn test_downscale_leaves_black_border() {
        let img = RasterBuffer::filled(9, 9, [255, 255, 255]);
        let out = geometric(&img, 0.0, 0.5, Interpolation::Bilinear);
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
        assert_eq!(out.pixel(4, 4), [255, 255, 255]);
    }

    #[test]
    fn test_upscale_magnifies_center() {
        let img = test_image(9, 9);
        let out = geometric(&img, 0.0, 2.0, Interpolation::Bilinear);
        // Center is a fixed point
        assert_eq!(out.pixel(4, 4), img.pixel(4, 4));
        // Corner samples halfway to the center
        assert_eq!(out.pixel(0, 0), img.pixel(2, 2));
    }

    #[test]
    fn test_invalid_scale_is_black() {
        let img = RasterBuffer::filled(4, 4, [10, 20, 30]);
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let out = geometric(&img, 0.0, scale, Interpolation::Bilinear);
            assert_eq!(out, RasterBuffer::new(4, 4));
        }
    }

    #[test]
    fn test_bilinear_vs_lanczos_on_smooth_gradient() {
        let img = test_image(30, 30);
        let bilinear = geometric(&img, 15.0, 1.0, Interpolation::Bilinear);
        let lanczos = geometric(&img, 15.0, 1.0, Interpolation::Lanczos3);
        let a = bilinear.pixel(15, 15)[0] as i32;
        let b = lanczos.pixel(15, 15)[0] as i32;
        assert!((a - b).abs() <= 2, "bilinear {a} lanczos {b}");
    }

    #[test]
    fn test_transform_center_is_fixed() {
        let t = SimilarityTransform::new(5, 5, 47.0, 1.7).unwrap();
        let (sx, sy) = t.source_point(2, 2);
        assert!((sx - 2.0).abs() < 1e-9);
        assert!((sy - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        let w1 = lanczos_weight(1.5, 3.0);
        let w2 = lanczos_weight(-1.5, 3.0);
        assert!((w1 - w2).abs() < 1e-10);
    }
}
