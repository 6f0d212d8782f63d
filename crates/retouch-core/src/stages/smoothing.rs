//! Smoothing stage: box, gaussian, median and bilateral filters.
//!
//! All filters use square `k x k` neighbourhoods (circular for bilateral)
//! with mirrored borders. Kernel sizes must be odd; even sizes are rounded up
//! to the next odd size rather than rejected.

use super::reflect101;
use crate::color::saturate_u8;
use crate::params::SmoothingVariant;
use crate::raster::{RasterBuffer, CHANNELS};

/// Apply the selected smoothing filter.
///
/// A kernel size of 1 (or 0) and [`SmoothingVariant::None`] both pass the
/// input through unchanged.
pub fn smooth(src: &RasterBuffer, kernel_size: u32, variant: SmoothingVariant) -> RasterBuffer {
    if kernel_size <= 1 || src.is_empty() {
        return src.clone();
    }
    let k = odd_kernel_size(kernel_size);
    match variant {
        SmoothingVariant::Box => box_filter(src, k),
        SmoothingVariant::Gaussian => gaussian_blur(src, k),
        SmoothingVariant::Median => median_filter(src, k),
        SmoothingVariant::Bilateral => bilateral_filter(src, k),
        SmoothingVariant::None => src.clone(),
    }
}

/// Round an even kernel size up to the next odd one.
#[inline]
pub fn odd_kernel_size(k: u32) -> u32 {
    if k % 2 == 0 {
        k + 1
    } else {
        k
    }
}

/// Gaussian sigma derived from the kernel size.
pub fn gaussian_sigma(k: u32) -> f32 {
    0.3 * ((k as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Unweighted mean over a `k x k` window.
pub fn box_filter(src: &RasterBuffer, k: u32) -> RasterBuffer {
    let weights = vec![1.0 / k as f32; k as usize];
    convolve_separable(src, &weights)
}

/// Gaussian-weighted mean over a `k x k` window.
pub fn gaussian_blur(src: &RasterBuffer, k: u32) -> RasterBuffer {
    let sigma = gaussian_sigma(k);
    let radius = (k / 2) as i32;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    convolve_separable(src, &weights)
}

/// Run a normalized 1-D kernel along rows, then along columns.
fn convolve_separable(src: &RasterBuffer, weights: &[f32]) -> RasterBuffer {
    let (w, h) = (src.width(), src.height());
    let radius = (weights.len() / 2) as i64;
    let row_len = w as usize * CHANNELS;

    let mut horizontal = vec![0.0f32; row_len * h as usize];
    for y in 0..h {
        let row = src.row(y);
        let out = &mut horizontal[y as usize * row_len..(y as usize + 1) * row_len];
        for x in 0..w as i64 {
            let mut acc = [0.0f32; 3];
            for (i, weight) in weights.iter().enumerate() {
                let sx = reflect101(x + i as i64 - radius, w) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += row[sx + c] as f32 * weight;
                }
            }
            let dx = x as usize * CHANNELS;
            out[dx..dx + CHANNELS].copy_from_slice(&acc);
        }
    }

    let mut dst = RasterBuffer::new(w, h);
    for y in 0..h as i64 {
        let out = dst.row_mut(y as u32);
        for x in 0..row_len {
            let mut acc = 0.0f32;
            for (i, weight) in weights.iter().enumerate() {
                let sy = reflect101(y + i as i64 - radius, h);
                acc += horizontal[sy * row_len + x] * weight;
            }
            out[x] = saturate_u8(acc);
        }
    }
    dst
}

/// Per-channel median over a `k x k` window.
///
/// Uses a sliding 256-bin histogram per channel, so the cost per pixel is
/// linear in `k` rather than quadratic.
pub fn median_filter(src: &RasterBuffer, k: u32) -> RasterBuffer {
    let (w, h) = (src.width(), src.height());
    let radius = (k / 2) as i64;
    let half = k * k / 2;
    let mut dst = RasterBuffer::new(w, h);

    for y in 0..h as i64 {
        let rows: Vec<&[u8]> = (-radius..=radius)
            .map(|dy| src.row(reflect101(y + dy, h) as u32))
            .collect();

        let mut hist = [[0u32; 256]; CHANNELS];
        for row in &rows {
            for dx in -radius..=radius {
                let sx = reflect101(dx, w) * CHANNELS;
                for c in 0..CHANNELS {
                    hist[c][row[sx + c] as usize] += 1;
                }
            }
        }

        for x in 0..w as i64 {
            if x > 0 {
                let leaving = reflect101(x - 1 - radius, w) * CHANNELS;
                let entering = reflect101(x + radius, w) * CHANNELS;
                for row in &rows {
                    for c in 0..CHANNELS {
                        hist[c][row[leaving + c] as usize] -= 1;
                        hist[c][row[entering + c] as usize] += 1;
                    }
                }
            }
            let px = [
                histogram_median(&hist[0], half),
                histogram_median(&hist[1], half),
                histogram_median(&hist[2], half),
            ];
            dst.set_pixel(x as u32, y as u32, px);
        }
    }
    dst
}

fn histogram_median(bins: &[u32; 256], half: u32) -> u8 {
    let mut seen = 0u32;
    for (level, &count) in bins.iter().enumerate() {
        seen += count;
        if seen > half {
            return level as u8;
        }
    }
    255
}

/// Edge-preserving bilateral filter with diameter `k`.
///
/// Sigmas are derived from the diameter: color sigma `2k`, spatial sigma
/// `k / 2` (at least 1). Color distance is the sum of absolute channel
/// differences.
pub fn bilateral_filter(src: &RasterBuffer, k: u32) -> RasterBuffer {
    let (w, h) = (src.width(), src.height());
    let radius = (k / 2) as i64;
    let sigma_color = (2 * k) as f32;
    let sigma_space = (k / 2).max(1) as f32;

    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    // Circular neighbourhood with precomputed spatial weights
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 <= (radius * radius) as f32 {
                offsets.push((dx, dy, (d2 * space_coeff).exp()));
            }
        }
    }

    let color_weights: Vec<f32> = (0..=255 * CHANNELS)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut dst = RasterBuffer::new(w, h);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let center = src.pixel(x as u32, y as u32);
            let mut acc = [0.0f32; 3];
            let mut weight_sum = 0.0f32;

            for &(dx, dy, space_weight) in &offsets {
                let sx = reflect101(x + dx, w) as u32;
                let sy = reflect101(y + dy, h) as u32;
                let px = src.pixel(sx, sy);
                let distance: usize = (0..CHANNELS)
                    .map(|c| (px[c] as i32 - center[c] as i32).unsigned_abs() as usize)
                    .sum();
                let weight = space_weight * color_weights[distance];
                for c in 0..CHANNELS {
                    acc[c] += px[c] as f32 * weight;
                }
                weight_sum += weight;
            }

            let px = acc.map(|v| saturate_u8(v / weight_sum));
            dst.set_pixel(x as u32, y as u32, px);
        }
    }
    dst
}
