//! Histogram computation and histogram equalization.
//!
//! `compute_histogram` feeds the histogram display of the edit view;
//! `channel_histogram` and `equalization_lut` drive the luma equalization
//! step of the color stage.

use crate::color::luma;
use crate::raster::{RasterBuffer, CHANNELS};
use crate::Histogram;

/// Compute RGB and luma histograms from a raster.
///
/// # Example
/// ```
/// use retouch_core::{histogram::compute_histogram, RasterBuffer};
///
/// let img = RasterBuffer::from_pixels(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
/// let hist = compute_histogram(&img);
/// assert_eq!(hist.red[255], 1);
/// assert_eq!(hist.green[255], 1);
/// ```
///
/// # Performance
/// Single pass over the pixels, constant memory (4KB of bins).
pub fn compute_histogram(image: &RasterBuffer) -> Histogram {
    let mut hist = Histogram::new();

    for y in 0..image.height() {
        for chunk in image.row(y).chunks_exact(CHANNELS) {
            hist.red[chunk[0] as usize] += 1;
            hist.green[chunk[1] as usize] += 1;
            hist.blue[chunk[2] as usize] += 1;
            hist.luma[luma([chunk[0], chunk[1], chunk[2]]) as usize] += 1;
        }
    }

    hist
}

/// Bin one channel of interleaved 3-channel pixel data.
pub fn channel_histogram(pixels: &[u8], channel: usize) -> [u32; 256] {
    debug_assert!(channel < CHANNELS, "channel index out of range");
    let mut bins = [0u32; 256];
    for chunk in pixels.chunks_exact(CHANNELS) {
        bins[chunk[channel] as usize] += 1;
    }
    bins
}

/// Build the lookup table that flattens `hist` across `[0, 255]`.
///
/// The darkest occupied level maps to 0 and the cumulative distribution of
/// the remaining levels is stretched to 255. A histogram with a single
/// occupied level (or none) yields the identity table.
pub fn equalization_lut(hist: &[u32; 256]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    let total: u64 = hist.iter().map(|&c| c as u64).sum();

    let Some(first) = hist.iter().position(|&c| c > 0) else {
        return identity_lut();
    };
    let first_count = hist[first] as u64;
    if first_count == total {
        return identity_lut();
    }

    let scale = 255.0 / (total - first_count) as f64;
    let mut sum = 0u64;
    for level in (first + 1)..256 {
        sum += hist[level] as u64;
        lut[level] = (sum as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }

    lut
}

fn identity_lut() -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = i as u8;
    }
    lut
}
