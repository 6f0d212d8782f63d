//! Pipeline stages.
//!
//! Each stage is a pure function from a [`RasterBuffer`](crate::RasterBuffer)
//! and a subset of the adjustment parameters to a new buffer. Stages never
//! mutate their input and every stage returns an exact copy of its input
//! when its parameters are at identity.
//!
//! # Stage Order
//!
//! 1. Basic (brightness / contrast)
//! 2. Color (luma equalization, then hue / saturation / value)
//! 3. Smoothing (box, gaussian, median or bilateral)
//! 4. Sharpen (unsharp mask against the pre-smoothing buffer)
//! 5. Geometric (rotation and scale about the image center)

mod basic;
mod color;
mod geometric;
mod sharpen;
mod smoothing;

pub use basic::basic;
pub use color::{adjust_hsv, color, equalize_luma, shift_hue};
pub use geometric::{geometric, Interpolation, SimilarityTransform};
pub use sharpen::sharpen;
pub use smoothing::{
    bilateral_filter, box_filter, gaussian_blur, gaussian_sigma, median_filter, odd_kernel_size,
    smooth,
};

/// Reflect an out-of-range coordinate back into `[0, n)` without repeating
/// the edge sample (`dcb|abcd|cba`).
#[inline]
pub(crate) fn reflect101(i: i64, n: u32) -> usize {
    let n = n as i64;
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i.rem_euclid(period);
    (if m >= n { period - m } else { m }) as usize
}
