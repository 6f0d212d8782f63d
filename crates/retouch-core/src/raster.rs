//! Owned RGB raster buffer.
//!
//! `RasterBuffer` is the unit of data every pipeline stage reads and writes:
//! a 2-D array of 3-channel 8-bit pixels stored row-major with an explicit
//! row stride. Channel order is always R, G, B.

use thiserror::Error;

/// Bytes per pixel (interleaved R, G, B).
pub const CHANNELS: usize = 3;

/// Errors raised when constructing a raster from raw parts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// Row stride is too small to hold a row of pixels.
    #[error("Invalid stride: {stride} bytes cannot hold {width} RGB pixels")]
    InvalidStride { width: u32, stride: usize },

    /// Buffer length does not equal height * stride.
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// A 3-channel 8-bit image buffer.
///
/// Invariants: `stride >= width * 3` and `data.len() == height * stride`.
/// Padding bytes at the end of each row are carried along but never read
/// as pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Create a black raster with tightly packed rows.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width as usize * CHANNELS;
        Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    /// Create a raster where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            stride: width as usize * CHANNELS,
            data,
        }
    }

    /// Wrap tightly packed RGB data (3 bytes per pixel, no row padding).
    pub fn from_pixels(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        Self::with_stride(width, height, width as usize * CHANNELS, data)
    }

    /// Wrap RGB data whose rows are `stride` bytes apart.
    pub fn with_stride(
        width: u32,
        height: u32,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if stride < width as usize * CHANNELS {
            return Err(RasterError::InvalidStride { width, stride });
        }
        let expected = stride * height as usize;
        if data.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Create a RasterBuffer from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            stride: width as usize * CHANNELS,
            data: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage for encoding or resampling.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.to_packed())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The full backing buffer, including any row padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixel bytes of row `y`, without padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * CHANNELS]
    }

    /// Mutable pixel bytes of row `y`, without padding.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let len = self.width as usize * CHANNELS;
        &mut self.data[start..start + len]
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = y as usize * self.stride + x as usize * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = y as usize * self.stride + x as usize * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgb);
    }

    /// Copy the pixel data into a tightly packed vector (row padding dropped).
    pub fn to_packed(&self) -> Vec<u8> {
        if self.stride == self.width as usize * CHANNELS {
            return self.data.clone();
        }
        let mut packed = Vec::with_capacity(self.width as usize * self.height as usize * CHANNELS);
        for y in 0..self.height {
            packed.extend_from_slice(self.row(y));
        }
        packed
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Build a tightly packed raster of the same size by mapping every
    /// pixel through `f`.
    pub(crate) fn map_pixels(&self, mut f: impl FnMut([u8; 3]) -> [u8; 3]) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            let src = self.row(y);
            let dst = out.row_mut(y);
            for (s, d) in src.chunks_exact(CHANNELS).zip(dst.chunks_exact_mut(CHANNELS)) {
                d.copy_from_slice(&f([s[0], s[1], s[2]]));
            }
        }
        out
    }
}
