//! Retouch Core - Parametric raster-adjustment pipeline
//!
//! This crate provides the image processing engine behind Retouch: an ordered
//! chain of adjustment stages (basic levels, color, smoothing, sharpening and
//! geometry) recomputed from a base image on every parameter change, plus the
//! edit-mode and commit state machine layered on top of it.
//!
//! ## Data flow
//!
//! ```text
//! parameter edit -> ModeController -> Pipeline::recompute(base, params) -> preview
//! mode switch    -> CommitController folds the pending edit into the base
//! ```

pub mod color;
pub mod commit;
pub mod config;
pub mod controls;
pub mod decode;
pub mod display;
pub mod encode;
pub mod histogram;
pub mod mode;
pub mod params;
pub mod pipeline;
pub mod raster;
pub mod session;
pub mod stages;

pub use commit::{CommitController, CommitPolicy, Fold};
pub use config::{ConfigError, ExportOptions, SessionConfig};
pub use controls::{Control, SliderScale, Step};
pub use decode::DecodeError;
pub use encode::{EncodeError, ImageFormat};
pub use mode::{EditCategory, EditState, ModeController, ModeEvent, Transition};
pub use params::{
    AdjustmentParameters, ParameterChange, ParameterLimits, ResetScope, SmoothingVariant,
};
pub use pipeline::{Pipeline, StageBuffers};
pub use raster::{RasterBuffer, RasterError};
pub use session::EditSession;
pub use stages::Interpolation;

/// Histogram data for an image
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Red channel histogram (256 bins)
    pub red: [u32; 256],
    /// Green channel histogram (256 bins)
    pub green: [u32; 256],
    /// Blue channel histogram (256 bins)
    pub blue: [u32; 256],
    /// Luma histogram (256 bins, BT.601 weights)
    pub luma: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luma: [0; 256],
        }
    }
}

impl Histogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the maximum value across the color channels for normalization
    pub fn max_value(&self) -> u32 {
        let max_r = *self.red.iter().max().unwrap_or(&0);
        let max_g = *self.green.iter().max().unwrap_or(&0);
        let max_b = *self.blue.iter().max().unwrap_or(&0);
        max_r.max(max_g).max(max_b)
    }

    /// Total number of samples binned per channel
    pub fn total(&self) -> u64 {
        self.luma.iter().map(|&c| c as u64).sum()
    }

    /// Check for highlight clipping (values at 255)
    pub fn has_highlight_clipping(&self) -> bool {
        self.red[255] > 0 || self.green[255] > 0 || self.blue[255] > 0
    }

    /// Check for shadow clipping (values at 0)
    pub fn has_shadow_clipping(&self) -> bool {
        self.red[0] > 0 || self.green[0] > 0 || self.blue[0] > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_empty() {
        let hist = Histogram::new();
        assert_eq!(hist.max_value(), 0);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_histogram_clipping() {
        let mut hist = Histogram::new();
        assert!(!hist.has_highlight_clipping());
        assert!(!hist.has_shadow_clipping());

        hist.red[255] = 100;
        assert!(hist.has_highlight_clipping());

        hist.blue[0] = 50;
        assert!(hist.has_shadow_clipping());
    }

    #[test]
    fn test_identity_parameters_are_default() {
        assert!(AdjustmentParameters::default().is_identity());
    }
}
