//! The adjustment pipeline.
//!
//! ```text
//! base -> Basic -> Color -> Smoothing -> Sharpen -> Geometric -> preview
//!                    |                      ^
//!                    +---- color output ----+
//! ```
//!
//! Every call recomputes the whole chain from the base buffer. Each stage
//! reads only its predecessor's output, except sharpen which also reads the
//! color stage output to measure the detail removed by smoothing.

use tracing::debug;

use crate::mode::EditCategory;
use crate::params::{AdjustmentParameters, ParameterLimits};
use crate::raster::RasterBuffer;
use crate::stages::{self, Interpolation};

/// Every intermediate buffer of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageBuffers {
    pub basic: RasterBuffer,
    pub color: RasterBuffer,
    pub smoothed: RasterBuffer,
    pub sharpened: RasterBuffer,
    pub geometric: RasterBuffer,
}

impl StageBuffers {
    /// The final output of the run.
    pub fn output(&self) -> &RasterBuffer {
        &self.geometric
    }

    pub fn into_output(self) -> RasterBuffer {
        self.geometric
    }
}

/// Composes the stages in their fixed order.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    limits: ParameterLimits,
    interpolation: Interpolation,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `limits` to normalize parameters before each run.
    pub fn with_limits(mut self, limits: ParameterLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resample the geometric stage with `interpolation`.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn limits(&self) -> &ParameterLimits {
        &self.limits
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Run every stage on `base` and return the final buffer.
    ///
    /// Pure: identical inputs give byte-identical output, and `base` is never
    /// modified. With every parameter at identity the result equals `base`.
    pub fn recompute(&self, base: &RasterBuffer, params: &AdjustmentParameters) -> RasterBuffer {
        self.recompute_stages(base, params).into_output()
    }

    /// Run every stage on `base`, keeping each intermediate buffer.
    pub fn recompute_stages(
        &self,
        base: &RasterBuffer,
        params: &AdjustmentParameters,
    ) -> StageBuffers {
        let p = params.normalized(&self.limits);

        debug!(
            stage = "basic",
            brightness = p.brightness,
            contrast = p.contrast,
            "processing"
        );
        let basic = stages::basic(base, p.brightness, p.contrast);

        debug!(
            stage = "color",
            equalize = p.equalize,
            hue = p.hue,
            saturation = p.saturation,
            value = p.value,
            "processing"
        );
        let color = stages::color(&basic, p.equalize, p.hue, p.saturation, p.value);

        debug!(
            stage = "smoothing",
            kernel_size = p.kernel_size,
            variant = p.variant.name(),
            "processing"
        );
        let smoothed = stages::smooth(&color, p.kernel_size, p.variant);

        debug!(stage = "sharpen", amount = p.sharpen, "processing");
        let sharpened = stages::sharpen(&color, &smoothed, p.sharpen);

        debug!(
            stage = "geometric",
            angle = p.angle,
            scale = p.scale,
            "processing"
        );
        let geometric = stages::geometric(&sharpened, p.angle, p.scale, self.interpolation);

        StageBuffers {
            basic,
            color,
            smoothed,
            sharpened,
            geometric,
        }
    }

    /// Run the pipeline with only the stages a commit of `category` bakes.
    ///
    /// This is the buffer a commit writes into the base. Recomputing it with
    /// the folded fields cleared reproduces the current preview.
    pub fn fold(
        &self,
        base: &RasterBuffer,
        params: &AdjustmentParameters,
        category: EditCategory,
    ) -> RasterBuffer {
        self.recompute(base, &params.folded(category))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::params::{ResetScope, SmoothingVariant};
    use proptest::prelude::*;

    /// Small images keep the neighborhood filters fast.
    fn raster_strategy() -> impl Strategy<Value = RasterBuffer> {
        (1u32..=8, 1u32..=8).prop_flat_map(|(w, h)| {
            let size = (w * h * 3) as usize;
            prop::collection::vec(any::<u8>(), size..=size)
                .prop_map(move |data| RasterBuffer::from_pixels(w, h, data).unwrap())
        })
    }

    fn variant_strategy() -> impl Strategy<Value = SmoothingVariant> {
        prop_oneof![
            Just(SmoothingVariant::Box),
            Just(SmoothingVariant::Gaussian),
            Just(SmoothingVariant::Median),
            Just(SmoothingVariant::Bilateral),
            Just(SmoothingVariant::None),
        ]
    }

    fn params_strategy() -> impl Strategy<Value = AdjustmentParameters> {
        (
            (-100i32..=100, 0.0f32..=3.0, any::<bool>(), -180i32..=180),
            (0.0f32..=3.0, 0.0f32..=3.0, 1u32..=7, variant_strategy()),
            (0.0f32..=5.0, -360.0f32..=360.0, 0.1f32..=4.0),
        )
            .prop_map(
                |(
                    (brightness, contrast, equalize, hue),
                    (saturation, value, kernel_size, variant),
                    (sharpen, angle, scale),
                )| AdjustmentParameters {
                    brightness,
                    contrast,
                    equalize,
                    hue,
                    saturation,
                    value,
                    kernel_size,
                    variant,
                    sharpen,
                    angle,
                    scale,
                },
            )
    }

    proptest! {
        /// Property: identity parameters reproduce the base byte for byte.
        #[test]
        fn prop_identity_is_byte_identical(base in raster_strategy()) {
            let out = Pipeline::new().recompute(&base, &AdjustmentParameters::default());
            prop_assert_eq!(out, base);
        }

        /// Property: recompute is deterministic.
        #[test]
        fn prop_recompute_is_deterministic(
            base in raster_strategy(),
            params in params_strategy(),
        ) {
            let pipeline = Pipeline::new();
            prop_assert_eq!(
                pipeline.recompute(&base, &params),
                pipeline.recompute(&base, &params)
            );
        }

        /// Property: output dimensions always match the base.
        #[test]
        fn prop_dimensions_preserved(
            base in raster_strategy(),
            params in params_strategy(),
        ) {
            let out = Pipeline::new().recompute(&base, &params);
            prop_assert_eq!((out.width(), out.height()), (base.width(), base.height()));
        }

        /// Property: resetting twice yields the same params and preview as once.
        #[test]
        fn prop_reset_is_idempotent(
            base in raster_strategy(),
            params in params_strategy(),
        ) {
            let pipeline = Pipeline::new();
            for scope in [
                ResetScope::Basic,
                ResetScope::Color,
                ResetScope::Smoothing,
                ResetScope::Sharpen,
                ResetScope::Geometric,
                ResetScope::All,
            ] {
                let mut once = params;
                once.reset(scope);
                let mut twice = once;
                twice.reset(scope);
                prop_assert_eq!(once, twice);
                prop_assert_eq!(
                    pipeline.recompute(&base, &once),
                    pipeline.recompute(&base, &twice)
                );
            }
        }
    }
}
