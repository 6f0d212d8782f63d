//! An editing session over one image.
//!
//! [`EditSession`] owns the base image, the parameter set, the mode and
//! commit controllers, and the latest preview. Every edit runs the event
//! through the [`ModeController`], folds a pending edit into the base when
//! the transition asks for it, then recomputes the full pipeline
//! synchronously. The preview is only ever replaced wholesale, so a caller
//! holding a [`snapshot`](EditSession::snapshot) never sees a partial
//! update.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::commit::CommitController;
use crate::config::SessionConfig;
use crate::controls::{self, Control, Step};
use crate::decode::{self, DecodeError};
use crate::encode::{self, EncodeError, ImageFormat};
use crate::histogram::compute_histogram;
use crate::mode::{EditState, ModeController, ModeEvent};
use crate::params::{AdjustmentParameters, ParameterChange, ResetScope, SmoothingVariant};
use crate::pipeline::Pipeline;
use crate::raster::RasterBuffer;
use crate::Histogram;

#[derive(Debug, Clone)]
pub struct EditSession {
    config: SessionConfig,
    pipeline: Pipeline,
    mode: ModeController,
    commit: CommitController,
    base: RasterBuffer,
    params: AdjustmentParameters,
    preview: RasterBuffer,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditSession {
    /// Create an empty session. The config is sanitized first.
    pub fn new(mut config: SessionConfig) -> Self {
        for warning in config.sanitize() {
            warn!(%warning, "config value replaced");
        }
        Self {
            pipeline: Pipeline::new()
                .with_limits(config.limits)
                .with_interpolation(config.interpolation),
            mode: ModeController::new(config.limits),
            commit: CommitController::new(config.commit),
            base: RasterBuffer::new(0, 0),
            params: AdjustmentParameters::default(),
            preview: RasterBuffer::new(0, 0),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether an image has been loaded.
    pub fn has_image(&self) -> bool {
        !self.base.is_empty()
    }

    // ----- Loading -----

    /// Load an image file. On failure the session is left untouched.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), DecodeError> {
        let raster = decode::load_file(path)
            .inspect_err(|e| warn!(error = %e, "load failed"))?;
        self.load_raster(raster);
        Ok(())
    }

    /// Load an image from encoded bytes. On failure the session is left
    /// untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let raster = decode::decode_bytes(bytes)
            .inspect_err(|e| warn!(error = %e, "load failed"))?;
        self.load_raster(raster);
        Ok(())
    }

    /// Replace the base image, discarding every uncommitted edit.
    pub fn load_raster(&mut self, raster: RasterBuffer) {
        info!(
            width = raster.width(),
            height = raster.height(),
            "new base image"
        );
        self.base = raster;
        self.dispatch(ModeEvent::ImageLoaded);
    }

    // ----- Edits -----

    /// Apply one parameter change and recompute.
    pub fn apply(&mut self, change: ParameterChange) -> &RasterBuffer {
        self.dispatch(ModeEvent::Edit(change))
    }

    /// A slider moved to `position`. Drag and release events both land here.
    pub fn slider(&mut self, control: Control, position: i32) -> &RasterBuffer {
        let change = controls::slider_change(control, position, &self.config.sliders);
        self.apply(change)
    }

    /// Where `control` should sit to reflect the current parameters.
    pub fn slider_position(&self, control: Control) -> i32 {
        controls::slider_position(control, &self.params, &self.config.sliders)
    }

    /// A zoom or rotate button was clicked.
    pub fn step(&mut self, step: Step) -> &RasterBuffer {
        let change = controls::step_change(step, &self.params, &self.config.sliders);
        self.apply(change)
    }

    /// Arm a smoothing variant (or disarm with `SmoothingVariant::None`).
    pub fn select_variant(&mut self, variant: SmoothingVariant) -> &RasterBuffer {
        self.dispatch(ModeEvent::SelectVariant(variant))
    }

    /// Commit the current category and return to idle.
    pub fn confirm(&mut self) -> &RasterBuffer {
        self.dispatch(ModeEvent::Confirm)
    }

    /// Reset the parameters in `scope` to identity.
    pub fn reset(&mut self, scope: ResetScope) -> &RasterBuffer {
        self.dispatch(ModeEvent::Reset(scope))
    }

    fn dispatch(&mut self, event: ModeEvent) -> &RasterBuffer {
        let transition = self.mode.transition(&self.params, event, &self.commit);
        if let Some(fold) = &transition.fold {
            self.base = self.commit.commit(&self.pipeline, &self.base, fold);
        }
        self.mode.apply(&transition);
        self.params = transition.params;
        self.preview = self.pipeline.recompute(&self.base, &self.params);
        &self.preview
    }

    // ----- State -----

    /// The latest pipeline output.
    pub fn preview(&self) -> &RasterBuffer {
        &self.preview
    }

    /// An independently owned copy of the preview.
    pub fn snapshot(&self) -> RasterBuffer {
        self.preview.clone()
    }

    /// The image edits are applied to, including committed edits.
    pub fn base(&self) -> &RasterBuffer {
        &self.base
    }

    pub fn params(&self) -> &AdjustmentParameters {
        &self.params
    }

    pub fn state(&self) -> EditState {
        self.mode.state()
    }

    pub fn active_variant(&self) -> SmoothingVariant {
        self.mode.active_variant()
    }

    /// Histogram of the preview.
    pub fn histogram(&self) -> Histogram {
        compute_histogram(&self.preview)
    }

    // ----- Export -----

    /// Save the preview to `path`, appending the format's extension if
    /// missing. Returns the path written.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        format: ImageFormat,
    ) -> Result<PathBuf, EncodeError> {
        encode::save(&self.preview, path, format, self.config.export.jpeg_quality)
            .inspect_err(|e| warn!(error = %e, "save failed"))
    }

    /// Encode the preview to the bytes of an image file.
    pub fn encode_preview(&self, format: ImageFormat) -> Result<Vec<u8>, EncodeError> {
        encode::encode(&self.preview, format, self.config.export.jpeg_quality)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn raster_strategy() -> impl Strategy<Value = RasterBuffer> {
        (1u32..=6, 1u32..=6).prop_flat_map(|(w, h)| {
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
        ]
    }

    /// Color, sharpen and geometric edits, live in every state.
    fn live_edits_strategy() -> impl Strategy<Value = Vec<ParameterChange>> {
        (
            (any::<bool>(), -40i32..=40, 0.0f32..=2.0, 0.0f32..=2.0),
            (0.0f32..=3.0, -180.0f32..=180.0, 0.5f32..=2.0),
        )
            .prop_map(|((equalize, hue, saturation, value), (sharpen, angle, scale))| {
                vec![
                    ParameterChange::Equalize(equalize),
                    ParameterChange::Hue(hue),
                    ParameterChange::Saturation(saturation),
                    ParameterChange::Value(value),
                    ParameterChange::Sharpen(sharpen),
                    ParameterChange::Angle(angle),
                    ParameterChange::Scale(scale),
                ]
            })
    }

    proptest! {
        /// Property: confirming a basic edit leaves the preview unchanged.
        #[test]
        fn prop_confirm_basic_keeps_preview(
            base in raster_strategy(),
            brightness in -80i32..=80,
            contrast in 0.5f32..=2.0,
            live in live_edits_strategy(),
        ) {
            let mut session = EditSession::default();
            session.load_raster(base);
            session.apply(ParameterChange::Brightness(brightness));
            session.apply(ParameterChange::Contrast(contrast));
            for change in live {
                session.apply(change);
            }
            let before = session.snapshot();
            session.confirm();
            prop_assert_eq!(session.preview(), &before);
            prop_assert!(session.params().basic_is_identity());
        }

        /// Property: confirming a smoothing edit leaves the preview unchanged.
        #[test]
        fn prop_confirm_smoothing_keeps_preview(
            base in raster_strategy(),
            variant in variant_strategy(),
            kernel_size in 1u32..=7,
            live in live_edits_strategy(),
        ) {
            let mut session = EditSession::default();
            session.load_raster(base);
            session.select_variant(variant);
            session.apply(ParameterChange::KernelSize(kernel_size));
            for change in live {
                session.apply(change);
            }
            let before = session.snapshot();
            session.confirm();
            prop_assert_eq!(session.preview(), &before);
            prop_assert!(session.params().smoothing_is_identity());
        }

        /// Property: picking a filter after a basic edit commits it without
        /// changing the preview.
        #[test]
        fn prop_variant_switch_keeps_preview(
            base in raster_strategy(),
            brightness in -80i32..=80,
            variant in variant_strategy(),
            live in live_edits_strategy(),
        ) {
            let mut session = EditSession::default();
            session.load_raster(base);
            for change in live {
                session.apply(change);
            }
            session.apply(ParameterChange::Brightness(brightness));
            let before = session.snapshot();
            session.select_variant(variant);
            prop_assert_eq!(session.preview(), &before);
            prop_assert_eq!(session.state(), EditState::EditingSmoothing);
        }
    }
}
