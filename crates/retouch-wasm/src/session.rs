//! Edit session WASM bindings.
//!
//! [`WasmSession`] wraps the core edit session so a web front end can drive
//! it from control events. Enum-valued arguments are passed by their
//! snake_case names, e.g. `session.select_variant("gaussian")`.
//!
//! # Example
//!
//! ```typescript
//! const session = new WasmSession();
//! session.load(new Uint8Array(await file.arrayBuffer()));
//!
//! session.slider("brightness", 40);
//! session.select_variant("median"); // commits the brightness edit
//! session.slider("kernel_size", 5);
//!
//! const view = session.fit_preview(canvas.width, canvas.height);
//! ctx.putImageData(new ImageData(view.rgba(), view.width, view.height), 0, 0);
//! ```

use retouch_core::{
    display, Control, EditSession, EditState, ImageFormat, ParameterChange, ResetScope,
    SessionConfig, SmoothingVariant, Step,
};
use wasm_bindgen::prelude::*;

use crate::histogram::JsHistogram;
use crate::types::{parse_name, to_js_error, JsRaster};

/// A single-image editing session.
#[wasm_bindgen]
pub struct WasmSession {
    inner: EditSession,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: EditSession::default(),
        }
    }

    /// Create a session from a JSON configuration string.
    pub fn with_config(json: &str) -> Result<WasmSession, JsValue> {
        let config = SessionConfig::from_json_str(json).map_err(to_js_error)?;
        Ok(Self {
            inner: EditSession::new(config),
        })
    }

    /// Decode image file bytes (PNG, JPEG or BMP) and make them the base.
    ///
    /// On failure the session keeps its previous image and edits.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load_bytes(bytes).map_err(|e| {
            console_warn(&format!("retouch: load failed: {e}"));
            to_js_error(e)
        })
    }

    /// Make an already decoded raster the base.
    pub fn load_raster(&mut self, image: &JsRaster) -> Result<(), JsValue> {
        let raster = image.to_raster().map_err(to_js_error)?;
        self.inner.load_raster(raster);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    // ----- Edits -----

    /// Apply a parameter change of the form `{ param: "hue", value: 20 }`.
    pub fn apply(&mut self, change: JsValue) -> Result<(), JsValue> {
        let change: ParameterChange =
            serde_wasm_bindgen::from_value(change).map_err(to_js_error)?;
        self.inner.apply(change);
        Ok(())
    }

    /// Toggle luma histogram equalization.
    pub fn set_equalize(&mut self, enabled: bool) {
        self.inner.apply(ParameterChange::Equalize(enabled));
    }

    /// A slider moved. `control` is one of `brightness`, `contrast`, `hue`,
    /// `saturation`, `value`, `kernel_size` or `sharpen`.
    pub fn slider(&mut self, control: &str, position: i32) -> Result<(), JsValue> {
        let control: Control = parse_name(control).map_err(to_js_error)?;
        self.inner.slider(control, position);
        Ok(())
    }

    /// Where a slider should sit for the current parameters.
    pub fn slider_position(&self, control: &str) -> Result<i32, JsValue> {
        let control: Control = parse_name(control).map_err(to_js_error)?;
        Ok(self.inner.slider_position(control))
    }

    /// A step button was clicked: `zoom_in`, `zoom_out`, `rotate_left` or
    /// `rotate_right`.
    pub fn step(&mut self, step: &str) -> Result<(), JsValue> {
        let step: Step = parse_name(step).map_err(to_js_error)?;
        self.inner.step(step);
        Ok(())
    }

    /// Arm a smoothing filter, or `none` to disarm.
    pub fn select_variant(&mut self, variant: &str) -> Result<(), JsValue> {
        let variant: SmoothingVariant = parse_name(variant).map_err(to_js_error)?;
        self.inner.select_variant(variant);
        Ok(())
    }

    /// Commit the current edit and return to idle.
    pub fn confirm(&mut self) {
        self.inner.confirm();
    }

    /// Reset `basic`, `color`, `smoothing`, `sharpen`, `geometric` or `all`.
    pub fn reset(&mut self, scope: &str) -> Result<(), JsValue> {
        let scope: ResetScope = parse_name(scope).map_err(to_js_error)?;
        self.inner.reset(scope);
        Ok(())
    }

    // ----- State -----

    /// `idle`, `editing_basic` or `editing_smoothing`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.inner.state()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn active_variant(&self) -> String {
        self.inner.active_variant().name().to_string()
    }

    /// The full parameter set as a plain object.
    pub fn params(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.params()).map_err(to_js_error)
    }

    // ----- Output -----

    /// The current preview at full resolution.
    pub fn preview(&self) -> JsRaster {
        JsRaster::from_raster(self.inner.preview())
    }

    /// The preview resampled to fit a `width` x `height` viewport.
    pub fn fit_preview(&self, width: u32, height: u32) -> JsRaster {
        JsRaster::from_raster(&display::fit_to_viewport(
            self.inner.preview(),
            width,
            height,
        ))
    }

    /// The preview as RGBA bytes, ready for `ImageData`.
    pub fn preview_rgba(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(display::to_rgba(self.inner.preview()).as_slice())
    }

    pub fn histogram(&self) -> JsHistogram {
        JsHistogram::from(self.inner.histogram())
    }

    /// Encode the preview as `png`, `jpeg` or `bmp` file bytes.
    pub fn export(&self, format: &str) -> Result<Vec<u8>, JsValue> {
        let format: ImageFormat = parse_name(format).map_err(to_js_error)?;
        self.export_as(format)
    }

    /// Encode the preview in the configured default format.
    pub fn export_default(&self) -> Result<Vec<u8>, JsValue> {
        self.export_as(self.inner.config().export.format)
    }

    /// MIME type of [`export_default`](Self::export_default), for the `Blob`.
    pub fn export_mime_type(&self) -> String {
        self.inner.config().export.format.mime_type().to_string()
    }
}

impl Default for WasmSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmSession {
    fn export_as(&self, format: ImageFormat) -> Result<Vec<u8>, JsValue> {
        self.inner.encode_preview(format).map_err(to_js_error)
    }
}

fn state_name(state: EditState) -> &'static str {
    match state {
        EditState::Idle => "idle",
        EditState::EditingBasic => "editing_basic",
        EditState::EditingSmoothing => "editing_smoothing",
    }
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(_message: &str) {}

/// Tests for session bindings.
///
/// Only success paths run natively: building a `JsValue` error needs a
/// wasm32 target.
#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::RasterBuffer;

    fn gray_session(value: u8) -> WasmSession {
        let mut session = WasmSession::new();
        let image = JsRaster::new(4, 4, vec![value; 4 * 4 * 3]);
        assert!(session.load_raster(&image).is_ok());
        session
    }

    #[test]
    fn test_new_session_has_no_image() {
        let session = WasmSession::new();
        assert!(!session.has_image());
        assert_eq!(session.state(), "idle");
        assert_eq!(session.active_variant(), "none");
    }

    #[test]
    fn test_slider_updates_preview() {
        let mut session = gray_session(100);
        assert!(session.slider("brightness", 30).is_ok());
        assert_eq!(session.state(), "editing_basic");
        assert_eq!(session.preview().pixels(), vec![130u8; 4 * 4 * 3]);
    }

    #[test]
    fn test_variant_switch_commits() {
        let mut session = gray_session(100);
        assert!(session.slider("brightness", 30).is_ok());
        assert!(session.select_variant("box").is_ok());
        assert_eq!(session.state(), "editing_smoothing");
        assert_eq!(session.active_variant(), "box");
        assert_eq!(
            session.inner.base(),
            &RasterBuffer::filled(4, 4, [130; 3])
        );
        assert_eq!(session.slider_position("brightness").ok(), Some(0));
    }

    #[test]
    fn test_confirm_and_reset() {
        let mut session = gray_session(50);
        assert!(session.slider("contrast", 66).is_ok());
        session.confirm();
        assert_eq!(session.state(), "idle");
        assert_eq!(session.preview().pixels(), vec![100u8; 4 * 4 * 3]);

        assert!(session.step("rotate_left").is_ok());
        assert!(session.reset("all").is_ok());
        assert!(session.inner.params().is_identity());
    }

    #[test]
    fn test_equalize_toggle() {
        let mut session = gray_session(50);
        session.set_equalize(true);
        assert!(session.inner.params().equalize);
        session.set_equalize(false);
        assert!(session.inner.params().is_identity());
    }

    #[test]
    fn test_fit_preview() {
        let mut session = WasmSession::new();
        let image = JsRaster::new(8, 4, vec![10u8; 8 * 4 * 3]);
        assert!(session.load_raster(&image).is_ok());
        let fitted = session.fit_preview(4, 4);
        assert_eq!((fitted.width(), fitted.height()), (4, 2));
    }

    #[test]
    fn test_export_png() {
        let session = gray_session(77);
        let png = session.export("png").unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(session.export_mime_type(), "image/png");
    }

    #[test]
    fn test_histogram() {
        let session = gray_session(200);
        assert_eq!(session.histogram().red()[200], 16);
    }
}
