//! Histogram WASM bindings.
//!
//! Exposes the RGB and luma histograms of a session preview.

use retouch_core::Histogram;
use wasm_bindgen::prelude::*;

/// Histogram result accessible from JavaScript.
///
/// Contains 256-bin histograms for red, green, blue, and luma channels,
/// plus clipping flags for drawing warnings.
#[wasm_bindgen]
pub struct JsHistogram {
    red: Vec<u32>,
    green: Vec<u32>,
    blue: Vec<u32>,
    luma: Vec<u32>,
    max_value: u32,
    has_highlight_clipping: bool,
    has_shadow_clipping: bool,
}

#[wasm_bindgen]
impl JsHistogram {
    /// Get red channel histogram (256 bins).
    pub fn red(&self) -> Vec<u32> {
        self.red.clone()
    }

    /// Get green channel histogram (256 bins).
    pub fn green(&self) -> Vec<u32> {
        self.green.clone()
    }

    /// Get blue channel histogram (256 bins).
    pub fn blue(&self) -> Vec<u32> {
        self.blue.clone()
    }

    /// Get luma histogram (256 bins).
    pub fn luma(&self) -> Vec<u32> {
        self.luma.clone()
    }

    /// Largest bin across the RGB channels, for normalizing the display.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    #[wasm_bindgen(getter)]
    pub fn has_highlight_clipping(&self) -> bool {
        self.has_highlight_clipping
    }

    #[wasm_bindgen(getter)]
    pub fn has_shadow_clipping(&self) -> bool {
        self.has_shadow_clipping
    }
}

impl From<Histogram> for JsHistogram {
    fn from(hist: Histogram) -> Self {
        Self {
            max_value: hist.max_value(),
            has_highlight_clipping: hist.has_highlight_clipping(),
            has_shadow_clipping: hist.has_shadow_clipping(),
            red: hist.red.to_vec(),
            green: hist.green.to_vec(),
            blue: hist.blue.to_vec(),
            luma: hist.luma.to_vec(),
        }
    }
}
