//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate exposes the retouch-core edit session to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `session` - The editing session: load, edit, commit, preview, export
//! - `types` - WASM-compatible wrapper types for image data
//! - `histogram` - Histogram of the current preview
//!
//! # Usage
//!
//! ```typescript
//! import init, { WasmSession } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new WasmSession();
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! session.slider("contrast", 50);
//! const preview = session.preview();
//! console.log(`Preview ${preview.width}x${preview.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod histogram;
mod session;
mod types;

// Re-export public types
pub use histogram::JsHistogram;
pub use session::WasmSession;
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
