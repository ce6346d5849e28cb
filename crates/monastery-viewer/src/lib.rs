//! Monastery Viewer - Interactive 3D monastery in the browser
//!
//! Binds the page controls to the viewer, shows the Bevy scene in the
//! `#monastery-canvas` element, and reveals it once loading is done.

mod app;
mod dom;
mod loading;

use monastery_core::ViewerConfig;
use tracing::{error, warn};
use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    let loaded = dom::inline_config();
    let level = loaded
        .as_ref()
        .map(ViewerConfig::log_level)
        .unwrap_or(tracing::Level::WARN);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );

    let config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring invalid inline config, using defaults");
        ViewerConfig::default()
    });

    app::run(config).map_err(|e| {
        error!(error = %e, "Viewer failed to start");
        JsValue::from_str(&e.to_string())
    })
}
