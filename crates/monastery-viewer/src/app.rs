//! Bevy application setup

use anyhow::Result;
use bevy::prelude::*;
use monastery_core::{ViewerConfig, ViewerError};
use monastery_scene::{MonasteryScenePlugin, PendingUiCommands, Viewer};
use tracing::info;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement};

use crate::dom::{DomBindingPlugin, DomControls, CANVAS_ID};
use crate::loading::LoadingScreenPlugin;

/// Graphics API the renderer was built against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    WebGpu,
    WebGl2,
}

impl Backend {
    fn compiled() -> Self {
        if cfg!(feature = "webgpu") {
            Backend::WebGpu
        } else {
            Backend::WebGl2
        }
    }

    fn name(self) -> &'static str {
        match self {
            Backend::WebGpu => "WebGPU",
            Backend::WebGl2 => "WebGL2",
        }
    }

    /// Whether this browser exposes the API
    fn is_available(self, window: &web_sys::Window, document: &Document) -> bool {
        match self {
            Backend::WebGpu => {
                js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("gpu"))
                    .map(|gpu| !gpu.is_undefined() && !gpu.is_null())
                    .unwrap_or(false)
            }
            // Probe a scratch canvas; the page canvas must stay context-free for the renderer
            Backend::WebGl2 => document
                .create_element("canvas")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
                .and_then(|canvas| canvas.get_context("webgl2").ok().flatten())
                .is_some(),
        }
    }

    fn require(self, available: bool) -> Result<(), ViewerError> {
        if available {
            Ok(())
        } else {
            Err(ViewerError::MissingCapability(format!(
                "{} rendering context is not available",
                self.name()
            )))
        }
    }
}

/// Check that the page can host the viewer: a window, a document, the
/// target canvas, and the graphics API the renderer needs
fn probe_capabilities() -> Result<Document, ViewerError> {
    let window = web_sys::window()
        .ok_or_else(|| ViewerError::MissingCapability("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| ViewerError::MissingCapability("no document".to_string()))?;
    document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| ViewerError::MissingCapability(format!("no #{CANVAS_ID} element")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ViewerError::MissingCapability(format!("#{CANVAS_ID} is not a canvas")))?;

    let backend = Backend::compiled();
    backend.require(backend.is_available(&window, &document))?;
    Ok(document)
}

/// Run the Bevy application
pub fn run(config: ViewerConfig) -> Result<()> {
    let document = probe_capabilities()?;
    let reveal = config.reveal_policy();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Monastery360".to_string(),
            canvas: Some(format!("#{CANVAS_ID}")),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(MonasteryScenePlugin::new(config));

    let pending = app.world().resource::<PendingUiCommands>().clone();
    let controls = DomControls::bind(&document, &pending);
    controls.show_state(app.world().resource::<Viewer>().state());

    app.insert_non_send_resource(controls)
        .add_plugins(DomBindingPlugin)
        .add_plugins(LoadingScreenPlugin::new(reveal));

    info!("Starting monastery viewer");
    app.run();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_backend_is_a_missing_capability() {
        for backend in [Backend::WebGpu, Backend::WebGl2] {
            assert!(backend.require(true).is_ok());
            match backend.require(false) {
                Err(ViewerError::MissingCapability(reason)) => {
                    assert!(reason.contains(backend.name()), "{reason}")
                }
                other => panic!("expected a missing capability, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_default_build_needs_webgpu() {
        assert_eq!(Backend::compiled() == Backend::WebGpu, cfg!(feature = "webgpu"));
    }
}
