//! Page control bindings
//!
//! Callbacks only parse control values and queue [`UiCommand`]s; the scene
//! plugin applies them at the start of the next frame. A missing control
//! is logged once and left unbound.

use bevy::prelude::*;
use monastery_core::{UiCommand, ViewName, ViewerConfig, ViewerError, ViewerState};
use monastery_scene::{PendingUiCommands, ViewChanged};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlSelectElement};

pub const CANVAS_ID: &str = "monastery-canvas";
const AUTO_ROTATE_ID: &str = "auto-rotate";
const ROTATION_SPEED_ID: &str = "rotation-speed";
const VIEW_MODE_ID: &str = "view-mode";
const RESET_VIEW_ID: &str = "reset-view";
const PREV_VIEW_ID: &str = "prev-view";
const NEXT_VIEW_ID: &str = "next-view";
const LOADING_ID: &str = "loading";
const VIEWER_ID: &str = "viewer";
const CONFIG_ID: &str = "viewer-config";

/// Plugin that keeps page controls in sync with the viewer
pub struct DomBindingPlugin;

impl Plugin for DomBindingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, sync_view_selector);
    }
}

/// Read the optional inline config element. No element means defaults.
pub fn inline_config() -> Result<ViewerConfig, ViewerError> {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ID))
        .and_then(|el| el.text_content());
    match text {
        Some(text) => ViewerConfig::parse(&text),
        None => Ok(ViewerConfig::default()),
    }
}

/// Controls the viewer writes back to
pub struct DomControls {
    auto_rotate: Option<HtmlInputElement>,
    rotation_speed: Option<HtmlInputElement>,
    view_mode: Option<HtmlSelectElement>,
    loading: Option<HtmlElement>,
    viewer: Option<HtmlElement>,
}

impl DomControls {
    /// Look up every control and attach its callback
    pub fn bind(document: &Document, pending: &PendingUiCommands) -> Self {
        let auto_rotate = element::<HtmlInputElement>(document, AUTO_ROTATE_ID);
        if let Some(input) = &auto_rotate {
            let pending = pending.clone();
            let target = input.clone();
            listen(input, "change", move |_| {
                pending.push(UiCommand::SetAutoRotate(target.checked()));
            });
        }

        let rotation_speed = element::<HtmlInputElement>(document, ROTATION_SPEED_ID);
        if let Some(input) = &rotation_speed {
            let pending = pending.clone();
            let target = input.clone();
            listen(input, "input", move |_| {
                if let Some(command) = UiCommand::parse_or_warn(UiCommand::from_slider, &target.value()) {
                    pending.push(command);
                }
            });
        }

        let view_mode = element::<HtmlSelectElement>(document, VIEW_MODE_ID);
        if let Some(select) = &view_mode {
            let pending = pending.clone();
            let target = select.clone();
            listen(select, "change", move |_| {
                if let Some(command) = UiCommand::parse_or_warn(UiCommand::from_view, &target.value()) {
                    pending.push(command);
                }
            });
        }

        for (id, command) in [
            (RESET_VIEW_ID, UiCommand::ResetView),
            (PREV_VIEW_ID, UiCommand::PreviousView),
            (NEXT_VIEW_ID, UiCommand::NextView),
        ] {
            if let Some(button) = element::<HtmlElement>(document, id) {
                let pending = pending.clone();
                listen(&button, "click", move |_| pending.push(command));
            }
        }

        Self {
            auto_rotate,
            rotation_speed,
            view_mode,
            loading: element(document, LOADING_ID),
            viewer: element(document, VIEWER_ID),
        }
    }

    /// Make the controls reflect `state`
    pub fn show_state(&self, state: &ViewerState) {
        if let Some(input) = &self.auto_rotate {
            input.set_checked(state.auto_rotate);
        }
        if let Some(input) = &self.rotation_speed {
            input.set_value(&state.rotation_speed().to_string());
        }
        self.show_view(state.current_view());
    }

    pub fn show_view(&self, view: ViewName) {
        if let Some(select) = &self.view_mode {
            select.set_value(view.as_str());
        }
    }

    /// Hide the loading overlay and fade the viewer in
    pub fn reveal(&self) {
        if let Some(loading) = &self.loading {
            set_display(loading, "none");
        }
        if let Some(viewer) = &self.viewer {
            set_display(viewer, "block");
            if let Err(e) = viewer.class_list().add_1("fade-in") {
                warn!(error = ?e, "Failed to add fade-in class");
            }
        }
    }
}

fn set_display(element: &HtmlElement, value: &str) {
    if let Err(e) = element.style().set_property("display", value) {
        warn!(id = %element.id(), error = ?e, "Failed to set display");
    }
}

/// Find an element by id, warning when it is missing or of the wrong kind
fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    match document.get_element_by_id(id) {
        Some(el) => match el.dyn_into::<T>() {
            Ok(el) => Some(el),
            Err(_) => {
                warn!(id, "UI element has an unexpected type, leaving it unbound");
                None
            }
        },
        None => {
            warn!(id, "UI element not found, leaving it unbound");
            None
        }
    }
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        warn!(event, error = ?e, "Failed to attach listener");
    }
    closure.forget();
}

/// Keep the view selector on the view the camera actually moved to
fn sync_view_selector(controls: NonSend<DomControls>, mut changes: MessageReader<ViewChanged>) {
    if let Some(ViewChanged(view)) = changes.read().last().copied() {
        debug!(view = %view, "Syncing view selector");
        controls.show_view(view);
    }
}
