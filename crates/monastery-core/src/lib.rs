//! Monastery Core - Scene composition, view navigation, and the frame loop
//!
//! This crate holds everything in the Monastery360 viewer that carries state
//! or invariants, independent of any rendering backend:
//! - Scene graph description and the deterministic monastery composer
//! - Lighting rig
//! - Named viewpoints and the view state machine
//! - Damped orbit camera rig
//! - Per-frame animation step and the viewer controller that owns it all
//! - Configuration and error types

pub mod animation;
pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod lighting;
pub mod loading;
pub mod scene;
pub mod state;
pub mod ui;
pub mod view;

pub use animation::{AnimationLoop, Frame, FrameRenderer, FrameReport};
pub use camera::{CameraRig, OrbitRig, Projection};
pub use config::ViewerConfig;
pub use controller::{ViewerController, Viewport};
pub use error::{RenderError, ViewerError};
pub use lighting::LightingRig;
pub use loading::{LoadingGate, RevealPolicy};
pub use scene::{MonasteryGraph, Part, SceneComposer, SceneGraph, SceneNode, Structure};
pub use state::ViewerState;
pub use ui::{UiCommand, ViewerEvents};
pub use view::{ViewName, ViewPose, ViewPoses, ViewStateMachine};
