//! Per-refresh frame step: auto-rotate, camera damping, render

use tracing::{trace, warn};

use crate::camera::{CameraRig, Projection};
use crate::error::RenderError;
use crate::scene::SceneGraph;
use crate::state::ViewerState;
use crate::view::ViewPose;

/// Yaw added per frame at rotation speed 1.0, in radians
pub const DEFAULT_BASE_INCREMENT: f32 = 0.005;

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub number: u64,
    pub scene: &'a SceneGraph,
    pub yaw: f32,
    pub camera: ViewPose,
    pub projection: Projection,
}

/// Drawing capability handed each frame by the loop
pub trait FrameRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;
}

/// Outcome of a single frame step
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub number: u64,
    pub rotated: bool,
    pub camera_moved: bool,
    pub rendered: Result<(), RenderError>,
}

/// Frame counter plus the auto-rotate step size
#[derive(Debug, Clone)]
pub struct AnimationLoop {
    base_increment: f32,
    frames: u64,
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_INCREMENT)
    }
}

impl AnimationLoop {
    pub fn new(base_increment: f32) -> Self {
        Self {
            base_increment,
            frames: 0,
        }
    }

    /// Frames stepped so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. A render failure is logged and reported; the loop
    /// keeps going on the next call.
    pub fn run_frame<R, F>(
        &mut self,
        state: &ViewerState,
        scene: &mut SceneGraph,
        rig: &mut R,
        renderer: &mut F,
    ) -> FrameReport
    where
        R: CameraRig + ?Sized,
        F: FrameRenderer + ?Sized,
    {
        self.frames += 1;
        let number = self.frames;

        let rotated = state.auto_rotate && state.rotation_speed() > 0.0;
        if rotated {
            scene
                .monastery
                .rotate_by(self.base_increment * state.rotation_speed());
        }

        let camera_moved = rig.update();

        let frame = Frame {
            number,
            yaw: scene.monastery.yaw(),
            scene: &*scene,
            camera: rig.pose(),
            projection: rig.projection(),
        };
        let rendered = renderer.render(&frame);
        match &rendered {
            Ok(()) => trace!(frame = number, yaw = frame.yaw, "Frame rendered"),
            Err(e) => warn!(frame = number, error = %e, "Frame failed to render"),
        }

        FrameReport {
            number,
            rotated,
            camera_moved,
            rendered,
        }
    }
}
