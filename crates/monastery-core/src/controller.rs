//! The viewer instance: owns state, scene, camera and the frame loop

use rand::Rng;
use tracing::{debug, info, warn};

use crate::animation::{AnimationLoop, FrameRenderer, FrameReport};
use crate::camera::{CameraRig, OrbitRig};
use crate::config::ViewerConfig;
use crate::scene::SceneGraph;
use crate::state::ViewerState;
use crate::ui::ViewerEvents;
use crate::view::{ViewName, ViewStateMachine};

/// Output surface size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Single owner of everything the viewer mutates.
///
/// UI events arrive through [`ViewerEvents`] between frames;
/// [`ViewerController::run_frame`] is called once per display refresh.
#[derive(Debug, Clone)]
pub struct ViewerController {
    state: ViewerState,
    views: ViewStateMachine,
    rig: OrbitRig,
    scene: SceneGraph,
    animation: AnimationLoop,
    max_rotation_speed: f32,
    viewport: Option<Viewport>,
}

impl ViewerController {
    /// Build the scene and place the camera at the exterior view
    pub fn new<R: Rng + ?Sized>(config: &ViewerConfig, rng: &mut R) -> Self {
        let views = ViewStateMachine::new(config.view_poses());
        let mut scene = config.composer().compose(rng);
        scene.background = config.background();

        let mut controller = Self {
            state: config.initial_state(),
            rig: OrbitRig::new(
                config.orbit_settings(),
                config.projection(),
                views.poses().get(ViewName::Exterior),
            ),
            views,
            scene,
            animation: config.animation_loop(),
            max_rotation_speed: config.animation.max_rotation_speed,
            viewport: None,
        };
        controller.on_reset();
        info!(
            nodes = controller.scene.node_count(),
            auto_rotate = controller.state.auto_rotate,
            "Viewer initialized"
        );
        controller
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn rig(&self) -> &OrbitRig {
        &self.rig
    }

    /// Direct access for pointer input
    pub fn rig_mut(&mut self) -> &mut OrbitRig {
        &mut self.rig
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.animation.frames()
    }

    pub fn run_frame<F: FrameRenderer + ?Sized>(&mut self, renderer: &mut F) -> FrameReport {
        self.animation
            .run_frame(&self.state, &mut self.scene, &mut self.rig, renderer)
    }
}

impl ViewerEvents for ViewerController {
    fn on_toggle(&mut self, auto_rotate: bool) {
        self.state.auto_rotate = auto_rotate;
        debug!(auto_rotate, "Auto-rotate toggled");
    }

    fn on_slider_change(&mut self, speed: f32) {
        if !speed.is_finite() {
            warn!(speed, "Ignoring non-finite rotation speed");
            return;
        }
        self.state
            .set_rotation_speed(speed.clamp(0.0, self.max_rotation_speed));
        debug!(speed = self.state.rotation_speed(), "Rotation speed changed");
    }

    fn on_view_select(&mut self, view: ViewName) -> ViewName {
        self.views.select(&mut self.state, &mut self.rig, view)
    }

    fn on_next(&mut self) -> ViewName {
        self.views.next(&mut self.state, &mut self.rig)
    }

    fn on_previous(&mut self) -> ViewName {
        self.views.previous(&mut self.state, &mut self.rig)
    }

    fn on_reset(&mut self) -> ViewName {
        self.views.reset(&mut self.state, &mut self.rig)
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!(width, height, "Ignoring degenerate resize");
            return;
        }
        let viewport = Viewport { width, height };
        self.rig.set_aspect(viewport.aspect());
        self.viewport = Some(viewport);
        debug!(width, height, "Viewport resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Frame;
    use crate::error::RenderError;
    use crate::ui::UiCommand;
    use crate::view::ViewPose;
    use bevy_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Recorder {
        poses: Vec<ViewPose>,
        aspects: Vec<f32>,
    }

    impl FrameRenderer for Recorder {
        fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
            self.poses.push(frame.camera);
            self.aspects.push(frame.projection.aspect);
            Ok(())
        }
    }

    fn controller() -> ViewerController {
        ViewerController::new(&ViewerConfig::default(), &mut StdRng::seed_from_u64(11))
    }

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.distance(b) < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_starts_at_exterior() {
        let viewer = controller();
        assert_eq!(viewer.state(), &ViewerState::default());
        assert_close(viewer.rig().pose().position, Vec3::new(0.0, 5.0, 15.0));
        assert_eq!(viewer.viewport(), None);
    }

    #[test]
    fn test_next_moves_to_interior() {
        let mut viewer = controller();
        assert_eq!(viewer.on_next(), ViewName::Interior);

        let state = viewer.state();
        assert_eq!(state.current_view(), ViewName::Interior);
        assert!(state.auto_rotate);
        assert_eq!(state.rotation_speed(), 0.5);

        let pose = viewer.rig().pose();
        assert_close(pose.position, Vec3::new(0.0, 3.0, 5.0));
        assert_close(pose.target, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_resize_sets_aspect_of_latest() {
        let mut viewer = controller();
        viewer.on_resize(800, 600);
        viewer.on_resize(1920, 1080);
        viewer.on_resize(0, 500);

        let mut recorder = Recorder::default();
        viewer.run_frame(&mut recorder);
        assert_eq!(recorder.aspects, vec![1920.0 / 1080.0]);
        assert_eq!(viewer.viewport(), Some(Viewport { width: 1920, height: 1080 }));
    }

    #[test]
    fn test_slider_is_clamped() {
        let mut viewer = controller();
        viewer.on_slider_change(9.0);
        assert_eq!(viewer.state().rotation_speed(), 2.0);
        viewer.on_slider_change(-1.0);
        assert_eq!(viewer.state().rotation_speed(), 0.0);
        viewer.on_slider_change(f32::NAN);
        assert_eq!(viewer.state().rotation_speed(), 0.0);
    }

    #[test]
    fn test_synthetic_command_stream() {
        let mut viewer = controller();
        let mut recorder = Recorder::default();
        let commands = [
            UiCommand::SetAutoRotate(false),
            UiCommand::SelectView(ViewName::Courtyard),
            UiCommand::PreviousView,
            UiCommand::Resize { width: 400, height: 200 },
        ];
        for command in commands {
            command.apply(&mut viewer);
        }
        for _ in 0..5 {
            viewer.run_frame(&mut recorder);
        }

        assert_eq!(viewer.state().current_view(), ViewName::Interior);
        assert_eq!(viewer.scene().monastery.yaw(), 0.0);
        assert_eq!(viewer.frames(), 5);
        assert_close(recorder.poses[4].position, Vec3::new(0.0, 3.0, 5.0));
        assert_eq!(recorder.aspects[0], 2.0);
    }

    #[test]
    fn test_config_background_and_clouds_flow_into_scene() {
        let config = ViewerConfig::parse("[camera]\nbackground = 0x000000\n[sky]\nclouds = 3").unwrap();
        let viewer = ViewerController::new(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(viewer.scene().background, crate::scene::hex(0));
        assert_eq!(viewer.scene().sky.count(crate::Part::Cloud), 3);
    }

    #[test]
    fn test_accepted_poses_are_shown_as_configured() {
        let config = ViewerConfig::parse(
            "[views.courtyard]\nposition = [0.0, 40.0, 3.0]\ntarget = [0.0, 0.0, 0.0]\n\
             [views.interior]\nposition = [2.0, 1.0, 6.0]\ntarget = [0.0, 0.0, 0.0]",
        )
        .unwrap();
        let mut viewer = ViewerController::new(&config, &mut StdRng::seed_from_u64(2));

        for view in [ViewName::Courtyard, ViewName::Interior] {
            viewer.on_view_select(view);
            let expected = config.view_poses().get(view);
            assert_close(viewer.rig().pose().position, expected.position);
            assert_close(viewer.rig().pose().target, expected.target);
        }
    }
}
