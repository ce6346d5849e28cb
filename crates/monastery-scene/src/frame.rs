//! Per-frame step and viewport tracking

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use monastery_core::{Frame, FrameRenderer, RenderError, ViewerEvents};

use crate::camera::{perspective, MainCamera};
use crate::scene::MonasteryRoot;
use crate::{Viewer, ViewerSet};

/// Plugin for the frame loop
pub struct FramePlugin;

impl Plugin for FramePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, sync_viewport.in_set(ViewerSet::Input))
            .add_systems(Update, advance_frame.in_set(ViewerSet::Frame));
    }
}

/// Writes a frame into the ECS: the monastery root's rotation and the main
/// camera's transform and projection
#[derive(SystemParam)]
pub struct FrameSink<'w, 's> {
    root: Query<'w, 's, &'static mut Transform, (With<MonasteryRoot>, Without<MainCamera>)>,
    camera: Query<
        'w,
        's,
        (&'static mut Transform, &'static mut Projection),
        (With<MainCamera>, Without<MonasteryRoot>),
    >,
}

impl FrameRenderer for FrameSink<'_, '_> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        let mut root = self
            .root
            .single_mut()
            .map_err(|_| RenderError::TargetMissing("monastery root"))?;
        root.rotation = frame.scene.monastery.rotation();

        let (mut transform, mut projection) = self
            .camera
            .single_mut()
            .map_err(|_| RenderError::TargetMissing("main camera"))?;
        *transform = Transform::from_translation(frame.camera.position)
            .looking_at(frame.camera.target, Vec3::Y);
        *projection = Projection::Perspective(perspective(&frame.projection));
        Ok(())
    }
}

fn advance_frame(mut viewer: ResMut<Viewer>, mut sink: FrameSink) {
    viewer.run_frame(&mut sink);
}

/// Forward primary window size changes to the viewer
fn sync_viewport(
    mut viewer: ResMut<Viewer>,
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let (width, height) = (window.physical_width(), window.physical_height());
    let unchanged = viewer
        .viewport()
        .is_some_and(|v| v.width == width && v.height == height);
    if !unchanged {
        viewer.on_resize(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use monastery_core::{CameraRig, Viewport};
    use std::f32::consts::TAU;

    fn root_rotation(app: &mut App) -> Quat {
        let world = app.world_mut();
        world
            .query_filtered::<&Transform, With<MonasteryRoot>>()
            .single(world)
            .expect("one monastery root")
            .rotation
    }

    #[test]
    fn test_root_follows_auto_rotation() {
        let mut app = test_support::app();
        for _ in 0..10 {
            app.update();
        }

        let viewer = app.world().resource::<Viewer>();
        assert_eq!(viewer.frames(), 10);
        let expected = (10.0 * 0.005 * 0.5f32).rem_euclid(TAU);
        assert!((viewer.scene().monastery.yaw() - expected).abs() < 1e-5);

        let rotation = root_rotation(&mut app);
        assert!(rotation.angle_between(Quat::from_rotation_y(expected)) < 1e-4);
    }

    #[test]
    fn test_root_frozen_when_auto_rotate_off() {
        let mut app = test_support::app();
        app.world_mut().resource_mut::<Viewer>().on_toggle(false);
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(root_rotation(&mut app), Quat::IDENTITY);
    }

    #[test]
    fn test_camera_follows_view_change() {
        let mut app = test_support::app();
        app.update();
        app.world_mut().resource_mut::<Viewer>().on_next();
        app.update();

        let world = app.world_mut();
        let transform = *world
            .query_filtered::<&Transform, With<MainCamera>>()
            .single(world)
            .expect("one main camera");
        assert!(transform.translation.distance(Vec3::new(0.0, 3.0, 5.0)) < 1e-3);
        let facing = transform.forward().as_vec3();
        let wanted = (Vec3::new(0.0, 2.0, 0.0) - transform.translation).normalize();
        assert!(facing.dot(wanted) > 0.9999);
    }

    #[test]
    fn test_window_size_reaches_rig() {
        let mut app = test_support::app();
        let mut window = Window::default();
        window.resolution.set_physical_resolution(1280, 640);
        let id = app.world_mut().spawn((window, PrimaryWindow)).id();
        app.update();

        let viewer = app.world().resource::<Viewer>();
        assert_eq!(viewer.viewport(), Some(Viewport { width: 1280, height: 640 }));
        assert_eq!(viewer.rig().projection().aspect, 2.0);

        app.world_mut()
            .get_mut::<Window>(id)
            .expect("window")
            .resolution
            .set_physical_resolution(600, 600);
        app.update();
        assert_eq!(app.world().resource::<Viewer>().rig().projection().aspect, 1.0);
    }

    #[test]
    fn test_missing_camera_is_reported_not_fatal() {
        let mut app = test_support::app();
        app.update();
        let world = app.world_mut();
        let camera = world
            .query_filtered::<Entity, With<MainCamera>>()
            .single(world)
            .expect("one main camera");
        world.despawn(camera);

        app.update();
        app.update();
        assert_eq!(app.world().resource::<Viewer>().frames(), 3);
    }
}
