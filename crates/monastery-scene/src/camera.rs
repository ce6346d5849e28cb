//! Main camera and orbit navigation input

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use monastery_core::{CameraRig, Projection as CameraProjection};

use crate::{Viewer, ViewerSet};

/// Scroll pixels that count as one wheel notch
const PIXELS_PER_NOTCH: f32 = 100.0;
/// Ambient brightness for an ambient intensity of 1.0
const AMBIENT_BRIGHTNESS: f32 = 500.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the camera and its orbit controls
pub struct OrbitInputPlugin;

impl Plugin for OrbitInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, orbit_input.in_set(ViewerSet::Input));
    }
}

/// Bevy projection for the rig's perspective parameters
pub fn perspective(projection: &CameraProjection) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: projection.fov_degrees.to_radians(),
        aspect_ratio: projection.aspect,
        near: projection.near,
        far: projection.far,
        ..default()
    }
}

fn spawn_camera(mut commands: Commands, viewer: Res<Viewer>) {
    let pose = viewer.rig().pose();
    let ambient = viewer.scene().lighting.ambient();
    commands.spawn((
        Name::new("Main Camera"),
        Camera3d::default(),
        Projection::Perspective(perspective(&viewer.rig().projection())),
        Transform::from_translation(pose.position).looking_at(pose.target, Vec3::Y),
        AmbientLight {
            color: ambient.color,
            brightness: ambient.intensity * AMBIENT_BRIGHTNESS,
            ..default()
        },
        MainCamera,
    ));
}

/// Feed pointer input into the orbit rig: left drag or one finger orbits,
/// right drag pans, the wheel or a pinch zooms
pub(crate) fn orbit_input(
    mut viewer: ResMut<Viewer>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let height = window.height();
    let rig = viewer.rig_mut();

    let delta = motion.delta;
    if delta != Vec2::ZERO {
        if buttons.pressed(MouseButton::Left) {
            rig.drag(delta.x, delta.y, height);
        } else if buttons.pressed(MouseButton::Right) {
            rig.pan(delta.x, delta.y, height);
        }
    }

    if scroll.delta.y != 0.0 {
        let notches = match scroll.unit {
            MouseScrollUnit::Line => scroll.delta.y,
            MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_NOTCH,
        };
        rig.zoom(notches);
    }

    let fingers: Vec<_> = touches.iter().collect();
    match fingers.as_slice() {
        [touch] => {
            let d = touch.delta();
            if d != Vec2::ZERO {
                rig.drag(d.x, d.y, height);
            }
        }
        [a, b] => {
            let current = a.position().distance(b.position());
            let previous = (a.position() - a.delta()).distance(b.position() - b.delta());
            if current > 0.0 && previous > 0.0 && current != previous {
                let factor = current / previous;
                rig.dolly_in(factor);
            }
        }
        _ => {}
    }
}
