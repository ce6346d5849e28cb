//! Orbit camera rig with damped rotate, zoom, and pan
//!
//! The rig pivots around a look-at target using spherical coordinates
//! (Y-up: `theta` around Y from +Z, `phi` down from +Y). User input
//! accumulates as pending deltas; each [`CameraRig::update`] applies a
//! damped share of them and decays the remainder, so motion coasts to a stop
//! over several frames.

use bevy_math::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::view::ViewPose;

const EPS: f32 = 1e-6;
/// Smallest position change reported as movement
const MOVE_EPS: f32 = 1e-4;
/// Per-notch zoom ratio before `zoom_speed` is applied
const ZOOM_STEP: f32 = 0.95;

/// Camera control capability the view machine and frame loop drive
pub trait CameraRig {
    /// Current camera position and look-at target
    fn pose(&self) -> ViewPose;
    /// Jump to `pose`, discarding any pending input momentum
    fn set_pose(&mut self, pose: ViewPose);
    /// Advance damping one step and rebuild the reference frame.
    /// Returns whether the camera moved.
    fn update(&mut self) -> bool;
    fn projection(&self) -> Projection;
    fn set_aspect(&mut self, aspect: f32);
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Orbit control tuning
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSettings {
    /// Share of pending motion applied per update, in `(0, 1]`
    pub damping: f32,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping: 0.05,
            enable_zoom: true,
            enable_pan: true,
            min_distance: 5.0,
            max_distance: 50.0,
            min_polar_angle: 0.0,
            max_polar_angle: FRAC_PI_2,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

/// Damped orbit camera
#[derive(Debug, Clone)]
pub struct OrbitRig {
    settings: OrbitSettings,
    projection: Projection,
    position: Vec3,
    target: Vec3,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self::new(
            OrbitSettings::default(),
            Projection::default(),
            ViewPose::new(Vec3::new(0.0, 5.0, 15.0), Vec3::ZERO),
        )
    }
}

impl OrbitRig {
    pub fn new(settings: OrbitSettings, projection: Projection, pose: ViewPose) -> Self {
        let mut rig = Self {
            settings,
            projection,
            position: pose.position,
            target: pose.target,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        };
        rig.update();
        rig
    }

    /// True once all pending input momentum has decayed
    pub fn is_settled(&self) -> bool {
        self.delta_theta == 0.0
            && self.delta_phi == 0.0
            && self.pan_offset == Vec3::ZERO
            && self.scale == 1.0
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Orbit from a pointer drag of `(dx, dy)` pixels in a viewport
    /// `height` pixels tall
    pub fn drag(&mut self, dx: f32, dy: f32, height: f32) {
        if height <= 0.0 {
            return;
        }
        let speed = self.settings.rotate_speed;
        self.rotate_left(TAU * dx / height * speed);
        self.rotate_up(TAU * dy / height * speed);
    }

    /// Move closer by `factor` (> 1 zooms in)
    pub fn dolly_in(&mut self, factor: f32) {
        if self.settings.enable_zoom && factor > 0.0 {
            self.scale /= factor;
        }
    }

    /// Move away by `factor` (> 1 zooms out)
    pub fn dolly_out(&mut self, factor: f32) {
        if self.settings.enable_zoom && factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Zoom by wheel notches; positive zooms in
    pub fn zoom(&mut self, notches: f32) {
        if notches == 0.0 {
            return;
        }
        let factor = ZOOM_STEP.powf(self.settings.zoom_speed * notches.abs()).recip();
        if notches > 0.0 {
            self.dolly_in(factor);
        } else {
            self.dolly_out(factor);
        }
    }

    /// Pan from a pointer drag of `(dx, dy)` pixels in screen space
    pub fn pan(&mut self, dx: f32, dy: f32, height: f32) {
        if !self.settings.enable_pan || height <= 0.0 {
            return;
        }
        let offset = self.position - self.target;
        // Half the visible height at the target plane
        let half_height = offset.length() * (self.projection.fov_degrees.to_radians() / 2.0).tan();
        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let per_pixel = 2.0 * half_height / height * self.settings.pan_speed;
        self.pan_offset += -right * dx * per_pixel + up * dy * per_pixel;
    }

    fn clear_motion(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }
}

impl CameraRig for OrbitRig {
    fn pose(&self) -> ViewPose {
        ViewPose::new(self.position, self.target)
    }

    fn set_pose(&mut self, pose: ViewPose) {
        self.position = pose.position;
        self.target = pose.target;
        self.clear_motion();
    }

    fn update(&mut self) -> bool {
        let settings = &self.settings;
        let d = settings.damping;

        let offset = self.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            radius = settings.min_distance;
            (0.0, FRAC_PI_2)
        };

        theta += self.delta_theta * d;
        phi += self.delta_phi * d;
        phi = phi
            .clamp(settings.min_polar_angle, settings.max_polar_angle)
            .clamp(EPS, PI - EPS);
        radius = (radius * self.scale).clamp(settings.min_distance, settings.max_distance);
        self.target += self.pan_offset * d;

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        let position = self.target + offset;

        let decay = 1.0 - d;
        self.delta_theta *= decay;
        self.delta_phi *= decay;
        self.pan_offset *= decay;
        self.scale = 1.0;
        if self.delta_theta.abs() < EPS && self.delta_phi.abs() < EPS {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        if self.pan_offset.length_squared() < EPS * EPS {
            self.pan_offset = Vec3::ZERO;
        }

        let moved = position.distance_squared(self.position) > MOVE_EPS * MOVE_EPS;
        self.position = position;
        moved
    }

    fn projection(&self) -> Projection {
        self.projection
    }

    fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.projection.aspect = aspect;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_preserves_reachable_pose() {
        let pose = ViewPose::new(Vec3::new(0.0, 3.0, 5.0), Vec3::new(0.0, 2.0, 0.0));
        let mut rig = OrbitRig::default();
        rig.set_pose(pose);
        rig.update();
        assert!(rig.pose().position.distance(pose.position) < 1e-4);
        assert_eq!(rig.pose().target, pose.target);
        assert!(rig.is_settled());
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut rig = OrbitRig::default();
        rig.set_pose(ViewPose::new(Vec3::new(0.0, 1.0, 1.0), Vec3::ZERO));
        rig.update();
        assert!((rig.pose().distance() - 5.0).abs() < 1e-4);

        rig.dolly_out(100.0);
        rig.update();
        assert!((rig.pose().distance() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_camera_never_goes_below_horizon() {
        let mut rig = OrbitRig::default();
        rig.rotate_up(-3.0);
        for _ in 0..200 {
            rig.update();
        }
        let pose = rig.pose();
        assert!(pose.position.y >= pose.target.y - 1e-4);
    }

    #[test]
    fn test_drag_momentum_decays() {
        let mut rig = OrbitRig::default();
        let start = rig.pose().position;
        rig.drag(120.0, 0.0, 800.0);

        assert!(rig.update());
        let after_first = rig.pose().position;
        assert!(after_first.distance(start) > 0.0);

        let mut steps = 0;
        while !rig.is_settled() && steps < 10_000 {
            rig.update();
            steps += 1;
        }
        assert!(rig.is_settled());
        assert!(!rig.update());
        // Orbiting keeps the distance to the target
        assert!((rig.pose().distance() - start.length()).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_respects_enable_flag() {
        let settings = OrbitSettings {
            enable_zoom: false,
            ..OrbitSettings::default()
        };
        let mut rig = OrbitRig::new(settings, Projection::default(), OrbitRig::default().pose());
        let before = rig.pose();
        rig.zoom(5.0);
        rig.update();
        assert!(rig.pose().position.distance(before.position) < 1e-4);
    }

    #[test]
    fn test_zoom_in_moves_closer() {
        let mut rig = OrbitRig::default();
        let before = rig.pose().distance();
        rig.zoom(2.0);
        rig.update();
        assert!(rig.pose().distance() < before);
    }

    #[test]
    fn test_pan_moves_target() {
        let mut rig = OrbitRig::default();
        rig.pan(50.0, 0.0, 600.0);
        rig.update();
        assert!(rig.pose().target.x < 0.0);
    }

    #[test]
    fn test_set_aspect_rejects_degenerate_values() {
        let mut rig = OrbitRig::default();
        rig.set_aspect(16.0 / 9.0);
        rig.set_aspect(f32::INFINITY);
        rig.set_aspect(0.0);
        assert_eq!(rig.projection().aspect, 16.0 / 9.0);
    }
}
