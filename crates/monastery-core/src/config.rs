//! Configuration loading and validation

use bevy_color::Color;
use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, Level};

use crate::animation::{AnimationLoop, DEFAULT_BASE_INCREMENT};
use crate::camera::{OrbitSettings, Projection};
use crate::error::ViewerError;
use crate::loading::RevealPolicy;
use crate::scene::{hex, SceneComposer, DEFAULT_CLOUDS, SKY_BLUE};
use crate::state::ViewerState;
use crate::view::{ViewPose, ViewPoses};

/// Slack for pose checks against the orbit limits
const POSE_TOLERANCE: f32 = 1e-4;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub sky: SkyConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Clear color as 0xRRGGBB
    #[serde(default = "default_background")]
    pub background: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            background: default_background(),
        }
    }
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_background() -> u32 {
    SKY_BLUE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Share of pending orbit motion applied per frame
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_true")]
    pub enable_zoom: bool,
    #[serde(default = "default_true")]
    pub enable_pan: bool,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Radians down from straight overhead
    #[serde(default)]
    pub min_polar_angle: f32,
    #[serde(default = "default_max_polar_angle")]
    pub max_polar_angle: f32,
    #[serde(default = "default_one")]
    pub rotate_speed: f32,
    #[serde(default = "default_one")]
    pub zoom_speed: f32,
    #[serde(default = "default_one")]
    pub pan_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            enable_zoom: true,
            enable_pan: true,
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            min_polar_angle: 0.0,
            max_polar_angle: default_max_polar_angle(),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

fn default_damping() -> f32 {
    0.05
}

fn default_min_distance() -> f32 {
    5.0
}

fn default_max_distance() -> f32 {
    50.0
}

fn default_max_polar_angle() -> f32 {
    FRAC_PI_2 // Never below the horizon
}

fn default_one() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Yaw per frame at speed 1.0, in radians
    #[serde(default = "default_base_increment")]
    pub base_increment: f32,
    #[serde(default = "default_true")]
    pub auto_rotate: bool,
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    /// Upper bound for speeds coming from the slider
    #[serde(default = "default_max_rotation_speed")]
    pub max_rotation_speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            base_increment: default_base_increment(),
            auto_rotate: true,
            rotation_speed: default_rotation_speed(),
            max_rotation_speed: default_max_rotation_speed(),
        }
    }
}

fn default_base_increment() -> f32 {
    DEFAULT_BASE_INCREMENT
}

fn default_rotation_speed() -> f32 {
    0.5
}

fn default_max_rotation_speed() -> f32 {
    2.0
}

/// A viewpoint as written in config. Both fields are required once a view
/// table is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl From<PoseConfig> for ViewPose {
    fn from(pose: PoseConfig) -> Self {
        ViewPose::new(Vec3::from_array(pose.position), Vec3::from_array(pose.target))
    }
}

impl From<ViewPose> for PoseConfig {
    fn from(pose: ViewPose) -> Self {
        Self {
            position: pose.position.to_array(),
            target: pose.target.to_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewsConfig {
    #[serde(default = "default_exterior")]
    pub exterior: PoseConfig,
    #[serde(default = "default_interior")]
    pub interior: PoseConfig,
    #[serde(default = "default_courtyard")]
    pub courtyard: PoseConfig,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            exterior: default_exterior(),
            interior: default_interior(),
            courtyard: default_courtyard(),
        }
    }
}

fn default_exterior() -> PoseConfig {
    PoseConfig {
        position: [0.0, 5.0, 15.0],
        target: [0.0, 0.0, 0.0],
    }
}

fn default_interior() -> PoseConfig {
    PoseConfig {
        position: [0.0, 3.0, 5.0],
        target: [0.0, 2.0, 0.0],
    }
}

fn default_courtyard() -> PoseConfig {
    PoseConfig {
        position: [0.0, 8.0, 0.0],
        target: [0.0, 0.0, 0.0],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyConfig {
    #[serde(default = "default_clouds")]
    pub clouds: usize,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            clouds: default_clouds(),
        }
    }
}

fn default_clouds() -> usize {
    DEFAULT_CLOUDS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    #[default]
    FixedDelay,
    SceneReady,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingConfig {
    #[serde(default)]
    pub reveal: RevealMode,
    /// Used by `fixed_delay` only
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            reveal: RevealMode::default(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum tracing level: trace, debug, info, warn or error
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl ViewerConfig {
    /// Parse inline config text. Text starting with `{` is read as JSON,
    /// anything else as TOML; blank text gives the defaults.
    pub fn parse(text: &str) -> Result<Self, ViewerError> {
        let text = text.trim();
        let config: ViewerConfig = if text.is_empty() {
            ViewerConfig::default()
        } else if text.starts_with('{') {
            serde_json::from_str(text)?
        } else {
            toml::from_str(text)?
        };
        config.validate()?;
        info!(
            auto_rotate = config.animation.auto_rotate,
            rotation_speed = config.animation.rotation_speed,
            clouds = config.sky.clouds,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        let invalid = |msg: String| Err(ViewerError::InvalidConfig(msg));

        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return invalid(format!("camera.fov must be in (0, 180), got {}", camera.fov));
        }
        if !(camera.near > 0.0 && camera.near < camera.far && camera.far.is_finite()) {
            return invalid(format!(
                "camera.near/far must satisfy 0 < near < far, got {} / {}",
                camera.near, camera.far
            ));
        }

        let controls = &self.controls;
        if !(controls.damping > 0.0 && controls.damping <= 1.0) {
            return invalid(format!("controls.damping must be in (0, 1], got {}", controls.damping));
        }
        if !(controls.min_distance > 0.0 && controls.min_distance <= controls.max_distance) {
            return invalid(format!(
                "controls distance range is empty: {}..{}",
                controls.min_distance, controls.max_distance
            ));
        }
        if !(controls.min_polar_angle >= 0.0
            && controls.min_polar_angle <= controls.max_polar_angle
            && controls.max_polar_angle <= std::f32::consts::PI)
        {
            return invalid(format!(
                "controls polar range must lie in [0, pi], got {}..{}",
                controls.min_polar_angle, controls.max_polar_angle
            ));
        }
        for (name, value) in [
            ("controls.rotate_speed", controls.rotate_speed),
            ("controls.zoom_speed", controls.zoom_speed),
            ("controls.pan_speed", controls.pan_speed),
            ("animation.base_increment", self.animation.base_increment),
            ("animation.rotation_speed", self.animation.rotation_speed),
            ("animation.max_rotation_speed", self.animation.max_rotation_speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("{name} must be finite and non-negative, got {value}"));
            }
        }
        if self.animation.rotation_speed > self.animation.max_rotation_speed {
            return invalid(format!(
                "animation.rotation_speed {} exceeds max_rotation_speed {}",
                self.animation.rotation_speed, self.animation.max_rotation_speed
            ));
        }

        for (name, pose) in [
            ("exterior", self.views.exterior),
            ("interior", self.views.interior),
            ("courtyard", self.views.courtyard),
        ] {
            if pose.position.iter().chain(&pose.target).any(|v| !v.is_finite()) {
                return invalid(format!("views.{name} has a non-finite coordinate"));
            }
            // Poses must lie inside the orbit limits
            let pose = ViewPose::from(pose);
            let distance = pose.distance();
            if distance < controls.min_distance - POSE_TOLERANCE
                || distance > controls.max_distance + POSE_TOLERANCE
            {
                return invalid(format!(
                    "views.{name} is {distance} from its target, outside {}..{}",
                    controls.min_distance, controls.max_distance
                ));
            }
            let polar = pose.polar_angle();
            if polar < controls.min_polar_angle - POSE_TOLERANCE
                || polar > controls.max_polar_angle + POSE_TOLERANCE
            {
                return invalid(format!(
                    "views.{name} polar angle {polar} is outside {}..{}",
                    controls.min_polar_angle, controls.max_polar_angle
                ));
            }
        }

        if Level::from_str(&self.logging.level).is_err() {
            return invalid(format!("logging.level '{}' is not a tracing level", self.logging.level));
        }
        Ok(())
    }

    pub fn projection(&self) -> Projection {
        Projection {
            fov_degrees: self.camera.fov,
            aspect: 1.0,
            near: self.camera.near,
            far: self.camera.far,
        }
    }

    pub fn background(&self) -> Color {
        hex(self.camera.background)
    }

    pub fn orbit_settings(&self) -> OrbitSettings {
        let c = &self.controls;
        OrbitSettings {
            damping: c.damping,
            enable_zoom: c.enable_zoom,
            enable_pan: c.enable_pan,
            min_distance: c.min_distance,
            max_distance: c.max_distance,
            min_polar_angle: c.min_polar_angle,
            max_polar_angle: c.max_polar_angle,
            rotate_speed: c.rotate_speed,
            zoom_speed: c.zoom_speed,
            pan_speed: c.pan_speed,
        }
    }

    pub fn view_poses(&self) -> ViewPoses {
        ViewPoses::new(
            self.views.exterior.into(),
            self.views.interior.into(),
            self.views.courtyard.into(),
        )
    }

    pub fn initial_state(&self) -> ViewerState {
        ViewerState::new(self.animation.auto_rotate, self.animation.rotation_speed)
    }

    pub fn animation_loop(&self) -> AnimationLoop {
        AnimationLoop::new(self.animation.base_increment)
    }

    pub fn composer(&self) -> SceneComposer {
        SceneComposer::new(self.sky.clouds)
    }

    pub fn reveal_policy(&self) -> RevealPolicy {
        match self.loading.reveal {
            RevealMode::FixedDelay => {
                RevealPolicy::FixedDelay(Duration::from_millis(self.loading.delay_ms))
            }
            RevealMode::SceneReady => RevealPolicy::SceneReady,
        }
    }

    /// Maximum tracing level, falling back to `WARN` if unparseable
    pub fn log_level(&self) -> Level {
        Level::from_str(&self.logging.level).unwrap_or(Level::WARN)
    }
}
