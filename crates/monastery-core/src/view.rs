//! Named viewpoints and the view navigation state machine

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::camera::CameraRig;
use crate::error::ViewerError;
use crate::state::ViewerState;

/// One of the fixed camera viewpoints.
///
/// Navigation order is `[Exterior, Interior, Courtyard]` and wraps in both
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewName {
    #[default]
    Exterior,
    Interior,
    Courtyard,
}

impl ViewName {
    /// Cyclic navigation order
    pub const ORDER: [ViewName; 3] = [ViewName::Exterior, ViewName::Interior, ViewName::Courtyard];

    fn index(self) -> usize {
        match self {
            ViewName::Exterior => 0,
            ViewName::Interior => 1,
            ViewName::Courtyard => 2,
        }
    }

    /// The view after this one, wrapping from the last back to the first
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// The view before this one, wrapping from the first to the last
    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }

    /// Lowercase name, as used by the view selector control
    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::Exterior => "exterior",
            ViewName::Interior => "interior",
            ViewName::Courtyard => "courtyard",
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exterior" => Ok(ViewName::Exterior),
            "interior" => Ok(ViewName::Interior),
            "courtyard" => Ok(ViewName::Courtyard),
            _ => Err(ViewerError::UnknownView(s.to_string())),
        }
    }
}

/// Camera position plus the point it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl ViewPose {
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Distance from the camera to its target
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Angle between +Y and the target-to-camera direction, in `[0, pi]`
    pub fn polar_angle(&self) -> f32 {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        }
    }
}

/// Immutable table mapping every [`ViewName`] to its pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPoses {
    exterior: ViewPose,
    interior: ViewPose,
    courtyard: ViewPose,
}

impl ViewPoses {
    pub fn new(exterior: ViewPose, interior: ViewPose, courtyard: ViewPose) -> Self {
        Self {
            exterior,
            interior,
            courtyard,
        }
    }

    pub fn get(&self, name: ViewName) -> ViewPose {
        match name {
            ViewName::Exterior => self.exterior,
            ViewName::Interior => self.interior,
            ViewName::Courtyard => self.courtyard,
        }
    }
}

impl Default for ViewPoses {
    fn default() -> Self {
        Self {
            exterior: ViewPose::new(Vec3::new(0.0, 5.0, 15.0), Vec3::ZERO),
            interior: ViewPose::new(Vec3::new(0.0, 3.0, 5.0), Vec3::new(0.0, 2.0, 0.0)),
            courtyard: ViewPose::new(Vec3::new(0.0, 8.0, 0.0), Vec3::ZERO),
        }
    }
}

/// Maps view transitions onto camera pose jumps.
///
/// The current view lives in [`ViewerState`]; the machine itself only holds
/// the pose table. Every transition returns the new view so the caller can
/// keep any view-name control in sync.
#[derive(Debug, Clone, Default)]
pub struct ViewStateMachine {
    poses: ViewPoses,
}

impl ViewStateMachine {
    pub fn new(poses: ViewPoses) -> Self {
        Self { poses }
    }

    pub fn poses(&self) -> &ViewPoses {
        &self.poses
    }

    /// Jump to `name`: record it, apply its pose to the rig, and make the rig
    /// rebuild its reference frame so further drag/zoom is relative to it.
    pub fn select<R: CameraRig + ?Sized>(
        &self,
        state: &mut ViewerState,
        rig: &mut R,
        name: ViewName,
    ) -> ViewName {
        state.set_current_view(name);
        rig.set_pose(self.poses.get(name));
        rig.update();
        debug!(view = %name, "View selected");
        name
    }

    pub fn next<R: CameraRig + ?Sized>(&self, state: &mut ViewerState, rig: &mut R) -> ViewName {
        let next = state.current_view().next();
        self.select(state, rig, next)
    }

    pub fn previous<R: CameraRig + ?Sized>(&self, state: &mut ViewerState, rig: &mut R) -> ViewName {
        let previous = state.current_view().previous();
        self.select(state, rig, previous)
    }

    pub fn reset<R: CameraRig + ?Sized>(&self, state: &mut ViewerState, rig: &mut R) -> ViewName {
        self.select(state, rig, ViewName::Exterior)
    }
}
