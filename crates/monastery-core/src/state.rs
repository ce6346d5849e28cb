//! Mutable viewer state shared between UI callbacks and the frame loop

use crate::view::ViewName;

/// Live viewer settings.
///
/// Owned by a single [`crate::ViewerController`]; UI entry points and view
/// transitions mutate it between frames, the frame loop only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    current_view: ViewName,
    pub auto_rotate: bool,
    rotation_speed: f32,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            current_view: ViewName::Exterior,
            auto_rotate: true,
            rotation_speed: 0.5,
        }
    }
}

impl ViewerState {
    pub fn new(auto_rotate: bool, rotation_speed: f32) -> Self {
        let mut state = Self {
            auto_rotate,
            ..Self::default()
        };
        state.set_rotation_speed(rotation_speed);
        state
    }

    /// View the camera was last moved to
    pub fn current_view(&self) -> ViewName {
        self.current_view
    }

    /// Only [`crate::ViewStateMachine`] records a view, alongside the camera jump
    pub(crate) fn set_current_view(&mut self, view: ViewName) {
        self.current_view = view;
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Set the rotation speed multiplier. Negative values clamp to zero and
    /// non-finite values are ignored.
    pub fn set_rotation_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.rotation_speed = speed.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ViewerState::default();
        assert_eq!(state.current_view(), ViewName::Exterior);
        assert!(state.auto_rotate);
        assert_eq!(state.rotation_speed(), 0.5);
    }

    #[test]
    fn test_rotation_speed_is_never_negative() {
        let mut state = ViewerState::new(false, -3.0);
        assert_eq!(state.rotation_speed(), 0.0);

        state.set_rotation_speed(1.25);
        state.set_rotation_speed(f32::NAN);
        assert_eq!(state.rotation_speed(), 1.25);
    }

    #[test]
    fn test_view_is_recorded_by_the_view_machine() {
        let machine = crate::ViewStateMachine::default();
        let mut rig = crate::OrbitRig::default();
        let mut state = ViewerState::default();

        machine.select(&mut state, &mut rig, ViewName::Courtyard);
        assert_eq!(state.current_view(), ViewName::Courtyard);
        machine.reset(&mut state, &mut rig);
        assert_eq!(state.current_view(), ViewName::Exterior);
    }
}
