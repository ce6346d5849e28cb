//! Queue between page controls and the viewer

use bevy::prelude::*;
use monastery_core::{UiCommand, ViewName};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::{Viewer, ViewerSet};

/// Plugin that applies queued UI commands once per frame
pub struct UiCommandPlugin;

impl Plugin for UiCommandPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingUiCommands>()
            .add_message::<ViewChanged>()
            .add_systems(
                Update,
                apply_ui_commands
                    .in_set(ViewerSet::Input)
                    .after(crate::camera::orbit_input),
            );
    }
}

/// Commands pushed by page callbacks, drained before the frame step.
///
/// Cloning shares the same queue, so callbacks can hold their own handle.
#[derive(Resource, Clone, Default)]
pub struct PendingUiCommands(Arc<Mutex<VecDeque<UiCommand>>>);

impl PendingUiCommands {
    pub fn push(&self, command: UiCommand) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push_back(command);
        }
    }

    /// Take every queued command in arrival order
    pub fn drain(&self) -> Vec<UiCommand> {
        match self.0.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Sent after a command moved the camera to a named view
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewChanged(pub ViewName);

fn apply_ui_commands(
    pending: Res<PendingUiCommands>,
    mut viewer: ResMut<Viewer>,
    mut changes: MessageWriter<ViewChanged>,
) {
    for command in pending.drain() {
        debug!(?command, "Applying UI command");
        if let Some(view) = command.apply(&mut viewer.0) {
            changes.write(ViewChanged(view));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use bevy::ecs::message::Messages;
    use monastery_core::{CameraRig, Viewport};

    #[test]
    fn test_commands_apply_in_order() {
        let mut app = test_support::app();
        let pending = app.world().resource::<PendingUiCommands>().clone();

        pending.push(UiCommand::SetAutoRotate(false));
        pending.push(UiCommand::SetRotationSpeed(1.5));
        pending.push(UiCommand::NextView);
        pending.push(UiCommand::NextView);
        pending.push(UiCommand::Resize { width: 300, height: 100 });
        app.update();

        let viewer = app.world().resource::<Viewer>();
        assert!(!viewer.state().auto_rotate);
        assert_eq!(viewer.state().rotation_speed(), 1.5);
        assert_eq!(viewer.state().current_view(), ViewName::Courtyard);
        assert_eq!(viewer.viewport(), Some(Viewport { width: 300, height: 100 }));
        assert_eq!(viewer.rig().projection().aspect, 3.0);
        assert!(pending.drain().is_empty());
    }

    #[test]
    fn test_view_changes_are_announced() {
        let mut app = test_support::app();
        let pending = app.world().resource::<PendingUiCommands>().clone();
        pending.push(UiCommand::SelectView(ViewName::Interior));
        pending.push(UiCommand::SetAutoRotate(true));
        pending.push(UiCommand::ResetView);
        app.update();

        let messages = app.world().resource::<Messages<ViewChanged>>();
        let mut cursor = messages.get_cursor();
        let views: Vec<_> = cursor.read(messages).map(|m| m.0).collect();
        assert_eq!(views, vec![ViewName::Interior, ViewName::Exterior]);
    }
}
