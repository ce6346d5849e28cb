//! Loading overlay reveal

use bevy::prelude::*;
use bevy::time::Real;
use monastery_core::{LoadingGate, RevealPolicy};
use monastery_scene::SceneStatus;

use crate::dom::DomControls;

/// Plugin that reveals the viewer once, when the reveal policy is met
pub struct LoadingScreenPlugin {
    policy: RevealPolicy,
}

impl LoadingScreenPlugin {
    pub fn new(policy: RevealPolicy) -> Self {
        Self { policy }
    }
}

impl Plugin for LoadingScreenPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(LoadingReveal(LoadingGate::new(self.policy)))
            .add_systems(Update, reveal_when_ready);
    }
}

#[derive(Resource)]
struct LoadingReveal(LoadingGate);

fn reveal_when_ready(
    mut reveal: ResMut<LoadingReveal>,
    time: Res<Time<Real>>,
    status: Res<SceneStatus>,
    controls: NonSend<DomControls>,
) {
    if reveal.0.is_revealed() {
        return;
    }
    if reveal.0.poll(time.elapsed(), status.spawned) {
        controls.reveal();
    }
}
