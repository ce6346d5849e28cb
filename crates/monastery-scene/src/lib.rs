//! Monastery Scene - Bevy rendering of the monastery viewer
//!
//! This crate turns the backend-independent scene graph from
//! `monastery-core` into Bevy entities and drives them each frame:
//! - Spawning meshes, materials, lights and the camera
//! - Orbit input from mouse and touch
//! - Draining queued UI commands
//! - The per-frame step that syncs the root rotation and camera

pub mod camera;
pub mod frame;
pub mod scene;
pub mod ui;

use bevy::prelude::*;
use monastery_core::{ViewerConfig, ViewerController};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The single viewer instance, owned by the ECS world
#[derive(Resource, Deref, DerefMut)]
pub struct Viewer(pub ViewerController);

/// Ordering of the per-frame viewer systems
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// UI commands, viewport changes, pointer input
    Input,
    /// Auto-rotate, camera damping, transform sync
    Frame,
}

/// Plugin that sets up the monastery scene and its frame loop
pub struct MonasteryScenePlugin {
    config: ViewerConfig,
    seed: Option<u64>,
}

impl MonasteryScenePlugin {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config, seed: None }
    }

    /// Use a fixed seed for cloud placement
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for MonasteryScenePlugin {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Plugin for MonasteryScenePlugin {
    fn build(&self, app: &mut App) {
        let controller = match self.seed {
            Some(seed) => ViewerController::new(&self.config, &mut StdRng::seed_from_u64(seed)),
            None => ViewerController::new(&self.config, &mut rand::rng()),
        };

        app.insert_resource(Viewer(controller))
            .configure_sets(Update, (ViewerSet::Input, ViewerSet::Frame).chain())
            .add_plugins(scene::SceneSpawnPlugin)
            .add_plugins(ui::UiCommandPlugin)
            .add_plugins(camera::OrbitInputPlugin)
            .add_plugins(frame::FramePlugin);
    }
}

// Re-export commonly used types
pub use camera::MainCamera;
pub use scene::{MonasteryRoot, PartTag, SceneStatus};
pub use ui::{PendingUiCommands, ViewChanged};

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Headless app with the scene plugin and just enough of Bevy to spawn
    /// meshes and materials and read input
    pub fn app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            bevy::input::InputPlugin,
        ))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .add_plugins(MonasteryScenePlugin::default().with_seed(5));
        app
    }
}
