//! Scene graph description of the monastery complex
//!
//! The graph is plain data. A rendering backend walks it once to create its
//! own entities, then only follows the root yaw from frame to frame.

mod composer;
mod node;

pub use composer::{chapel_window_color, column_position, SceneComposer, DEFAULT_CLOUDS, SKY_BLUE};
pub use node::{
    hex, Material, MeshNode, NodeContent, NodeTransform, Part, SceneNode, Shading, Shape, Side,
    Structure,
};

use bevy_color::Color;
use bevy_math::Quat;
use std::f32::consts::TAU;

use crate::lighting::LightingRig;

/// The rotating monastery root and its fixed structural sub-groups.
///
/// Topology is frozen at construction; the only thing that changes is the
/// root's yaw, kept in `[0, 2π)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonasteryGraph {
    root: SceneNode,
    yaw: f32,
}

impl MonasteryGraph {
    pub(crate) fn new(root: SceneNode) -> Self {
        Self { root, yaw: 0.0 }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Root rotation about +Y, in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Turn the root by `delta` radians
    pub fn rotate_by(&mut self, delta: f32) {
        if delta.is_finite() {
            self.yaw = (self.yaw + delta).rem_euclid(TAU);
            self.root.transform.rotation = self.rotation();
        }
    }

    pub fn structure(&self, which: Structure) -> Option<&SceneNode> {
        self.root
            .children()
            .iter()
            .find(|node| node.part == Part::Structure(which))
    }
}

/// Everything the renderer draws: the monastery plus its static
/// surroundings and lights
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub monastery: MonasteryGraph,
    pub ground: SceneNode,
    pub sky: SceneNode,
    pub lighting: LightingRig,
    pub background: Color,
}

impl SceneGraph {
    /// Total renderable node count, lights excluded
    pub fn node_count(&self) -> usize {
        self.monastery.root().node_count() + self.ground.node_count() + self.sky.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        let mut graph = SceneComposer::default().build();
        graph.rotate_by(TAU + 0.25);
        assert!((graph.yaw() - 0.25).abs() < 1e-5);
        graph.rotate_by(-0.5);
        assert!((graph.yaw() - (TAU - 0.25)).abs() < 1e-5);
        assert_eq!(graph.root().transform.rotation, graph.rotation());
    }

    #[test]
    fn test_rotation_keeps_topology() {
        let mut graph = SceneComposer::default().build();
        let count = graph.root().node_count();
        for _ in 0..100 {
            graph.rotate_by(0.1);
        }
        assert_eq!(graph.root().node_count(), count);
        for which in Structure::ALL {
            assert!(graph.structure(which).is_some());
        }
    }
}
