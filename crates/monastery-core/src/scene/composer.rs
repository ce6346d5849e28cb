//! Deterministic assembly of the monastery geometry
//!
//! All dimensions below are design constants in scene units (roughly
//! meters). The only randomness is cloud placement, drawn from an injected
//! RNG so topology stays testable.

use bevy_color::{Color, Hsla};
use bevy_math::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use super::node::{hex, Material, Part, SceneNode, Shape, Side, Structure};
use super::{MonasteryGraph, SceneGraph};
use crate::lighting::LightingRig;

const STONE: u32 = 0x8B7355;
const SLATE: u32 = 0x696969;
const ROOF_RED: u32 = 0x8B0000;
const GLASS_BLUE: u32 = 0x000080;
const LEAF_GREEN: u32 = 0x228B22;
const BARK: u32 = 0x8B4513;
const MEADOW: u32 = 0x90EE90;
pub const SKY_BLUE: u32 = 0x87CEEB;

const MAIN_WINDOWS: usize = 4;
const CHAPEL_WINDOWS: usize = 3;
const CLOISTER_SIDES: usize = 4;
const COLUMNS_PER_SIDE: usize = 4;
const TOWER_WINDOWS: usize = 3;
const TREES: usize = 8;
pub const DEFAULT_CLOUDS: usize = 20;

/// Builds the static monastery scene
#[derive(Debug, Clone)]
pub struct SceneComposer {
    cloud_count: usize,
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self::new(DEFAULT_CLOUDS)
    }
}

impl SceneComposer {
    pub fn new(cloud_count: usize) -> Self {
        Self { cloud_count }
    }

    pub fn cloud_count(&self) -> usize {
        self.cloud_count
    }

    /// Assemble the full top-level scene: rotating monastery, ground, sky,
    /// and lights
    pub fn compose<R: Rng + ?Sized>(&self, rng: &mut R) -> SceneGraph {
        SceneGraph {
            monastery: self.build(),
            ground: self.build_ground(),
            sky: self.build_sky(rng),
            lighting: LightingRig::default(),
            background: hex(SKY_BLUE),
        }
    }

    /// Build the monastery root group. Deterministic.
    pub fn build(&self) -> MonasteryGraph {
        let root = SceneNode::group(
            Part::Monastery,
            vec![
                main_building(),
                chapel(),
                cloister(),
                tower(),
                garden(),
            ],
        );
        MonasteryGraph::new(root)
    }

    /// One large flat plane under the whole scene
    pub fn build_ground(&self) -> SceneNode {
        SceneNode::mesh(
            Part::Ground,
            Shape::Plane { width: 50.0, height: 50.0 },
            Material::lambert(hex(MEADOW)).with_opacity(0.8),
        )
        .rotated_x(-FRAC_PI_2)
        .at(0.0, -0.1, 0.0)
        .shadows(false, true)
    }

    /// Inverted sky dome plus randomly placed cloud puffs
    pub fn build_sky<R: Rng + ?Sized>(&self, rng: &mut R) -> SceneNode {
        let mut children = Vec::with_capacity(self.cloud_count + 1);
        children.push(SceneNode::mesh(
            Part::Dome,
            Shape::Sphere { radius: 100.0, sectors: 32, stacks: 32 },
            Material::unlit(hex(SKY_BLUE)).with_side(Side::Back),
        ));

        let cloud_material = Material::unlit(Color::WHITE).with_opacity(0.6);
        for _ in 0..self.cloud_count {
            let x = (rng.random::<f32>() - 0.5) * 200.0;
            let y = rng.random::<f32>() * 20.0 + 10.0;
            let z = (rng.random::<f32>() - 0.5) * 200.0;
            let scale = Vec3::new(
                rng.random::<f32>() * 2.0 + 1.0,
                rng.random::<f32>() * 0.5 + 0.5,
                rng.random::<f32>() * 2.0 + 1.0,
            );
            children.push(
                SceneNode::mesh(
                    Part::Cloud,
                    Shape::Sphere { radius: 2.0, sectors: 8, stacks: 6 },
                    cloud_material,
                )
                .at(x, y, z)
                .scaled(scale),
            );
        }

        SceneNode::group(Part::Sky, children)
    }
}

/// Angle of the `i`th of `n` evenly spaced directions
fn spaced(i: usize, n: usize) -> f32 {
    i as f32 * TAU / n as f32
}

fn main_building() -> SceneNode {
    let mut parts = vec![SceneNode::mesh(
        Part::Volume,
        Shape::Box { width: 8.0, height: 6.0, depth: 8.0 },
        Material::lambert(hex(STONE)).with_opacity(0.9),
    )
    .at(0.0, 3.0, 0.0)
    .shadows(true, true)];

    let glass = Material::lambert(hex(GLASS_BLUE)).with_opacity(0.7);
    for i in 0..MAIN_WINDOWS {
        let angle = spaced(i, MAIN_WINDOWS);
        parts.push(
            SceneNode::mesh(
                Part::Window,
                Shape::Box { width: 1.0, height: 2.0, depth: 0.1 },
                glass,
            )
            .at(angle.cos() * 4.1, 3.0, angle.sin() * 4.1)
            .rotated_y(angle),
        );
    }

    parts.push(
        SceneNode::mesh(
            Part::Roof,
            Shape::Cone { radius: 6.0, height: 2.0, sides: 4 },
            Material::lambert(hex(ROOF_RED)),
        )
        .at(0.0, 7.0, 0.0)
        .rotated_y(FRAC_PI_4)
        .shadows(true, false),
    );

    SceneNode::group(Part::Structure(Structure::MainBuilding), parts)
}

/// Stained-glass hue for chapel window `index`, evenly spaced around the
/// color wheel
pub fn chapel_window_color(index: usize) -> Color {
    let hue = 360.0 * index as f32 / CHAPEL_WINDOWS as f32;
    Color::Hsla(Hsla::new(hue, 0.8, 0.5, 1.0))
}

fn chapel() -> SceneNode {
    let mut parts = vec![
        SceneNode::mesh(
            Part::Volume,
            Shape::Box { width: 4.0, height: 8.0, depth: 6.0 },
            Material::lambert(hex(SLATE)),
        )
        .at(8.0, 4.0, 0.0)
        .shadows(true, true),
        SceneNode::mesh(
            Part::Roof,
            Shape::Cone { radius: 3.0, height: 1.5, sides: 4 },
            Material::lambert(hex(ROOF_RED)),
        )
        .at(8.0, 9.0, 0.0)
        .rotated_y(FRAC_PI_4)
        .shadows(true, false),
    ];

    for i in 0..CHAPEL_WINDOWS {
        parts.push(
            SceneNode::mesh(
                Part::Window,
                Shape::Box { width: 0.8, height: 3.0, depth: 0.1 },
                Material::lambert(chapel_window_color(i)).with_opacity(0.6),
            )
            .at(8.0, 4.0, -2.5 + i as f32 * 2.5),
        );
    }

    SceneNode::group(Part::Structure(Structure::Chapel), parts)
}

/// Local position of a cloister column from its `(side, slot)` pair:
/// pushed out along the side's normal, then spread along the side
pub fn column_position(side: usize, slot: usize) -> Vec3 {
    let angle = side as f32 * FRAC_PI_2;
    let along = angle + FRAC_PI_2;
    let offset = (slot as f32 - 1.5) * 1.5;
    Vec3::new(
        angle.cos() * 2.5 + along.cos() * offset,
        2.0,
        angle.sin() * 2.5 + along.sin() * offset,
    )
}

fn cloister() -> SceneNode {
    let mut parts = Vec::with_capacity(CLOISTER_SIDES * (COLUMNS_PER_SIDE + 1));

    let wall_material = Material::lambert(hex(STONE));
    for i in 0..CLOISTER_SIDES {
        let angle = spaced(i, CLOISTER_SIDES);
        parts.push(
            SceneNode::mesh(
                Part::Wall,
                Shape::Box { width: 6.0, height: 4.0, depth: 1.0 },
                wall_material,
            )
            .at(angle.cos() * 3.0, 2.0, angle.sin() * 3.0)
            .rotated_y(angle)
            .shadows(true, true),
        );
    }

    let column_material = Material::lambert(hex(SLATE));
    for i in 0..CLOISTER_SIDES * COLUMNS_PER_SIDE {
        let position = column_position(i / COLUMNS_PER_SIDE, i % COLUMNS_PER_SIDE);
        parts.push(
            SceneNode::mesh(
                Part::Column,
                Shape::Cylinder { radius_top: 0.2, radius_bottom: 0.2, height: 4.0 },
                column_material,
            )
            .at(position.x, position.y, position.z)
            .shadows(true, false),
        );
    }

    SceneNode::group(Part::Structure(Structure::Cloister), parts).at(-2.0, 0.0, -2.0)
}

fn tower() -> SceneNode {
    let mut parts = vec![
        SceneNode::mesh(
            Part::Volume,
            Shape::Cylinder { radius_top: 1.5, radius_bottom: 2.0, height: 12.0 },
            Material::lambert(hex(SLATE)),
        )
        .at(-8.0, 6.0, 0.0)
        .shadows(true, true),
        SceneNode::mesh(
            Part::Roof,
            Shape::Cone { radius: 2.0, height: 3.0, sides: 8 },
            Material::lambert(hex(ROOF_RED)),
        )
        .at(-8.0, 13.5, 0.0)
        .shadows(true, false),
    ];

    let glass = Material::lambert(hex(GLASS_BLUE)).with_opacity(0.7);
    for i in 0..TOWER_WINDOWS {
        parts.push(
            SceneNode::mesh(
                Part::Window,
                Shape::Box { width: 0.5, height: 1.0, depth: 0.1 },
                glass,
            )
            .at(-8.0, 6.0 + i as f32 * 3.0, 1.6),
        );
    }

    SceneNode::group(Part::Structure(Structure::Tower), parts)
}

fn garden() -> SceneNode {
    let mut parts = vec![SceneNode::mesh(
        Part::Lawn,
        Shape::Circle { radius: 8.0, segments: 32 },
        Material::lambert(hex(LEAF_GREEN)).with_opacity(0.8),
    )
    .rotated_x(-FRAC_PI_2)
    .at(0.0, 0.01, 0.0)
    .shadows(false, true)];

    for i in 0..TREES {
        let angle = spaced(i, TREES);
        parts.push(tree().at(angle.cos() * 6.0, 0.0, angle.sin() * 6.0));
    }

    SceneNode::group(Part::Structure(Structure::Garden), parts)
}

fn tree() -> SceneNode {
    SceneNode::group(
        Part::Tree,
        vec![
            SceneNode::mesh(
                Part::Trunk,
                Shape::Cylinder { radius_top: 0.3, radius_bottom: 0.4, height: 3.0 },
                Material::lambert(hex(BARK)),
            )
            .at(0.0, 1.5, 0.0)
            .shadows(true, false),
            SceneNode::mesh(
                Part::Foliage,
                Shape::Sphere { radius: 2.0, sectors: 8, stacks: 6 },
                Material::lambert(hex(LEAF_GREEN)),
            )
            .at(0.0, 4.0, 0.0)
            .shadows(true, false),
        ],
    )
}
