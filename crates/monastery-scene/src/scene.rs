//! Scene setup - monastery geometry, surroundings, and lights

use bevy::color::Alpha;
use bevy::ecs::system::SystemParam;
use bevy::light::{
    CascadeShadowConfigBuilder, DirectionalLightShadowMap, NotShadowCaster, NotShadowReceiver,
};
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use monastery_core::scene::{Material as NodeMaterial, NodeContent, Shading, Shape, Side};
use monastery_core::{Part, SceneNode};
use tracing::info;

use crate::Viewer;

/// Illuminance in lux for a sun intensity of 1.0
const SUN_LUX: f32 = 10_000.0;
/// Luminous power in lumens for a lantern intensity of 1.0
const LANTERN_LUMENS: f32 = 1_000_000.0;
/// Cylinder and frustum facet count
const ROUND_SEGMENTS: u32 = 32;

/// Marker for the rotating monastery root
#[derive(Component)]
pub struct MonasteryRoot;

/// Which part of the scene graph an entity was spawned from
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartTag(pub Part);

/// Whether the scene graph has been turned into entities yet
#[derive(Resource, Debug, Default)]
pub struct SceneStatus {
    pub spawned: bool,
    pub entities: usize,
}

/// Plugin for scene setup
pub struct SceneSpawnPlugin;

impl Plugin for SceneSpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneStatus>()
            .add_systems(Startup, (spawn_scene, spawn_lights));
    }
}

#[derive(SystemParam)]
struct SceneAssets<'w> {
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
}

fn spawn_scene(
    mut commands: Commands,
    mut assets: SceneAssets,
    viewer: Res<Viewer>,
    mut status: ResMut<SceneStatus>,
) {
    let scene = viewer.scene();
    commands.insert_resource(ClearColor(scene.background));

    let mut count = 0;
    let root = spawn_node(&mut commands, &mut assets, scene.monastery.root(), None, &mut count);
    commands.entity(root).insert(MonasteryRoot);
    spawn_node(&mut commands, &mut assets, &scene.ground, None, &mut count);
    spawn_node(&mut commands, &mut assets, &scene.sky, None, &mut count);

    status.spawned = true;
    status.entities = count;
    info!(entities = count, "Monastery scene spawned");
}

/// Spawn `node` and its subtree, returning the entity for `node`
fn spawn_node(
    commands: &mut Commands,
    assets: &mut SceneAssets,
    node: &SceneNode,
    parent: Option<Entity>,
    count: &mut usize,
) -> Entity {
    let t = node.transform;
    let mut entity = commands.spawn((
        Name::new(format!("{:?}", node.part)),
        PartTag(node.part),
        Transform {
            translation: t.translation,
            rotation: t.rotation,
            scale: t.scale,
        },
        Visibility::default(),
    ));
    if let Some(parent) = parent {
        entity.insert(ChildOf(parent));
    }
    let id = entity.id();
    *count += 1;

    match &node.content {
        NodeContent::Mesh(mesh) => {
            entity.insert((
                Mesh3d(assets.meshes.add(shape_mesh(mesh.shape))),
                MeshMaterial3d(assets.materials.add(standard_material(&mesh.material))),
            ));
            if !mesh.cast_shadow {
                entity.insert(NotShadowCaster);
            }
            if !mesh.receive_shadow {
                entity.insert(NotShadowReceiver);
            }
        }
        NodeContent::Group(children) => {
            for child in children {
                spawn_node(commands, assets, child, Some(id), count);
            }
        }
    }
    id
}

/// Build the Bevy mesh for a primitive
pub fn shape_mesh(shape: Shape) -> Mesh {
    match shape {
        Shape::Box { width, height, depth } => Cuboid::new(width, height, depth).into(),
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } if radius_top == radius_bottom => Cylinder::new(radius_top, height)
            .mesh()
            .resolution(ROUND_SEGMENTS)
            .into(),
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => ConicalFrustum {
            radius_top,
            radius_bottom,
            height,
        }
        .mesh()
        .resolution(ROUND_SEGMENTS)
        .into(),
        Shape::Cone { radius, height, sides } => {
            Cone::new(radius, height).mesh().resolution(sides).into()
        }
        Shape::Sphere { radius, sectors, stacks } => Sphere::new(radius).mesh().uv(sectors, stacks),
        Shape::Circle { radius, segments } => Circle::new(radius).mesh().resolution(segments).into(),
        Shape::Plane { width, height } => Rectangle::new(width, height).into(),
    }
}

/// Rough, non-metallic surface matching the node's color and opacity
pub fn standard_material(material: &NodeMaterial) -> StandardMaterial {
    StandardMaterial {
        base_color: material.color.with_alpha(material.opacity),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        reflectance: 0.0,
        unlit: material.shading == Shading::Unlit,
        alpha_mode: if material.is_transparent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        cull_mode: match material.side {
            Side::Front => Some(Face::Back),
            Side::Back => Some(Face::Front),
        },
        ..default()
    }
}

fn spawn_lights(mut commands: Commands, viewer: Res<Viewer>) {
    let lighting = viewer.scene().lighting;

    let sun = lighting.sun();
    commands.insert_resource(DirectionalLightShadowMap {
        size: sun.shadow.map_size as usize,
    });
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            color: sun.color,
            illuminance: sun.intensity * SUN_LUX,
            shadows_enabled: sun.cast_shadow,
            ..default()
        },
        CascadeShadowConfigBuilder {
            num_cascades: 1,
            minimum_distance: sun.shadow.near,
            maximum_distance: sun.shadow.far,
            ..default()
        }
        .build(),
        Transform::from_translation(sun.position).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let lantern = lighting.lantern();
    commands.spawn((
        Name::new("Lantern"),
        PointLight {
            color: lantern.color,
            intensity: lantern.intensity * LANTERN_LUMENS,
            range: lantern.range,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(lantern.position),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use monastery_core::Structure;

    fn count_parts(app: &mut App, part: Part) -> usize {
        let world = app.world_mut();
        world
            .query::<&PartTag>()
            .iter(world)
            .filter(|tag| tag.0 == part)
            .count()
    }

    #[test]
    fn test_spawns_every_node() {
        let mut app = test_support::app();
        app.update();

        let expected = app.world().resource::<Viewer>().scene().node_count();
        let status = app.world().resource::<SceneStatus>();
        assert!(status.spawned);
        assert_eq!(status.entities, expected);

        assert_eq!(count_parts(&mut app, Part::Window), 10);
        assert_eq!(count_parts(&mut app, Part::Column), 16);
        assert_eq!(count_parts(&mut app, Part::Tree), 8);
        assert_eq!(count_parts(&mut app, Part::Cloud), 20);
        for which in Structure::ALL {
            assert_eq!(count_parts(&mut app, Part::Structure(which)), 1);
        }
    }

    #[test]
    fn test_surroundings_are_not_under_the_root() {
        let mut app = test_support::app();
        app.update();

        let world = app.world_mut();
        let root = world
            .query_filtered::<Entity, With<MonasteryRoot>>()
            .single(world)
            .expect("one monastery root");

        let mut query = world.query::<(&PartTag, Option<&ChildOf>)>();
        for (tag, parent) in query.iter(world) {
            match tag.0 {
                Part::Ground | Part::Sky | Part::Monastery => assert!(parent.is_none()),
                Part::Structure(_) => assert_eq!(parent.map(ChildOf::parent), Some(root)),
                _ => assert!(parent.is_some()),
            }
        }
    }

    #[test]
    fn test_lights_and_clear_color() {
        let mut app = test_support::app();
        app.update();

        let world = app.world_mut();
        assert_eq!(world.query::<&DirectionalLight>().iter(world).count(), 1);
        assert_eq!(world.query::<&PointLight>().iter(world).count(), 1);
        assert_eq!(world.resource::<DirectionalLightShadowMap>().size, 2048);
        assert_eq!(
            world.resource::<ClearColor>().0,
            monastery_core::scene::hex(monastery_core::scene::SKY_BLUE)
        );
    }

    #[test]
    fn test_material_translation() {
        let glass = NodeMaterial::lambert(Color::WHITE).with_opacity(0.7);
        let material = standard_material(&glass);
        assert_eq!(material.alpha_mode, AlphaMode::Blend);
        assert!(!material.unlit);
        assert!((material.base_color.alpha() - 0.7).abs() < 1e-6);

        let dome = NodeMaterial::unlit(Color::WHITE).with_side(Side::Back);
        let material = standard_material(&dome);
        assert!(material.unlit);
        assert_eq!(material.cull_mode, Some(Face::Front));
        assert_eq!(material.alpha_mode, AlphaMode::Opaque);
    }
}
