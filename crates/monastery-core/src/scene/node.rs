//! Scene graph node types

use bevy_color::Color;
use bevy_math::{Quat, Vec3};

/// Primitive geometry, in the conventions of the rendering backend:
/// boxes, cylinders, cones and spheres are centered and Y-aligned; circles
/// and planes lie in the XY plane facing +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    /// Tapered cylinder; equal radii give a plain cylinder
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    /// Cone with `sides` facets (4 gives a pyramid)
    Cone { radius: f32, height: f32, sides: u32 },
    Sphere { radius: f32, sectors: u32, stacks: u32 },
    Circle { radius: f32, segments: u32 },
    Plane { width: f32, height: f32 },
}

/// How a surface responds to light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Diffuse-only, lit surface
    #[default]
    Lambert,
    /// Flat color, ignores lights
    Unlit,
}

/// Which faces are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    /// Inside faces only, for shells viewed from within
    Back,
}

/// Surface appearance of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    /// 1.0 is opaque
    pub opacity: f32,
    pub shading: Shading,
    pub side: Side,
}

impl Material {
    pub fn lambert(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            shading: Shading::Lambert,
            side: Side::Front,
        }
    }

    pub fn unlit(color: Color) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::lambert(color)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Build an sRGB color from a `0xRRGGBB` literal
pub fn hex(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// The major building blocks of the monastery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    MainBuilding,
    Chapel,
    Cloister,
    Tower,
    Garden,
}

impl Structure {
    pub const ALL: [Structure; 5] = [
        Structure::MainBuilding,
        Structure::Chapel,
        Structure::Cloister,
        Structure::Tower,
        Structure::Garden,
    ];
}

/// What a node represents, used to query the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// The rotating root group
    Monastery,
    Structure(Structure),
    /// Main body of a building
    Volume,
    Window,
    Roof,
    Wall,
    Column,
    Lawn,
    Tree,
    Trunk,
    Foliage,
    Ground,
    /// Sky group holding the dome and clouds
    Sky,
    Dome,
    Cloud,
}

/// Local transform relative to the parent node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A renderable primitive
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub shape: Shape,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Mesh(MeshNode),
    Group(Vec<SceneNode>),
}

/// A transformable unit of the scene graph. Children are owned exclusively
/// by their parent group.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub part: Part,
    pub transform: NodeTransform,
    pub content: NodeContent,
}

impl SceneNode {
    pub fn mesh(part: Part, shape: Shape, material: Material) -> Self {
        Self {
            part,
            transform: NodeTransform::default(),
            content: NodeContent::Mesh(MeshNode {
                shape,
                material,
                cast_shadow: false,
                receive_shadow: false,
            }),
        }
    }

    pub fn group(part: Part, children: Vec<SceneNode>) -> Self {
        Self {
            part,
            transform: NodeTransform::default(),
            content: NodeContent::Group(children),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.translation = Vec3::new(x, y, z);
        self
    }

    pub fn rotated_x(mut self, angle: f32) -> Self {
        self.transform.rotation = Quat::from_rotation_x(angle) * self.transform.rotation;
        self
    }

    pub fn rotated_y(mut self, angle: f32) -> Self {
        self.transform.rotation = Quat::from_rotation_y(angle) * self.transform.rotation;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    /// Set shadow flags; no effect on groups
    pub fn shadows(mut self, cast: bool, receive: bool) -> Self {
        if let NodeContent::Mesh(mesh) = &mut self.content {
            mesh.cast_shadow = cast;
            mesh.receive_shadow = receive;
        }
        self
    }

    pub fn children(&self) -> &[SceneNode] {
        match &self.content {
            NodeContent::Group(children) => children,
            NodeContent::Mesh(_) => &[],
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.content {
            NodeContent::Mesh(mesh) => Some(mesh),
            NodeContent::Group(_) => None,
        }
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Number of nodes tagged `part` in this subtree, including `self`
    pub fn count(&self, part: Part) -> usize {
        usize::from(self.part == part)
            + self
                .children()
                .iter()
                .map(|child| child.count(part))
                .sum::<usize>()
    }

    /// First node tagged `part` in depth-first order
    pub fn find(&self, part: Part) -> Option<&SceneNode> {
        if self.part == part {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(part))
    }
}
