//! Fixed light sources for the monastery scene

use bevy_color::Color;
use bevy_math::Vec3;

use crate::scene::hex;

/// Low-intensity fill applied to every surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientFill {
    pub color: Color,
    pub intensity: f32,
}

/// Orthographic volume the sun renders its shadow map through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowFrustum {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub map_size: u32,
}

impl ShadowFrustum {
    /// Whether a point on the ground plane (x, z) falls inside the
    /// frustum's cross-section
    pub fn covers(&self, x: f32, z: f32) -> bool {
        (self.left..=self.right).contains(&x) && (self.bottom..=self.top).contains(&z)
    }
}

/// Directional "sun" light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sun {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowFrustum,
}

/// Warm point light over the courtyard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lantern {
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
}

/// A light in the rig
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient(AmbientFill),
    Directional(Sun),
    Point(Lantern),
}

/// Exactly three lights, fixed at construction and unaffected by rotation
/// or view changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingRig {
    ambient: AmbientFill,
    sun: Sun,
    lantern: Lantern,
}

impl Default for LightingRig {
    fn default() -> Self {
        Self {
            ambient: AmbientFill {
                color: hex(0x404040),
                intensity: 0.6,
            },
            sun: Sun {
                color: Color::WHITE,
                intensity: 0.8,
                position: Vec3::new(10.0, 10.0, 5.0),
                cast_shadow: true,
                shadow: ShadowFrustum {
                    left: -25.0,
                    right: 25.0,
                    top: 25.0,
                    bottom: -25.0,
                    near: 0.5,
                    far: 50.0,
                    map_size: 2048,
                },
            },
            lantern: Lantern {
                color: hex(0xFFA500),
                intensity: 0.5,
                range: 30.0,
                position: Vec3::new(0.0, 8.0, 0.0),
            },
        }
    }
}

impl LightingRig {
    pub fn ambient(&self) -> &AmbientFill {
        &self.ambient
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn lantern(&self) -> &Lantern {
        &self.lantern
    }

    pub fn lights(&self) -> [Light; 3] {
        [
            Light::Ambient(self.ambient),
            Light::Directional(self.sun),
            Light::Point(self.lantern),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_lights_one_shadow_caster() {
        let rig = LightingRig::default();
        let lights = rig.lights();
        assert_eq!(lights.len(), 3);
        let casters = lights
            .iter()
            .filter(|l| matches!(l, Light::Directional(sun) if sun.cast_shadow))
            .count();
        assert_eq!(casters, 1);
        assert!(rig.ambient().intensity < rig.sun().intensity);
    }

    #[test]
    fn test_shadow_frustum_covers_footprint() {
        let shadow = LightingRig::default().sun().shadow;
        // Outermost structures: chapel at x = 10, tower at x = -10, garden radius 8
        for (x, z) in [(10.0, 3.0), (-10.0, 0.0), (0.0, 8.0), (0.0, -8.0), (-5.5, -5.5)] {
            assert!(shadow.covers(x, z), "({x}, {z}) not covered");
        }
    }

    #[test]
    fn test_lantern_sits_over_courtyard() {
        let lantern = *LightingRig::default().lantern();
        assert_eq!(lantern.position.x, 0.0);
        assert_eq!(lantern.position.z, 0.0);
        assert!(lantern.range > lantern.position.y);
    }
}
