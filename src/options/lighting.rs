use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Hemispheric light colors shared by the up- and down-facing lights.
pub struct LightingOptions {
    /// Color contributed to normals facing the light direction.
    pub sky_color: [f32; 3],
    /// Color contributed to normals facing away from it.
    pub ground_color: [f32; 3],
    /// Intensity of each light.
    pub intensity: f32,
    /// Specular exponent of textured surfaces.
    pub specular_power: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            sky_color: [1.0, 1.0, 1.0],
            ground_color: [0.0, 0.0, 0.0],
            intensity: 1.0,
            specular_power: 64.0,
        }
    }
}
