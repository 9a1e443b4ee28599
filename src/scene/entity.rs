use glam::{Mat4, Quat, Vec3};
use image::RgbaImage;

use super::image_source::ImageSource;
use super::mesh_gen::PlaneMesh;
use super::MaterialId;

/// Rigid placement of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub position: Vec3,
    /// Orientation applied before translation.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Model matrix (rotate, then translate).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Pixel source of a material's diffuse texture.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// Decoded asynchronously from a file or URL.
    Image(ImageSource),
    /// Generated in memory (labels).
    Generated(RgbaImage),
}

/// Upload progress of a material's texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    /// Not uploaded yet; nothing using this material is drawn.
    Pending,
    /// Decode requested from the background loader.
    Loading,
    /// Resident on the GPU.
    Ready,
    /// Decode failed; stays untextured.
    Failed,
}

/// Diffuse-textured material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Debug label.
    pub label: String,
    /// Diffuse texture pixels.
    pub texture: TextureSource,
    /// Discard texels below the alpha cutoff.
    pub has_alpha: bool,
    /// Skip faces pointing away from the camera.
    pub back_face_culling: bool,
    /// Specular tint (black disables highlights).
    pub specular: [f32; 3],
    /// Texture upload state.
    pub state: TextureState,
}

impl Material {
    /// Material with culling on and a white specular tint.
    #[must_use]
    pub fn new(label: impl Into<String>, texture: TextureSource) -> Self {
        Self {
            label: label.into(),
            texture,
            has_alpha: false,
            back_face_culling: true,
            specular: [1.0; 3],
            state: TextureState::Pending,
        }
    }
}

/// A textured plane placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Debug label.
    pub label: String,
    /// Plane geometry.
    pub mesh: PlaneMesh,
    /// Shared material.
    pub material: MaterialId,
    /// World placement.
    pub transform: Transform,
    /// Opacity multiplier; 0 hides the surface.
    pub visibility: f32,
}

/// A colored polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSet {
    /// Debug label.
    pub label: String,
    /// Points visited in order.
    pub points: Vec<Vec3>,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// World translation.
    pub position: Vec3,
    /// Opacity multiplier; 0 hides the line set.
    pub visibility: f32,
}

/// Light blending `ground` into `sky` by how much a normal faces
/// `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphericLight {
    /// Debug label.
    pub label: String,
    /// Unit vector toward the sky.
    pub direction: Vec3,
    /// Color on normals facing `direction`.
    pub sky: [f32; 3],
    /// Color on normals facing away from `direction`.
    pub ground: [f32; 3],
    /// Scale applied to both colors.
    pub intensity: f32,
}
