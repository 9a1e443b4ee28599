//! Textured plane renderer.
//!
//! Keeps one vertex/index buffer pair and one uniform per scene surface,
//! and one texture bind group per uploaded material. Surfaces whose
//! material has no texture yet, or whose visibility is zero, are skipped.

use std::collections::BTreeMap;

use image::RgbaImage;
use wgpu::util::DeviceExt;

use super::draw_context::DrawBindGroups;
use super::pipeline_util::{self, PipelineSpec};
use crate::error::FoldviewError;
use crate::gpu::pipeline_helpers::{
    filtering_sampler, linear_sampler, texture_2d, uniform_bind_group,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, SURFACE_SHADER};
use crate::gpu::texture::ImageTexture;
use crate::scene::mesh_gen::MeshVertex;
use crate::scene::{Material, MaterialId, Scene, Surface, SurfaceId};

/// Texels with alpha below this are discarded on alpha-tested materials.
pub const ALPHA_CUTOFF: f32 = 0.4;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
];

/// Per-surface uniform (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniform {
    /// Object-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Opacity multiplier.
    pub visibility: f32,
    pub(crate) _pad: [f32; 3],
}

impl From<&Surface> for SurfaceUniform {
    fn from(surface: &Surface) -> Self {
        Self {
            model: surface.transform.matrix().to_cols_array_2d(),
            visibility: surface.visibility,
            _pad: [0.0; 3],
        }
    }
}

/// Per-material uniform (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Specular tint.
    pub specular: [f32; 3],
    /// Alpha-test threshold.
    pub alpha_cutoff: f32,
    /// Nonzero when the texture's alpha channel is honored.
    pub has_alpha: u32,
    pub(crate) _pad: [u32; 3],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            specular: material.specular,
            alpha_cutoff: ALPHA_CUTOFF,
            has_alpha: u32::from(material.has_alpha),
            _pad: [0; 3],
        }
    }
}

struct GpuMaterial {
    _texture: ImageTexture,
    _uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    back_face_culling: bool,
}

struct GpuSurface {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws every textured surface of a [`Scene`].
pub struct SurfaceRenderer {
    culled: wgpu::RenderPipeline,
    double_sided: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    surface_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    materials: BTreeMap<MaterialId, GpuMaterial>,
    surfaces: BTreeMap<SurfaceId, GpuSurface>,
    synced_structure: Option<u64>,
}

impl SurfaceRenderer {
    /// Build both pipelines (back-face culled and double-sided).
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Shader`] if the surface shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        lighting_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, FoldviewError> {
        let device = &context.device;
        let material_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Layout"),
                entries: &[
                    texture_2d(0),
                    filtering_sampler(1),
                    uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
                ],
            });
        let surface_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Surface Layout"),
                entries: &[uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });

        let layouts = [
            camera_layout,
            lighting_layout,
            &material_layout,
            &surface_layout,
        ];
        let vertex_layout = || wgpu::VertexBufferLayout {
            array_stride: size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        };
        let mut pipeline = |label: &str, cull_mode| {
            pipeline_util::create_pipeline(
                context,
                composer,
                PipelineSpec {
                    label,
                    source: SURFACE_SHADER,
                    file_path: "raster/surface.wgsl",
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode,
                    bind_group_layouts: &layouts,
                    vertex_layout: vertex_layout(),
                },
            )
        };
        let culled = pipeline("Surface Pipeline", Some(wgpu::Face::Back))?;
        let double_sided = pipeline("Surface Pipeline (No Cull)", None)?;

        Ok(Self {
            culled,
            double_sided,
            material_layout,
            surface_layout,
            sampler: linear_sampler(device, "Surface Sampler"),
            materials: BTreeMap::new(),
            surfaces: BTreeMap::new(),
            synced_structure: None,
        })
    }

    /// Upload a decoded texture for `id`, replacing any previous one.
    pub fn upload_texture(
        &mut self,
        context: &RenderContext,
        id: MaterialId,
        material: &Material,
        image: &RgbaImage,
    ) {
        let texture = ImageTexture::upload(
            &context.device,
            &context.queue,
            &material.label,
            image,
        );
        let uniform = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Material Uniform"),
                contents: bytemuck::cast_slice(&[MaterialUniform::from(material)]),
                usage: wgpu::BufferUsages::UNIFORM,
            },
        );
        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&material.label),
                layout: &self.material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &texture.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniform.as_entire_binding(),
                    },
                ],
            });
        let _ = self.materials.insert(
            id,
            GpuMaterial {
                _texture: texture,
                _uniform: uniform,
                bind_group,
                back_face_culling: material.back_face_culling,
            },
        );
    }

    /// Whether `id` has a texture on the GPU.
    #[must_use]
    pub fn has_texture(&self, id: MaterialId) -> bool {
        self.materials.contains_key(&id)
    }

    /// Create or release GPU resources to match `scene`, then refresh every
    /// surface uniform.
    pub fn sync(&mut self, context: &RenderContext, scene: &Scene) {
        if self.synced_structure != Some(scene.structure_generation()) {
            self.surfaces.retain(|id, _| scene.surface(*id).is_some());
            self.materials.retain(|id, _| scene.material(*id).is_some());
            for (id, surface) in scene.surfaces() {
                if !self.surfaces.contains_key(&id) {
                    let gpu = self.create_surface(context, surface);
                    let _ = self.surfaces.insert(id, gpu);
                }
            }
            self.synced_structure = Some(scene.structure_generation());
        }

        for (id, gpu) in &self.surfaces {
            if let Some(surface) = scene.surface(*id) {
                context.queue.write_buffer(
                    &gpu.uniform_buffer,
                    0,
                    bytemuck::cast_slice(&[SurfaceUniform::from(surface)]),
                );
            }
        }
    }

    fn create_surface(
        &self,
        context: &RenderContext,
        surface: &Surface,
    ) -> GpuSurface {
        let device = &context.device;
        let vertices = surface.mesh.vertices();
        let indices = surface.mesh.indices();
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} vertices", surface.label)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} indices", surface.label)),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} uniform", surface.label)),
                contents: bytemuck::cast_slice(&[SurfaceUniform::from(surface)]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = uniform_bind_group(
            device,
            &surface.label,
            &self.surface_layout,
            &uniform_buffer,
        );
        GpuSurface {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Record draws for every visible, textured surface.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        bind_groups: &DrawBindGroups<'a>,
        scene: &Scene,
    ) {
        render_pass.set_bind_group(0, bind_groups.camera, &[]);
        render_pass.set_bind_group(1, bind_groups.lighting, &[]);
        for (id, surface) in scene.surfaces() {
            if surface.visibility <= 0.0 {
                continue;
            }
            let (Some(gpu), Some(material)) =
                (self.surfaces.get(&id), self.materials.get(&surface.material))
            else {
                continue;
            };
            let pipeline = if material.back_face_culling {
                &self.culled
            } else {
                &self.double_sided
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(2, &material.bind_group, &[]);
            render_pass.set_bind_group(3, &gpu.bind_group, &[]);
            render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                gpu.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }

    /// Number of surfaces with GPU buffers.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TextureSource;

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(size_of::<SurfaceUniform>(), 80);
        assert_eq!(size_of::<MaterialUniform>(), 32);
        assert_eq!(size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn material_uniform_flags() {
        let mut material =
            Material::new("m", TextureSource::Generated(RgbaImage::new(1, 1)));
        material.has_alpha = true;
        material.specular = [0.0; 3];
        let uniform = MaterialUniform::from(&material);
        assert_eq!(uniform.has_alpha, 1);
        assert_eq!(uniform.alpha_cutoff, ALPHA_CUTOFF);
        assert_eq!(uniform.specular, [0.0; 3]);
    }
}
