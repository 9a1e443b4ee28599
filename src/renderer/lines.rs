//! Colored line-strip renderer (axis gizmo).

use std::collections::BTreeMap;

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::draw_context::DrawBindGroups;
use super::pipeline_util::{self, PipelineSpec};
use crate::error::FoldviewError;
use crate::gpu::pipeline_helpers::{uniform_bind_group, uniform_buffer};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, LINES_SHADER};
use crate::scene::mesh_gen::{line_strip, LineVertex};
use crate::scene::{LineSet, LineSetId, Scene};

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];

/// Per-line-set uniform (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineUniform {
    /// Object-to-world matrix (translation only).
    pub model: [[f32; 4]; 4],
    /// Line color.
    pub color: [f32; 3],
    /// Opacity multiplier.
    pub visibility: f32,
}

impl From<&LineSet> for LineUniform {
    fn from(lines: &LineSet) -> Self {
        Self {
            model: Mat4::from_translation(lines.position).to_cols_array_2d(),
            color: lines.color,
            visibility: lines.visibility,
        }
    }
}

struct GpuLines {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws every line set of a [`Scene`].
pub struct LineRenderer {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    lines: BTreeMap<LineSetId, GpuLines>,
    synced_structure: Option<u64>,
}

impl LineRenderer {
    /// Build the line-strip pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Shader`] if the line shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, FoldviewError> {
        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Line Layout"),
                entries: &[uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            },
        );
        let pipeline = pipeline_util::create_pipeline(
            context,
            composer,
            PipelineSpec {
                label: "Line Pipeline",
                source: LINES_SHADER,
                file_path: "raster/lines.wgsl",
                topology: wgpu::PrimitiveTopology::LineStrip,
                cull_mode: None,
                bind_group_layouts: &[camera_layout, &layout],
                vertex_layout: wgpu::VertexBufferLayout {
                    array_stride: size_of::<LineVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                },
            },
        )?;
        Ok(Self {
            pipeline,
            layout,
            lines: BTreeMap::new(),
            synced_structure: None,
        })
    }

    /// Create or release GPU resources to match `scene`, then refresh every
    /// line uniform.
    pub fn sync(&mut self, context: &RenderContext, scene: &Scene) {
        if self.synced_structure != Some(scene.structure_generation()) {
            self.lines.retain(|id, _| scene.line_set(*id).is_some());
            for (id, lines) in scene.line_sets() {
                if !self.lines.contains_key(&id) {
                    let gpu = self.create_lines(context, lines);
                    let _ = self.lines.insert(id, gpu);
                }
            }
            self.synced_structure = Some(scene.structure_generation());
        }

        for (id, gpu) in &self.lines {
            if let Some(lines) = scene.line_set(*id) {
                context.queue.write_buffer(
                    &gpu.uniform_buffer,
                    0,
                    bytemuck::cast_slice(&[LineUniform::from(lines)]),
                );
            }
        }
    }

    fn create_lines(&self, context: &RenderContext, lines: &LineSet) -> GpuLines {
        let device = &context.device;
        let vertices = line_strip(&lines.points);
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&lines.label),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} uniform", lines.label)),
                contents: bytemuck::cast_slice(&[LineUniform::from(lines)]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = uniform_bind_group(
            device,
            &lines.label,
            &self.layout,
            &uniform_buffer,
        );
        GpuLines {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Record draws for every visible line set.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        bind_groups: &DrawBindGroups<'a>,
        scene: &Scene,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_groups.camera, &[]);
        for (id, lines) in scene.line_sets() {
            if lines.visibility <= 0.0 {
                continue;
            }
            let Some(gpu) = self.lines.get(&id) else {
                continue;
            };
            if gpu.vertex_count < 2 {
                continue;
            }
            render_pass.set_bind_group(1, &gpu.bind_group, &[]);
            render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            render_pass.draw(0..gpu.vertex_count, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn uniform_carries_translation_and_color() {
        assert_eq!(size_of::<LineUniform>(), 80);
        let lines = LineSet {
            label: "axisX".into(),
            points: vec![Vec3::ZERO, Vec3::X],
            color: [1.0, 0.0, 0.0],
            position: Vec3::new(1.0, 2.0, 3.0),
            visibility: 0.5,
        };
        let uniform = LineUniform::from(&lines);
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.color, [1.0, 0.0, 0.0]);
        assert_eq!(uniform.visibility, 0.5);
    }
}
