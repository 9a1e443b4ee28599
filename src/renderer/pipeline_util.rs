//! Pipeline construction shared by the surface and line renderers.

use crate::error::FoldviewError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DEPTH_FORMAT;

/// Single color target with alpha blending (visibility fades).
#[must_use]
pub fn color_targets(
    format: wgpu::TextureFormat,
) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: crate::gpu::pipeline_helpers::alpha_blend(),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

/// Standard depth-stencil state used by all render pipelines.
#[must_use]
pub fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Everything that varies between the crate's raster pipelines.
pub(crate) struct PipelineSpec<'a> {
    pub label: &'a str,
    pub source: &'a str,
    pub file_path: &'a str,
    pub topology: wgpu::PrimitiveTopology,
    pub cull_mode: Option<wgpu::Face>,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
}

/// Compose the shader and build a `vs_main`/`fs_main` render pipeline
/// targeting the surface format with depth testing.
pub(crate) fn create_pipeline(
    context: &RenderContext,
    composer: &mut ShaderComposer,
    spec: PipelineSpec<'_>,
) -> Result<wgpu::RenderPipeline, FoldviewError> {
    let shader = composer.compose(
        &context.device,
        spec.label,
        spec.source,
        spec.file_path,
    )?;

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", spec.label)),
            bind_group_layouts: spec.bind_group_layouts,
            push_constant_ranges: &[],
        },
    );

    Ok(context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(spec.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[spec.vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &color_targets(context.format()),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: spec.topology,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: spec.cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        }))
}
