//! GPU lighting uniform for the two hemispheric lights.

use bytemuck::Zeroable as _;
use wgpu::util::DeviceExt;

use super::pipeline_helpers::uniform_buffer;
use super::render_context::RenderContext;
use crate::scene::HemisphericLight;

/// One hemispheric light as laid out in WGSL (48 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HemiLightUniform {
    /// Unit vector toward the sky.
    pub direction: [f32; 3],
    /// Scale applied to both colors.
    pub intensity: f32,
    /// Sky color.
    pub sky: [f32; 3],
    pub(crate) _pad0: f32,
    /// Ground color.
    pub ground: [f32; 3],
    pub(crate) _pad1: f32,
}

impl From<&HemisphericLight> for HemiLightUniform {
    fn from(light: &HemisphericLight) -> Self {
        Self {
            direction: light.direction.normalize_or(glam::Vec3::Y).to_array(),
            intensity: light.intensity,
            sky: light.sky,
            _pad0: 0.0,
            ground: light.ground,
            _pad1: 0.0,
        }
    }
}

/// Lighting shared by every surface.
/// NOTE: Must match the WGSL `LightingUniform` layout exactly (112 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// The up- and down-facing lights.
    pub lights: [HemiLightUniform; 2],
    /// Specular exponent.
    pub specular_power: f32,
    pub(crate) _pad: [f32; 3],
}

impl LightingUniform {
    /// Pack up to two lights; missing slots stay dark.
    #[must_use]
    pub fn from_lights(lights: &[HemisphericLight], specular_power: f32) -> Self {
        let mut packed = [HemiLightUniform::zeroed(); 2];
        for (slot, light) in packed.iter_mut().zip(lights) {
            *slot = light.into();
        }
        Self {
            lights: packed,
            specular_power,
            _pad: [0.0; 3],
        }
    }
}

/// Lighting uniform buffer and its bind group (group 1 of the surface
/// pipeline).
pub struct Lighting {
    /// CPU copy of the uniform.
    pub uniform: LightingUniform,
    /// Uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Upload `uniform` into a new buffer.
    #[must_use]
    pub fn new(context: &RenderContext, uniform: LightingUniform) -> Self {
        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Layout"),
                entries: &[uniform_buffer(0, wgpu::ShaderStages::FRAGMENT)],
            },
        );
        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Lighting Bind Group"),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn layout_matches_wgsl() {
        assert_eq!(size_of::<HemiLightUniform>(), 48);
        assert_eq!(size_of::<LightingUniform>(), 112);
    }

    #[test]
    fn packs_lights_in_order() {
        let light = |y: f32| HemisphericLight {
            label: String::new(),
            direction: Vec3::new(0.0, y * 2.0, 0.0),
            sky: [1.0; 3],
            ground: [0.0; 3],
            intensity: 1.0,
        };
        let uniform = LightingUniform::from_lights(&[light(1.0), light(-1.0)], 64.0);
        assert_eq!(uniform.lights[0].direction, [0.0, 1.0, 0.0]);
        assert_eq!(uniform.lights[1].direction, [0.0, -1.0, 0.0]);
        assert_eq!(uniform.specular_power, 64.0);

        let single = LightingUniform::from_lights(&[light(1.0)], 1.0);
        assert_eq!(single.lights[1].intensity, 0.0);
    }
}
