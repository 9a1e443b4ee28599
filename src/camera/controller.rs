use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::{ArcRotate, Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;
use crate::options::CameraOptions;

/// Radians of orbit per pixel of drag at `rotate_speed = 1`.
const RADIANS_PER_PIXEL: f32 = 0.01;
/// Fraction of the orbit radius panned per pixel at `pan_speed = 1`.
const PAN_PER_PIXEL: f32 = 0.004;

/// Arc-rotate camera plus its GPU uniform buffer and bind group.
pub struct CameraController {
    rig: ArcRotate,
    /// Framing restored by [`recenter`](Self::recenter).
    home: ArcRotate,

    /// Current camera derived from the rig.
    pub camera: Camera,
    /// CPU copy of the uniform.
    pub uniform: CameraUniform,
    /// Uniform buffer (group 0, binding 0 in every pipeline).
    pub buffer: wgpu::Buffer,
    /// Layout of the camera bind group.
    pub layout: wgpu::BindGroupLayout,
    /// Camera bind group.
    pub bind_group: wgpu::BindGroup,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Frame `target` using the configured angles and radius.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        options: &CameraOptions,
        target: Vec3,
    ) -> Self {
        let rig = ArcRotate {
            target,
            alpha: options.alpha,
            beta: options.beta,
            radius: options.radius,
            min_radius: options.min_radius,
            max_radius: options.max_radius,
        };

        let camera = Camera {
            eye: rig.eye(),
            target,
            up: Vec3::Y,
            aspect: context.aspect(),
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some("Camera Bind Group"),
            });

        Self {
            rig,
            home: rig,
            camera,
            uniform,
            buffer,
            layout,
            bind_group,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        }
    }

    fn update_camera_pos(&mut self) {
        self.camera.eye = self.rig.eye();
        self.camera.target = self.rig.target;
    }

    /// Upload the current camera to the uniform buffer.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Track the new viewport aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Orbit by a screen-space drag: right drags decrease `alpha`, down
    /// drags decrease `beta`.
    pub fn rotate(&mut self, delta: Vec2) {
        let k = RADIANS_PER_PIXEL * self.rotate_speed;
        self.rig.rotate(-delta.x * k, -delta.y * k);
        self.update_camera_pos();
    }

    /// Pan proportionally to the orbit radius.
    pub fn pan(&mut self, delta: Vec2) {
        let k = PAN_PER_PIXEL * self.pan_speed * self.rig.radius;
        self.rig.pan(delta * k);
        self.update_camera_pos();
    }

    /// Dolly: positive deltas move toward the target.
    pub fn zoom(&mut self, delta: f32) {
        let factor = (1.0 - delta * self.zoom_speed).max(0.05);
        self.rig.zoom(factor);
        self.update_camera_pos();
    }

    /// Restore the initial framing.
    pub fn recenter(&mut self) {
        self.rig = self.home;
        self.update_camera_pos();
    }
}
