//! Frame loop and command dispatch over a [`Stage`].

pub mod command;
mod execute;
mod scene_sync;

pub use self::command::FoldCommand;
use crate::camera::controller::CameraController;
use crate::error::FoldviewError;
use crate::gpu::lighting::{Lighting, LightingUniform};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DepthTarget;
use crate::options::Options;
use crate::panel::Panel;
use crate::renderer::draw_context::DrawBindGroups;
use crate::renderer::lines::LineRenderer;
use crate::renderer::surface::SurfaceRenderer;
use crate::scene::loader::TextureLoader;
use crate::stage::Stage;
use crate::util::frame_timing::FrameTiming;

/// Target FPS limit.
const TARGET_FPS: u32 = 120;

/// Renders a [`Stage`] and applies [`FoldCommand`]s to it.
///
/// # Frame loop
///
/// Call [`render`](Self::render) every redraw and
/// [`resize`](Self::resize) when the window size changes. Everything the
/// user can do goes through [`execute`](Self::execute).
///
/// # Textures
///
/// Fold images are decoded on a [`TextureLoader`] worker; labels are
/// rasterized up front. Both are uploaded on the main thread at the start
/// of the next frame, so a surface draws only once its texture exists.
pub struct FoldEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    _shader_composer: ShaderComposer,
    /// Arc-rotate camera and its uniform.
    pub camera_controller: CameraController,
    /// Hemispheric lighting uniform and bind group.
    pub lighting: Lighting,
    surfaces: SurfaceRenderer,
    lines: LineRenderer,
    depth: DepthTarget,
    loader: TextureLoader,
    options: Options,
    stage: Stage,
    frame_timing: FrameTiming,
    /// Scene generation last pushed to the renderers.
    synced_generation: Option<u64>,
}

impl FoldEngine {
    /// Bootstrap the stage into `panel` and build every GPU subsystem.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError`] if a shader fails to compose, the loader
    /// thread cannot start, or the root controls cannot be registered.
    pub fn new(
        context: RenderContext,
        options: Options,
        panel: Panel,
    ) -> Result<Self, FoldviewError> {
        let stage = Stage::new(&options, panel)?;
        let mut shader_composer = ShaderComposer::new()?;
        let camera_controller =
            CameraController::new(&context, &options.camera, stage.framing().target);
        let lighting = Lighting::new(
            &context,
            LightingUniform::from_lights(
                stage.lights(),
                options.lighting.specular_power,
            ),
        );
        let surfaces = SurfaceRenderer::new(
            &context,
            &mut shader_composer,
            &camera_controller.layout,
            &lighting.layout,
        )?;
        let lines = LineRenderer::new(
            &context,
            &mut shader_composer,
            &camera_controller.layout,
        )?;
        let (width, height) = context.size();
        let depth = DepthTarget::new(&context.device, width, height);

        Ok(Self {
            context,
            _shader_composer: shader_composer,
            camera_controller,
            lighting,
            surfaces,
            lines,
            depth,
            loader: TextureLoader::new()?,
            options,
            stage,
            frame_timing: FrameTiming::new(TARGET_FPS),
            synced_generation: None,
        })
    }

    /// Per-frame updates: texture uploads, scene sync, camera uniform.
    fn pre_render(&mut self) {
        self.upload_generated_textures();
        self.apply_loaded_textures();
        self.sync_scene();
        self.camera_controller.update_gpu(&self.context.queue);
    }

    /// Encode the single geometry pass into `view`.
    fn encode_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let [r, g, b, a] = self.options.display.background_color;
        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("main render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(r),
                        g: f64::from(g),
                        b: f64::from(b),
                        a: f64::from(a),
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });

        let bind_groups = DrawBindGroups {
            camera: &self.camera_controller.bind_group,
            lighting: &self.lighting.bind_group,
        };
        let scene = self.stage.scene();
        self.lines.draw(&mut rp, &bind_groups, scene);
        self.surfaces.draw(&mut rp, &bind_groups, scene);
    }

    /// Execute one frame: upload, draw, present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }

        self.pre_render();

        let frame = self.context.get_next_frame()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.context.format()),
            ..Default::default()
        });
        let mut encoder = self.context.create_encoder();
        self.encode_pass(&mut encoder, &view);
        self.context.submit(encoder);
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    /// Resize the surface, depth target, and camera projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.camera_controller.resize(width, height);
            self.depth = DepthTarget::new(&self.context.device, width, height);
        }
    }

    // ── Accessors ──

    /// The stage being rendered.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The control panel.
    #[must_use]
    pub fn panel(&self) -> &Panel {
        self.stage.panel()
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Images still being decoded.
    #[must_use]
    pub fn pending_textures(&self) -> usize {
        self.loader.in_flight()
    }

    /// Tear the stage down and return the (now empty) panel.
    #[must_use]
    pub fn teardown(self) -> Panel {
        self.stage.teardown()
    }
}
