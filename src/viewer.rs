//! Standalone fold viewer window backed by winit.
//!
//! When the `gui` feature is enabled, a wry webview panel overlays the
//! right edge of the window with the fold controls.
//!
//! ```no_run
//! # use foldview::Viewer;
//! Viewer::builder()
//!     .with_images(["layers/page_0.png", "layers/page_1.png"])
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;
#[cfg(feature = "gui")]
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    engine::FoldCommand, error::FoldviewError,
    gpu::render_context::RenderContext, options::Options, panel::Panel,
    scene::image_source::ImageSource, stage::StageRequest, FoldEngine,
    InputEvent, InputProcessor, MouseButton,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    images: Vec<ImageSource>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            images: Vec::new(),
            options: None,
            title: "Foldview".into(),
        }
    }

    /// Images to show as folds on startup, in selection order. Entries
    /// starting with `http://` or `https://` are fetched remotely.
    #[must_use]
    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.images
            .extend(images.into_iter().map(|s| ImageSource::parse(s.as_ref())));
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            images: self.images,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays folds.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    images: Vec<ImageSource>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Viewer`] if the event loop cannot be
    /// created or exits with an error.
    pub fn run(self) -> Result<(), FoldviewError> {
        let event_loop =
            EventLoop::new().map_err(|e| FoldviewError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            input: InputProcessor::with_key_bindings(
                self.options.keybindings.clone(),
            ),
            images: self.images,
            options: Some(self.options),
            title: self.title,
            #[cfg(feature = "gui")]
            panel: crate::gui::panel::PanelController::new(),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| FoldviewError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<FoldEngine>,
    input: InputProcessor,
    images: Vec<ImageSource>,
    options: Option<Options>,
    title: String,
    #[cfg(feature = "gui")]
    panel: crate::gui::panel::PanelController,
}

/// Surface size: always the full window, the panel overlays it.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn create_window(&self, event_loop: &ActiveEventLoop) -> Option<Arc<Window>> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let mut attrs = Window::default_attributes().with_title(&self.title);
        if let Some(mon) = &monitor {
            let size = mon.size().to_logical::<f64>(mon.scale_factor());
            attrs = attrs.with_inner_size(winit::dpi::LogicalSize::new(
                size.width * 0.75,
                size.height * 0.75,
            ));
        }
        match event_loop.create_window(attrs) {
            Ok(w) => Some(Arc::new(w)),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                None
            }
        }
    }

    /// Run a command and service whatever the stage asks for.
    fn dispatch(&mut self, cmd: FoldCommand) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        if let Some(request) = engine.execute(cmd) {
            handle_request(engine, request);
        }
    }

    fn redraw(&mut self) {
        #[cfg(feature = "gui")]
        if let (Some(window), Some(engine)) = (&self.window, &mut self.engine) {
            self.panel.pump();
            self.panel.drain_and_apply(engine, window);
            self.panel.sync_panel(engine);
            self.panel.push_stats_if_due(Instant::now(), engine);
        }

        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                if let Some(w) = &self.window {
                    let (vp_w, vp_h) = viewport_size(w.inner_size());
                    engine.resize(vp_w, vp_h);
                }
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn key_pressed(&mut self, code: KeyCode) {
        #[cfg(feature = "gui")]
        if code == KeyCode::Backslash {
            if let Some(window) = &self.window {
                self.panel.toggle(window);
            }
            return;
        }
        if let Some(cmd) = self.input.handle_key_press(&format!("{code:?}")) {
            self.dispatch(cmd);
        }
    }

    fn input_event(&mut self, event: InputEvent) {
        if let Some(cmd) = self.input.handle_event(event) {
            self.dispatch(cmd);
        }
    }
}

#[cfg(feature = "gui")]
fn handle_request(engine: &mut FoldEngine, request: StageRequest) {
    crate::gui::panel::service_request(engine, request);
}

#[cfg(not(feature = "gui"))]
fn handle_request(_engine: &mut FoldEngine, request: StageRequest) {
    match request {
        StageRequest::PickFiles => {
            log::warn!("No file dialog available; pass images on the command line");
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };
        let Some(window) = self.create_window(event_loop) else {
            event_loop.exit();
            return;
        };

        let size = viewport_size(window.inner_size());
        let context =
            match pollster::block_on(RenderContext::new(window.clone(), size)) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("Failed to initialize GPU: {e}");
                    event_loop.exit();
                    return;
                }
            };
        let panel = Panel::new(options.display.panel_title.clone());
        let engine = match FoldEngine::new(context, options, panel) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(feature = "gui")]
        self.panel.init_webview(&window, &engine);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);

        if !self.images.is_empty() {
            let sources = std::mem::take(&mut self.images);
            log::info!("Loading {} initial image(s)", sources.len());
            self.dispatch(FoldCommand::LoadImages { sources });
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(engine) = self.engine.take() {
                let panel = engine.teardown();
                log::debug!("Closed with {} panel control(s) left", panel.controls().len());
            }
            event_loop.exit();
            return;
        }
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (vp_w, vp_h) = viewport_size(size);
                if let Some(engine) = &mut self.engine {
                    engine.resize(vp_w, vp_h);
                }
                #[cfg(feature = "gui")]
                if let Some(window) = &self.window {
                    self.panel.apply_layout(window);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                self.input_event(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.input_event(InputEvent::CursorMoved { x, y });
                #[cfg(feature = "gui")]
                if let Some(window) = &self.window {
                    self.panel.update_peek(x, window);
                }
            }

            WindowEvent::CursorLeft { .. } => self.input.release_mouse_state(),

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.input_event(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_event(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key_pressed(code);
                }
            }

            _ => (),
        }
    }
}
