//! GUI panel controller: owns the wry webview, its layout state, and the
//! native file dialog.
//!
//! `ViewerApp` holds a single `PanelController` instead of a handful of
//! `#[cfg(feature = "gui")]` fields.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use winit::window::Window;

use super::webview::{self, PanelStats, UiAction};
use crate::engine::FoldCommand;
use crate::panel::Panel;
use crate::scene::image_source::ImageSource;
use crate::stage::StageRequest;
use crate::FoldEngine;

/// Owns the webview panel and all associated state.
pub(crate) struct PanelController {
    webview: Option<wry::WebView>,
    action_rx: Option<mpsc::Receiver<UiAction>>,
    last_stats_push: Instant,
    /// Structural panel revision last pushed to the webview.
    pushed_revision: Option<u64>,
    /// Value revision last pushed to the webview.
    pushed_values: u64,
    /// Whether the panel is pinned open.
    pinned: bool,
    /// Whether the panel is temporarily revealed by a mouse hover.
    peek: bool,
    /// Current panel width in physical pixels.
    width: u32,
}

// ── Constants ────────────────────────────────────────────────────────────

impl PanelController {
    /// Margin around the panel when floating (not pinned).
    const PANEL_MARGIN: u32 = 10;
    /// Minimum panel width for resize.
    const MIN_PANEL_WIDTH: u32 = 200;
    /// Maximum panel width for resize.
    const MAX_PANEL_WIDTH: u32 = 600;
    /// Hover zone at the right edge that reveals an unpinned panel.
    const EDGE_ZONE: f32 = 6.0;
}

// ── Construction ─────────────────────────────────────────────────────────

impl PanelController {
    /// Controller with default state (pinned, no webview yet).
    pub(crate) fn new() -> Self {
        Self {
            webview: None,
            action_rx: None,
            last_stats_push: Instant::now(),
            pushed_revision: None,
            pushed_values: 0,
            pinned: true,
            peek: false,
            width: webview::PANEL_WIDTH,
        }
    }

    /// Create the webview and push the initial panel to it. Failure is
    /// logged and the viewer keeps running without a panel.
    pub(crate) fn init_webview(&mut self, window: &Window, engine: &FoldEngine) {
        #[cfg(target_os = "linux")]
        if let Err(e) = gtk::init() {
            log::error!("Failed to initialize GTK: {e}");
            return;
        }

        let inner = window.inner_size();
        match webview::create_webview(window, inner.width, inner.height, self.width)
        {
            Ok((wv, rx)) => {
                webview::push_panel(&wv, engine.panel());
                webview::push_panel_pinned(&wv, self.pinned);
                self.pushed_revision = Some(engine.panel().revision());
                self.pushed_values = engine.panel().value_revision();
                self.webview = Some(wv);
                self.action_rx = Some(rx);
            }
            Err(e) => log::error!("Failed to create webview: {e}"),
        }
    }
}

// ── Runtime ──────────────────────────────────────────────────────────────

impl PanelController {
    /// Flip the pinned state and tell the webview.
    pub(crate) fn toggle(&mut self, window: &Window) {
        self.pinned = !self.pinned;
        self.peek = false;
        if let Some(ref wv) = self.webview {
            webview::push_panel_pinned(wv, self.pinned);
        }
        self.apply_layout(window);
    }

    /// Position the webview according to the pinned/peek state.
    pub(crate) fn apply_layout(&self, window: &Window) {
        let Some(ref wv) = self.webview else {
            return;
        };
        let inner = window.inner_size();
        let bounds = if self.pinned {
            webview::panel_bounds(inner.width, inner.height, self.width)
        } else if self.peek {
            webview::panel_bounds_floating(
                inner.width,
                inner.height,
                self.width,
                Self::PANEL_MARGIN,
            )
        } else {
            webview::panel_bounds_hidden(inner.width, inner.height, self.width)
        };
        if let Err(e) = wv.set_bounds(bounds) {
            log::debug!("Panel layout failed: {e}");
        }
    }

    /// Reveal an unpinned panel while the cursor is at the right edge or
    /// over the panel.
    pub(crate) fn update_peek(&mut self, mouse_x: f32, window: &Window) {
        if self.pinned {
            return;
        }
        let right = window.inner_size().width as f32;
        let near_edge = mouse_x >= right - Self::EDGE_ZONE;
        let in_panel =
            mouse_x >= right - (self.width + Self::PANEL_MARGIN) as f32;
        let should_peek = near_edge || (self.peek && in_panel);
        if should_peek != self.peek {
            self.peek = should_peek;
            self.apply_layout(window);
        }
    }

    /// Pump GTK so the webview stays responsive under winit's loop.
    pub(crate) fn pump(&self) {
        #[cfg(target_os = "linux")]
        if self.webview.is_some() {
            while gtk::events_pending() {
                let _ = gtk::main_iteration_do(false);
            }
        }
    }

    /// Drain panel messages, apply them to the engine, and service any
    /// file-picker request.
    pub(crate) fn drain_and_apply(
        &mut self,
        engine: &mut FoldEngine,
        window: &Window,
    ) {
        let Some(ref rx) = self.action_rx else {
            return;
        };

        let mut requests = Vec::new();
        let mut toggled = false;
        let mut resize_width: Option<u32> = None;

        while let Ok(action) = rx.try_recv() {
            let request = match action {
                UiAction::SetControl { id, value } => {
                    engine.execute(FoldCommand::SetControl { id, value })
                }
                UiAction::FireControl { id } => {
                    engine.execute(FoldCommand::FireControl { id })
                }
                UiAction::TogglePanel => {
                    toggled = true;
                    None
                }
                UiAction::ResizePanel { width } => {
                    resize_width = Some(width);
                    None
                }
            };
            requests.extend(request);
        }

        for request in requests {
            service_request(engine, request);
        }
        if toggled {
            self.toggle(window);
        }
        if let Some(w) = resize_width {
            let clamped = w.clamp(Self::MIN_PANEL_WIDTH, Self::MAX_PANEL_WIDTH);
            if clamped != self.width {
                self.width = clamped;
                self.apply_layout(window);
            }
        }
    }

    /// Push the whole panel after a structural change, or only the changed
    /// values after edits.
    pub(crate) fn sync_panel(&mut self, engine: &FoldEngine) {
        let Some(ref wv) = self.webview else {
            return;
        };
        let panel = engine.panel();
        match plan_sync(self.pushed_revision, self.pushed_values, panel) {
            PanelSync::Full => webview::push_panel(wv, panel),
            PanelSync::Values => webview::push_values(wv, panel, self.pushed_values),
            PanelSync::None => return,
        }
        self.pushed_revision = Some(panel.revision());
        self.pushed_values = panel.value_revision();
    }

    /// Push footer stats at ~4 Hz.
    pub(crate) fn push_stats_if_due(&mut self, now: Instant, engine: &FoldEngine) {
        let Some(ref wv) = self.webview else {
            return;
        };
        if now.duration_since(self.last_stats_push) >= Duration::from_millis(250)
        {
            webview::push_stats(
                wv,
                PanelStats {
                    fps: engine.fps(),
                    folds: engine.stage().folds().len(),
                    pending: engine.pending_textures(),
                },
            );
            self.last_stats_push = now;
        }
    }
}

/// Carry out a [`StageRequest`] with native UI.
pub(crate) fn service_request(engine: &mut FoldEngine, request: StageRequest) {
    match request {
        StageRequest::PickFiles => {
            let picked = rfd::FileDialog::new()
                .set_title("Select layer images")
                .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp", "gif"])
                .pick_files();
            let Some(files) = picked else {
                log::debug!("File selection cancelled");
                return;
            };
            let sources = files.into_iter().map(ImageSource::File).collect();
            let _ = engine.execute(FoldCommand::LoadImages { sources });
        }
    }
}

/// What [`PanelController::sync_panel`] has to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelSync {
    /// Structure changed (or nothing was pushed yet).
    Full,
    /// Only values changed.
    Values,
    /// Up to date.
    None,
}

fn plan_sync(pushed_revision: Option<u64>, pushed_values: u64, panel: &Panel) -> PanelSync {
    if pushed_revision != Some(panel.revision()) {
        PanelSync::Full
    } else if panel.value_revision() > pushed_values {
        PanelSync::Values
    } else {
        PanelSync::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{ControlKind, ControlValue};

    #[test]
    fn slider_ticks_push_values_not_the_whole_panel() {
        let mut panel = Panel::new("Folds");
        assert_eq!(plan_sync(None, 0, &panel), PanelSync::Full);

        let folder = panel.add_folder("page.png");
        let offset = panel
            .bind(Some(folder), "offset", ControlKind::range(0.0, 9.0), 0.0.into())
            .unwrap();
        let pushed = (Some(panel.revision()), panel.value_revision());
        assert_eq!(plan_sync(pushed.0, pushed.1, &panel), PanelSync::None);

        let _ = panel.set_value(offset, ControlValue::Number(2.0)).unwrap();
        assert_eq!(plan_sync(pushed.0, pushed.1, &panel), PanelSync::Values);

        let _ = panel.add_folder("other.png");
        assert_eq!(plan_sync(pushed.0, pushed.1, &panel), PanelSync::Full);
    }
}
