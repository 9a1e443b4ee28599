//! Wry webview child of the winit window.
//!
//! Creates a [`wry::WebView`] overlaying the right edge of the window,
//! serves the foldview-ui bundle from a custom `foldview://` protocol, and
//! bridges JSON IPC between the Dioxus panel and the native engine.

use std::borrow::Cow;
use std::sync::mpsc;

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use wry::http::{header::CONTENT_TYPE, Response};
use wry::{dpi, Rect, WebView, WebViewBuilder};

use crate::panel::{ControlId, ControlValue, Panel};

/// Embedded foldview-ui dist output (built by `trunk build`).
#[derive(RustEmbed)]
#[folder = "crates/foldview-ui/dist/"]
struct UiAssets;

/// Default width of the control panel in physical pixels.
pub const PANEL_WIDTH: u32 = 300;

/// Messages posted by the panel app.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    /// A widget changed value.
    SetControl {
        /// Edited control.
        id: ControlId,
        /// New value as entered.
        value: ControlValue,
    },
    /// A button was pressed.
    FireControl {
        /// Pressed control.
        id: ControlId,
    },
    /// Pin or unpin the panel.
    TogglePanel,
    /// The user dragged the panel edge.
    ResizePanel {
        /// Requested width in physical pixels.
        width: u32,
    },
}

/// Engine statistics shown in the panel footer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PanelStats {
    /// Smoothed frames per second.
    pub fps: f32,
    /// Active folds.
    pub folds: usize,
    /// Images still decoding.
    pub pending: usize,
}

/// Create the wry webview as a child of `window`.
///
/// Returns `(webview, action_rx)`; the receiver yields [`UiAction`]s from
/// the panel app.
///
/// # Errors
///
/// Returns [`wry::Error`] if the platform webview cannot be created.
pub fn create_webview<W: wry::raw_window_handle::HasWindowHandle>(
    window: &W,
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Result<(WebView, mpsc::Receiver<UiAction>), wry::Error> {
    let (tx, rx) = mpsc::channel();

    let webview = WebViewBuilder::new()
        .with_bounds(panel_bounds(window_width, window_height, panel_width))
        .with_transparent(true)
        .with_custom_protocol("foldview".into(), |_id, request| {
            let path = request.uri().path();
            let path = path.strip_prefix('/').unwrap_or(path);
            let path = if path.is_empty() { "index.html" } else { path };
            serve_asset(path)
        })
        .with_url("foldview://localhost/")
        .with_initialization_script(BRIDGE_JS)
        .with_ipc_handler(move |req| {
            match serde_json::from_str::<UiAction>(req.body()) {
                Ok(action) => {
                    let _ = tx.send(action);
                }
                Err(e) => log::warn!("Ignoring panel message: {e}"),
            }
        })
        .build_as_child(window)?;

    Ok((webview, rx))
}

fn serve_asset(path: &str) -> Response<Cow<'static, [u8]>> {
    let empty = || Response::new(Cow::from(Vec::new()));
    match UiAssets::get(path) {
        Some(asset) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .header(CONTENT_TYPE, mime.as_ref())
                .body(Cow::from(asset.data.into_owned()))
                .unwrap_or_else(|_| empty())
        }
        None => Response::builder()
            .status(404)
            .body(Cow::from(Vec::new()))
            .unwrap_or_else(|_| empty()),
    }
}

/// Panel rect pinned to the right edge.
#[must_use]
pub fn panel_bounds(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Rect {
    let width = panel_width.min(window_width);
    rect(window_width - width, 0, width, window_height)
}

/// Panel rect floating inside the right edge with `margin` on each side.
#[must_use]
pub fn panel_bounds_floating(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
    margin: u32,
) -> Rect {
    let width = panel_width.min(window_width.saturating_sub(2 * margin));
    rect(
        window_width.saturating_sub(width + margin),
        margin,
        width,
        window_height.saturating_sub(2 * margin),
    )
}

/// Rect parked just outside the right edge.
#[must_use]
pub fn panel_bounds_hidden(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Rect {
    rect(window_width, 0, panel_width, window_height)
}

fn rect(x: u32, y: u32, width: u32, height: u32) -> Rect {
    Rect {
        position: dpi::Position::Physical(dpi::PhysicalPosition::new(
            x as i32, y as i32,
        )),
        size: dpi::Size::Physical(dpi::PhysicalSize::new(width, height)),
    }
}

/// Push the full panel state.
pub fn push_panel(webview: &WebView, panel: &Panel) {
    match serde_json::to_string(&panel.snapshot()) {
        Ok(json) => call(webview, "__foldview_push_panel", &json),
        Err(e) => log::error!("Serializing panel: {e}"),
    }
}

/// Push the values changed after value revision `since`, leaving the
/// structure the UI already has untouched.
pub fn push_values(webview: &WebView, panel: &Panel, since: u64) {
    let updates: Vec<_> = panel.values_changed_since(since).collect();
    if updates.is_empty() {
        return;
    }
    match serde_json::to_string(&updates) {
        Ok(json) => call(webview, "__foldview_push_values", &json),
        Err(e) => log::error!("Serializing panel values: {e}"),
    }
}

/// Push footer statistics.
pub fn push_stats(webview: &WebView, stats: PanelStats) {
    if let Ok(json) = serde_json::to_string(&stats) {
        call(webview, "__foldview_push_stats", &json);
    }
}

/// Tell the panel whether it is pinned.
pub fn push_panel_pinned(webview: &WebView, pinned: bool) {
    call(webview, "__foldview_push_pinned", if pinned { "true" } else { "false" });
}

fn call(webview: &WebView, function: &str, json: &str) {
    let escaped = json.replace('\\', "\\\\").replace('\'', "\\'");
    if let Err(e) =
        webview.evaluate_script(&format!("window.{function}('{escaped}')"))
    {
        log::debug!("{function} failed: {e}");
    }
}

// ── Internals ────────────────────────────────────────────────────────────

/// Injected before page load. Pushes that arrive before the Dioxus app
/// subscribes are buffered and replayed when it adds its listener. Value
/// updates accumulate until the next full panel push, which supersedes
/// them.
const BRIDGE_JS: &str = r#"
(function() {
    var latest = {};

    function dispatch(name, json) {
        latest[name] = json;
        window.dispatchEvent(new CustomEvent(name, { detail: json }));
    }

    var values = {};

    window.__foldview_push_panel = function(json) {
        values = {};
        delete latest['foldview-values'];
        dispatch('foldview-panel', json);
    };
    window.__foldview_push_values = function(json) {
        JSON.parse(json).forEach(function(u) { values[u.id] = u.value; });
        latest['foldview-values'] = JSON.stringify(Object.keys(values).map(function(id) {
            return { id: Number(id), value: values[id] };
        }));
        window.dispatchEvent(new CustomEvent('foldview-values', { detail: json }));
    };
    window.__foldview_push_stats = function(json) { dispatch('foldview-stats', json); };
    window.__foldview_push_pinned = function(json) { dispatch('foldview-pinned', json); };

    var origAdd = EventTarget.prototype.addEventListener;
    EventTarget.prototype.addEventListener = function(type, fn, opts) {
        origAdd.call(this, type, fn, opts);
        if (this === window && latest[type] !== undefined) {
            fn(new CustomEvent(type, { detail: latest[type] }));
        }
    };
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_panel_messages() {
        let action: UiAction =
            serde_json::from_str(r#"{"action":"set_control","id":7,"value":2.5}"#)
                .unwrap();
        assert_eq!(
            action,
            UiAction::SetControl {
                id: ControlId(7),
                value: ControlValue::Number(2.5)
            }
        );
        let action: UiAction =
            serde_json::from_str(r#"{"action":"fire_control","id":1}"#).unwrap();
        assert_eq!(action, UiAction::FireControl { id: ControlId(1) });
        let action: UiAction =
            serde_json::from_str(r#"{"action":"toggle_panel"}"#).unwrap();
        assert_eq!(action, UiAction::TogglePanel);
        assert!(serde_json::from_str::<UiAction>(r#"{"action":"nope"}"#).is_err());
    }

    #[test]
    fn bounds_hug_the_right_edge() {
        let Rect { position, size } = panel_bounds(1000, 600, 300);
        assert_eq!(
            position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(700, 0))
        );
        assert_eq!(size, dpi::Size::Physical(dpi::PhysicalSize::new(300, 600)));

        let Rect { size, .. } = panel_bounds(200, 600, 300);
        assert_eq!(size, dpi::Size::Physical(dpi::PhysicalSize::new(200, 600)));
    }
}
