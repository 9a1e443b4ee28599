//! IPC bridge between the wry webview (native) and the Dioxus WASM app.
//!
//! **Inbound** (native → WASM): the viewer calls
//! `window.__foldview_push_panel(json)`, `__foldview_push_values(json)`,
//! `__foldview_push_stats(json)` and `__foldview_push_pinned(flag)`, which dispatch `CustomEvent`s that we
//! listen to here.
//!
//! **Outbound** (WASM → native): we call `window.ipc.postMessage(json)` with
//! one tagged action object per user edit.

use dioxus::signals::{Signal, Writable};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::panel_ui::{PanelState, StatsState, ValueUpdate};

// ── Inbound listeners ────────────────────────────────────────────────────

/// Register the panel, value, stats and pinned-state listeners. Call once
/// at app startup.
pub fn register_listeners(
    mut panel_sig: Signal<Option<PanelState>>,
    stats_sig: Signal<Option<StatsState>>,
    mut pinned_sig: Signal<bool>,
) {
    listen_json("foldview-panel", panel_sig);
    listen("foldview-values", move |detail| {
        let Ok(updates) = serde_json::from_str::<Vec<ValueUpdate>>(&detail)
        else {
            return;
        };
        if let Some(panel) = panel_sig.write().as_mut() {
            panel.apply_values(&updates);
        }
    });
    listen_json("foldview-stats", stats_sig);
    listen("foldview-pinned", move |detail| {
        pinned_sig.set(detail == "true");
    });
}

/// Parse each event's JSON detail into `T` and store it in `sig`. Malformed
/// payloads are ignored.
fn listen_json<T: DeserializeOwned + 'static>(
    event: &str,
    mut sig: Signal<Option<T>>,
) {
    listen(event, move |detail| {
        if let Ok(val) = serde_json::from_str::<T>(&detail) {
            sig.set(Some(val));
        }
    });
}

fn listen(event: &str, mut on_detail: impl FnMut(String) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handler = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(
        move |evt: web_sys::CustomEvent| {
            if let Some(detail) = evt.detail().as_string() {
                on_detail(detail);
            }
        },
    );
    if window
        .add_event_listener_with_callback(
            event,
            handler.as_ref().unchecked_ref(),
        )
        .is_ok()
    {
        handler.forget();
    }
}

// ── Outbound actions ─────────────────────────────────────────────────────

/// Send a `set_control` action for a range, checkbox or dropdown edit.
pub fn send_set_control(id: u32, value: &Value) {
    let msg = serde_json::json!({
        "action": "set_control",
        "id": id,
        "value": value,
    });
    post_message(&msg.to_string());
}

/// Send a `fire_control` action for a button press.
pub fn send_fire_control(id: u32) {
    let msg = serde_json::json!({ "action": "fire_control", "id": id });
    post_message(&msg.to_string());
}

/// Send a `toggle_panel` action to the viewer.
pub fn send_toggle_panel() {
    let msg = serde_json::json!({ "action": "toggle_panel" });
    post_message(&msg.to_string());
}

/// Send a `resize_panel` action to the viewer.
pub fn send_resize_panel(width: u32) {
    let msg = serde_json::json!({ "action": "resize_panel", "width": width });
    post_message(&msg.to_string());
}

/// Call `window.ipc.postMessage(json)` to reach the native wry IPC handler.
fn post_message(json: &str) {
    let js = format!(
        "window.ipc.postMessage('{}')",
        json.replace('\\', "\\\\").replace('\'', "\\'")
    );
    let _ = js_sys::eval(&js);
}
