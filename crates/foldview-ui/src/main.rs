//! Dioxus web app for the foldview control panel.
//!
//! Compiled to WASM and loaded into a wry webview by the native viewer.
//! Renders whatever panel snapshot the viewer pushes and sends user edits
//! back over the JSON IPC bridge.

mod bridge;
mod panel_ui;

use dioxus::prelude::*;

use crate::panel_ui::{PanelState, StatsState};

/// Starting panel width in physical pixels, matching the native default.
const INITIAL_WIDTH: u32 = 300;

fn main() {
    dioxus::launch(app);
}

fn app() -> Element {
    let panel: Signal<Option<PanelState>> = use_signal(|| None);
    let stats: Signal<Option<StatsState>> = use_signal(|| None);
    let pinned: Signal<bool> = use_signal(|| true);
    let width: Signal<u32> = use_signal(|| INITIAL_WIDTH);

    // Register IPC listeners once on mount.
    use_effect(move || {
        bridge::register_listeners(panel, stats, pinned);
    });

    let panel_val = panel.read();
    match &*panel_val {
        Some(state) => rsx! {
            panel_ui::FoldPanel {
                panel: state.clone(),
                stats_sig: stats,
                pinned: pinned,
                width: width,
            }
        },
        None => rsx! {
            div {
                style: "padding: 16px; color: #585b70;",
                "Waiting for viewer..."
            }
        },
    }
}
