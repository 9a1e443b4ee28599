//! Panel rendering.
//!
//! Mirrors the snapshot the viewer serializes: root controls first, then one
//! collapsible folder per fold. Every widget sends its edit straight back
//! over the bridge; the viewer answers with a fresh snapshot.

use dioxus::prelude::*;
use serde::Deserialize;
use serde_json::Value;

use crate::bridge;

const MIN_WIDTH: u32 = 200;
const MAX_WIDTH: u32 = 600;
const WIDTH_STEP: u32 = 50;

/// Full panel state as pushed by the viewer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PanelState {
    /// Header title.
    pub title: String,
    /// Structural revision.
    pub revision: u64,
    /// Controls outside any folder.
    pub controls: Vec<ControlState>,
    /// Folders in display order.
    pub folders: Vec<FolderState>,
}

/// A folder and its controls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FolderState {
    /// Folder handle.
    pub id: u32,
    /// Folder title.
    pub name: String,
    /// Controls in display order.
    pub controls: Vec<ControlState>,
}

/// A single control.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlState {
    /// Control handle sent back with edits.
    pub id: u32,
    /// Bound parameter key.
    pub property: String,
    /// Label shown beside the widget.
    pub name: String,
    /// Widget kind.
    pub kind: ControlKind,
    /// Current value: bool, number, string, or null for actions.
    pub value: Value,
}

/// Widget kind and its constraints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    /// Slider.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Increment, `None` for continuous.
        step: Option<f64>,
    },
    /// Checkbox.
    Boolean,
    /// Dropdown.
    Enumerated {
        /// Choices in display order.
        options: Vec<String>,
    },
    /// Button.
    Action,
}

/// One control's new value, sent between full panel pushes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueUpdate {
    /// Control that changed.
    pub id: u32,
    /// Value now stored by the viewer.
    pub value: Value,
}

impl PanelState {
    /// Patch control values in place. Unknown ids are ignored.
    pub fn apply_values(&mut self, updates: &[ValueUpdate]) {
        let controls = self
            .controls
            .iter_mut()
            .chain(self.folders.iter_mut().flat_map(|f| f.controls.iter_mut()));
        for control in controls {
            if let Some(update) = updates.iter().rev().find(|u| u.id == control.id) {
                control.value = update.value.clone();
            }
        }
    }
}

/// Footer statistics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatsState {
    /// Smoothed frames per second.
    pub fps: f64,
    /// Folds in the scene.
    pub folds: usize,
    /// Images still decoding.
    pub pending: usize,
}

/// Top-level component: header, controls, folders and footer.
#[component]
pub fn FoldPanel(
    panel: PanelState,
    stats_sig: Signal<Option<StatsState>>,
    pinned: Signal<bool>,
    width: Signal<u32>,
) -> Element {
    let pin_glyph = if *pinned.read() { "⇥" } else { "⇤" };

    rsx! {
        div { class: "side-panel", "data-revision": "{panel.revision}",
            div { class: "panel-header",
                span { "{panel.title}" }
                div { class: "header-buttons",
                    button {
                        class: "pin-button",
                        title: "Narrower",
                        onclick: move |_| resize_by(width, -1),
                        "−"
                    }
                    button {
                        class: "pin-button",
                        title: "Wider",
                        onclick: move |_| resize_by(width, 1),
                        "+"
                    }
                    button {
                        class: "pin-button",
                        title: "Pin or hide the panel",
                        onclick: move |_| bridge::send_toggle_panel(),
                        "{pin_glyph}"
                    }
                }
            }
            div { class: "panel-body",
                div { class: "section-body",
                    for control in panel.controls.iter() {
                        {render_control(control)}
                    }
                }
                for folder in panel.folders.iter() {
                    details { key: "{folder.id}", open: true,
                        summary { class: "section-header", "{folder.name}" }
                        div { class: "section-body",
                            for control in folder.controls.iter() {
                                {render_control(control)}
                            }
                        }
                    }
                }
            }
            StatsFooter { stats_sig: stats_sig }
        }
    }
}

fn resize_by(mut width: Signal<u32>, direction: i32) {
    let current = *width.read();
    let next = if direction < 0 {
        current.saturating_sub(WIDTH_STEP)
    } else {
        current + WIDTH_STEP
    }
    .clamp(MIN_WIDTH, MAX_WIDTH);
    if next != current {
        width.set(next);
        bridge::send_resize_panel(next);
    }
}

/// Leaf component that reads the stats signal, so only the footer
/// re-renders on every stats push.
#[component]
fn StatsFooter(stats_sig: Signal<Option<StatsState>>) -> Element {
    let stats = stats_sig.read();
    let fps_text = stats
        .as_ref()
        .map_or_else(|| "--".to_owned(), |s| format!("{:.0}", s.fps));
    let folds = stats.as_ref().map_or(0, |s| s.folds);
    let pending = stats.as_ref().map_or(0, |s| s.pending);

    rsx! {
        div { class: "stats-footer",
            span { "{fps_text} fps" }
            span {
                if pending > 0 {
                    "{folds} folds, {pending} loading"
                } else {
                    "{folds} folds"
                }
            }
        }
    }
}

fn render_control(control: &ControlState) -> Element {
    let id = control.id;
    let widget = match &control.kind {
        ControlKind::Range { min, max, step } => {
            render_range(id, *min, *max, *step, &control.value)
        }
        ControlKind::Boolean => render_bool(id, &control.value),
        ControlKind::Enumerated { options } => {
            render_enumerated(id, options, &control.value)
        }
        ControlKind::Action => {
            return rsx! {
                div { key: "{id}", class: "field-row",
                    button {
                        class: "action-button",
                        onclick: move |_| bridge::send_fire_control(id),
                        "{control.name}"
                    }
                }
            };
        }
    };

    rsx! {
        div { key: "{id}", class: "field-row", title: "{control.property}",
            label { class: "field-label", "{control.name}" }
            {widget}
        }
    }
}

fn render_range(
    id: u32,
    min: f64,
    max: f64,
    step: Option<f64>,
    current: &Value,
) -> Element {
    let current_val = current.as_f64().unwrap_or(min);
    let step = step.map_or_else(|| "any".to_owned(), |s| s.to_string());

    rsx! {
        input {
            r#type: "range",
            min: "{min}",
            max: "{max}",
            step: "{step}",
            value: "{current_val}",
            oninput: move |evt: Event<FormData>| {
                if let Ok(v) = evt.value().parse::<f64>() {
                    bridge::send_set_control(id, &Value::from(v));
                }
            },
        }
        span { class: "range-value", "{current_val:.2}" }
    }
}

fn render_bool(id: u32, current: &Value) -> Element {
    let checked = current.as_bool().unwrap_or(false);

    rsx! {
        input {
            r#type: "checkbox",
            checked: "{checked}",
            onchange: move |evt: Event<FormData>| {
                let val = Value::Bool(evt.value() == "true");
                bridge::send_set_control(id, &val);
            },
        }
    }
}

fn render_enumerated(id: u32, options: &[String], current: &Value) -> Element {
    let current_str = current.as_str().unwrap_or("").to_owned();

    rsx! {
        select {
            value: "{current_str}",
            onchange: move |evt: Event<FormData>| {
                bridge::send_set_control(id, &Value::String(evt.value()));
            },
            for choice in options.iter() {
                option {
                    value: "{choice}",
                    selected: *choice == current_str,
                    "{choice}"
                }
            }
        }
    }
}
