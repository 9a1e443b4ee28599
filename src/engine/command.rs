//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether it comes from a key press, a mouse
//! gesture, a panel widget or a programmatic call, is a [`FoldCommand`]
//! passed to [`FoldEngine::execute`](super::FoldEngine::execute).

use glam::Vec2;

use crate::panel::{ControlId, ControlValue};
use crate::scene::image_source::ImageSource;

/// A command for the engine to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldCommand {
    // ── Camera ──
    /// Orbit by a screen-space drag delta (pixels).
    RotateCamera {
        /// Drag delta.
        delta: Vec2,
    },
    /// Translate the target by a screen-space drag delta (pixels).
    PanCamera {
        /// Drag delta.
        delta: Vec2,
    },
    /// Dolly toward (positive) or away from the target.
    Zoom {
        /// Scroll amount.
        delta: f32,
    },
    /// Restore the initial framing.
    RecenterCamera,

    // ── Stage ──
    /// Flip the axis gizmo (and its panel checkbox).
    ToggleAxes,
    /// Set a panel control's value.
    SetControl {
        /// Target control.
        id: ControlId,
        /// New value before validation.
        value: ControlValue,
    },
    /// Press an action control.
    FireControl {
        /// Target control.
        id: ControlId,
    },
    /// Replace every fold with one per source.
    LoadImages {
        /// Selected images in selection order.
        sources: Vec<ImageSource>,
    },
    /// Ask for the file picker (same as pressing `Upload`).
    Upload,
}
