//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns the transient input state (cursor tracking,
//! held buttons, modifier keys) and the key-binding map. It is the only
//! thing between raw window events and
//! [`FoldEngine::execute`](crate::FoldEngine::execute).

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::command::FoldCommand;

/// Maps physical key strings to [`FoldCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyQ"`, `"KeyO"`, `"Escape"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: BTreeMap<String, KeyCommandTag>,
}

/// Serializable tag for the key-bindable subset of [`FoldCommand`]
/// (discrete, parameterless actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Restore the initial camera framing.
    RecenterCamera,
    /// Show or hide the axis gizmo.
    ToggleAxes,
    /// Open the image picker.
    Upload,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`FoldCommand`].
    fn to_command(self) -> FoldCommand {
        match self {
            Self::RecenterCamera => FoldCommand::RecenterCamera,
            Self::ToggleAxes => FoldCommand::ToggleAxes,
            Self::Upload => FoldCommand::Upload,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = BTreeMap::from([
            ("KeyQ".into(), KeyCommandTag::RecenterCamera),
            ("KeyA".into(), KeyCommandTag::ToggleAxes),
            ("KeyO".into(), KeyCommandTag::Upload),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<FoldCommand> {
        self.tag(key).map(KeyCommandTag::to_command)
    }

    /// Look up the bound tag for a physical key string.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<KeyCommandTag> {
        self.bindings.get(key).copied()
    }

    /// Bind (or rebind) a key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`FoldCommand`]s.
///
/// Left-drag orbits, right-drag or shift+left-drag pans, the wheel zooms.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("KeyQ") {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Last cursor position, `None` until the first move.
    mouse_pos: Option<(f32, f32)>,
    left_pressed: bool,
    right_pressed: bool,
    shift_pressed: bool,
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeyBindings::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            mouse_pos: None,
            left_pressed: false,
            right_pressed: false,
            shift_pressed: false,
            key_bindings,
        }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Release all buttons (e.g. when the cursor leaves the window).
    pub fn release_mouse_state(&mut self) {
        self.left_pressed = false;
        self.right_pressed = false;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<FoldCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<FoldCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                match button {
                    MouseButton::Left => self.left_pressed = pressed,
                    MouseButton::Right => self.right_pressed = pressed,
                    MouseButton::Middle => {}
                }
                None
            }
            InputEvent::Scroll { delta } => Some(FoldCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<FoldCommand> {
        let previous = self.mouse_pos.replace((x, y));
        let (px, py) = previous?;
        let delta = Vec2::new(x - px, y - py);
        if delta == Vec2::ZERO {
            return None;
        }

        if self.right_pressed || (self.left_pressed && self.shift_pressed) {
            Some(FoldCommand::PanCamera { delta })
        } else if self.left_pressed {
            Some(FoldCommand::RotateCamera { delta })
        } else {
            None
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(p: &mut InputProcessor, button: MouseButton, pressed: bool) {
        assert!(p
            .handle_event(InputEvent::MouseButton { button, pressed })
            .is_none());
    }

    fn move_to(p: &mut InputProcessor, x: f32, y: f32) -> Option<FoldCommand> {
        p.handle_event(InputEvent::CursorMoved { x, y })
    }

    #[test]
    fn hover_produces_nothing() {
        let mut p = InputProcessor::new();
        assert!(move_to(&mut p, 10.0, 10.0).is_none());
        assert!(move_to(&mut p, 20.0, 15.0).is_none());
    }

    #[test]
    fn left_drag_rotates() {
        let mut p = InputProcessor::new();
        let _ = move_to(&mut p, 10.0, 10.0);
        press(&mut p, MouseButton::Left, true);
        assert_eq!(
            move_to(&mut p, 14.0, 7.0),
            Some(FoldCommand::RotateCamera {
                delta: Vec2::new(4.0, -3.0)
            })
        );
        press(&mut p, MouseButton::Left, false);
        assert!(move_to(&mut p, 20.0, 7.0).is_none());
    }

    #[test]
    fn right_or_shift_drag_pans() {
        let mut p = InputProcessor::new();
        let _ = move_to(&mut p, 0.0, 0.0);
        press(&mut p, MouseButton::Right, true);
        assert!(matches!(
            move_to(&mut p, 1.0, 0.0),
            Some(FoldCommand::PanCamera { .. })
        ));
        press(&mut p, MouseButton::Right, false);

        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        press(&mut p, MouseButton::Left, true);
        assert!(matches!(
            move_to(&mut p, 2.0, 0.0),
            Some(FoldCommand::PanCamera { .. })
        ));
    }

    #[test]
    fn scroll_zooms() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(FoldCommand::Zoom { delta: 1.5 })
        );
    }

    #[test]
    fn default_key_bindings() {
        let p = InputProcessor::new();
        assert_eq!(p.handle_key_press("KeyA"), Some(FoldCommand::ToggleAxes));
        assert_eq!(p.handle_key_press("KeyO"), Some(FoldCommand::Upload));
        assert_eq!(
            p.handle_key_press("KeyQ"),
            Some(FoldCommand::RecenterCamera)
        );
        assert_eq!(p.handle_key_press("Tab"), None);
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut p = InputProcessor::new();
        p.key_bindings_mut().bind("KeyX", KeyCommandTag::ToggleAxes);
        assert_eq!(p.handle_key_press("KeyX"), Some(FoldCommand::ToggleAxes));
    }
}
