use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Display toggles and scene decoration.
pub struct DisplayOptions {
    /// Show the axis gizmo at startup.
    pub show_axes: bool,
    /// Axis arrow length in world units.
    pub axis_size: f32,
    /// Clear color (linear RGBA).
    pub background_color: [f32; 4],
    /// Title of the control panel.
    pub panel_title: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_axes: false,
            axis_size: 5.0,
            background_color: [0.2, 0.2, 0.3, 1.0],
            panel_title: "Folds".into(),
        }
    }
}
