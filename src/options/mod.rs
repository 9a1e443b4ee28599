//! Runtime options with TOML preset support.
//!
//! Camera framing, lighting, page geometry, display toggles, and
//! keybindings live here. Options serialize to/from TOML so a viewer
//! configuration can be stored next to the page images.

mod camera;
mod display;
mod lighting;
mod page;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use lighting::LightingOptions;
pub use page::PageOptions;
use serde::{Deserialize, Serialize};

use crate::error::FoldviewError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[page]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Display toggles and decoration.
    pub display: DisplayOptions,
    /// Hemispheric light colors.
    pub lighting: LightingOptions,
    /// Orbit camera parameters.
    pub camera: CameraOptions,
    /// Source page size.
    pub page: PageOptions,
    /// Keyboard binding options.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Io`] if the file cannot be read and
    /// [`FoldviewError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, FoldviewError> {
        let content = std::fs::read_to_string(path).map_err(FoldviewError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, FoldviewError> {
        toml::from_str(content)
            .map_err(|e| FoldviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::OptionsParse`] if serialization fails and
    /// [`FoldviewError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), FoldviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FoldviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(FoldviewError::Io)?;
        }
        std::fs::write(path, content).map_err(FoldviewError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCommandTag;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[page]
scale = 50.0

[display]
show_axes = true
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.page.scale, 50.0);
        assert_eq!(opts.page.width_px, 2598.0);
        assert!(opts.display.show_axes);
        assert_eq!(opts.display.axis_size, 5.0);
        assert_eq!(opts.camera.radius, 3.0);
    }

    #[test]
    fn page_geometry_follows_scale() {
        let mut page = PageOptions::default();
        page.scale = 200.0;
        let geometry = page.geometry();
        assert!((geometry.width - 12.99).abs() < 1e-4);
        assert!((geometry.half_height - 9.065).abs() < 1e-4);

        page.scale = 0.0;
        assert_eq!(page.geometry().width, 2598.0);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nradius = ").unwrap_err();
        assert!(matches!(err, FoldviewError::OptionsParse(_)));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("foldview-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.display.axis_size = 12.0;
        opts.save(&dir.join("big-axes.toml")).unwrap();
        Options::default().save(&dir.join("plain.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), ["big-axes", "plain"]);
        let loaded = Options::load(&dir.join("big-axes.toml")).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.tag("KeyQ"),
            Some(KeyCommandTag::RecenterCamera)
        );
        assert_eq!(opts.keybindings.tag("KeyO"), Some(KeyCommandTag::Upload));
        assert_eq!(opts.keybindings.tag("KeyZ"), None);
    }
}
