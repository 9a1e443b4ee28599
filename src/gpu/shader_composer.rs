use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::FoldviewError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared WGSL modules are registered at construction time. Consuming
/// shaders use `#import foldview::module::Item` to pull in shared code. The
/// composer produces `naga::Module` IR directly, skipping a WGSL re-parse
/// at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

/// Textured surface shader source.
pub const SURFACE_SHADER: &str =
    include_str!("../../assets/shaders/raster/surface.wgsl");
/// Line-strip shader source.
pub const LINES_SHADER: &str =
    include_str!("../../assets/shaders/raster/lines.wgsl");

impl ShaderComposer {
    /// Register every shared module.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Shader`] if a module fails to parse.
    pub fn new() -> Result<Self, FoldviewError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    FoldviewError::Shader(format!(
                        "failed to register module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, FoldviewError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, FoldviewError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                FoldviewError::Shader(format!(
                    "failed to compose '{file_path}': {e}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in [
            (SURFACE_SHADER, "raster/surface.wgsl"),
            (LINES_SHADER, "raster/lines.wgsl"),
        ] {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("{e}"));
            let entry_points: Vec<&str> =
                module.entry_points.iter().map(|e| e.name.as_str()).collect();
            assert!(entry_points.contains(&"vs_main"), "{file_path}");
            assert!(entry_points.contains(&"fs_main"), "{file_path}");
        }
    }

    /// naga_oil rejects composable identifiers that writeback would rename,
    /// which includes any name ending in a digit.
    #[test]
    fn struct_members_avoid_trailing_digits() {
        let sources = MODULES
            .iter()
            .map(|m| (m.source, m.file_path))
            .chain([
                (SURFACE_SHADER, "raster/surface.wgsl"),
                (LINES_SHADER, "raster/lines.wgsl"),
            ]);
        for (source, file_path) in sources {
            let mut in_struct = false;
            for line in source.lines().map(str::trim) {
                if line.starts_with("struct ") {
                    in_struct = true;
                } else if line.starts_with('}') {
                    in_struct = false;
                } else if in_struct {
                    if let Some((name, _)) = line.split_once(':') {
                        let name = name.trim_start_matches('@').trim();
                        assert!(
                            !name.ends_with(|c: char| c.is_ascii_digit()),
                            "{file_path}: member '{name}'"
                        );
                    }
                }
            }
        }
    }
}
