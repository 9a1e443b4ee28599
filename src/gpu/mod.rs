//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, image and depth textures,
//! the lighting uniform, bind group helpers, and shader composition.

/// Hemispheric lighting uniform and bind group.
pub mod lighting;
/// Shared wgpu boilerplate helpers for layouts and samplers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth attachment and sampled image textures.
pub mod texture;
