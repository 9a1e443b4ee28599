//! Raster passes that draw the retained scene.
//!
//! [`SurfaceRenderer`](surface::SurfaceRenderer) draws textured planes and
//! [`LineRenderer`](lines::LineRenderer) draws line strips. Both keep GPU
//! resources keyed by scene handles and resync when the scene's structure
//! generation changes.

/// Bind groups shared by every draw call in a frame.
pub mod draw_context;
pub mod lines;
pub(crate) mod pipeline_util;
pub mod surface;
