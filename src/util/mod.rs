//! Shared utilities.

/// Frame limiter and FPS smoothing.
pub mod frame_timing;
