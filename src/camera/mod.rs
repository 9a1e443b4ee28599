//! Orbit camera for viewing the page stack.
//!
//! [`core`] holds the GPU-free math (camera matrices and the arc-rotate
//! rig); [`controller`] owns the uniform buffer and applies drag, pan and
//! zoom gestures.

/// Arc-rotate camera controller owning the camera's GPU resources.
pub mod controller;
/// Core camera struct, arc-rotate rig, and GPU uniform type.
pub mod core;
