use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Orbit camera framing, projection, and control parameters.
pub struct CameraOptions {
    /// Initial azimuth around the target in radians.
    pub alpha: f32,
    /// Initial polar angle from the up axis in radians.
    pub beta: f32,
    /// Initial distance from the target.
    pub radius: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Closest allowed orbit distance.
    pub min_radius: f32,
    /// Farthest allowed orbit distance.
    pub max_radius: f32,
    /// Rotation sensitivity multiplier.
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            alpha: -std::f32::consts::FRAC_PI_2,
            beta: std::f32::consts::FRAC_PI_2,
            radius: 3.0,
            fovy: 45.8,
            znear: 1.0,
            zfar: 10_000.0,
            min_radius: 0.5,
            max_radius: 500.0,
            rotate_speed: 0.5,
            pan_speed: 0.5,
            zoom_speed: 0.1,
        }
    }
}
