use glam::{Mat4, Vec2, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters. The world is left-handed (+X right, +Y up, +Z into the
/// screen at the default framing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and eye position.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
}

impl Camera {
    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_lh(self.eye, self.target, self.up);
        // perspective_lh maps depth to [0, 1] (wgpu convention)
        let proj = Mat4::perspective_lh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * view
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
    }
}

/// Keeps the polar angle off the poles so the view basis stays defined.
const BETA_LIMIT: f32 = 0.01;

/// Arc-rotate rig: an eye orbiting a target at `radius`, positioned by
/// azimuth `alpha` and polar angle `beta` (measured from +Y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRotate {
    /// Orbit center.
    pub target: Vec3,
    /// Azimuth in the XZ plane, radians.
    pub alpha: f32,
    /// Polar angle from +Y, radians.
    pub beta: f32,
    /// Distance from the target.
    pub radius: f32,
    /// Closest allowed distance.
    pub min_radius: f32,
    /// Farthest allowed distance.
    pub max_radius: f32,
}

impl ArcRotate {
    /// Eye position for the current angles.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b)
    }

    /// Unit view direction (eye toward target).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye()).normalize_or(Vec3::Z)
    }

    /// Screen-right and screen-up axes in world space.
    #[must_use]
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let right = Vec3::Y.cross(forward).normalize_or(Vec3::X);
        let up = forward.cross(right);
        (right, up)
    }

    /// Orbit by angle deltas; `beta` stays strictly between the poles.
    pub fn rotate(&mut self, d_alpha: f32, d_beta: f32) {
        self.alpha += d_alpha;
        self.beta = (self.beta + d_beta).clamp(
            BETA_LIMIT,
            std::f32::consts::PI - BETA_LIMIT,
        );
    }

    /// Slide the target in the view plane. `delta` is in screen units:
    /// +x drags the scene right, +y drags it down.
    pub fn pan(&mut self, delta: Vec2) {
        let (right, up) = self.basis();
        self.target += -right * delta.x + up * delta.y;
    }

    /// Scale the radius by `factor`, clamped to the allowed range.
    pub fn zoom(&mut self, factor: f32) {
        let max = self.max_radius.max(self.min_radius);
        self.radius = (self.radius * factor).clamp(self.min_radius, max);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    fn rig() -> ArcRotate {
        ArcRotate {
            target: Vec3::new(12.99, 0.0, 0.0),
            alpha: -FRAC_PI_2,
            beta: FRAC_PI_2,
            radius: 3.0,
            min_radius: 0.5,
            max_radius: 100.0,
        }
    }

    #[test]
    fn default_framing_looks_down_positive_z() {
        let rig = rig();
        assert!((rig.eye() - Vec3::new(12.99, 0.0, -3.0)).length() < 1e-5);
        assert!((rig.forward() - Vec3::Z).length() < 1e-5);
        let (right, up) = rig.basis();
        assert!((right - Vec3::X).length() < 1e-5);
        assert!((up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn beta_is_clamped_off_the_poles() {
        let mut rig = rig();
        rig.rotate(0.0, 10.0);
        assert!(rig.beta < PI);
        rig.rotate(0.0, -10.0);
        assert!(rig.beta > 0.0);
        assert!(rig.eye().is_finite());
    }

    #[test]
    fn rotation_keeps_radius() {
        let mut rig = rig();
        rig.rotate(0.7, -0.3);
        assert!(((rig.eye() - rig.target).length() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_target_opposite_to_drag() {
        let mut rig = rig();
        let start = rig.target;
        rig.pan(Vec2::new(1.0, 0.0));
        assert!((rig.target - (start - Vec3::X)).length() < 1e-5);
        rig.pan(Vec2::new(0.0, 2.0));
        assert!((rig.target.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_clamps_radius() {
        let mut rig = rig();
        rig.zoom(0.001);
        assert_eq!(rig.radius, 0.5);
        rig.zoom(1_000_000.0);
        assert_eq!(rig.radius, 100.0);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let rig = rig();
        let camera = Camera {
            eye: rig.eye(),
            target: rig.target,
            up: Vec3::Y,
            aspect: 1.5,
            fovy: 45.8,
            znear: 1.0,
            zfar: 100.0,
        };
        let clip = camera.build_matrix() * rig.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);

        // +X lands on the right half of the screen.
        let right = camera.build_matrix() * (rig.target + Vec3::X).extend(1.0);
        assert!(right.x / right.w > 0.0);
    }
}
