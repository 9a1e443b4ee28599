//! CPU-side mesh generation for planes and line strips.

use glam::Vec3;

/// Vertex layout shared by every textured plane.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate as sampled on the GPU (v = 0 is the first image
    /// row).
    pub uv: [f32; 2],
}

/// Line-strip vertex (position only; color is per line set).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// Object-space position.
    pub position: [f32; 3],
}

/// Texture-coordinate rectangle `(u0, v0) → (u1, v1)` spread across a
/// plane face.
///
/// V points up: `v = 0` is the bottom image row and `v = 1` the top row.
/// `(u0, v0)` lands on the bottom-left corner and `(u1, v1)` on the
/// top-right corner; everything in between is interpolated linearly, so a
/// rectangle with `u0 > u1` mirrors the image horizontally.
/// [`PlaneMesh::vertices`] flips V into texture row order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// U at the left edge.
    pub u0: f32,
    /// V at the bottom edge.
    pub v0: f32,
    /// U at the right edge.
    pub u1: f32,
    /// V at the top edge.
    pub v1: f32,
}

impl UvRect {
    /// Whole image, upright.
    pub const UPRIGHT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Construct from the four corner coordinates.
    #[must_use]
    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }

    /// V-up texture coordinate at unit face position `(s, t)`, `t = 0` being
    /// the bottom edge.
    #[must_use]
    pub fn map(&self, s: f32, t: f32) -> [f32; 2] {
        [
            self.u0 + (self.u1 - self.u0) * s,
            self.v0 + (self.v1 - self.v0) * t,
        ]
    }
}

/// Which faces of a plane get geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideOrientation {
    /// Only the face whose normal points along -Z.
    Front,
    /// Both faces, each with its own UV rectangle.
    Double,
}

/// Rectangular plane lying in the XY plane, centered on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMesh {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// UVs of the front (-Z facing) side.
    pub front_uvs: UvRect,
    /// UVs of the back side (only used when double-sided).
    pub back_uvs: UvRect,
    /// Face generation mode.
    pub sides: SideOrientation,
}

/// Unit corner coordinates in counter-clockwise order seen from -Z.
const CORNERS: [(f32, f32); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

impl PlaneMesh {
    /// Single-sided upright plane.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            front_uvs: UvRect::UPRIGHT,
            back_uvs: UvRect::UPRIGHT,
            sides: SideOrientation::Front,
        }
    }

    /// Single-sided square plane.
    #[must_use]
    pub fn square(size: f32) -> Self {
        Self::new(size, size)
    }

    /// Double-sided plane with distinct UV rectangles per side.
    #[must_use]
    pub fn double_sided(width: f32, height: f32, front: UvRect, back: UvRect) -> Self {
        Self {
            width,
            height,
            front_uvs: front,
            back_uvs: back,
            sides: SideOrientation::Double,
        }
    }

    /// Generate the vertex list (4 per side).
    #[must_use]
    pub fn vertices(&self) -> Vec<MeshVertex> {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let face = |uvs: &UvRect, normal: [f32; 3]| {
            CORNERS.map(|(s, t)| {
                let [u, v] = uvs.map(s, t);
                MeshVertex {
                    position: [-hw + s * self.width, -hh + t * self.height, 0.0],
                    normal,
                    uv: [u, 1.0 - v],
                }
            })
        };

        let mut out = face(&self.front_uvs, [0.0, 0.0, -1.0]).to_vec();
        if self.sides == SideOrientation::Double {
            out.extend(face(&self.back_uvs, [0.0, 0.0, 1.0]));
        }
        out
    }

    /// Generate the triangle list; back faces use reversed winding.
    #[must_use]
    pub fn indices(&self) -> Vec<u32> {
        let mut out = vec![0, 1, 2, 0, 2, 3];
        if self.sides == SideOrientation::Double {
            out.extend([4, 6, 5, 4, 7, 6]);
        }
        out
    }
}

/// Convert polyline points into line-strip vertices.
#[must_use]
pub fn line_strip(points: &[Vec3]) -> Vec<LineVertex> {
    points
        .iter()
        .map(|p| LineVertex {
            position: p.to_array(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_rect_interpolates_corners() {
        let rect = UvRect::new(1.0, 0.5, 0.0, 0.0);
        assert_eq!(rect.map(0.0, 0.0), [1.0, 0.5]);
        assert_eq!(rect.map(1.0, 1.0), [0.0, 0.0]);
        assert_eq!(rect.map(0.5, 0.5), [0.5, 0.25]);
    }

    #[test]
    fn single_sided_plane_is_one_quad() {
        let plane = PlaneMesh::new(4.0, 2.0);
        let verts = plane.vertices();
        assert_eq!(verts.len(), 4);
        assert_eq!(plane.indices().len(), 6);
        assert_eq!(verts[0].position, [-2.0, -1.0, 0.0]);
        assert_eq!(verts[2].position, [2.0, 1.0, 0.0]);
        // Upright: bottom edge samples the last image row.
        assert_eq!(verts[0].uv, [0.0, 1.0]);
        assert_eq!(verts[2].uv, [1.0, 0.0]);
    }

    #[test]
    fn double_sided_plane_uses_back_uvs_and_flipped_normals() {
        let front = UvRect::new(1.0, 0.5, 0.0, 0.0);
        let back = UvRect::new(1.0, 0.5, 0.0, 1.0);
        let plane = PlaneMesh::double_sided(2.0, 2.0, front, back);
        let verts = plane.vertices();
        assert_eq!(verts.len(), 8);
        assert_eq!(verts[0].normal, [0.0, 0.0, -1.0]);
        assert_eq!(verts[4].normal, [0.0, 0.0, 1.0]);
        // Top-left corners: front v = 0 and back v = 1 flipped to rows.
        assert_eq!(verts[3].uv, [1.0, 1.0]);
        assert_eq!(verts[7].uv, [1.0, 0.0]);

        let indices = plane.indices();
        assert_eq!(indices.len(), 12);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn line_strip_keeps_point_order() {
        let strip = line_strip(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(strip.len(), 3);
        assert_eq!(strip[1].position, [1.0, 0.0, 0.0]);
    }
}
