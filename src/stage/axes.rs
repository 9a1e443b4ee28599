//! World-axis gizmo: three arrow polylines with letter labels.

use glam::Vec3;

use crate::scene::label::render_label;
use crate::scene::mesh_gen::PlaneMesh;
use crate::scene::{
    LineSet, Material, NodeId, Scene, Surface, TextureSource, Transform,
};

/// One axis: direction, the perpendicular the arrowhead opens along, line
/// color, label color, and label position (in units of the axis size).
struct AxisSpec {
    name: &'static str,
    direction: Vec3,
    barb: Vec3,
    line_color: [f32; 3],
    label_color: [u8; 3],
    label_at: Vec3,
}

const AXES: [AxisSpec; 3] = [
    AxisSpec {
        name: "X",
        direction: Vec3::X,
        barb: Vec3::Y,
        line_color: [1.0, 0.0, 0.0],
        label_color: [255, 0, 0],
        label_at: Vec3::new(0.9, -0.05, 0.0),
    },
    AxisSpec {
        name: "Y",
        direction: Vec3::Y,
        barb: Vec3::NEG_X,
        line_color: [0.0, 1.0, 0.0],
        label_color: [0, 128, 0],
        label_at: Vec3::new(0.0, 0.9, -0.05),
    },
    AxisSpec {
        name: "Z",
        direction: Vec3::Z,
        barb: Vec3::NEG_Y,
        line_color: [0.0, 0.0, 1.0],
        label_color: [0, 0, 255],
        label_at: Vec3::new(0.0, 0.05, 0.9),
    },
];

/// Arrow polyline `0 → tip → barb → tip → opposite barb`.
#[must_use]
pub fn arrow_points(direction: Vec3, barb: Vec3, size: f32) -> Vec<Vec3> {
    let tip = direction * size;
    let back = direction * (0.95 * size);
    vec![
        Vec3::ZERO,
        tip,
        back + barb * (0.05 * size),
        tip,
        back - barb * (0.05 * size),
    ]
}

/// Handles of the six gizmo objects.
#[derive(Debug, Clone)]
pub struct Axes {
    nodes: Vec<NodeId>,
    materials: Vec<crate::scene::MaterialId>,
    visible: bool,
}

impl Axes {
    /// Add the gizmo to `scene`, hidden.
    pub fn build(scene: &mut Scene, size: f32) -> Self {
        let mut nodes = Vec::with_capacity(6);
        let mut materials = Vec::with_capacity(3);
        for axis in &AXES {
            let line = scene.add_lines(LineSet {
                label: format!("axis{}", axis.name),
                points: arrow_points(axis.direction, axis.barb, size),
                color: axis.line_color,
                position: Vec3::ZERO,
                visibility: 0.0,
            });
            nodes.push(NodeId::Lines(line));

            let mut material = Material::new(
                "TextPlaneMaterial",
                TextureSource::Generated(render_label(axis.name, axis.label_color)),
            );
            material.has_alpha = true;
            material.back_face_culling = false;
            material.specular = [0.0; 3];
            let material = scene.add_material(material);
            materials.push(material);

            let plane = scene.add_surface(Surface {
                label: "TextPlane".into(),
                mesh: PlaneMesh::square(size / 10.0),
                material,
                transform: Transform {
                    position: axis.label_at * size,
                    ..Transform::default()
                },
                visibility: 0.0,
            });
            nodes.push(NodeId::Surface(plane));
        }
        Self {
            nodes,
            materials,
            visible: false,
        }
    }

    /// Show or hide all six objects.
    pub fn set_visible(&mut self, scene: &mut Scene, visible: bool) {
        let visibility = if visible { 1.0 } else { 0.0 };
        for &node in &self.nodes {
            scene.set_visibility(node, visibility);
        }
        self.visible = visible;
    }

    /// Whether the gizmo is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The six gizmo nodes (line, label) per axis.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Remove the gizmo from `scene`.
    pub fn dispose(self, scene: &mut Scene) {
        for node in self.nodes {
            match node {
                NodeId::Surface(id) => {
                    let _ = scene.dispose_surface(id);
                }
                NodeId::Lines(id) => {
                    let _ = scene.dispose_lines(id);
                }
            }
        }
        for material in self.materials {
            let _ = scene.dispose_material(material);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_shape() {
        let pts = arrow_points(Vec3::X, Vec3::Y, 5.0);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[1], Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(pts[3], pts[1]);
        assert!((pts[2] - Vec3::new(4.75, 0.25, 0.0)).length() < 1e-6);
        assert!((pts[4] - Vec3::new(4.75, -0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn gizmo_starts_hidden_with_six_objects() {
        let mut scene = Scene::new();
        let axes = Axes::build(&mut scene, 5.0);
        assert_eq!(axes.nodes().len(), 6);
        assert_eq!(scene.line_set_count(), 3);
        assert_eq!(scene.surface_count(), 3);
        assert!(!axes.is_visible());
        for &node in axes.nodes() {
            assert_eq!(scene.visibility(node), Some(0.0));
        }
    }

    #[test]
    fn labels_are_placed_and_unculled() {
        let mut scene = Scene::new();
        let _axes = Axes::build(&mut scene, 10.0);
        let positions: Vec<Vec3> = scene
            .surfaces()
            .map(|(_, s)| s.transform.position)
            .collect();
        assert!((positions[0] - Vec3::new(9.0, -0.5, 0.0)).length() < 1e-5);
        assert!((positions[1] - Vec3::new(0.0, 9.0, -0.5)).length() < 1e-5);
        assert!((positions[2] - Vec3::new(0.0, 0.5, 9.0)).length() < 1e-5);
        for (_, surface) in scene.surfaces() {
            assert!((surface.mesh.width - 1.0).abs() < 1e-6);
            let material = scene.material(surface.material).unwrap();
            assert!(!material.back_face_culling);
            assert_eq!(material.specular, [0.0; 3]);
        }
    }

    #[test]
    fn dispose_removes_everything() {
        let mut scene = Scene::new();
        let axes = Axes::build(&mut scene, 5.0);
        axes.dispose(&mut scene);
        assert_eq!(scene.surface_count(), 0);
        assert_eq!(scene.line_set_count(), 0);
        assert_eq!(scene.material_count(), 0);
    }
}
