//! Retained scene: textured surfaces, their materials, and line sets.
//!
//! Objects live in ordered maps keyed by typed handles that are never
//! reused. The renderer compares [`Scene::structure_generation`] to know
//! when GPU resources must be created or released, and
//! [`Scene::generation`] to know when per-object uniforms are stale.

mod entity;
pub mod image_source;
pub mod label;
pub mod loader;
pub mod mesh_gen;

use std::collections::BTreeMap;

pub use entity::{
    HemisphericLight, LineSet, Material, Surface, TextureSource, TextureState,
    Transform,
};

/// Handle to a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Handle to a [`Material`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Handle to a [`LineSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineSetId(pub u32);

/// Any object that carries a visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    /// A textured surface.
    Surface(SurfaceId),
    /// A line set.
    Lines(LineSetId),
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Owner of every object drawn by the renderer.
#[derive(Debug, Default)]
pub struct Scene {
    surfaces: BTreeMap<SurfaceId, Surface>,
    materials: BTreeMap<MaterialId, Material>,
    lines: BTreeMap<LineSetId, LineSet>,
    next_id: u32,
    /// Bumped on any mutation.
    generation: u64,
    /// Bumped when objects are added or removed.
    structure_generation: u64,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn restructure(&mut self) {
        self.structure_generation += 1;
        self.invalidate();
    }

    /// Counter bumped by every mutation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Counter bumped when objects are added or removed.
    #[must_use]
    pub fn structure_generation(&self) -> u64 {
        self.structure_generation
    }

    // -- Materials --

    /// Register a material.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.allocate());
        let _ = self.materials.insert(id, material);
        self.restructure();
        id
    }

    /// Release a material. Surfaces still pointing at it stop drawing.
    pub fn dispose_material(&mut self, id: MaterialId) -> Option<Material> {
        let removed = self.materials.remove(&id);
        if removed.is_some() {
            self.restructure();
        }
        removed
    }

    /// Read access to a material.
    #[must_use]
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Materials in creation order.
    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().map(|(id, m)| (*id, m))
    }

    /// Record a texture state change.
    pub fn set_texture_state(&mut self, id: MaterialId, state: TextureState) {
        if let Some(material) = self.materials.get_mut(&id) {
            material.state = state;
            self.invalidate();
        }
    }

    // -- Surfaces --

    /// Place a surface.
    pub fn add_surface(&mut self, surface: Surface) -> SurfaceId {
        let id = SurfaceId(self.allocate());
        let _ = self.surfaces.insert(id, surface);
        self.restructure();
        id
    }

    /// Remove a surface.
    pub fn dispose_surface(&mut self, id: SurfaceId) -> Option<Surface> {
        let removed = self.surfaces.remove(&id);
        if removed.is_some() {
            self.restructure();
        }
        removed
    }

    /// Read access to a surface.
    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    /// Surfaces in creation order.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces.iter().map(|(id, s)| (*id, s))
    }

    // -- Line sets --

    /// Add a line set.
    pub fn add_lines(&mut self, lines: LineSet) -> LineSetId {
        let id = LineSetId(self.allocate());
        let _ = self.lines.insert(id, lines);
        self.restructure();
        id
    }

    /// Remove a line set.
    pub fn dispose_lines(&mut self, id: LineSetId) -> Option<LineSet> {
        let removed = self.lines.remove(&id);
        if removed.is_some() {
            self.restructure();
        }
        removed
    }

    /// Read access to a line set.
    #[must_use]
    pub fn line_set(&self, id: LineSetId) -> Option<&LineSet> {
        self.lines.get(&id)
    }

    /// Line sets in creation order.
    pub fn line_sets(&self) -> impl Iterator<Item = (LineSetId, &LineSet)> {
        self.lines.iter().map(|(id, l)| (*id, l))
    }

    // -- Visibility --

    /// Set a node's visibility (clamped to `[0, 1]`). Unknown nodes are
    /// ignored.
    pub fn set_visibility(&mut self, node: NodeId, visibility: f32) {
        let visibility = visibility.clamp(0.0, 1.0);
        let slot = match node {
            NodeId::Surface(id) => {
                self.surfaces.get_mut(&id).map(|s| &mut s.visibility)
            }
            NodeId::Lines(id) => {
                self.lines.get_mut(&id).map(|l| &mut l.visibility)
            }
        };
        if let Some(slot) = slot {
            *slot = visibility;
            self.invalidate();
        }
    }

    /// A node's visibility, `None` if it does not exist.
    #[must_use]
    pub fn visibility(&self, node: NodeId) -> Option<f32> {
        match node {
            NodeId::Surface(id) => self.surfaces.get(&id).map(|s| s.visibility),
            NodeId::Lines(id) => self.lines.get(&id).map(|l| l.visibility),
        }
    }

    /// Move a surface. Unknown surfaces are ignored.
    pub fn set_position(&mut self, id: SurfaceId, position: glam::Vec3) {
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.transform.position = position;
            self.invalidate();
        }
    }

    // -- Counts --

    /// Number of surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of materials.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of line sets.
    #[must_use]
    pub fn line_set_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use image::RgbaImage;

    use super::mesh_gen::PlaneMesh;
    use super::*;

    fn material() -> Material {
        Material::new("m", TextureSource::Generated(RgbaImage::new(1, 1)))
    }

    fn surface(material: MaterialId) -> Surface {
        Surface {
            label: "s".into(),
            mesh: PlaneMesh::square(1.0),
            material,
            transform: Transform::default(),
            visibility: 1.0,
        }
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scene = Scene::new();
        let m = scene.add_material(material());
        let a = scene.add_surface(surface(m));
        let _ = scene.dispose_surface(a);
        let b = scene.add_surface(surface(m));
        assert_ne!(a, b);
        assert!(scene.surface(a).is_none());
        assert_eq!(scene.surface_count(), 1);
    }

    #[test]
    fn structure_generation_tracks_add_and_remove_only() {
        let mut scene = Scene::new();
        let m = scene.add_material(material());
        let s = scene.add_surface(surface(m));
        let structure = scene.structure_generation();
        let generation = scene.generation();

        scene.set_position(s, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.structure_generation(), structure);
        assert!(scene.generation() > generation);

        let _ = scene.dispose_material(m);
        assert!(scene.structure_generation() > structure);
        assert_eq!(scene.material_count(), 0);
    }

    #[test]
    fn disposing_twice_is_harmless() {
        let mut scene = Scene::new();
        let m = scene.add_material(material());
        assert!(scene.dispose_material(m).is_some());
        let structure = scene.structure_generation();
        assert!(scene.dispose_material(m).is_none());
        assert_eq!(scene.structure_generation(), structure);
    }

    #[test]
    fn visibility_is_clamped_and_per_node() {
        let mut scene = Scene::new();
        let m = scene.add_material(material());
        let s = scene.add_surface(surface(m));
        let l = scene.add_lines(LineSet {
            label: "x".into(),
            points: vec![Vec3::ZERO, Vec3::X],
            color: [1.0, 0.0, 0.0],
            position: Vec3::ZERO,
            visibility: 1.0,
        });

        scene.set_visibility(NodeId::Lines(l), 3.0);
        scene.set_visibility(NodeId::Surface(s), -1.0);
        assert_eq!(scene.visibility(NodeId::Lines(l)), Some(1.0));
        assert_eq!(scene.visibility(NodeId::Surface(s)), Some(0.0));
        assert_eq!(scene.visibility(NodeId::Lines(LineSetId(999))), None);
    }

    #[test]
    fn texture_state_updates_material() {
        let mut scene = Scene::new();
        let m = scene.add_material(material());
        assert_eq!(scene.material(m).unwrap().state, TextureState::Pending);
        scene.set_texture_state(m, TextureState::Ready);
        assert_eq!(scene.material(m).unwrap().state, TextureState::Ready);
    }
}
