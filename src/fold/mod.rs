//! Folds: one image shown as a two-segment pop-up page.
//!
//! Each fold owns two double-sided planes sharing one material and a panel
//! folder with three controls (`visible`, `top`, `offset`). Any control
//! change re-runs [`fold_placement`] and moves both planes.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use crate::panel::{
    ControlId, ControlKind, ControlValue, FolderId, Panel, PanelError,
};
use crate::scene::image_source::ImageSource;
use crate::scene::mesh_gen::{PlaneMesh, UvRect};
use crate::scene::{
    Material, MaterialId, NodeId, Scene, Surface, SurfaceId, TextureSource,
    Transform,
};

/// UVs of the first segment, the one rotated flat onto the floor: the lower
/// half of the image.
pub const FRONT_SEGMENT_UVS: UvRect = UvRect::new(1.0, 0.5, 0.0, 0.0);
/// UVs of the second, standing segment: the upper half of the image,
/// upright.
pub const BACK_SEGMENT_UVS: UvRect = UvRect::new(1.0, 0.5, 0.0, 1.0);

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Page dimensions in world units, shared by every fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width.
    pub width: f32,
    /// Height of one segment (half the page).
    pub half_height: f32,
}

impl PageGeometry {
    /// Derive the page size from a source image size in pixels.
    #[must_use]
    pub fn from_pixels(width_px: f32, height_px: f32, scale: f32) -> Self {
        Self {
            width: width_px / scale,
            half_height: height_px / scale / 2.0,
        }
    }

    /// Upper bound of the offset control.
    #[must_use]
    pub fn max_offset(&self) -> f32 {
        self.half_height / 2.0
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::from_pixels(2598.0, 3626.0, 100.0)
    }
}

/// Mutable parameters of a fold, mirrored by its three controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldParams {
    /// Displacement magnitude of both segments.
    pub offset: f32,
    /// Displace along depth when true, vertically when false.
    pub top: bool,
    /// Both segments drawn.
    pub visible: bool,
}

impl Default for FoldParams {
    fn default() -> Self {
        Self {
            offset: 0.0,
            top: true,
            visible: true,
        }
    }
}

/// Positions of the (first, second) segment for `params`.
#[must_use]
pub fn fold_placement(params: &FoldParams, page: &PageGeometry) -> (Vec3, Vec3) {
    let (vertical, depth) = if params.top {
        (0.0, params.offset)
    } else {
        (params.offset, 0.0)
    };
    let x = page.width / 2.0;
    let quarter = page.half_height / 2.0;
    (
        Vec3::new(x, vertical, quarter + depth),
        Vec3::new(x, quarter + vertical, depth),
    )
}

// ---------------------------------------------------------------------------
// Fold
// ---------------------------------------------------------------------------

/// Controls registered for one fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldControls {
    /// `visible` checkbox.
    pub visible: ControlId,
    /// `top` checkbox.
    pub top: ControlId,
    /// `offset` slider.
    pub offset: ControlId,
}

/// A loaded image rendered as two segments.
#[derive(Debug, Clone)]
pub struct Fold {
    label: String,
    params: FoldParams,
    page: PageGeometry,
    material: MaterialId,
    front: SurfaceId,
    back: SurfaceId,
    folder: FolderId,
    controls: FoldControls,
}

impl Fold {
    /// Build a fold for `source` and attach its folder to `panel`.
    ///
    /// The label defaults to the source's file name, or empty when none can
    /// be found.
    ///
    /// # Errors
    ///
    /// Propagates [`PanelError`] from control registration; nothing is left
    /// in the scene or panel on failure.
    pub fn build(
        scene: &mut Scene,
        panel: &mut Panel,
        source: ImageSource,
        label: Option<String>,
        top: bool,
        page: PageGeometry,
    ) -> Result<Self, PanelError> {
        let label = label.or_else(|| source.label()).unwrap_or_default();
        let params = FoldParams {
            top,
            ..FoldParams::default()
        };

        let folder = panel.add_folder(label.clone());
        let controls = match register_controls(panel, folder, &params, &page) {
            Ok(controls) => controls,
            Err(e) => {
                let _ = panel.remove_folder(folder);
                return Err(e);
            }
        };

        let mut material =
            Material::new(format!("{label} mat"), TextureSource::Image(source));
        material.has_alpha = true;
        let material = scene.add_material(material);

        let segment = |index: u32, uvs: UvRect, rotation: Quat| Surface {
            label: format!("{label} plane {index}"),
            mesh: PlaneMesh::double_sided(page.width, page.half_height, uvs, uvs),
            material,
            transform: Transform {
                position: Vec3::ZERO,
                rotation,
            },
            visibility: 1.0,
        };
        let front = scene.add_surface(segment(
            0,
            FRONT_SEGMENT_UVS,
            Quat::from_rotation_x(FRAC_PI_2),
        ));
        let back =
            scene.add_surface(segment(1, BACK_SEGMENT_UVS, Quat::IDENTITY));

        let fold = Self {
            label,
            params,
            page,
            material,
            front,
            back,
            folder,
            controls,
        };
        fold.recompute(scene);
        log::debug!("Built fold {:?}", fold.label);
        Ok(fold)
    }

    /// Display label (also the folder name).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current parameters.
    #[must_use]
    pub fn params(&self) -> &FoldParams {
        &self.params
    }

    /// Shared material of both segments.
    #[must_use]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// (first, second) segment surfaces.
    #[must_use]
    pub fn surfaces(&self) -> (SurfaceId, SurfaceId) {
        (self.front, self.back)
    }

    /// Panel folder holding the controls.
    #[must_use]
    pub fn folder(&self) -> FolderId {
        self.folder
    }

    /// Registered control handles.
    #[must_use]
    pub fn controls(&self) -> &FoldControls {
        &self.controls
    }

    /// Whether `id` is one of this fold's controls.
    #[must_use]
    pub fn owns_control(&self, id: ControlId) -> bool {
        let c = &self.controls;
        id == c.visible || id == c.top || id == c.offset
    }

    /// Apply an already-validated control value. Returns `false` if the
    /// control does not belong to this fold.
    pub fn handle_control(
        &mut self,
        scene: &mut Scene,
        id: ControlId,
        value: &ControlValue,
    ) -> bool {
        if id == self.controls.visible {
            self.params.visible = value.is_truthy();
        } else if id == self.controls.top {
            self.params.top = value.is_truthy();
        } else if id == self.controls.offset {
            let Some(offset) = value.as_number() else {
                return true;
            };
            self.params.offset = offset as f32;
        } else {
            return false;
        }
        self.recompute(scene);
        true
    }

    /// Push parameters to both segments (positions and visibility).
    pub fn recompute(&self, scene: &mut Scene) {
        let (front, back) = fold_placement(&self.params, &self.page);
        scene.set_position(self.front, front);
        scene.set_position(self.back, back);
        let visibility = if self.params.visible { 1.0 } else { 0.0 };
        scene.set_visibility(NodeId::Surface(self.front), visibility);
        scene.set_visibility(NodeId::Surface(self.back), visibility);
    }

    /// Release both segments, the material, and the folder with its
    /// controls.
    pub fn dispose(self, scene: &mut Scene, panel: &mut Panel) {
        let _ = scene.dispose_surface(self.front);
        let _ = scene.dispose_surface(self.back);
        let _ = scene.dispose_material(self.material);
        if let Err(e) = panel.remove_folder(self.folder) {
            log::warn!("Disposing fold {:?}: {e}", self.label);
        }
        log::debug!("Disposed fold {:?}", self.label);
    }
}

fn register_controls(
    panel: &mut Panel,
    folder: FolderId,
    params: &FoldParams,
    page: &PageGeometry,
) -> Result<FoldControls, PanelError> {
    let visible = panel.bind(
        Some(folder),
        "visible",
        ControlKind::Boolean,
        params.visible.into(),
    )?;
    panel.rename(visible, "Visible?")?;

    let top =
        panel.bind(Some(folder), "top", ControlKind::Boolean, params.top.into())?;
    panel.rename(top, "Top?")?;

    let offset = panel.bind(
        Some(folder),
        "offset",
        ControlKind::range(0.0, f64::from(page.max_offset())),
        params.offset.into(),
    )?;
    panel.rename(offset, "Offset")?;

    Ok(FoldControls {
        visible,
        top,
        offset,
    })
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Ordered set of active folds.
#[derive(Debug, Default)]
pub struct FoldCollection {
    folds: Vec<Fold>,
}

impl FoldCollection {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispose every fold (in collection order) and build one per source,
    /// last source first. Returns the number of folds disposed.
    ///
    /// Sources whose controls cannot be registered are logged and skipped.
    pub fn replace(
        &mut self,
        scene: &mut Scene,
        panel: &mut Panel,
        sources: Vec<ImageSource>,
        page: PageGeometry,
    ) -> usize {
        let disposed = self.clear(scene, panel);
        for source in sources.into_iter().rev() {
            match Fold::build(scene, panel, source, None, true, page) {
                Ok(fold) => self.folds.push(fold),
                Err(e) => log::error!("Failed to build fold: {e}"),
            }
        }
        log::info!(
            "Replaced {disposed} fold(s) with {} new fold(s)",
            self.folds.len()
        );
        disposed
    }

    /// Dispose every fold. Returns how many were disposed.
    pub fn clear(&mut self, scene: &mut Scene, panel: &mut Panel) -> usize {
        let count = self.folds.len();
        for fold in self.folds.drain(..) {
            fold.dispose(scene, panel);
        }
        count
    }

    /// Route a validated control value to the fold that owns it.
    pub fn handle_control(
        &mut self,
        scene: &mut Scene,
        id: ControlId,
        value: &ControlValue,
    ) -> bool {
        self.folds
            .iter_mut()
            .any(|fold| fold.handle_control(scene, id, value))
    }

    /// Folds in order.
    #[must_use]
    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    /// Number of folds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    /// Whether there are no folds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPS
    }

    fn source(name: &str) -> ImageSource {
        ImageSource::File(PathBuf::from(format!("/layers/{name}")))
    }

    fn build(scene: &mut Scene, panel: &mut Panel) -> Fold {
        Fold::build(
            scene,
            panel,
            source("page.png"),
            None,
            true,
            PageGeometry::default(),
        )
        .unwrap()
    }

    fn positions(scene: &Scene, fold: &Fold) -> (Vec3, Vec3) {
        let (a, b) = fold.surfaces();
        (
            scene.surface(a).unwrap().transform.position,
            scene.surface(b).unwrap().transform.position,
        )
    }

    #[test]
    fn default_page_geometry() {
        let page = PageGeometry::default();
        assert!((page.width - 25.98).abs() < EPS);
        assert!((page.half_height - 18.13).abs() < EPS);
        assert!((page.max_offset() - 9.065).abs() < EPS);
    }

    #[test]
    fn placement_with_top_displaces_depth() {
        let page = PageGeometry::default();
        let (w, hh) = (page.width, page.half_height);
        for o in [0.0, 1.5, page.max_offset()] {
            let params = FoldParams {
                offset: o,
                top: true,
                visible: true,
            };
            let (front, back) = fold_placement(&params, &page);
            assert!(approx(front, Vec3::new(w / 2.0, 0.0, hh / 2.0 + o)));
            assert!(approx(back, Vec3::new(w / 2.0, hh / 2.0, o)));
        }
    }

    #[test]
    fn placement_without_top_displaces_vertically() {
        let page = PageGeometry::default();
        let (w, hh) = (page.width, page.half_height);
        let params = FoldParams {
            offset: 4.0,
            top: false,
            visible: true,
        };
        let (front, back) = fold_placement(&params, &page);
        assert!(approx(front, Vec3::new(w / 2.0, 4.0, hh / 2.0)));
        assert!(approx(back, Vec3::new(w / 2.0, hh / 2.0 + 4.0, 0.0)));
    }

    /// Sign of the GPU v change from the bottom edge to the top edge of the
    /// front face.
    fn v_direction(mesh: &PlaneMesh) -> f32 {
        let verts = mesh.vertices();
        (verts[3].uv[1] - verts[0].uv[1]).signum()
    }

    #[test]
    fn standing_segment_samples_image_upright() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let fold = build(&mut scene, &mut panel);
        let (_, standing) = fold.surfaces();
        let standing = scene.surface(standing).unwrap();
        assert_eq!(standing.transform.rotation, Quat::IDENTITY);

        let upright = PlaneMesh::new(1.0, 1.0);
        assert_eq!(v_direction(&standing.mesh), v_direction(&upright));

        // Upper half: the top edge samples the first image row.
        let verts = standing.mesh.vertices();
        assert_eq!(verts[3].uv[1], 0.0);
        assert_eq!(verts[0].uv[1], 0.5);
    }

    #[test]
    fn build_creates_two_planes_sharing_one_material() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let fold = build(&mut scene, &mut panel);

        assert_eq!(fold.label(), "page.png");
        assert_eq!(scene.surface_count(), 2);
        assert_eq!(scene.material_count(), 1);
        let (a, b) = fold.surfaces();
        let (sa, sb) = (scene.surface(a).unwrap(), scene.surface(b).unwrap());
        assert_eq!(sa.material, fold.material());
        assert_eq!(sb.material, fold.material());
        assert_eq!(sa.mesh.front_uvs, FRONT_SEGMENT_UVS);
        assert_eq!(sa.mesh.back_uvs, FRONT_SEGMENT_UVS);
        assert_eq!(sb.mesh.front_uvs, BACK_SEGMENT_UVS);
        assert!(scene.material(fold.material()).unwrap().has_alpha);

        let folder = panel.folder(fold.folder()).unwrap();
        assert_eq!(folder.name, "page.png");
        let names: Vec<&str> = panel
            .controls_in(Some(fold.folder()))
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Visible?", "Top?", "Offset"]);
    }

    #[test]
    fn construction_places_segments() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let fold = build(&mut scene, &mut panel);
        let page = PageGeometry::default();
        let (front, back) = positions(&scene, &fold);
        assert!(approx(
            front,
            Vec3::new(page.width / 2.0, 0.0, page.half_height / 2.0)
        ));
        assert!(approx(
            back,
            Vec3::new(page.width / 2.0, page.half_height / 2.0, 0.0)
        ));
    }

    #[test]
    fn offset_control_moves_segments_after_clamp() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let mut fold = build(&mut scene, &mut panel);
        let page = PageGeometry::default();
        let id = fold.controls().offset;

        let stored = panel.set_value(id, 100.0.into()).unwrap();
        assert!(fold.handle_control(&mut scene, id, &stored));
        let (front, _) = positions(&scene, &fold);
        assert!(
            (front.z - (page.half_height / 2.0 + page.max_offset())).abs() < EPS
        );

        let top = fold.controls().top;
        let stored = panel.set_value(top, false.into()).unwrap();
        assert!(fold.handle_control(&mut scene, top, &stored));
        let (front, back) = positions(&scene, &fold);
        assert!((front.y - page.max_offset()).abs() < EPS);
        assert!((back.z).abs() < EPS);
    }

    #[test]
    fn visible_control_toggles_both_segments() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let mut fold = build(&mut scene, &mut panel);
        let (a, b) = fold.surfaces();
        let id = fold.controls().visible;

        assert!(fold.handle_control(&mut scene, id, &false.into()));
        assert_eq!(scene.visibility(NodeId::Surface(a)), Some(0.0));
        assert_eq!(scene.visibility(NodeId::Surface(b)), Some(0.0));

        assert!(fold.handle_control(&mut scene, id, &true.into()));
        assert_eq!(scene.visibility(NodeId::Surface(a)), Some(1.0));
        assert_eq!(scene.visibility(NodeId::Surface(b)), Some(1.0));
    }

    #[test]
    fn foreign_control_is_not_handled() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let mut fold = build(&mut scene, &mut panel);
        assert!(!fold.handle_control(&mut scene, ControlId(9999), &true.into()));
    }

    #[test]
    fn dispose_is_symmetric() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let fold = build(&mut scene, &mut panel);
        fold.dispose(&mut scene, &mut panel);
        assert_eq!(scene.surface_count(), 0);
        assert_eq!(scene.material_count(), 0);
        assert!(panel.folders().is_empty());
        assert!(panel.controls().is_empty());
    }

    #[test]
    fn missing_label_is_empty() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let fold = Fold::build(
            &mut scene,
            &mut panel,
            ImageSource::Url("https://host/layers/".into()),
            None,
            true,
            PageGeometry::default(),
        )
        .unwrap();
        assert_eq!(fold.label(), "");
    }

    #[test]
    fn replace_orders_last_selected_first() {
        let mut scene = Scene::new();
        let mut panel = Panel::new("Folds");
        let mut folds = FoldCollection::new();
        let page = PageGeometry::default();

        let first = vec![source("a.png"), source("b.png")];
        assert_eq!(folds.replace(&mut scene, &mut panel, first, page), 0);

        let second = vec![source("c.png"), source("d.png"), source("e.png")];
        assert_eq!(folds.replace(&mut scene, &mut panel, second, page), 2);

        let labels: Vec<&str> = folds.folds().iter().map(Fold::label).collect();
        assert_eq!(labels, ["e.png", "d.png", "c.png"]);
        assert_eq!(scene.surface_count(), 6);
        assert_eq!(scene.material_count(), 3);
        assert_eq!(panel.folders().len(), 3);
        assert_eq!(panel.controls().len(), 9);
    }
}
