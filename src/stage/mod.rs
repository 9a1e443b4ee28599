//! Scene bootstrapper: camera framing, lights, axis gizmo, root controls,
//! and the fold collection.
//!
//! The stage owns the [`Scene`] and borrows nothing globally: the caller
//! hands in the [`Panel`] at construction and gets it back from
//! [`Stage::teardown`].

pub mod axes;

use glam::Vec3;

pub use self::axes::Axes;
use crate::error::FoldviewError;
use crate::fold::{FoldCollection, PageGeometry};
use crate::options::Options;
use crate::panel::{ControlId, ControlKind, ControlValue, Panel, PanelError};
use crate::scene::image_source::ImageSource;
use crate::scene::{HemisphericLight, Scene};

/// Something the stage needs from its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRequest {
    /// Show a multi-file image picker and call
    /// [`Stage::load_images`] with the selection.
    PickFiles,
}

/// Initial orbit-camera framing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Orbit center.
    pub target: Vec3,
    /// Azimuth, radians.
    pub alpha: f32,
    /// Polar angle from +Y, radians.
    pub beta: f32,
    /// Orbit distance.
    pub radius: f32,
}

/// Root panel controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootControls {
    /// `Upload` button.
    pub upload: ControlId,
    /// `Show axes?` checkbox.
    pub show_axes: ControlId,
}

/// A fully populated scene plus the panel that drives it.
pub struct Stage {
    scene: Scene,
    panel: Panel,
    folds: FoldCollection,
    axes: Axes,
    lights: [HemisphericLight; 2],
    framing: Framing,
    page: PageGeometry,
    root: RootControls,
}

impl Stage {
    /// Populate a scene: framing, two opposing hemispheric lights, the
    /// (hidden) axis gizmo, and the root controls.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::Panel`] if the root controls cannot be
    /// registered.
    pub fn new(options: &Options, mut panel: Panel) -> Result<Self, FoldviewError> {
        let page = options.page.geometry();
        let mut scene = Scene::new();

        let framing = Framing {
            target: Vec3::new(page.width / 2.0, 0.0, 0.0),
            alpha: options.camera.alpha,
            beta: options.camera.beta,
            radius: options.camera.radius,
        };

        let light = |label: &str, direction: Vec3| HemisphericLight {
            label: label.into(),
            direction,
            sky: options.lighting.sky_color,
            ground: options.lighting.ground_color,
            intensity: options.lighting.intensity,
        };
        let lights = [light("light1", Vec3::Y), light("light2", Vec3::NEG_Y)];

        let mut axes = Axes::build(&mut scene, options.display.axis_size);
        if options.display.show_axes {
            axes.set_visible(&mut scene, true);
        }

        let root = register_root_controls(&mut panel, axes.is_visible())?;
        log::info!(
            "Stage ready: page {:.2} x {:.2}, axes size {}",
            page.width,
            page.half_height * 2.0,
            options.display.axis_size
        );

        Ok(Self {
            scene,
            panel,
            folds: FoldCollection::new(),
            axes,
            lights,
            framing,
            page,
            root,
        })
    }

    /// The scene being drawn.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access (texture state updates).
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The control panel.
    #[must_use]
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Active folds.
    #[must_use]
    pub fn folds(&self) -> &FoldCollection {
        &self.folds
    }

    /// The axis gizmo.
    #[must_use]
    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    /// The up- and down-facing lights.
    #[must_use]
    pub fn lights(&self) -> &[HemisphericLight; 2] {
        &self.lights
    }

    /// Initial camera framing.
    #[must_use]
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Page geometry shared by every fold.
    #[must_use]
    pub fn page(&self) -> PageGeometry {
        self.page
    }

    /// Root control handles.
    #[must_use]
    pub fn root_controls(&self) -> RootControls {
        self.root
    }

    /// Replace every fold with one per source (last source first). Returns
    /// how many folds were disposed.
    pub fn load_images(&mut self, sources: Vec<ImageSource>) -> usize {
        self.folds
            .replace(&mut self.scene, &mut self.panel, sources, self.page)
    }

    /// Validate and apply a control change from the UI.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError`] for unknown controls or values the control
    /// cannot hold.
    pub fn set_control(
        &mut self,
        id: ControlId,
        value: ControlValue,
    ) -> Result<Option<StageRequest>, PanelError> {
        let stored = self.panel.set_value(id, value)?;
        if id == self.root.upload {
            return Ok(Some(StageRequest::PickFiles));
        }
        if id == self.root.show_axes {
            self.axes.set_visible(&mut self.scene, stored.is_truthy());
            return Ok(None);
        }
        if !self.folds.handle_control(&mut self.scene, id, &stored) {
            log::debug!("Control {} has no handler", id.0);
        }
        Ok(None)
    }

    /// Press an action control.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError`] if `id` is unknown or not an action.
    pub fn fire(&mut self, id: ControlId) -> Result<Option<StageRequest>, PanelError> {
        self.set_control(id, ControlValue::None)
    }

    /// Flip the axis gizmo and keep its checkbox in sync.
    pub fn toggle_axes(&mut self) {
        let show = !self.axes.is_visible();
        if let Err(e) = self.set_control(self.root.show_axes, show.into()) {
            log::warn!("Toggling axes: {e}");
        }
    }

    /// Dispose every fold and the gizmo, remove the root controls, and hand
    /// the panel back.
    #[must_use]
    pub fn teardown(mut self) -> Panel {
        let _ = self.folds.clear(&mut self.scene, &mut self.panel);
        self.axes.dispose(&mut self.scene);
        for id in [self.root.upload, self.root.show_axes] {
            let _ = self.panel.remove_control(id);
        }
        self.panel
    }
}

fn register_root_controls(
    panel: &mut Panel,
    show_axes: bool,
) -> Result<RootControls, PanelError> {
    let upload =
        panel.bind(None, "upload", ControlKind::Action, ControlValue::None)?;
    panel.rename(upload, "Upload")?;
    let show =
        panel.bind(None, "show_axes", ControlKind::Boolean, show_axes.into())?;
    panel.rename(show, "Show axes?")?;
    Ok(RootControls {
        upload,
        show_axes: show,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::scene::NodeId;

    fn stage() -> Stage {
        Stage::new(&Options::default(), Panel::new("Folds")).unwrap()
    }

    fn files(names: &[&str]) -> Vec<ImageSource> {
        names
            .iter()
            .map(|n| ImageSource::File(PathBuf::from(format!("/pages/{n}"))))
            .collect()
    }

    #[test]
    fn bootstrap_frames_page_center_with_two_lights() {
        let stage = stage();
        let framing = stage.framing();
        assert!((framing.target.x - 12.99).abs() < 1e-4);
        assert_eq!(framing.radius, 3.0);

        let [up, down] = stage.lights();
        assert_eq!(up.direction, Vec3::Y);
        assert_eq!(down.direction, Vec3::NEG_Y);
        for light in stage.lights() {
            assert_eq!(light.sky, [1.0; 3]);
            assert_eq!(light.ground, [0.0; 3]);
            assert_eq!(light.intensity, 1.0);
        }
    }

    #[test]
    fn root_controls_registered() {
        let stage = stage();
        let names: Vec<&str> = stage
            .panel()
            .controls_in(None)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Upload", "Show axes?"]);
    }

    #[test]
    fn upload_requests_file_picker() {
        let mut stage = stage();
        let upload = stage.root_controls().upload;
        assert_eq!(stage.fire(upload), Ok(Some(StageRequest::PickFiles)));
        let show = stage.root_controls().show_axes;
        assert!(stage.fire(show).is_err());
    }

    #[test]
    fn axes_toggle_all_six_objects() {
        let mut stage = stage();
        let show = stage.root_controls().show_axes;
        let nodes: Vec<NodeId> = stage.axes().nodes().to_vec();
        assert_eq!(nodes.len(), 6);

        let _ = stage.set_control(show, true.into()).unwrap();
        for &n in &nodes {
            assert_eq!(stage.scene().visibility(n), Some(1.0));
        }
        let _ = stage.set_control(show, false.into()).unwrap();
        for &n in &nodes {
            assert_eq!(stage.scene().visibility(n), Some(0.0));
        }

        stage.toggle_axes();
        assert!(stage.axes().is_visible());
        assert_eq!(stage.panel().value(show), Some(&ControlValue::Bool(true)));
    }

    #[test]
    fn show_axes_option_starts_visible() {
        let mut options = Options::default();
        options.display.show_axes = true;
        let stage = Stage::new(&options, Panel::new("Folds")).unwrap();
        assert!(stage.axes().is_visible());
        let show = stage.root_controls().show_axes;
        assert_eq!(stage.panel().value(show), Some(&ControlValue::Bool(true)));
    }

    #[test]
    fn selecting_files_replaces_collection() {
        let mut stage = stage();
        assert_eq!(stage.load_images(files(&["a.png", "b.png", "c.png"])), 0);
        assert_eq!(stage.folds().len(), 3);

        assert_eq!(stage.load_images(files(&["d.png", "e.png"])), 3);
        let labels: Vec<&str> =
            stage.folds().folds().iter().map(|f| f.label()).collect();
        assert_eq!(labels, ["e.png", "d.png"]);
        // Two fold pairs plus three axis labels.
        assert_eq!(stage.scene().surface_count(), 4 + 3);
        assert_eq!(stage.panel().folders().len(), 2);
    }

    #[test]
    fn fold_controls_route_through_stage() {
        let mut stage = stage();
        let _ = stage.load_images(files(&["a.png"]));
        let fold = stage.folds().folds()[0].clone();
        let (front, back) = fold.surfaces();

        let _ = stage
            .set_control(fold.controls().visible, false.into())
            .unwrap();
        assert_eq!(stage.scene().visibility(NodeId::Surface(front)), Some(0.0));
        assert_eq!(stage.scene().visibility(NodeId::Surface(back)), Some(0.0));

        let _ = stage.set_control(fold.controls().offset, 2.0.into()).unwrap();
        let z = stage.scene().surface(front).unwrap().transform.position.z;
        assert!((z - (stage.page().half_height / 2.0 + 2.0)).abs() < 1e-5);
    }

    #[test]
    fn teardown_returns_empty_panel() {
        let mut stage = stage();
        let _ = stage.load_images(files(&["a.png", "b.png"]));
        let panel = stage.teardown();
        assert!(panel.controls().is_empty());
        assert!(panel.folders().is_empty());
        assert_eq!(panel.title(), "Folds");
    }
}
