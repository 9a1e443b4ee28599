//! Control-panel model: folders of typed controls bound to named
//! parameters.
//!
//! The panel is plain data. It does not render anything; the GUI layer
//! serializes a [`PanelSnapshot`] and pushes it to the webview, and feeds
//! user edits back through [`Panel::set_value`].

mod control;

use std::fmt;

pub use control::{Control, ControlId, ControlKind, ControlValue, FolderId};
use serde::Serialize;

/// Errors from panel operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    /// No control with this id is registered.
    UnknownControl(ControlId),
    /// No folder with this id is registered.
    UnknownFolder(FolderId),
    /// The value's type does not fit the control kind.
    TypeMismatch {
        /// Control that rejected the value.
        id: ControlId,
        /// Rejected value.
        value: ControlValue,
    },
    /// The choice is not one of an enumerated control's options.
    UnknownOption {
        /// Control that rejected the choice.
        id: ControlId,
        /// Rejected option.
        option: String,
    },
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownControl(id) => write!(f, "unknown control {}", id.0),
            Self::UnknownFolder(id) => write!(f, "unknown folder {}", id.0),
            Self::TypeMismatch { id, value } => {
                write!(f, "control {} cannot hold {value:?}", id.0)
            }
            Self::UnknownOption { id, option } => {
                write!(f, "control {} has no option {option:?}", id.0)
            }
        }
    }
}

impl std::error::Error for PanelError {}

/// A named group of controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    /// Stable handle.
    pub id: FolderId,
    /// Title shown in the folder header.
    pub name: String,
}

/// Control panel: root controls plus an ordered list of folders.
#[derive(Debug, Clone)]
pub struct Panel {
    title: String,
    folders: Vec<Folder>,
    controls: Vec<Control>,
    next_id: u32,
    revision: u64,
    value_revision: u64,
}

/// Serializable view of the panel consumed by the UI.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot<'a> {
    /// Panel title.
    pub title: &'a str,
    /// Structural revision.
    pub revision: u64,
    /// Value revision the snapshot's values reflect.
    pub value_revision: u64,
    /// Controls that belong to no folder.
    pub controls: Vec<&'a Control>,
    /// Folders in registration order, each with its controls.
    pub folders: Vec<FolderSnapshot<'a>>,
}

/// A single control's new value, pushed without the full snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueUpdate<'a> {
    /// Control that changed.
    pub id: ControlId,
    /// Value now stored.
    pub value: &'a ControlValue,
}

/// One folder inside a [`PanelSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct FolderSnapshot<'a> {
    /// Folder handle.
    pub id: FolderId,
    /// Folder title.
    pub name: &'a str,
    /// Controls in registration order.
    pub controls: Vec<&'a Control>,
}

impl Panel {
    /// Create an empty panel.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            folders: Vec::new(),
            controls: Vec::new(),
            next_id: 1,
            revision: 0,
            value_revision: 0,
        }
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Title shown at the top of the panel.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Structural revision: bumps when folders or controls are added,
    /// removed or renamed.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Value revision: bumps on every accepted [`set_value`](Self::set_value).
    #[must_use]
    pub fn value_revision(&self) -> u64 {
        self.value_revision
    }

    /// Controls whose value changed after value revision `since`, in
    /// registration order.
    pub fn values_changed_since(
        &self,
        since: u64,
    ) -> impl Iterator<Item = ValueUpdate<'_>> {
        self.controls
            .iter()
            .filter(move |c| c.changed_at > since)
            .map(|c| ValueUpdate {
                id: c.id,
                value: &c.value,
            })
    }

    /// Add a folder at the end of the folder list.
    pub fn add_folder(&mut self, name: impl Into<String>) -> FolderId {
        let id = FolderId(self.allocate());
        self.folders.push(Folder {
            id,
            name: name.into(),
        });
        self.touch();
        id
    }

    /// Remove a folder and every control inside it.
    pub fn remove_folder(&mut self, id: FolderId) -> Result<(), PanelError> {
        let before = self.folders.len();
        self.folders.retain(|f| f.id != id);
        if self.folders.len() == before {
            return Err(PanelError::UnknownFolder(id));
        }
        self.controls.retain(|c| c.folder != Some(id));
        self.touch();
        Ok(())
    }

    /// Bind a control to `property`, placed in `folder` (or the root).
    ///
    /// The display name defaults to the property key. Values that do not fit
    /// the kind fall back to the kind's neutral value.
    pub fn bind(
        &mut self,
        folder: Option<FolderId>,
        property: impl Into<String>,
        kind: ControlKind,
        initial: ControlValue,
    ) -> Result<ControlId, PanelError> {
        if let Some(fid) = folder {
            if !self.folders.iter().any(|f| f.id == fid) {
                return Err(PanelError::UnknownFolder(fid));
            }
        }
        let value = kind
            .coerce(initial)
            .unwrap_or_else(|| neutral_value(&kind));
        let property = property.into();
        let id = ControlId(self.allocate());
        self.controls.push(Control {
            id,
            name: property.clone(),
            property,
            kind,
            value,
            folder,
            changed_at: 0,
        });
        self.touch();
        Ok(id)
    }

    /// Set the display name of a control.
    pub fn rename(
        &mut self,
        id: ControlId,
        name: impl Into<String>,
    ) -> Result<(), PanelError> {
        let control = self.control_mut(id)?;
        control.name = name.into();
        self.touch();
        Ok(())
    }

    /// Remove a single control.
    pub fn remove_control(&mut self, id: ControlId) -> Result<(), PanelError> {
        let before = self.controls.len();
        self.controls.retain(|c| c.id != id);
        if self.controls.len() == before {
            return Err(PanelError::UnknownControl(id));
        }
        self.touch();
        Ok(())
    }

    /// Validate and store a new value, returning what was stored (ranges
    /// clamp).
    pub fn set_value(
        &mut self,
        id: ControlId,
        value: ControlValue,
    ) -> Result<ControlValue, PanelError> {
        let control = self.control_mut(id)?;
        let Some(stored) = control.kind.coerce(value.clone()) else {
            return Err(match (&control.kind, value) {
                (ControlKind::Enumerated { .. }, ControlValue::Choice(option)) => {
                    PanelError::UnknownOption { id, option }
                }
                (_, value) => PanelError::TypeMismatch { id, value },
            });
        };
        self.value_revision += 1;
        let revision = self.value_revision;
        let control = self.control_mut(id)?;
        control.value = stored.clone();
        control.changed_at = revision;
        Ok(stored)
    }

    /// Look up a control.
    #[must_use]
    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    fn control_mut(&mut self, id: ControlId) -> Result<&mut Control, PanelError> {
        self.controls
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(PanelError::UnknownControl(id))
    }

    /// Current value of a control.
    #[must_use]
    pub fn value(&self, id: ControlId) -> Option<&ControlValue> {
        self.control(id).map(|c| &c.value)
    }

    /// Look up a folder.
    #[must_use]
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Folders in registration order.
    #[must_use]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// All controls (root and foldered) in registration order.
    #[must_use]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Controls inside `folder` (or the root when `None`).
    pub fn controls_in(
        &self,
        folder: Option<FolderId>,
    ) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(move |c| c.folder == folder)
    }

    /// Borrowing snapshot for serialization.
    #[must_use]
    pub fn snapshot(&self) -> PanelSnapshot<'_> {
        PanelSnapshot {
            title: &self.title,
            revision: self.revision,
            value_revision: self.value_revision,
            controls: self.controls_in(None).collect(),
            folders: self
                .folders
                .iter()
                .map(|f| FolderSnapshot {
                    id: f.id,
                    name: &f.name,
                    controls: self.controls_in(Some(f.id)).collect(),
                })
                .collect(),
        }
    }
}

fn neutral_value(kind: &ControlKind) -> ControlValue {
    match kind {
        ControlKind::Range { min, .. } => ControlValue::Number(*min),
        ControlKind::Boolean => ControlValue::Bool(false),
        ControlKind::Enumerated { options } => options
            .first()
            .cloned()
            .map_or(ControlValue::None, ControlValue::Choice),
        ControlKind::Action => ControlValue::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_places_controls_in_folders() {
        let mut panel = Panel::new("Folds");
        let root = panel
            .bind(None, "show", ControlKind::Boolean, false.into())
            .unwrap();
        let folder = panel.add_folder("page.png");
        let offset = panel
            .bind(
                Some(folder),
                "offset",
                ControlKind::range(0.0, 9.0),
                0.0.into(),
            )
            .unwrap();

        assert_eq!(panel.controls_in(None).count(), 1);
        assert_eq!(panel.controls_in(Some(folder)).count(), 1);
        assert_eq!(panel.control(root).unwrap().name, "show");
        assert_eq!(panel.control(offset).unwrap().folder, Some(folder));
    }

    #[test]
    fn bind_into_missing_folder_fails() {
        let mut panel = Panel::new("p");
        let err = panel
            .bind(Some(FolderId(99)), "x", ControlKind::Boolean, true.into())
            .unwrap_err();
        assert_eq!(err, PanelError::UnknownFolder(FolderId(99)));
    }

    #[test]
    fn initial_value_of_wrong_type_falls_back() {
        let mut panel = Panel::new("p");
        let id = panel
            .bind(
                None,
                "offset",
                ControlKind::range(1.0, 2.0),
                ControlValue::Choice("nope".into()),
            )
            .unwrap();
        assert_eq!(panel.value(id), Some(&ControlValue::Number(1.0)));
    }

    #[test]
    fn set_value_clamps_and_rejects() {
        let mut panel = Panel::new("p");
        let id = panel
            .bind(None, "offset", ControlKind::range(0.0, 4.5), 0.0.into())
            .unwrap();
        let stored = panel.set_value(id, 10.0.into()).unwrap();
        assert_eq!(stored, ControlValue::Number(4.5));
        assert!(matches!(
            panel.set_value(id, ControlValue::Choice("x".into())),
            Err(PanelError::TypeMismatch { .. })
        ));
        assert_eq!(
            panel.set_value(ControlId(1234), 1.0.into()),
            Err(PanelError::UnknownControl(ControlId(1234)))
        );
    }

    #[test]
    fn enumerated_rejects_unlisted_option() {
        let mut panel = Panel::new("p");
        let id = panel
            .bind(
                None,
                "side",
                ControlKind::Enumerated {
                    options: vec!["front".into(), "back".into()],
                },
                ControlValue::Choice("back".into()),
            )
            .unwrap();
        assert_eq!(
            panel.set_value(id, ControlValue::Choice("left".into())),
            Err(PanelError::UnknownOption {
                id,
                option: "left".into()
            })
        );
        assert_eq!(panel.value(id), Some(&ControlValue::Choice("back".into())));
    }

    #[test]
    fn remove_folder_drops_its_controls() {
        let mut panel = Panel::new("p");
        let keep = panel
            .bind(None, "show", ControlKind::Boolean, false.into())
            .unwrap();
        let folder = panel.add_folder("a");
        for key in ["visible", "top", "offset"] {
            let _ = panel
                .bind(Some(folder), key, ControlKind::Boolean, true.into())
                .unwrap();
        }
        assert_eq!(panel.controls().len(), 4);

        panel.remove_folder(folder).unwrap();
        assert!(panel.folders().is_empty());
        assert_eq!(panel.controls().len(), 1);
        assert!(panel.control(keep).is_some());
        assert!(panel.remove_folder(folder).is_err());
    }

    #[test]
    fn revision_bumps_on_mutation() {
        let mut panel = Panel::new("p");
        let r0 = panel.revision();
        let id = panel
            .bind(None, "x", ControlKind::Boolean, true.into())
            .unwrap();
        let r1 = panel.revision();
        panel.rename(id, "X?").unwrap();
        assert!(r1 > r0);
        assert!(panel.revision() > r1);
    }

    #[test]
    fn value_edits_leave_structure_revision_alone() {
        let mut panel = Panel::new("p");
        let folder = panel.add_folder("page.png");
        let offset = panel
            .bind(Some(folder), "offset", ControlKind::range(0.0, 4.0), 0.0.into())
            .unwrap();
        let visible = panel
            .bind(Some(folder), "visible", ControlKind::Boolean, true.into())
            .unwrap();
        let structure = panel.revision();
        let seen = panel.value_revision();

        for tick in [0.5, 1.0, 1.5] {
            let _ = panel.set_value(offset, ControlValue::Number(tick)).unwrap();
        }
        assert_eq!(panel.revision(), structure);
        assert_eq!(panel.value_revision(), seen + 3);

        let changed: Vec<_> = panel.values_changed_since(seen).collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, offset);
        assert_eq!(*changed[0].value, ControlValue::Number(1.5));

        let _ = panel.set_value(visible, false.into()).unwrap();
        let latest: Vec<ControlId> = panel
            .values_changed_since(seen + 3)
            .map(|u| u.id)
            .collect();
        assert_eq!(latest, [visible]);

        // Rejected values do not count as changes.
        assert!(panel
            .set_value(visible, ControlValue::Choice("x".into()))
            .is_err());
        assert_eq!(panel.value_revision(), seen + 4);
        let json = serde_json::to_value(
            panel.values_changed_since(seen).collect::<Vec<_>>(),
        )
        .unwrap();
        assert_eq!(json[0]["id"], offset.0);
        assert_eq!(json[1]["value"], false);
    }

    #[test]
    fn snapshot_groups_by_folder() {
        let mut panel = Panel::new("Folds");
        let _ = panel
            .bind(None, "load", ControlKind::Action, ControlValue::None)
            .unwrap();
        let a = panel.add_folder("a.png");
        let b = panel.add_folder("b.png");
        let _ = panel
            .bind(Some(b), "visible", ControlKind::Boolean, true.into())
            .unwrap();

        let json = serde_json::to_value(panel.snapshot()).unwrap();
        assert_eq!(json["title"], "Folds");
        assert_eq!(json["controls"].as_array().unwrap().len(), 1);
        assert_eq!(json["controls"][0]["kind"]["type"], "action");
        assert_eq!(json["folders"][0]["id"], a.0);
        assert_eq!(json["folders"][0]["controls"].as_array().unwrap().len(), 0);
        assert_eq!(json["folders"][1]["name"], "b.png");
        assert_eq!(json["folders"][1]["controls"][0]["value"], true);
    }
}
