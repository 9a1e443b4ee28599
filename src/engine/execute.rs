//! Command dispatch for FoldEngine.

use super::command::FoldCommand;
use super::FoldEngine;
use crate::panel::PanelError;
use crate::stage::StageRequest;

impl FoldEngine {
    /// Apply one command.
    ///
    /// Returns a [`StageRequest`] when the host has to act (e.g. open the
    /// file picker). Rejected control values are logged and dropped.
    ///
    /// # Example
    ///
    /// ```ignore
    /// if let Some(StageRequest::PickFiles) = engine.execute(FoldCommand::Upload) {
    ///     let sources = pick_images();
    ///     let _ = engine.execute(FoldCommand::LoadImages { sources });
    /// }
    /// ```
    pub fn execute(&mut self, cmd: FoldCommand) -> Option<StageRequest> {
        match cmd {
            // ── Camera ──
            FoldCommand::RotateCamera { delta } => {
                self.camera_controller.rotate(delta);
            }
            FoldCommand::PanCamera { delta } => {
                self.camera_controller.pan(delta);
            }
            FoldCommand::Zoom { delta } => self.camera_controller.zoom(delta),
            FoldCommand::RecenterCamera => self.camera_controller.recenter(),

            // ── Stage ──
            FoldCommand::ToggleAxes => self.stage.toggle_axes(),
            FoldCommand::SetControl { id, value } => {
                return log_rejected(self.stage.set_control(id, value));
            }
            FoldCommand::FireControl { id } => {
                return log_rejected(self.stage.fire(id));
            }
            FoldCommand::LoadImages { sources } => {
                let _ = self.stage.load_images(sources);
            }
            FoldCommand::Upload => {
                let upload = self.stage.root_controls().upload;
                return log_rejected(self.stage.fire(upload));
            }
        }
        None
    }
}

fn log_rejected(
    result: Result<Option<StageRequest>, PanelError>,
) -> Option<StageRequest> {
    result.unwrap_or_else(|e| {
        log::warn!("Rejected control change: {e}");
        None
    })
}
