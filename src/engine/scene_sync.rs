//! Texture uploads and scene-to-renderer synchronization.

use super::FoldEngine;
use crate::scene::{MaterialId, TextureSource, TextureState};

impl FoldEngine {
    /// Upload rasterized label textures that have not reached the GPU yet.
    pub(super) fn upload_generated_textures(&mut self) {
        let pending: Vec<MaterialId> = self
            .stage
            .scene()
            .materials()
            .filter(|(_, m)| {
                m.state == TextureState::Pending
                    && matches!(m.texture, TextureSource::Generated(_))
            })
            .map(|(id, _)| id)
            .collect();

        for id in pending {
            if let Some(material) = self.stage.scene().material(id) {
                if let TextureSource::Generated(image) = &material.texture {
                    self.surfaces
                        .upload_texture(&self.context, id, material, image);
                }
            }
            self.stage
                .scene_mut()
                .set_texture_state(id, TextureState::Ready);
        }
    }

    /// Queue newly created image materials and upload finished decodes.
    pub(super) fn apply_loaded_textures(&mut self) {
        self.loader.request_pending(self.stage.scene_mut());
        let loaded = self.loader.collect(self.stage.scene_mut());
        if loaded.is_empty() {
            return;
        }
        log::debug!(
            "Uploading {} texture(s), {} still decoding",
            loaded.len(),
            self.loader.in_flight()
        );
        for (id, image) in loaded {
            if let Some(material) = self.stage.scene().material(id) {
                self.surfaces
                    .upload_texture(&self.context, id, material, &image);
            }
        }
    }

    /// Push scene changes to the renderers when the scene has been
    /// modified since the last frame.
    pub(super) fn sync_scene(&mut self) {
        let generation = self.stage.scene().generation();
        if self.synced_generation == Some(generation) {
            return;
        }
        let scene = self.stage.scene();
        self.surfaces.sync(&self.context, scene);
        self.lines.sync(&self.context, scene);
        self.synced_generation = Some(generation);
    }
}
