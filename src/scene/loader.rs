//! Background image decoding.
//!
//! Decoding a page-sized PNG takes long enough to drop frames, so the
//! main thread only queues [`ImageSource`]s here and later collects the
//! finished RGBA buffers. Results for materials disposed in the meantime
//! are dropped on collection.

use std::sync::mpsc;

use image::RgbaImage;

use super::image_source::ImageSource;
use super::{MaterialId, Scene, TextureState};
use crate::error::FoldviewError;

enum LoadRequest {
    Decode {
        material: MaterialId,
        source: ImageSource,
    },
    Shutdown,
}

/// Outcome of one decode.
pub struct LoadResult {
    /// Material the image was requested for.
    pub material: MaterialId,
    /// Decoded pixels or the failure.
    pub image: Result<RgbaImage, FoldviewError>,
}

/// Worker thread that decodes images off the main thread.
pub struct TextureLoader {
    request_tx: mpsc::Sender<LoadRequest>,
    result_rx: mpsc::Receiver<LoadResult>,
    in_flight: usize,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl TextureLoader {
    /// Spawn the decode thread.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::ThreadSpawn`] if the thread fails to spawn.
    pub fn new() -> Result<Self, FoldviewError> {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel::<LoadResult>();

        let thread = std::thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || Self::thread_loop(&request_rx, &result_tx))
            .map_err(FoldviewError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            result_rx,
            in_flight: 0,
            thread: Some(thread),
        })
    }

    /// Queue a decode (non-blocking).
    pub fn request(&mut self, material: MaterialId, source: ImageSource) {
        log::debug!("Queueing decode of {source} for material {}", material.0);
        if self
            .request_tx
            .send(LoadRequest::Decode { material, source })
            .is_ok()
        {
            self.in_flight += 1;
        }
    }

    /// Queue a decode for every material still waiting on an image and mark
    /// them as loading.
    pub fn request_pending(&mut self, scene: &mut Scene) {
        let pending: Vec<(MaterialId, ImageSource)> = scene
            .materials()
            .filter(|(_, m)| m.state == TextureState::Pending)
            .filter_map(|(id, m)| match &m.texture {
                super::TextureSource::Image(source) => {
                    Some((id, source.clone()))
                }
                super::TextureSource::Generated(_) => None,
            })
            .collect();
        for (id, source) in pending {
            self.request(id, source);
            scene.set_texture_state(id, TextureState::Loading);
        }
    }

    /// Number of decodes requested but not yet collected.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Non-blocking: every decode finished since the last call.
    pub fn poll(&mut self) -> Vec<LoadResult> {
        let results: Vec<LoadResult> = self.result_rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    /// Collect finished decodes into `scene`.
    ///
    /// Successful decodes for live materials are returned for upload and
    /// their material marked ready. Failures are logged and marked failed.
    /// Results for disposed materials are discarded.
    pub fn collect(&mut self, scene: &mut Scene) -> Vec<(MaterialId, RgbaImage)> {
        let mut ready = Vec::new();
        for LoadResult { material, image } in self.poll() {
            if scene.material(material).is_none() {
                log::debug!(
                    "Discarding decode for disposed material {}",
                    material.0
                );
                continue;
            }
            match image {
                Ok(image) => {
                    scene.set_texture_state(material, TextureState::Ready);
                    ready.push((material, image));
                }
                Err(e) => {
                    log::error!("{e}");
                    scene.set_texture_state(material, TextureState::Failed);
                }
            }
        }
        ready
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(LoadRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        request_rx: &mpsc::Receiver<LoadRequest>,
        result_tx: &mpsc::Sender<LoadResult>,
    ) {
        while let Ok(request) = request_rx.recv() {
            match request {
                LoadRequest::Shutdown => break,
                LoadRequest::Decode { material, source } => {
                    let image = source.decode();
                    if let Ok(ref decoded) = image {
                        log::info!(
                            "Decoded {source} ({}x{})",
                            decoded.width(),
                            decoded.height()
                        );
                    }
                    if result_tx.send(LoadResult { material, image }).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::scene::{Material, TextureSource};

    fn write_png(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("foldview-loader-{}-{name}", std::process::id()));
        let image = RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        image.save(&path).unwrap();
        path
    }

    fn collect_until(
        loader: &mut TextureLoader,
        scene: &mut Scene,
    ) -> Vec<(MaterialId, RgbaImage)> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut out = Vec::new();
        while loader.in_flight() > 0 && Instant::now() < deadline {
            out.extend(loader.collect(scene));
            std::thread::sleep(Duration::from_millis(5));
        }
        out
    }

    fn image_material(source: ImageSource) -> Material {
        let mut material = Material::new("page", TextureSource::Image(source));
        material.has_alpha = true;
        material
    }

    #[test]
    fn decodes_pending_materials() {
        let path = write_png("ok.png");
        let mut scene = Scene::new();
        let id = scene.add_material(image_material(ImageSource::File(path.clone())));
        let mut loader = TextureLoader::new().unwrap();

        loader.request_pending(&mut scene);
        assert_eq!(scene.material(id).unwrap().state, TextureState::Loading);

        let ready = collect_until(&mut loader, &mut scene);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].0, id);
        assert_eq!(ready[0].1.dimensions(), (4, 2));
        assert_eq!(scene.material(id).unwrap().state, TextureState::Ready);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn results_for_disposed_materials_are_discarded() {
        let path = write_png("gone.png");
        let mut scene = Scene::new();
        let id = scene.add_material(image_material(ImageSource::File(path.clone())));
        let mut loader = TextureLoader::new().unwrap();

        loader.request_pending(&mut scene);
        let _ = scene.dispose_material(id);

        assert!(collect_until(&mut loader, &mut scene).is_empty());
        assert_eq!(loader.in_flight(), 0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn decode_failure_marks_material_failed() {
        let mut scene = Scene::new();
        let id = scene.add_material(image_material(ImageSource::File(
            PathBuf::from("/no/such/layer.png"),
        )));
        let mut loader = TextureLoader::new().unwrap();

        loader.request_pending(&mut scene);
        assert!(collect_until(&mut loader, &mut scene).is_empty());
        assert_eq!(scene.material(id).unwrap().state, TextureState::Failed);
    }

    #[test]
    fn generated_textures_are_not_queued() {
        let mut scene = Scene::new();
        let id = scene.add_material(Material::new(
            "label",
            TextureSource::Generated(RgbaImage::new(2, 2)),
        ));
        let mut loader = TextureLoader::new().unwrap();
        loader.request_pending(&mut scene);
        assert_eq!(loader.in_flight(), 0);
        assert_eq!(scene.material(id).unwrap().state, TextureState::Pending);
    }
}
