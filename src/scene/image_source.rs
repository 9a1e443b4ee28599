//! Where a layer image comes from, and how it is decoded.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use image::RgbaImage;
use regex::Regex;

use crate::error::FoldviewError;

/// Trailing `name.ext` of a path or URL.
static FILE_NAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_\-\.]+\.[A-Za-z0-9]+$").ok());

/// Demo layer shipped with the original pop-up page set.
pub const DEMO_IMAGE_URL: &str = "https://ghcdn.rawgit.org/agoldstein03/HUGS/main/layers/Page_10_materials_0003s_0000_Color-Fill-14.png";

/// A loadable image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Local file.
    File(PathBuf),
    /// Remote HTTP(S) resource.
    Url(String),
}

impl ImageSource {
    /// Classify a command-line argument as a URL or a file path.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_owned())
        } else {
            Self::File(PathBuf::from(input))
        }
    }

    /// Display label: the file name for local files, the trailing
    /// `name.ext` for URLs. `None` when nothing name-like can be found.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Self::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Self::Url(url) => extract_label(url).map(str::to_owned),
        }
    }

    /// Read and decode the image into RGBA8.
    ///
    /// # Errors
    ///
    /// Returns [`FoldviewError::ImageLoad`] if the source cannot be read or
    /// decoded.
    pub fn decode(&self) -> Result<RgbaImage, FoldviewError> {
        let fail = |reason: String| FoldviewError::ImageLoad {
            source: self.to_string(),
            reason,
        };
        match self {
            Self::File(path) => image::open(path)
                .map(image::DynamicImage::into_rgba8)
                .map_err(|e| fail(e.to_string())),
            Self::Url(url) => {
                let bytes = fetch(url).map_err(&fail)?;
                image::load_from_memory(&bytes)
                    .map(image::DynamicImage::into_rgba8)
                    .map_err(|e| fail(e.to_string()))
            }
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Trailing `name.ext` of a path, matching `[A-Za-z0-9_\-.]+\.[A-Za-z0-9]+$`.
#[must_use]
pub fn extract_label(path: &str) -> Option<&str> {
    FILE_NAME_PATTERN
        .as_ref()?
        .find(path)
        .map(|m| m.as_str())
}

#[cfg(feature = "remote")]
fn fetch(url: &str) -> Result<Vec<u8>, String> {
    /// Upper bound on a downloaded layer.
    const MAX_BYTES: u64 = 64 * 1024 * 1024;

    log::info!("Downloading {url}");
    ureq::get(url)
        .call()
        .map_err(|e| e.to_string())?
        .into_body()
        .with_config()
        .limit(MAX_BYTES)
        .read_to_vec()
        .map_err(|e| e.to_string())
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &str) -> Result<Vec<u8>, String> {
    Err(format!(
        "cannot fetch {url}: built without the `remote` feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trailing_file_name() {
        assert_eq!(
            extract_label("https://host/layers/Page_10-fill.png"),
            Some("Page_10-fill.png")
        );
        assert_eq!(extract_label("blob:abc/x.y.jpeg"), Some("x.y.jpeg"));
    }

    #[test]
    fn no_extension_means_no_label() {
        assert_eq!(extract_label("https://host/layers/"), None);
        assert_eq!(extract_label("noextension"), None);
        assert_eq!(extract_label("bad.ext_"), None);
    }

    #[test]
    fn file_label_is_file_name() {
        let src = ImageSource::File(PathBuf::from("/tmp/pages/cover art.png"));
        assert_eq!(src.label().as_deref(), Some("cover art.png"));
    }

    #[test]
    fn parse_classifies_urls() {
        assert!(matches!(
            ImageSource::parse(DEMO_IMAGE_URL),
            ImageSource::Url(_)
        ));
        assert!(matches!(
            ImageSource::parse("layers/a.png"),
            ImageSource::File(_)
        ));
        assert_eq!(
            ImageSource::parse(DEMO_IMAGE_URL).label().as_deref(),
            Some("Page_10_materials_0003s_0000_Color-Fill-14.png")
        );
    }

    #[test]
    fn missing_file_reports_image_load() {
        let src = ImageSource::File(PathBuf::from("/definitely/not/here.png"));
        let err = src.decode().unwrap_err();
        assert!(matches!(err, FoldviewError::ImageLoad { .. }));
        assert!(err.to_string().contains("here.png"));
    }
}
