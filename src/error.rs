//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::panel::PanelError;

/// Errors produced by the foldview crate.
#[derive(Debug)]
pub enum FoldviewError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// An image layer could not be read or decoded.
    ImageLoad {
        /// Display form of the image source.
        source: String,
        /// Underlying failure.
        reason: String,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// WGSL composition failure.
    Shader(String),
    /// Control panel operation failure.
    Panel(PanelError),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for FoldviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ImageLoad { source, reason } => {
                write!(f, "failed to load image {source}: {reason}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Panel(e) => write!(f, "panel error: {e}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for FoldviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::Panel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for FoldviewError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for FoldviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PanelError> for FoldviewError {
    fn from(e: PanelError) -> Self {
        Self::Panel(e)
    }
}
