//! Errors that abort a single generation run.

use std::path::PathBuf;

use helios_render::RenderError;
use helios_system::LayoutError;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("layout generation failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GIF encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("metadata serialization failed: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("metadata log lock poisoned")]
    MetadataLock,
}

impl RunError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
