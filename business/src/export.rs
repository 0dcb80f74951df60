//! Export surfaces: writing the rendered image to the clipboard or to a file.
//!
//! Both are collaborators of the session. Platform implementations live in the
//! UI crate; [`DirectorySaver`] is a plain file-system saver.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{ClipboardError, SaveError};

/// File name offered for downloaded codes.
pub const DOWNLOAD_FILENAME: &str = "qrcode.png";

/// Writes an encoded image to the system clipboard.
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_image(&self, bytes: &[u8], mime_type: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The user dismissed the save dialog.
    Cancelled,
}

/// Persists image bytes under a suggested file name.
#[async_trait]
pub trait ImageSaver: Send + Sync {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<SaveOutcome, SaveError>;
}

/// Saves into a fixed directory, overwriting existing files.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ImageSaver for DirectorySaver {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<SaveOutcome, SaveError> {
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SaveError::Io {
                path: path.display().to_string(),
                source,
            })?;

        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(SaveOutcome::Saved(path))
    }
}
