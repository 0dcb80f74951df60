//! Saving rendered codes through a native "Save as" dialog.
//!
//! The dialog is abstracted behind [`SavePathPrompt`] so tests can substitute a
//! fixed destination for the system dialog.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use qrcraft_business::{ImageSaver, SaveError, SaveOutcome};

/// Asks the user where a file should be written.
pub trait SavePathPrompt: Send + Sync {
    /// Returns `None` when the user dismisses the prompt.
    fn prompt(&self, suggested_name: &str) -> Option<PathBuf>;
}

/// Native save dialog via `rfd`, restricted to PNG files.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdSavePrompt;

impl SavePathPrompt for RfdSavePrompt {
    fn prompt(&self, suggested_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save QR code")
            .add_filter("PNG image", &["png"])
            .set_file_name(suggested_name)
            .save_file()
    }
}

/// [`ImageSaver`] that prompts for a destination, then writes the bytes there.
#[derive(Clone)]
pub struct DialogSaver {
    prompt: Arc<dyn SavePathPrompt>,
}

impl Default for DialogSaver {
    fn default() -> Self {
        Self::new(Arc::new(RfdSavePrompt))
    }
}

impl DialogSaver {
    pub fn new(prompt: Arc<dyn SavePathPrompt>) -> Self {
        Self { prompt }
    }
}

#[async_trait]
impl ImageSaver for DialogSaver {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<SaveOutcome, SaveError> {
        let prompt = Arc::clone(&self.prompt);
        let suggested = filename.to_owned();

        // rfd dialogs block the calling thread until dismissed.
        let path = tokio::task::spawn_blocking(move || prompt.prompt(&suggested))
            .await
            .map_err(|e| SaveError::Task(e.to_string()))?;

        let Some(path) = path else {
            log::debug!("Save dialog dismissed");
            return Ok(SaveOutcome::Cancelled);
        };

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SaveError::Io {
                path: path.display().to_string(),
                source,
            })?;

        log::info!("Saved QR code to {}", path.display());
        Ok(SaveOutcome::Saved(path))
    }
}
