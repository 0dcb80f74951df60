//! Helpers shared by widget unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use qrcraft_business::{
    ClipboardError, ClipboardWriter, DirectorySaver, LogNotifier, PngQrEncoder, QrRenderSession,
};

/// Clipboard that accepts everything and keeps nothing.
pub struct NullClipboard;

#[async_trait]
impl ClipboardWriter for NullClipboard {
    async fn write_image(&self, _bytes: &[u8], _mime_type: &str) -> Result<(), ClipboardError> {
        Ok(())
    }
}

/// A session with the real encoder. Must be called inside a tokio runtime.
pub fn test_session() -> QrRenderSession {
    QrRenderSession::builder()
        .encoder(Arc::new(PngQrEncoder))
        .clipboard(Arc::new(NullClipboard))
        .saver(Arc::new(DirectorySaver::new(std::env::temp_dir())))
        .notifier(Arc::new(LogNotifier))
        .runtime(tokio::runtime::Handle::current())
        .build()
}
