use std::sync::Arc;

use bon::bon;
use qrcraft_business::{
    ClipboardWriter, ImageSaver, PngQrEncoder, QrEncoder, QrRenderSession, SessionConfig,
};
use tokio::runtime::Handle;

use crate::utils::clipboard::SystemClipboard;
use crate::utils::file_saver::DialogSaver;
use crate::widgets::{PreviewTexture, ToastQueue};

/// The main application state.
///
/// Collaborators default to the system implementations: the `qrcode`
/// encoder, the `arboard` clipboard and an `rfd` save dialog.
pub struct State {
    /// Render session owning the input, category and current image.
    pub session: QrRenderSession,
    /// Notifications raised by the session, drawn as toasts.
    pub toasts: Arc<ToastQueue>,
    pub preview: PreviewTexture,
}

#[bon]
impl State {
    #[builder]
    pub fn new(
        runtime: Handle,
        #[builder(default)] config: SessionConfig,
        encoder: Option<Arc<dyn QrEncoder>>,
        clipboard: Option<Arc<dyn ClipboardWriter>>,
        saver: Option<Arc<dyn ImageSaver>>,
    ) -> Self {
        let toasts = Arc::new(ToastQueue::new());

        let session = QrRenderSession::builder()
            .encoder(encoder.unwrap_or_else(|| Arc::new(PngQrEncoder)))
            .clipboard(clipboard.unwrap_or_else(|| Arc::new(SystemClipboard::new())))
            .saver(saver.unwrap_or_else(|| Arc::new(DialogSaver::default())))
            .notifier(toasts.clone())
            .runtime(runtime)
            .config(config)
            .build();

        Self {
            session,
            toasts,
            preview: PreviewTexture::default(),
        }
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("session", &self.session)
            .field("toasts", &self.toasts.len())
            .field("preview", &self.preview)
            .finish()
    }
}
