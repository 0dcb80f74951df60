#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use egui::accesskit::Role;
use egui_kittest::Harness;
use kittest::Queryable;
use qrcraft_business::{
    ClipboardError, ClipboardWriter, EncodeError, EncodeOptions, ImageSaver, QrEncoder,
    RenderedImage, SaveError, SaveOutcome, SessionConfig,
};
use qrcraft_ui::QrCraftApp;
use qrcraft_ui::state::State;

/// Frames to run after an outcome is queued so it reaches the screen.
pub const UI_PROPAGATION_FRAMES: usize = 3;

#[derive(Default)]
pub struct MockClipboard {
    pub fail: bool,
    pub writes: Mutex<Vec<String>>,
}

#[async_trait]
impl ClipboardWriter for MockClipboard {
    async fn write_image(&self, _bytes: &[u8], mime_type: &str) -> Result<(), ClipboardError> {
        self.writes.lock().unwrap().push(mime_type.to_owned());
        if self.fail {
            Err(ClipboardError::AccessError("denied".to_owned()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct MockSaver {
    pub fail: bool,
    pub saves: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageSaver for MockSaver {
    async fn save(&self, _bytes: &[u8], filename: &str) -> Result<SaveOutcome, SaveError> {
        self.saves.lock().unwrap().push(filename.to_owned());
        if self.fail {
            Err(SaveError::Task("disk full".to_owned()))
        } else {
            Ok(SaveOutcome::Saved(PathBuf::from(filename)))
        }
    }
}

/// Encoder that rejects every payload.
pub struct BrokenEncoder;

#[async_trait]
impl QrEncoder for BrokenEncoder {
    async fn encode(
        &self,
        payload: &str,
        _options: &EncodeOptions,
    ) -> Result<RenderedImage, EncodeError> {
        Err(EncodeError::qr(payload.len(), "broken encoder"))
    }
}

pub struct TestCtx<'a> {
    harness: Harness<'a, QrCraftApp>,
    pub clipboard: Arc<MockClipboard>,
    pub saver: Arc<MockSaver>,
}

pub struct TestCtxOptions {
    pub config: SessionConfig,
    pub clipboard: MockClipboard,
    pub saver: MockSaver,
    pub encoder: Option<Arc<dyn QrEncoder>>,
}

impl Default for TestCtxOptions {
    fn default() -> Self {
        Self {
            config: SessionConfig::default(),
            clipboard: MockClipboard::default(),
            saver: MockSaver::default(),
            encoder: None,
        }
    }
}

impl<'a> TestCtx<'a> {
    /// Must be called from within a tokio runtime.
    pub fn new_app() -> Self {
        Self::with_options(TestCtxOptions::default())
    }

    pub fn with_options(options: TestCtxOptions) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let clipboard = Arc::new(options.clipboard);
        let saver = Arc::new(options.saver);

        let state = State::builder()
            .runtime(tokio::runtime::Handle::current())
            .config(options.config)
            .clipboard(clipboard.clone())
            .saver(saver.clone())
            .maybe_encoder(options.encoder)
            .build();
        let app = QrCraftApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            harness,
            clipboard,
            saver,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, QrCraftApp> {
        &mut self.harness
    }

    pub fn harness(&self) -> &Harness<'a, QrCraftApp> {
        &self.harness
    }

    pub fn step(&mut self, frames: usize) {
        for _ in 0..frames {
            self.harness.step();
        }
    }

    /// Waits for the next background outcome, then renders it.
    pub async fn settle(&mut self) {
        self.harness.state_mut().state.session.process_next().await;
        self.step(UI_PROPAGATION_FRAMES);
    }

    /// Types `text` into the content field.
    pub fn type_content(&mut self, text: &str) {
        // Multiline for free text, single line for url, phone and the like.
        let role = if self
            .harness
            .query_by_role(Role::MultilineTextInput)
            .is_some()
        {
            Role::MultilineTextInput
        } else {
            Role::TextInput
        };
        self.harness.get_by_role(role).focus();
        self.harness.step();
        self.harness.get_by_role(role).type_text(text);
        self.harness.step();
    }
}
