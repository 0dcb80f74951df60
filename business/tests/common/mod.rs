//! Scripted collaborators for driving a `QrRenderSession` in tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qrcraft_business::{
    ClipboardError, ClipboardWriter, EncodeError, EncodeOptions, ImageSaver, QrEncoder,
    Notification, NotificationSink, QrRenderSession, RenderedImage, SaveError, SaveOutcome,
    SessionConfig,
};

/// Encoder whose latency and outcome are scripted per payload.
#[derive(Default)]
pub struct ScriptedEncoder {
    delays: Mutex<HashMap<String, Duration>>,
    failing: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self, payload: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(payload.to_owned(), delay);
    }

    pub fn fail_on(&self, payload: &str) {
        self.failing.lock().unwrap().push(payload.to_owned());
    }

    /// Payloads received, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QrEncoder for ScriptedEncoder {
    async fn encode(
        &self,
        payload: &str,
        _options: &EncodeOptions,
    ) -> Result<RenderedImage, EncodeError> {
        self.calls.lock().unwrap().push(payload.to_owned());

        let delay = self.delays.lock().unwrap().get(payload).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().iter().any(|p| p == payload) {
            return Err(EncodeError::qr(payload.len(), "scripted failure"));
        }

        Ok(RenderedImage::new(
            payload.as_bytes().to_vec(),
            300,
            300,
            payload,
        ))
    }
}

#[derive(Default)]
pub struct MockClipboard {
    fail: bool,
    writes: Mutex<Vec<(Vec<u8>, String)>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<(Vec<u8>, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipboardWriter for MockClipboard {
    async fn write_image(&self, bytes: &[u8], mime_type: &str) -> Result<(), ClipboardError> {
        self.writes
            .lock()
            .unwrap()
            .push((bytes.to_vec(), mime_type.to_owned()));
        if self.fail {
            Err(ClipboardError::AccessError("permission denied".to_owned()))
        } else {
            Ok(())
        }
    }
}

pub enum SaverBehaviour {
    Save,
    Cancel,
    Fail,
}

pub struct MockSaver {
    behaviour: SaverBehaviour,
    saves: Mutex<Vec<(Vec<u8>, String)>>,
}

impl MockSaver {
    pub fn new(behaviour: SaverBehaviour) -> Self {
        Self {
            behaviour,
            saves: Mutex::new(Vec::new()),
        }
    }

    pub fn saves(&self) -> Vec<(Vec<u8>, String)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSaver for MockSaver {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<SaveOutcome, SaveError> {
        self.saves
            .lock()
            .unwrap()
            .push((bytes.to_vec(), filename.to_owned()));
        match self.behaviour {
            SaverBehaviour::Save => Ok(SaveOutcome::Saved(PathBuf::from("/tmp").join(filename))),
            SaverBehaviour::Cancel => Ok(SaveOutcome::Cancelled),
            SaverBehaviour::Fail => Err(SaveError::Io {
                path: filename.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            }),
        }
    }
}

/// Sink that keeps every notification in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    recorded: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Notification> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn destructive_count(&self) -> usize {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.is_destructive())
            .count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.recorded.lock().unwrap().push(notification);
    }
}

/// A session wired to scripted collaborators, with handles to inspect them.
pub struct TestSession {
    pub session: QrRenderSession,
    pub encoder: Arc<ScriptedEncoder>,
    pub clipboard: Arc<MockClipboard>,
    pub saver: Arc<MockSaver>,
    pub notifier: Arc<RecordingNotifier>,
}

pub struct TestSessionBuilder {
    config: SessionConfig,
    clipboard: MockClipboard,
    saver: SaverBehaviour,
}

impl TestSessionBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clipboard(mut self, clipboard: MockClipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn saver(mut self, saver: SaverBehaviour) -> Self {
        self.saver = saver;
        self
    }

    /// Must be called from within a tokio runtime.
    pub fn build(self) -> TestSession {
        let _ = env_logger::builder().is_test(true).try_init();

        let encoder = Arc::new(ScriptedEncoder::new());
        let clipboard = Arc::new(self.clipboard);
        let saver = Arc::new(MockSaver::new(self.saver));
        let notifier = Arc::new(RecordingNotifier::new());

        let session = QrRenderSession::builder()
            .encoder(encoder.clone())
            .clipboard(clipboard.clone())
            .saver(saver.clone())
            .notifier(notifier.clone())
            .runtime(tokio::runtime::Handle::current())
            .config(self.config)
            .build();

        TestSession {
            session,
            encoder,
            clipboard,
            saver,
            notifier,
        }
    }
}

impl TestSession {
    pub fn builder() -> TestSessionBuilder {
        TestSessionBuilder {
            config: SessionConfig::default(),
            clipboard: MockClipboard::new(),
            saver: SaverBehaviour::Save,
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Sets the input and waits until its encode outcome is applied.
    pub async fn render(&mut self, text: &str) {
        self.session.on_input_changed(text);
        self.session.process_next().await;
    }

    pub fn current_payload(&self) -> Option<String> {
        self.session.image().map(|image| image.payload().to_owned())
    }
}
