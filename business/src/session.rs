//! The render session: keeps the displayed QR image in step with the input.
//!
//! All session state lives on the thread that owns the [`QrRenderSession`].
//! Encodes, clipboard writes, saves and the copy-feedback timer run as tokio
//! tasks that report back through a `flume` channel. [`QrRenderSession::sync`]
//! applies those outcomes in the order the tasks resolved, so with
//! [`StaleResults::Apply`] the last encode to resolve wins, even if it was not
//! the last one requested.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use qrcraft_business::{
//!     DirectorySaver, LogNotifier, PngQrEncoder, QrRenderSession, SessionConfig,
//! };
//! # use qrcraft_business::{ClipboardWriter, ClipboardError};
//! # struct NoClipboard;
//! # #[async_trait::async_trait]
//! # impl ClipboardWriter for NoClipboard {
//! #     async fn write_image(&self, _: &[u8], _: &str) -> Result<(), ClipboardError> { Ok(()) }
//! # }
//!
//! # async fn run() {
//! let mut session = QrRenderSession::builder()
//!     .encoder(Arc::new(PngQrEncoder))
//!     .clipboard(Arc::new(NoClipboard))
//!     .saver(Arc::new(DirectorySaver::new(".")))
//!     .notifier(Arc::new(LogNotifier))
//!     .runtime(tokio::runtime::Handle::current())
//!     .config(SessionConfig::default())
//!     .build();
//!
//! session.on_input_changed("hello");
//! session.process_next().await;
//! assert!(session.image().is_some());
//! # }
//! ```

use std::sync::{Arc, Mutex};

use bon::bon;
use flume::{Receiver, Sender};
use tokio::runtime::Handle;

use crate::config::{EncodeInput, SessionConfig, StaleResults};
use crate::content::{ContentCategory, format_content};
use crate::encoder::{QrEncoder, RenderedImage};
use crate::error::{ClipboardError, EncodeError, SaveError};
use crate::export::{ClipboardWriter, DOWNLOAD_FILENAME, ImageSaver, SaveOutcome};
use crate::notification::{Notification, NotificationSink};

/// Lifecycle of the displayed image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageState {
    /// Nothing to show: blank input, or no encode has succeeded yet.
    #[default]
    Empty,
    /// The image from the most recently applied successful encode.
    Ready(RenderedImage),
    /// A previous image kept after a failed encode.
    Stale(RenderedImage),
}

impl ImageState {
    /// The image to display. Ready and Stale are shown the same way.
    pub fn image(&self) -> Option<&RenderedImage> {
        match self {
            Self::Empty => None,
            Self::Ready(image) | Self::Stale(image) => Some(image),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }

    fn into_stale(self) -> Self {
        match self {
            Self::Ready(image) | Self::Stale(image) => Self::Stale(image),
            Self::Empty => Self::Empty,
        }
    }
}

/// Everything a presentation layer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub category: ContentCategory,
    pub input: String,
    pub image: ImageState,
    pub copied: bool,
}

/// Outcome of a task, queued for the owning thread.
#[derive(Debug)]
enum SessionEvent {
    Encoded {
        generation: u64,
        result: Result<RenderedImage, EncodeError>,
    },
    Copied(Result<(), ClipboardError>),
    CopyFeedbackExpired,
    Saved(Result<SaveOutcome, SaveError>),
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Queues task outcomes and wakes the presentation layer.
#[derive(Clone)]
struct EventSender {
    tx: Sender<SessionEvent>,
    waker: Arc<Mutex<Option<Waker>>>,
}

impl EventSender {
    fn send(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("Session dropped before task outcome was delivered");
            return;
        }

        let waker = self.waker.lock().ok().and_then(|guard| guard.clone());
        if let Some(wake) = waker {
            wake();
        }
    }
}

pub struct QrRenderSession {
    config: SessionConfig,
    encoder: Arc<dyn QrEncoder>,
    clipboard: Arc<dyn ClipboardWriter>,
    saver: Arc<dyn ImageSaver>,
    notifier: Arc<dyn NotificationSink>,
    runtime: Handle,

    raw_input: String,
    category: ContentCategory,
    image: ImageState,
    copied: bool,
    /// Incremented on every input change; encode outcomes carry the value
    /// they were requested under.
    generation: u64,

    events: EventSender,
    event_rx: Receiver<SessionEvent>,
    subscribers: Vec<Sender<RenderSnapshot>>,
}

impl std::fmt::Debug for QrRenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrRenderSession")
            .field("config", &self.config)
            .field("category", &self.category)
            .field("raw_input", &self.raw_input)
            .field("image", &self.image)
            .field("copied", &self.copied)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[bon]
impl QrRenderSession {
    #[builder]
    pub fn new(
        encoder: Arc<dyn QrEncoder>,
        clipboard: Arc<dyn ClipboardWriter>,
        saver: Arc<dyn ImageSaver>,
        notifier: Arc<dyn NotificationSink>,
        runtime: Handle,
        #[builder(default)] config: SessionConfig,
    ) -> Self {
        let (tx, event_rx) = flume::unbounded();
        let category = config.initial_category;

        Self {
            config,
            encoder,
            clipboard,
            saver,
            notifier,
            runtime,
            raw_input: String::new(),
            category,
            image: ImageState::Empty,
            copied: false,
            generation: 0,
            events: EventSender {
                tx,
                waker: Arc::new(Mutex::new(None)),
            },
            event_rx,
            subscribers: Vec::new(),
        }
    }
}

impl QrRenderSession {
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn input(&self) -> &str {
        &self.raw_input
    }

    pub fn category(&self) -> ContentCategory {
        self.category
    }

    /// The input formatted for the current category.
    pub fn encodable(&self) -> String {
        format_content(self.category, &self.raw_input)
    }

    pub fn image_state(&self) -> &ImageState {
        &self.image
    }

    pub fn image(&self) -> Option<&RenderedImage> {
        self.image.image()
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Number of input changes seen so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            category: self.category,
            input: self.raw_input.clone(),
            image: self.image.clone(),
            copied: self.copied,
        }
    }

    /// Receives a snapshot after every state change.
    pub fn subscribe(&mut self) -> Receiver<RenderSnapshot> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Called from task context whenever an outcome is queued.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut slot) = self.events.waker.lock() {
            *slot = Some(Arc::new(waker));
        }
    }

    pub fn on_input_changed(&mut self, text: impl Into<String>) {
        self.raw_input = text.into();
        self.generation = self.generation.wrapping_add(1);
        self.regenerate();
    }

    /// Switching category never re-encodes by itself.
    pub fn on_category_changed(&mut self, category: ContentCategory) {
        if self.category == category {
            return;
        }
        self.category = category;
        self.publish();
    }

    fn regenerate(&mut self) {
        if self.raw_input.trim().is_empty() {
            self.image = ImageState::Empty;
            self.publish();
            return;
        }

        let payload = match self.config.encode_input {
            EncodeInput::Raw => self.raw_input.clone(),
            EncodeInput::Formatted => self.encodable(),
        };
        let generation = self.generation;
        let encoder = Arc::clone(&self.encoder);
        let options = self.config.encode.clone();
        let events = self.events.clone();

        log::debug!("Encoding generation {generation}: {} bytes", payload.len());
        self.runtime.spawn(async move {
            let result = encoder.encode(&payload, &options).await;
            events.send(SessionEvent::Encoded { generation, result });
        });
    }

    /// Saves the current image as `qrcode.png`. No-op without an image.
    pub fn download(&mut self) {
        let Some(image) = self.image.image() else {
            return;
        };

        let bytes = image.png_shared();
        let saver = Arc::clone(&self.saver);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = saver.save(&bytes, DOWNLOAD_FILENAME).await;
            events.send(SessionEvent::Saved(result));
        });
    }

    /// Copies the current image to the clipboard. No-op without an image.
    pub fn copy_to_clipboard(&mut self) {
        let Some(image) = self.image.image() else {
            return;
        };

        let bytes = image.png_shared();
        let mime_type = image.mime_type();
        let clipboard = Arc::clone(&self.clipboard);
        let feedback = self.config.copy_feedback;
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = clipboard.write_image(&bytes, mime_type).await;
            let succeeded = result.is_ok();
            events.send(SessionEvent::Copied(result));

            if succeeded {
                tokio::time::sleep(feedback).await;
                events.send(SessionEvent::CopyFeedbackExpired);
            }
        });
    }

    /// Applies every queued outcome. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next outcome and applies it.
    pub async fn process_next(&mut self) {
        if let Ok(event) = self.event_rx.recv_async().await {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Encoded { generation, result } => self.apply_encoded(generation, result),
            SessionEvent::Copied(Ok(())) => {
                self.copied = true;
                self.notifier.notify(Notification::copied());
                self.publish();
            }
            SessionEvent::Copied(Err(err)) => {
                log::error!("Failed to copy QR code: {err}");
                self.notifier.notify(Notification::copy_failed());
            }
            SessionEvent::CopyFeedbackExpired => {
                if self.copied {
                    self.copied = false;
                    self.publish();
                }
            }
            SessionEvent::Saved(Ok(SaveOutcome::Saved(path))) => {
                log::info!("QR code saved to {}", path.display());
                self.notifier.notify(Notification::download_finished());
            }
            SessionEvent::Saved(Ok(SaveOutcome::Cancelled)) => {
                log::debug!("Save dialog dismissed");
            }
            SessionEvent::Saved(Err(err)) => {
                log::error!("Failed to save QR code: {err}");
                self.notifier.notify(Notification::download_failed());
            }
        }
    }

    fn apply_encoded(&mut self, generation: u64, result: Result<RenderedImage, EncodeError>) {
        if self.config.stale_results == StaleResults::Discard && generation != self.generation {
            log::debug!(
                "Discarding encode for generation {generation}, current is {}",
                self.generation
            );
            return;
        }

        match result {
            Ok(image) => {
                self.image = ImageState::Ready(image);
            }
            Err(err) => {
                log::error!("Failed to generate QR code: {err}");
                self.image = std::mem::take(&mut self.image).into_stale();
                self.notifier.notify(Notification::encode_failed());
            }
        }
        self.publish();
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }
}
