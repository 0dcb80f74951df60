//! Domain logic for QRCraft: content formatting, QR rendering, export and the
//! render session that ties them together. Nothing in this crate depends on a
//! UI toolkit.

pub mod config;
pub mod content;
pub mod encoder;
pub mod error;
pub mod export;
pub mod notification;
pub mod session;

pub use config::{EncodeInput, RawConfig, SessionConfig, StaleResults};
pub use content::{ContentCategory, UnknownCategory, format_content};
pub use encoder::{
    EncodeOptions, ErrorCorrection, MAX_MARGIN, MAX_WIDTH, PNG_MIME, PngQrEncoder, QrColor, QrEncoder, RenderedImage,
    render_png, render_rgba,
};
pub use error::{ClipboardError, ConfigError, EncodeError, SaveError};
pub use export::{ClipboardWriter, DOWNLOAD_FILENAME, DirectorySaver, ImageSaver, SaveOutcome};
pub use notification::{LogNotifier, Notification, NotificationSink, Severity};
pub use session::{ImageState, QrRenderSession, RenderSnapshot};
