use thiserror::Error;

/// Failure of the encode-to-image primitive.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Nothing to encode: payload is empty")]
    EmptyPayload,
    #[error("Payload of {len} bytes does not fit a QR code: {reason}")]
    Qr { len: usize, reason: String },
    #[error("Invalid render options: {0}")]
    InvalidOptions(String),
    #[error("Failed to encode PNG: {0}")]
    Png(String),
    #[error("Encode task did not complete: {0}")]
    Task(String),
}

impl EncodeError {
    pub fn qr(len: usize, reason: impl Into<String>) -> Self {
        Self::Qr {
            len,
            reason: reason.into(),
        }
    }
}

/// Failure of a clipboard image write.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Unsupported clipboard MIME type: {0}")]
    UnsupportedMime(String),
    #[error("Image processing error: {0}")]
    ImageError(String),
    #[error("Clipboard access error: {0}")]
    AccessError(String),
}

/// Failure of a file save.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Save task did not complete: {0}")]
    Task(String),
}

/// Invalid value in the environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(String),
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
