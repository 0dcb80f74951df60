//! Transient user-facing notifications ("toasts").

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Normal,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn normal(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Normal,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }

    pub fn encode_failed() -> Self {
        Self::destructive("Error", "Could not generate the QR code")
    }

    pub fn download_finished() -> Self {
        Self::normal("Download complete", "QR code saved successfully!")
    }

    pub fn download_failed() -> Self {
        Self::destructive("Error", "Could not save the QR code")
    }

    pub fn copied() -> Self {
        Self::normal("Copied!", "QR code copied to the clipboard")
    }

    pub fn copy_failed() -> Self {
        Self::destructive("Error", "Could not copy the QR code")
    }
}

/// Displays notifications. Fire-and-forget: nothing is returned.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that only logs. Useful for headless drivers.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Normal => log::info!("{}: {}", notification.title, notification.description),
            Severity::Destructive => {
                log::warn!("{}: {}", notification.title, notification.description);
            }
        }
    }
}
