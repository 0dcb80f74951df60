//! System clipboard writer backed by `arboard`.
//!
//! Rendered codes arrive as PNG bytes. `arboard` takes raw RGBA, so the image
//! is decoded before being handed over. The `arboard::Clipboard` is kept alive
//! for the lifetime of the writer: on X11 and Wayland the clipboard contents
//! are served by the process that owns them and vanish once it is dropped.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use qrcraft_business::{ClipboardError, ClipboardWriter, PNG_MIME};

use super::image_data::ImageData;

/// Writes PNG images to the system clipboard.
#[derive(Default, Clone)]
pub struct SystemClipboard {
    clipboard: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn write_image(&self, bytes: &[u8], mime_type: &str) -> Result<(), ClipboardError> {
        let image = decode_for_clipboard(bytes, mime_type)?;
        let clipboard = Arc::clone(&self.clipboard);

        tokio::task::spawn_blocking(move || set_clipboard_image(&clipboard, image))
            .await
            .map_err(|e| ClipboardError::AccessError(e.to_string()))?
    }
}

/// Validate the MIME type and decode the PNG into RGBA pixels.
pub fn decode_for_clipboard(bytes: &[u8], mime_type: &str) -> Result<ImageData, ClipboardError> {
    if mime_type != PNG_MIME {
        return Err(ClipboardError::UnsupportedMime(mime_type.to_owned()));
    }

    let image =
        ImageData::from_png(bytes).map_err(|e| ClipboardError::ImageError(e.to_string()))?;
    if !image.is_rgba() {
        return Err(ClipboardError::ImageError(format!(
            "decoded {}x{} image has {} bytes",
            image.width,
            image.height,
            image.bytes.len()
        )));
    }
    Ok(image)
}

fn set_clipboard_image(
    clipboard: &Mutex<Option<arboard::Clipboard>>,
    image: ImageData,
) -> Result<(), ClipboardError> {
    let mut guard = clipboard
        .lock()
        .map_err(|_| ClipboardError::AccessError("clipboard lock poisoned".to_owned()))?;

    if guard.is_none() {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;
        *guard = Some(clipboard);
    }
    let Some(clipboard) = guard.as_mut() else {
        return Err(ClipboardError::AccessError(
            "clipboard unavailable".to_owned(),
        ));
    };

    let (width, height) = (image.width, image.height);
    clipboard
        .set_image(arboard::ImageData {
            width,
            height,
            bytes: Cow::Owned(image.bytes),
        })
        .map_err(|e| ClipboardError::AccessError(e.to_string()))?;

    log::info!("Copied {width}x{height} image to the clipboard");
    Ok(())
}
