mod category_select;
mod content_input;
pub mod qr_preview;
pub mod toasts;

pub use category_select::category_select;
pub use content_input::content_input;
pub use qr_preview::{PreviewAction, PreviewTexture, qr_preview};
pub use toasts::{Toast, ToastQueue, toasts};
