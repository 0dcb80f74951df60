//! Shared color constants for the UI.

use egui::Color32;

/// Forest green for the "copied" confirmation.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red for destructive notifications.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Muted gray for placeholder text in the preview area.
pub const COLOR_MUTED: Color32 = Color32::from_rgb(128, 128, 128);

