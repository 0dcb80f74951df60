use egui::{Response, TextEdit, Ui};
use qrcraft_business::QrRenderSession;

use crate::utils::colors::COLOR_MUTED;

/// Text field for the code's content, shaped by the selected category.
///
/// Text and WiFi get a multi-line editor. The session holds the only copy of
/// the input, so every edit is forwarded to it immediately.
pub fn content_input(session: &mut QrRenderSession, ui: &mut Ui) -> Response {
    let category = session.category();
    let mut text = session.input().to_owned();

    let label = ui.label("Content");
    let editor = if category.is_multiline() {
        TextEdit::multiline(&mut text).desired_rows(4)
    } else {
        TextEdit::singleline(&mut text)
    };
    let response = ui
        .add(
            editor
                .id_salt("qr_content_input")
                .hint_text(category.placeholder())
                .desired_width(f32::INFINITY),
        )
        .labelled_by(label.id);

    if response.changed() {
        session.on_input_changed(text);
    }

    if let Some(lines) = category.hint() {
        ui.add_space(4.0);
        for line in lines {
            ui.small(egui::RichText::new(*line).color(COLOR_MUTED));
        }
    }

    response
}
