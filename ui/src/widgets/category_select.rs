use egui::{ComboBox, Response, Ui};
use qrcraft_business::{ContentCategory, QrRenderSession};

/// Combo box over every [`ContentCategory`].
pub fn category_select(session: &mut QrRenderSession, ui: &mut Ui) -> Response {
    let mut selected = session.category();

    let response = ComboBox::from_label("QR code type")
        .selected_text(selected.label())
        .show_ui(ui, |ui| {
            for category in ContentCategory::ALL {
                ui.selectable_value(&mut selected, category, category.label());
            }
        })
        .response;

    if selected != session.category() {
        log::debug!("Category changed to {selected}");
        session.on_category_changed(selected);
    }

    response
}
