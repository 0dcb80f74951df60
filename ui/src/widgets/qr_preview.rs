//! Preview of the rendered code together with its Download and Copy actions.

use std::sync::Arc;

use egui::{Context, Image, RichText, TextureHandle, TextureOptions, Ui, vec2};
use qrcraft_business::{RenderSnapshot, RenderedImage};

use crate::utils::colors::{COLOR_GREEN, COLOR_MUTED};
use crate::utils::image_data::ImageData;

/// Edge length of the preview, in points.
pub const PREVIEW_SIZE: f32 = 256.0;

/// GPU texture for the currently displayed image.
///
/// Re-uploaded only when the session hands out a different image; identity is
/// the shared PNG buffer, so re-rendering the same frame costs nothing.
#[derive(Default)]
pub struct PreviewTexture {
    current: Option<(Arc<[u8]>, Option<TextureHandle>)>,
}

impl std::fmt::Debug for PreviewTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewTexture")
            .field("loaded", &self.current.is_some())
            .finish()
    }
}

impl PreviewTexture {
    pub fn texture_for(&mut self, ctx: &Context, image: &RenderedImage) -> Option<&TextureHandle> {
        let png = image.png_shared();
        let up_to_date = matches!(&self.current, Some((source, _)) if Arc::ptr_eq(source, &png));

        if !up_to_date {
            let texture = match ImageData::from_png(&png) {
                Ok(data) => Some(ctx.load_texture(
                    "qr_preview",
                    data.to_color_image(),
                    TextureOptions::NEAREST,
                )),
                Err(e) => {
                    log::error!("Failed to decode QR preview: {e}");
                    None
                }
            };
            self.current = Some((png, texture));
        }

        self.current.as_ref().and_then(|(_, texture)| texture.as_ref())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.current, Some((_, Some(_))))
    }
}

/// Export requested from the preview's buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    Download,
    Copy,
}

/// Draws `snapshot`'s image, or a placeholder when there is none.
///
/// Returns the button the user clicked this frame, if any.
pub fn qr_preview(
    snapshot: &RenderSnapshot,
    texture: &mut PreviewTexture,
    ui: &mut Ui,
) -> Option<PreviewAction> {
    let Some(image) = snapshot.image.image() else {
        texture.clear();
        ui.allocate_ui(vec2(PREVIEW_SIZE, PREVIEW_SIZE), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Type something to generate your QR code").color(COLOR_MUTED),
                );
            });
        });
        return None;
    };

    let mut action = None;
    ui.vertical_centered(|ui| {
        if let Some(handle) = texture.texture_for(ui.ctx(), image) {
            ui.add(
                Image::new(handle)
                    .fit_to_exact_size(vec2(PREVIEW_SIZE, PREVIEW_SIZE))
                    .alt_text("QR code"),
            );
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Download").clicked() {
                action = Some(PreviewAction::Download);
            }

            let copy_label = if snapshot.copied {
                RichText::new("✔ Copied!").color(COLOR_GREEN)
            } else {
                RichText::new("Copy")
            };
            if ui.button(copy_label).clicked() {
                action = Some(PreviewAction::Copy);
            }
        });
    });
    action
}
