//! Decoding rendered PNG bytes into pixel data for display and the clipboard.

use image::ImageFormat;

/// Decoded RGBA8 image.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    /// Unpremultiplied RGBA, 4 bytes per pixel.
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(width: usize, height: usize, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes,
        }
    }

    /// Decode a PNG image into RGBA8.
    pub fn from_png(png: &[u8]) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory_with_format(png, ImageFormat::Png)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::new(width as usize, height as usize, rgba.into_raw()))
    }

    /// Returns true if the byte length matches `width * height * 4`.
    pub fn is_rgba(&self) -> bool {
        self.width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(4))
            == Some(self.bytes.len())
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.bytes)
    }
}
