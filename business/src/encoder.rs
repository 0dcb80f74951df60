//! The encode-to-image primitive.
//!
//! QR matrix computation is delegated to the `qrcode` crate. This module only
//! rasterizes the matrix into a fixed-width RGBA image with a quiet-zone margin
//! and a two-tone palette, then encodes it as PNG.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder as _, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

use crate::error::EncodeError;

/// MIME type of every [`RenderedImage`].
pub const PNG_MIME: &str = "image/png";

/// Pixels per module used when the requested width cannot fit the symbol.
const FALLBACK_SCALE: u32 = 4;

/// Largest accepted `EncodeOptions::width`, in pixels.
pub const MAX_WIDTH: u32 = 4096;

/// Largest accepted `EncodeOptions::margin`, in modules.
pub const MAX_MARGIN: u32 = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => Self::L,
            ErrorCorrection::Medium => Self::M,
            ErrorCorrection::Quartile => Self::Q,
            ErrorCorrection::High => Self::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            other => Err(format!("expected one of L, M, Q, H, got {other:?}")),
        }
    }
}

/// An RGBA colour, parsed from `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct QrColor(pub [u8; 4]);

impl QrColor {
    pub const DARK: Self = Self([0x1a, 0x1a, 0x1a, 0xff]);
    pub const LIGHT: Self = Self([0xff, 0xff, 0xff, 0xff]);

    pub fn rgba(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Debug for QrColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl FromStr for QrColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("expected #rrggbb or #rrggbbaa, got {s:?}"));
        }

        let mut rgba = [0xff; 4];
        for (slot, chunk) in rgba.iter_mut().zip(hex.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(chunk).map_err(|e| e.to_string())?;
            *slot = u8::from_str_radix(pair, 16).map_err(|e| format!("{pair:?}: {e}"))?;
        }
        Ok(Self(rgba))
    }
}

/// Rendering parameters handed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Requested image width in pixels.
    pub width: u32,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub dark: QrColor,
    pub light: QrColor,
    pub error_correction: ErrorCorrection,
}

impl EncodeOptions {
    /// Rejects sizes that would overflow or allocate unbounded images.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.width == 0 || self.width > MAX_WIDTH {
            return Err(EncodeError::InvalidOptions(format!(
                "width {} is outside 1..={MAX_WIDTH}",
                self.width
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(EncodeError::InvalidOptions(format!(
                "margin {} is outside 0..={MAX_MARGIN}",
                self.margin
            )));
        }
        Ok(())
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            width: 300,
            margin: 2,
            dark: QrColor::DARK,
            light: QrColor::LIGHT,
            error_correction: ErrorCorrection::Medium,
        }
    }
}

/// A successfully encoded QR code image.
///
/// Cloning is cheap: the PNG bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedImage {
    png: Arc<[u8]>,
    width: u32,
    height: u32,
    payload: String,
}

impl RenderedImage {
    pub fn new(png: impl Into<Arc<[u8]>>, width: u32, height: u32, payload: impl Into<String>) -> Self {
        Self {
            png: png.into(),
            width,
            height,
            payload: payload.into(),
        }
    }

    /// Encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn png_shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.png)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The exact string that was encoded into this image.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn mime_type(&self) -> &'static str {
        PNG_MIME
    }
}

impl fmt::Debug for RenderedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedImage")
            .field("payload", &self.payload)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// Turns a string into a QR code image.
#[async_trait]
pub trait QrEncoder: Send + Sync {
    async fn encode(&self, payload: &str, options: &EncodeOptions) -> Result<RenderedImage, EncodeError>;
}

/// Production encoder: `qrcode` matrix, rasterized and PNG-encoded off the
/// async worker threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngQrEncoder;

#[async_trait]
impl QrEncoder for PngQrEncoder {
    async fn encode(&self, payload: &str, options: &EncodeOptions) -> Result<RenderedImage, EncodeError> {
        if payload.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }

        let payload = payload.to_owned();
        let options = options.clone();
        tokio::task::spawn_blocking(move || render_png(&payload, &options))
            .await
            .map_err(|e| EncodeError::Task(e.to_string()))?
    }
}

/// Rasterizes `payload` into an RGBA image.
///
/// The symbol plus margin spans `modules` cells. When `options.width` can hold
/// at least one pixel per cell the scale is fractional (`width / modules`) and
/// the image is exactly `width` wide; otherwise each cell is 4 pixels.
pub fn render_rgba(payload: &str, options: &EncodeOptions) -> Result<RgbaImage, EncodeError> {
    if payload.is_empty() {
        return Err(EncodeError::EmptyPayload);
    }
    options.validate()?;

    let code = QrCode::with_error_correction_level(payload.as_bytes(), options.error_correction.into())
        .map_err(|e| EncodeError::qr(payload.len(), e.to_string()))?;

    let size = code.width();
    let colors = code.to_colors();
    let modules = u32::try_from(size)
        .ok()
        .zip(options.margin.checked_mul(2))
        .and_then(|(size, margins)| size.checked_add(margins))
        .ok_or_else(|| EncodeError::InvalidOptions(format!("margin {} is too large", options.margin)))?;

    let scale = if options.width >= modules {
        f64::from(options.width) / f64::from(modules)
    } else {
        f64::from(FALLBACK_SCALE)
    };
    let side = (f64::from(modules) * scale).floor() as u32;
    let scaled_margin = f64::from(options.margin) * scale;
    let inner_end = f64::from(side) - scaled_margin;

    let dark = Rgba(options.dark.rgba());
    let light = Rgba(options.light.rgba());

    let image = RgbaImage::from_fn(side, side, |x, y| {
        let (px, py) = (f64::from(x), f64::from(y));
        let inside = px >= scaled_margin && py >= scaled_margin && px < inner_end && py < inner_end;
        if !inside {
            return light;
        }

        let col = (((px - scaled_margin) / scale) as usize).min(size - 1);
        let row = (((py - scaled_margin) / scale) as usize).min(size - 1);
        match colors[row * size + col] {
            qrcode::Color::Dark => dark,
            qrcode::Color::Light => light,
        }
    });

    Ok(image)
}

/// Rasterizes and PNG-encodes `payload`.
pub fn render_png(payload: &str, options: &EncodeOptions) -> Result<RenderedImage, EncodeError> {
    let image = render_rgba(payload, options)?;
    let (width, height) = image.dimensions();

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::Png(e.to_string()))?;

    log::debug!(
        "Rendered QR code: payload_len={}, size={width}x{height}, png_bytes={}",
        payload.len(),
        png.len()
    );

    Ok(RenderedImage::new(png, width, height, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_match_generator_defaults() {
        let options = EncodeOptions::default();
        assert_eq!(options.width, 300);
        assert_eq!(options.margin, 2);
        assert_eq!(options.dark, QrColor::DARK);
        assert_eq!(options.light, QrColor::LIGHT);
        assert_eq!(options.error_correction, ErrorCorrection::Medium);
    }

    #[test]
    fn test_render_is_requested_width() {
        let image = render_rgba("hello", &EncodeOptions::default()).expect("hello should encode");
        assert_eq!(image.dimensions(), (300, 300));
    }

    #[test]
    fn test_margin_is_light_and_finder_is_dark() {
        let options = EncodeOptions::default();
        let image = render_rgba("hello", &options).expect("hello should encode");

        // "hello" fits version 1: 21 modules + 2 * 2 margin = 25 cells, 12 px each.
        assert_eq!(*image.get_pixel(0, 0), Rgba(QrColor::LIGHT.rgba()));
        assert_eq!(*image.get_pixel(23, 23), Rgba(QrColor::LIGHT.rgba()));
        assert_eq!(*image.get_pixel(24, 24), Rgba(QrColor::DARK.rgba()));
        assert_eq!(*image.get_pixel(30, 30), Rgba(QrColor::DARK.rgba()));
        assert_eq!(*image.get_pixel(299, 299), Rgba(QrColor::LIGHT.rgba()));
    }

    #[test]
    fn test_too_small_width_falls_back_to_fixed_scale() {
        let options = EncodeOptions {
            width: 10,
            ..EncodeOptions::default()
        };
        let image = render_rgba("hello", &options).expect("hello should encode");
        assert_eq!(image.dimensions(), (100, 100));
    }

    #[test]
    fn test_custom_colors_are_used() {
        let options = EncodeOptions {
            dark: "#ff0000".parse().expect("valid colour"),
            light: "#00ff0080".parse().expect("valid colour"),
            ..EncodeOptions::default()
        };
        let image = render_rgba("hello", &options).expect("hello should encode");
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 255, 0, 128]));
        assert_eq!(*image.get_pixel(30, 30), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_payload_too_long_fails() {
        let payload = "x".repeat(3000);
        let err = render_rgba(&payload, &EncodeOptions::default()).expect_err("should not fit");
        assert!(matches!(err, EncodeError::Qr { len: 3000, .. }));
    }

    #[test]
    fn test_empty_payload_fails() {
        assert!(matches!(
            render_rgba("", &EncodeOptions::default()),
            Err(EncodeError::EmptyPayload)
        ));
    }

    #[test]
    fn test_png_output_decodes_back() {
        let rendered = render_png("hello", &EncodeOptions::default()).expect("hello should encode");
        assert_eq!(rendered.payload(), "hello");
        assert!(rendered.png().starts_with(&[0x89, b'P', b'N', b'G']));

        let decoded = image::load_from_memory_with_format(rendered.png(), image::ImageFormat::Png)
            .expect("PNG should decode");
        assert_eq!(decoded.width(), rendered.width());
        assert_eq!(decoded.height(), rendered.height());
    }

    #[test]
    fn test_png_signature() {
        let rendered = render_png("hello", &EncodeOptions::default()).expect("hello should encode");
        assert!(rendered.png().starts_with(b"\x89PNG\r\n\x1a\n"));
        assert_eq!(rendered.mime_type(), PNG_MIME);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("#1a1a1a".parse::<QrColor>(), Ok(QrColor::DARK));
        assert_eq!("ffffff".parse::<QrColor>(), Ok(QrColor::LIGHT));
        assert!("#fff".parse::<QrColor>().is_err());
        assert!("#gggggg".parse::<QrColor>().is_err());
        assert!("#+f+f+f".parse::<QrColor>().is_err());
        assert!("#1a1a1a-1".parse::<QrColor>().is_err());
        assert_eq!(format!("{:?}", QrColor::DARK), "#1a1a1aff");
    }

    #[test]
    fn test_oversized_options_fail_instead_of_panicking() {
        let huge_margin = EncodeOptions {
            margin: u32::MAX,
            ..EncodeOptions::default()
        };
        assert!(matches!(
            render_rgba("hello", &huge_margin),
            Err(EncodeError::InvalidOptions(_))
        ));

        let huge_width = EncodeOptions {
            width: 4_000_000_000,
            ..EncodeOptions::default()
        };
        assert!(matches!(
            render_png("hello", &huge_width),
            Err(EncodeError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_largest_options_render() {
        let options = EncodeOptions {
            width: MAX_WIDTH,
            margin: MAX_MARGIN,
            ..EncodeOptions::default()
        };
        let image = render_rgba("hello", &options).expect("limits should render");
        assert!((MAX_WIDTH - 1..=MAX_WIDTH).contains(&image.width()));
    }

    #[test]
    fn test_error_correction_parsing() {
        assert_eq!("M".parse::<ErrorCorrection>(), Ok(ErrorCorrection::Medium));
        assert_eq!("high".parse::<ErrorCorrection>(), Ok(ErrorCorrection::High));
        assert!("x".parse::<ErrorCorrection>().is_err());
    }

    #[tokio::test]
    async fn test_png_encoder_async() {
        let rendered = PngQrEncoder
            .encode("https://example.com", &EncodeOptions::default())
            .await
            .expect("url should encode");
        assert_eq!(rendered.width(), 300);
        assert_eq!(rendered.payload(), "https://example.com");
    }
}
