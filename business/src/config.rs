//! Session configuration, read from `QRCRAFT_*` environment variables.
//!
//! Every variable is optional; unset variables keep the generator defaults.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::content::ContentCategory;
use crate::encoder::{EncodeOptions, ErrorCorrection, MAX_MARGIN, MAX_WIDTH, QrColor};
use crate::error::ConfigError;

/// Which string the session hands to the encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodeInput {
    /// The raw input, exactly as typed.
    #[default]
    Raw,
    /// The input after category formatting (`mailto:`, `tel:`, `https://`).
    Formatted,
}

impl FromStr for EncodeInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "formatted" => Ok(Self::Formatted),
            other => Err(format!("expected raw or formatted, got {other:?}")),
        }
    }
}

/// What happens to an encode result that resolves after a newer request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleResults {
    /// Results are applied in resolution order; the last one to resolve wins.
    #[default]
    Apply,
    /// Results for anything but the latest request are dropped.
    Discard,
}

impl FromStr for StaleResults {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apply" => Ok(Self::Apply),
            "discard" => Ok(Self::Discard),
            other => Err(format!("expected apply or discard, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub encode_input: EncodeInput,
    pub stale_results: StaleResults,
    /// How long the "copied" flag stays set after a successful copy.
    pub copy_feedback: Duration,
    /// Category selected when the session starts.
    pub initial_category: ContentCategory,
    pub encode: EncodeOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            encode_input: EncodeInput::default(),
            stale_results: StaleResults::default(),
            copy_feedback: Duration::from_millis(2000),
            initial_category: ContentCategory::default(),
            encode: EncodeOptions::default(),
        }
    }
}

/// Environment variables as read, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    qrcraft_encode_input: Option<String>,
    qrcraft_stale_results: Option<String>,
    qrcraft_copy_feedback_ms: Option<String>,
    qrcraft_category: Option<String>,
    qrcraft_width: Option<String>,
    qrcraft_margin: Option<String>,
    qrcraft_dark: Option<String>,
    qrcraft_light: Option<String>,
    qrcraft_ec_level: Option<String>,
}

fn parse_var<T>(key: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(key, v.as_str(), e.to_string()))
        })
        .transpose()
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_env::from_env().map_err(|e| ConfigError::Env(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let encode_input = parse_var("QRCRAFT_ENCODE_INPUT", raw.qrcraft_encode_input)?
            .unwrap_or(defaults.encode_input);
        let stale_results = parse_var("QRCRAFT_STALE_RESULTS", raw.qrcraft_stale_results)?
            .unwrap_or(defaults.stale_results);
        let copy_feedback = parse_var::<u64>("QRCRAFT_COPY_FEEDBACK_MS", raw.qrcraft_copy_feedback_ms)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.copy_feedback);

        let initial_category = parse_var::<ContentCategory>("QRCRAFT_CATEGORY", raw.qrcraft_category)?
            .unwrap_or(defaults.initial_category);

        let width: u32 = parse_var("QRCRAFT_WIDTH", raw.qrcraft_width)?.unwrap_or(defaults.encode.width);
        if !(1..=MAX_WIDTH).contains(&width) {
            return Err(ConfigError::invalid(
                "QRCRAFT_WIDTH",
                width.to_string(),
                format!("width must be within 1..={MAX_WIDTH}"),
            ));
        }
        let margin: u32 = parse_var("QRCRAFT_MARGIN", raw.qrcraft_margin)?.unwrap_or(defaults.encode.margin);
        if margin > MAX_MARGIN {
            return Err(ConfigError::invalid(
                "QRCRAFT_MARGIN",
                margin.to_string(),
                format!("margin must be at most {MAX_MARGIN}"),
            ));
        }

        let encode = EncodeOptions {
            width,
            margin,
            dark: parse_var::<QrColor>("QRCRAFT_DARK", raw.qrcraft_dark)?.unwrap_or(defaults.encode.dark),
            light: parse_var::<QrColor>("QRCRAFT_LIGHT", raw.qrcraft_light)?
                .unwrap_or(defaults.encode.light),
            error_correction: parse_var::<ErrorCorrection>("QRCRAFT_EC_LEVEL", raw.qrcraft_ec_level)?
                .unwrap_or(defaults.encode.error_correction),
        };

        Ok(Self {
            encode_input,
            stale_results,
            copy_feedback,
            initial_category,
            encode,
        })
    }
}
