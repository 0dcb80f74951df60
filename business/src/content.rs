//! Content categories and the formatter that turns user input into the
//! string a QR code should carry.
//!
//! The formatter is a total function: any string is accepted and category
//! specific syntax (for example the WiFi payload) is never validated.

use std::fmt;
use std::str::FromStr;

/// What kind of content the user is typing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    #[default]
    Text,
    Url,
    Email,
    Phone,
    Wifi,
}

impl ContentCategory {
    /// Every category, in selector order.
    pub const ALL: [Self; 5] = [Self::Text, Self::Url, Self::Email, Self::Phone, Self::Wifi];

    /// Lowercase identifier, also accepted by [`FromStr`].
    pub fn id(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Wifi => "wifi",
        }
    }

    /// Label shown in the category selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Url => "URL / Website",
            Self::Email => "E-mail",
            Self::Phone => "Phone",
            Self::Wifi => "WiFi",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Text => "Type your text here...",
            Self::Url => "https://example.com",
            Self::Email => "contact@example.com",
            Self::Phone => "+55 11 99999-9999",
            Self::Wifi => "WIFI:T:WPA;S:NetworkName;P:password123;;",
        }
    }

    /// Text and WiFi payloads get a multi-line editor, the rest a single line.
    pub fn is_multiline(self) -> bool {
        matches!(self, Self::Text | Self::Wifi)
    }

    /// Format help displayed under the input, if the category has any.
    pub fn hint(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Wifi => Some(&[
                "WiFi format:",
                "WIFI:T:WPA;S:NetworkName;P:password123;;",
                "T = type (WPA/WEP), S = network name, P = password",
            ]),
            _ => None,
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown content category: {:?}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for ContentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Maps raw input to the canonical string for its category.
///
/// - Email gets a `mailto:` prefix unless the value already contains one.
/// - Phone gets a `tel:` prefix unless the value already contains one.
/// - URL gets `https://` unless the value already starts with `http`.
/// - Text and WiFi are returned unchanged.
pub fn format_content(category: ContentCategory, value: &str) -> String {
    match category {
        ContentCategory::Email if !value.contains("mailto:") => format!("mailto:{value}"),
        ContentCategory::Phone if !value.contains("tel:") => format!("tel:{value}"),
        ContentCategory::Url if !value.starts_with("http") => format!("https://{value}"),
        _ => value.to_owned(),
    }
}
