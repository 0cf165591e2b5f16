//! Validated CSS color values for note cards

use crate::error::{NotesError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Background color of a freshly created note
pub const DEFAULT_BACKGROUND_COLOR: &str = "white";

/// Text color of a freshly created note
pub const DEFAULT_TEXT_COLOR: &str = "black";

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-f]{3}|[0-9a-f]{4}|[0-9a-f]{6}|[0-9a-f]{8})$").expect("valid regex")
});

static FUNCTIONAL_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:rgb|rgba|hsl|hsla)\(\s*[0-9.+\-%]+(?:\s*[,/ ]\s*[0-9.+\-%]+){2,3}\s*\)$")
        .expect("valid regex")
});

static NAMED_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{3,24}$").expect("valid regex"));

/// A CSS color string: hex, `rgb()`/`rgba()`/`hsl()`/`hsla()` or a color name.
///
/// Values are stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse and normalize a user supplied color
    pub fn parse(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(NotesError::invalid_color(value, "color must not be empty"));
        }

        if normalized.starts_with('#') {
            if HEX_COLOR.is_match(&normalized) {
                return Ok(Self(normalized));
            }
            return Err(NotesError::invalid_color(
                value,
                "hex colors take 3, 4, 6 or 8 hex digits",
            ));
        }

        if normalized.contains('(') {
            if FUNCTIONAL_COLOR.is_match(&normalized) {
                return Ok(Self(normalized));
            }
            return Err(NotesError::invalid_color(
                value,
                "expected rgb(), rgba(), hsl() or hsla() with 3 or 4 components",
            ));
        }

        if NAMED_COLOR.is_match(&normalized) {
            return Ok(Self(normalized));
        }

        Err(NotesError::invalid_color(
            value,
            "expected a hex value, a color function or a color name",
        ))
    }

    /// Parse a persisted color, falling back to `default` when it is empty
    /// or unparseable.
    pub fn parse_or(value: &str, default: &Color) -> Self {
        Self::parse(value).unwrap_or_else(|_| default.clone())
    }

    /// The default card background
    pub fn default_background() -> Self {
        Self(DEFAULT_BACKGROUND_COLOR.to_string())
    }

    /// The default content text color
    pub fn default_text() -> Self {
        Self(DEFAULT_TEXT_COLOR.to_string())
    }

    /// The normalized CSS text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Color {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = NotesError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_forms() {
        for value in [
            "#fff",
            "#FFEE88",
            "#ffee8880",
            "rgb(255, 0, 0)",
            "rgba(0, 0, 0, 0.5)",
            "hsl(120 50% 50%)",
            "LightYellow",
            "  teal ",
        ] {
            assert!(Color::parse(value).is_ok(), "{} should parse", value);
        }
    }

    #[test]
    fn test_normalizes() {
        assert_eq!(Color::parse(" #ABCDEF ").unwrap().as_str(), "#abcdef");
        assert_eq!(Color::parse("Red").unwrap().as_str(), "red");
    }

    #[test]
    fn test_rejects_garbage() {
        for value in ["", "   ", "#12", "#ggg", "rgb(1,2)", "red; background: url(x)", "x"] {
            assert!(
                matches!(Color::parse(value), Err(NotesError::InvalidColor { .. })),
                "{:?} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_parse_or_falls_back() {
        let default = Color::default_background();
        assert_eq!(Color::parse_or("", &default), default);
        assert_eq!(Color::parse_or("#zzz", &default), default);
        assert_eq!(Color::parse_or("navy", &default).as_str(), "navy");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Color = serde_json::from_str("\"#00FF00\"").unwrap();
        assert_eq!(ok.as_str(), "#00ff00");
        assert!(serde_json::from_str::<Color>("\"#0\"").is_err());
    }
}
