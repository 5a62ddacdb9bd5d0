//! Reader typography and theme settings.
//!
//! Settings are persisted as one JSON object under [`SETTINGS_KEY`]. Loading
//! is a shallow merge over [`ReaderSettings::default`]: missing keys keep
//! their defaults, known keys override, unknown keys are ignored.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{ReaderSettings, Theme};
//! use serde_json::json;
//!
//! let settings = ReaderSettings::merge(&json!({ "theme": "dark", "fontSize": "20", "extra": true }));
//! assert_eq!(settings.theme, Theme::Dark);
//! assert_eq!(settings.font_size, 20);
//! assert_eq!(settings.width, 800);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store key holding the settings blob.
pub const SETTINGS_KEY: &str = "readerSettings";

/// Font stack appended to every chosen family.
pub const FALLBACK_FONTS: &str =
    r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Oxygen, Ubuntu, Cantarell, sans-serif"#;

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the system color scheme.
    Auto,
}

impl Theme {
    /// Body class for this theme; `Auto` follows `prefers_dark`.
    pub fn body_class(self, prefers_dark: bool) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
            Theme::Auto if prefers_dark => "theme-dark",
            Theme::Auto => "theme-light",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            _ => Err(format!("Invalid theme: {}. Valid options: light, dark, auto", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "500")]
    Medium,
    #[serde(rename = "bold")]
    Bold,
}

impl FontWeight {
    pub fn as_css(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Medium => "500",
            FontWeight::Bold => "bold",
        }
    }
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "500" | "medium" => Ok(Self::Medium),
            "bold" => Ok(Self::Bold),
            _ => Err(format!("Invalid font weight: {}. Valid options: normal, 500, bold", s)),
        }
    }
}

/// User-adjustable typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderSettings {
    /// Body font size in pixels.
    #[serde(deserialize_with = "number_or_string")]
    pub font_size: u32,
    /// A font family name, `system-ui`, or `custom` to use `custom_font`.
    pub font_family: String,
    pub custom_font: String,
    #[serde(deserialize_with = "number_or_string")]
    pub line_height: f64,
    /// Content column width in pixels.
    #[serde(deserialize_with = "number_or_string")]
    pub width: u32,
    pub theme: Theme,
    pub font_weight: FontWeight,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_size: 18,
            font_family: "system-ui".to_string(),
            custom_font: String::new(),
            line_height: 1.6,
            width: 800,
            theme: Theme::Light,
            font_weight: FontWeight::Normal,
        }
    }
}

impl ReaderSettings {
    /// Shallow-merges a stored blob over the defaults.
    ///
    /// Each stored key is applied on its own; a key whose value does not fit
    /// the field is skipped and the default kept.
    pub fn merge(stored: &Value) -> Self {
        Self::merge_onto(&Self::default(), stored)
    }

    /// Shallow-merges a stored blob over `base`.
    pub fn merge_onto(base: &Self, stored: &Value) -> Self {
        let Value::Object(stored) = stored else {
            tracing::warn!("stored settings are not an object, keeping current values");
            return base.clone();
        };

        let mut merged = match serde_json::to_value(base) {
            Ok(Value::Object(map)) => map,
            _ => return base.clone(),
        };

        for (key, value) in stored {
            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            if serde_json::from_value::<Self>(Value::Object(candidate.clone())).is_ok() {
                merged = candidate;
            } else {
                tracing::warn!(key = %key, "ignoring invalid stored setting");
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or_else(|_| base.clone())
    }

    /// The CSS `font-family` value for the current choice.
    pub fn font_stack(&self) -> String {
        let family = if self.font_family == "custom" {
            self.custom_font.trim()
        } else {
            self.font_family.trim()
        };

        if family.is_empty() || family == "system-ui" {
            FALLBACK_FONTS.to_string()
        } else {
            format!("\"{}\", {}", family, FALLBACK_FONTS)
        }
    }

    /// Inline style for the reader container.
    pub fn container_style(&self) -> String {
        format!(
            "--reader-width: {}px; font-size: {}px; font-family: {}; --reader-line-height: {}; font-weight: {}",
            self.width,
            self.font_size,
            self.font_stack(),
            self.line_height,
            self.font_weight.as_css()
        )
    }

    /// Inline style for paragraphs and list items.
    pub fn text_style(&self) -> String {
        format!("font-size: {}px; font-weight: {}", self.font_size, self.font_weight.as_css())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

/// Accepts `18` as well as `"18"`; range inputs report their value as text.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = ReaderSettings::default();
        assert_eq!(settings.font_size, 18);
        assert_eq!(settings.font_family, "system-ui");
        assert_eq!(settings.custom_font, "");
        assert_eq!(settings.line_height, 1.6);
        assert_eq!(settings.width, 800);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_weight, FontWeight::Normal);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let value = serde_json::to_value(ReaderSettings::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "fontSize": 18,
                "fontFamily": "system-ui",
                "customFont": "",
                "lineHeight": 1.6,
                "width": 800,
                "theme": "light",
                "fontWeight": "normal"
            })
        );
    }

    #[test]
    fn test_merge_overrides_known_keys() {
        let settings = ReaderSettings::merge(&json!({ "width": 1000, "fontWeight": "500", "theme": "auto" }));
        assert_eq!(settings.width, 1000);
        assert_eq!(settings.font_weight, FontWeight::Medium);
        assert_eq!(settings.theme, Theme::Auto);
        assert_eq!(settings.font_size, 18);
    }

    #[test]
    fn test_merge_accepts_string_numbers() {
        let settings = ReaderSettings::merge(&json!({ "fontSize": "22", "lineHeight": "1.8", "width": "650" }));
        assert_eq!(settings.font_size, 22);
        assert_eq!(settings.line_height, 1.8);
        assert_eq!(settings.width, 650);
    }

    #[test]
    fn test_merge_skips_invalid_keys_only() {
        let settings = ReaderSettings::merge(&json!({ "theme": "sepia", "fontSize": 24 }));
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size, 24);
    }

    #[test]
    fn test_merge_non_object_keeps_base() {
        let base = ReaderSettings { width: 900, ..Default::default() };
        assert_eq!(ReaderSettings::merge_onto(&base, &json!("nope")), base);
    }

    #[test]
    fn test_font_stack() {
        let mut settings = ReaderSettings::default();
        assert_eq!(settings.font_stack(), FALLBACK_FONTS);

        settings.font_family = "Georgia".into();
        assert_eq!(settings.font_stack(), format!("\"Georgia\", {}", FALLBACK_FONTS));

        settings.font_family = "custom".into();
        assert_eq!(settings.font_stack(), FALLBACK_FONTS);

        settings.custom_font = "Fira Sans".into();
        assert_eq!(settings.font_stack(), format!("\"Fira Sans\", {}", FALLBACK_FONTS));
    }

    #[test]
    fn test_theme_body_class() {
        assert_eq!(Theme::Light.body_class(true), "theme-light");
        assert_eq!(Theme::Dark.body_class(false), "theme-dark");
        assert_eq!(Theme::Auto.body_class(true), "theme-dark");
        assert_eq!(Theme::Auto.body_class(false), "theme-light");
    }

    #[test]
    fn test_container_style() {
        let settings = ReaderSettings { width: 700, font_weight: FontWeight::Bold, ..Default::default() };
        let style = settings.container_style();
        assert!(style.starts_with("--reader-width: 700px; font-size: 18px; font-family: -apple-system"));
        assert!(style.ends_with("--reader-line-height: 1.6; font-weight: bold"));
        assert_eq!(settings.text_style(), "font-size: 18px; font-weight: bold");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!("500".parse::<FontWeight>().unwrap(), FontWeight::Medium);
        assert!("thin".parse::<FontWeight>().is_err());
    }
}
